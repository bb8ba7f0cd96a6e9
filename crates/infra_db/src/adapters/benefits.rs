//! PostgreSQL Claim Store
//!
//! Implements [`ClaimStore`] over the `benefit_documents` table. `save` is a
//! single conditional `UPDATE`; when it matches no row a follow-up read
//! decides between "owner unknown" and "someone else wrote first".
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::PostgresClaimStore;
//! use domain_claims::{ClaimStore, ClaimsService};
//! use std::sync::Arc;
//!
//! let store: Arc<dyn ClaimStore> = Arc::new(PostgresClaimStore::new(pool));
//! let service = ClaimsService::with_defaults(store);
//! ```

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, instrument, warn};

use core_kernel::{DomainPort, HealthCheckResult, HealthCheckable, Owner};
use domain_claims::{BenefitDocument, ClaimStore, DocumentVersion, StoreError, VersionedDocument};

use crate::error::DatabaseError;
use crate::repositories::benefits::{BenefitDocumentRow, BenefitsRepository};

const ADAPTER_ID: &str = "postgres-claim-store";

/// PostgreSQL-backed implementation of the ClaimStore port
#[derive(Debug, Clone)]
pub struct PostgresClaimStore {
    repository: BenefitsRepository,
    pool: PgPool,
}

impl PostgresClaimStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: BenefitsRepository::new(pool.clone()),
            pool,
        }
    }

    /// Returns the underlying repository, for operations the port doesn't expose
    pub fn repository(&self) -> &BenefitsRepository {
        &self.repository
    }
}

impl DomainPort for PostgresClaimStore {}

#[async_trait]
impl HealthCheckable for PostgresClaimStore {
    async fn health_check(&self) -> HealthCheckResult {
        let start = std::time::Instant::now();

        let result = sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await;

        let latency_ms = start.elapsed().as_millis() as u64;
        match result {
            Ok(_) => HealthCheckResult::healthy(ADAPTER_ID, latency_ms),
            Err(e) => HealthCheckResult::unhealthy(ADAPTER_ID, latency_ms, format!("Database error: {}", e)),
        }
    }
}

#[async_trait]
impl ClaimStore for PostgresClaimStore {
    #[instrument(skip(self), fields(owner = %owner))]
    async fn load(&self, owner: &Owner) -> Result<VersionedDocument, StoreError> {
        let row = self
            .repository
            .fetch(owner.as_str())
            .await?
            .ok_or_else(|| StoreError::NotFound(owner.clone()))?;

        let snapshot = versioned_document(owner, row)?;
        debug!(version = %snapshot.version, policies = snapshot.document.policies.len(), "benefit document loaded");
        Ok(snapshot)
    }

    #[instrument(skip(self, document), fields(owner = %document.owner, expected = %expected))]
    async fn save(
        &self,
        document: &BenefitDocument,
        expected: DocumentVersion,
    ) -> Result<DocumentVersion, StoreError> {
        let owner = document.owner.as_str();
        let swapped = self
            .repository
            .compare_and_swap(owner, &document.policies, to_db_version(expected)?)
            .await?;

        match swapped {
            Some(version) => {
                let version = from_db_version(version)?;
                debug!(version = %version, "benefit document saved");
                Ok(version)
            }
            None => {
                let actual = self
                    .repository
                    .fetch_version(owner)
                    .await?
                    .map(from_db_version)
                    .transpose()?;
                let Some(actual) = actual else {
                    return Err(StoreError::NotFound(document.owner.clone()));
                };
                warn!(actual = %actual, "benefit document version moved on");
                Err(StoreError::VersionConflict {
                    owner: document.owner.clone(),
                    expected,
                    actual: Some(actual),
                })
            }
        }
    }

    #[instrument(skip(self, document), fields(owner = %document.owner))]
    async fn insert(&self, document: &BenefitDocument) -> Result<DocumentVersion, StoreError> {
        let initial = to_db_version(DocumentVersion::initial())?;
        match self
            .repository
            .insert(document.owner.as_str(), &document.policies, initial)
            .await
        {
            Ok(version) => from_db_version(version),
            Err(DatabaseError::DuplicateEntry(_)) => {
                Err(StoreError::AlreadyExists(document.owner.clone()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

fn to_db_version(version: DocumentVersion) -> Result<i64, StoreError> {
    i64::try_from(version.as_raw())
        .map_err(|_| StoreError::Corrupted(format!("version {} does not fit the version column", version)))
}

fn from_db_version(version: i64) -> Result<DocumentVersion, StoreError> {
    u64::try_from(version)
        .ok()
        .filter(|v| *v >= DocumentVersion::initial().as_raw())
        .map(DocumentVersion::from_raw)
        .ok_or_else(|| StoreError::Corrupted(format!("invalid stored version {}", version)))
}

fn versioned_document(owner: &Owner, row: BenefitDocumentRow) -> Result<VersionedDocument, StoreError> {
    if row.owner != owner.as_str() {
        return Err(StoreError::Corrupted(format!(
            "row for {} returned for owner {}",
            row.owner, owner
        )));
    }
    let version = from_db_version(row.version)?;
    let document = BenefitDocument::new(owner.clone(), row.policies.0)
        .map_err(|e| StoreError::Corrupted(format!("document for {}: {}", owner, e)))?;

    Ok(VersionedDocument { document, version })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use core_kernel::{Amount, Percentage};
    use domain_claims::Policy;
    use rust_decimal_macros::dec;
    use sqlx::types::Json;

    fn owner() -> Owner {
        Owner::new("ana@example.com").unwrap()
    }

    fn row(owner: &str, policies: Vec<Policy>, version: i64) -> BenefitDocumentRow {
        BenefitDocumentRow {
            owner: owner.to_string(),
            policies: Json(policies),
            version,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn dental() -> Policy {
        Policy::new("Dental", "tooth", Percentage::new(dec!(80)).unwrap(), Amount::new(dec!(1000))).unwrap()
    }

    #[test]
    fn test_version_conversions() {
        assert_eq!(to_db_version(DocumentVersion::from_raw(7)).unwrap(), 7);
        assert_eq!(from_db_version(7).unwrap(), DocumentVersion::from_raw(7));
        assert!(matches!(to_db_version(DocumentVersion::from_raw(u64::MAX)), Err(StoreError::Corrupted(_))));
        assert!(matches!(from_db_version(0), Err(StoreError::Corrupted(_))));
        assert!(matches!(from_db_version(-3), Err(StoreError::Corrupted(_))));
    }

    #[test]
    fn test_row_becomes_versioned_document() {
        let snapshot = versioned_document(&owner(), row("ana@example.com", vec![dental()], 4)).unwrap();

        assert_eq!(snapshot.version, DocumentVersion::from_raw(4));
        assert_eq!(snapshot.document.owner, owner());
        assert!(snapshot.document.policy("Dental").is_some());
    }

    #[test]
    fn test_row_for_other_owner_is_corrupted() {
        let result = versioned_document(&owner(), row("bob@example.com", vec![dental()], 1));
        assert!(matches!(result, Err(StoreError::Corrupted(_))));
    }

    #[test]
    fn test_duplicate_titles_are_corrupted() {
        let result = versioned_document(&owner(), row("ana@example.com", vec![dental(), dental()], 1));
        assert!(matches!(result, Err(StoreError::Corrupted(_))));
    }
}
