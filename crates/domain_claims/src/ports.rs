//! Claims Domain Ports
//!
//! The [`ClaimStore`] port is everything the claims domain needs from
//! persistence: load one owner's benefit document together with its version,
//! and save it back only if nobody else has saved in between.
//!
//! # Adapters
//!
//! - **PostgreSQL**: `infra_db::PostgresClaimStore`
//! - **In-memory**: [`mock::InMemoryClaimStore`], available in tests and
//!   behind the `mock` feature
//!
//! # Usage
//!
//! ```rust,ignore
//! use domain_claims::{ClaimsService, ClaimsConfig};
//! use std::sync::Arc;
//!
//! let store: Arc<dyn ClaimStore> = Arc::new(PostgresClaimStore::new(pool));
//! let service = ClaimsService::new(store, ClaimsConfig::default());
//! ```

use async_trait::async_trait;

use core_kernel::{DomainPort, HealthCheckable, Owner};
use crate::document::{BenefitDocument, DocumentVersion, VersionedDocument};
use crate::error::StoreError;

/// Versioned document storage, partitioned by owner
///
/// Implementations must make `save` a compare-and-swap on the version: the
/// write only happens if the stored version still equals `expected`, and a
/// successful write always yields a version different from `expected`.
#[async_trait]
pub trait ClaimStore: DomainPort + HealthCheckable {
    /// Loads the owner's benefit document and its current version
    async fn load(&self, owner: &Owner) -> Result<VersionedDocument, StoreError>;

    /// Replaces the owner's document if its version is still `expected`
    ///
    /// Returns the new version, or `StoreError::VersionConflict` without
    /// writing anything.
    async fn save(
        &self,
        document: &BenefitDocument,
        expected: DocumentVersion,
    ) -> Result<DocumentVersion, StoreError>;

    /// Stores a newly enrolled owner's document
    async fn insert(&self, document: &BenefitDocument) -> Result<DocumentVersion, StoreError>;
}

#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
    use std::sync::Arc;
    use tokio::sync::RwLock;

    use core_kernel::HealthCheckResult;

    /// In-memory implementation of ClaimStore
    ///
    /// Besides plain storage it can simulate a competing writer
    /// ([`inject_conflicts`](Self::inject_conflicts)) and an unreachable
    /// backend ([`inject_failures`](Self::inject_failures)).
    #[derive(Debug, Default)]
    pub struct InMemoryClaimStore {
        documents: Arc<RwLock<HashMap<Owner, (BenefitDocument, DocumentVersion)>>>,
        pending_conflicts: AtomicU32,
        pending_failures: AtomicU32,
        successful_saves: AtomicU64,
    }

    impl InMemoryClaimStore {
        pub fn new() -> Self {
            Self::default()
        }

        /// Pre-populates with documents for testing
        pub async fn with_documents(documents: Vec<BenefitDocument>) -> Self {
            let store = Self::new();
            {
                let mut map = store.documents.write().await;
                for document in documents {
                    map.insert(document.owner.clone(), (document, DocumentVersion::initial()));
                }
            }
            store
        }

        /// Stores `document` under `key` regardless of its owner, as a
        /// misbehaving backend might
        pub async fn insert_under(&self, key: Owner, document: BenefitDocument) {
            self.documents
                .write()
                .await
                .insert(key, (document, DocumentVersion::initial()));
        }

        /// Makes the next `count` saves lose a race against another writer
        ///
        /// The stored version is bumped as if someone else had saved the same
        /// content, so the caller's expected version no longer matches.
        pub fn inject_conflicts(&self, count: u32) {
            self.pending_conflicts.store(count, Ordering::SeqCst);
        }

        /// Makes the next `count` saves fail as if the backend were down
        pub fn inject_failures(&self, count: u32) {
            self.pending_failures.store(count, Ordering::SeqCst);
        }

        /// Number of saves that changed stored state
        pub fn successful_saves(&self) -> u64 {
            self.successful_saves.load(Ordering::SeqCst)
        }

        /// Current stored copy, bypassing versions
        pub async fn snapshot(&self, owner: &Owner) -> Option<BenefitDocument> {
            self.documents.read().await.get(owner).map(|(doc, _)| doc.clone())
        }

        fn take_one(counter: &AtomicU32) -> bool {
            counter
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok()
        }
    }

    impl DomainPort for InMemoryClaimStore {}

    #[async_trait]
    impl HealthCheckable for InMemoryClaimStore {
        async fn health_check(&self) -> HealthCheckResult {
            HealthCheckResult::healthy("in-memory-claim-store", 0)
        }
    }

    #[async_trait]
    impl ClaimStore for InMemoryClaimStore {
        async fn load(&self, owner: &Owner) -> Result<VersionedDocument, StoreError> {
            self.documents
                .read()
                .await
                .get(owner)
                .map(|(document, version)| VersionedDocument {
                    document: document.clone(),
                    version: *version,
                })
                .ok_or_else(|| StoreError::NotFound(owner.clone()))
        }

        async fn save(
            &self,
            document: &BenefitDocument,
            expected: DocumentVersion,
        ) -> Result<DocumentVersion, StoreError> {
            if Self::take_one(&self.pending_failures) {
                return Err(StoreError::Unavailable("injected store failure".to_string()));
            }

            let mut documents = self.documents.write().await;
            let (stored, version) = documents
                .get_mut(&document.owner)
                .ok_or_else(|| StoreError::NotFound(document.owner.clone()))?;

            if Self::take_one(&self.pending_conflicts) {
                *version = version.next();
            }

            if *version != expected {
                return Err(StoreError::VersionConflict {
                    owner: document.owner.clone(),
                    expected,
                    actual: Some(*version),
                });
            }

            *stored = document.clone();
            *version = version.next();
            self.successful_saves.fetch_add(1, Ordering::SeqCst);
            Ok(*version)
        }

        async fn insert(&self, document: &BenefitDocument) -> Result<DocumentVersion, StoreError> {
            let mut documents = self.documents.write().await;
            if documents.contains_key(&document.owner) {
                return Err(StoreError::AlreadyExists(document.owner.clone()));
            }
            let version = DocumentVersion::initial();
            documents.insert(document.owner.clone(), (document.clone(), version));
            Ok(version)
        }
    }
}
