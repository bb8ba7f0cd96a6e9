//! Benefit document repository
//!
//! Each row holds an owner's complete document. Updates are conditional on
//! the version the caller read, and bump it by one when they apply.

use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;

use domain_claims::Policy;

use crate::error::DatabaseError;

/// A row of the `benefit_documents` table
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BenefitDocumentRow {
    pub owner: String,
    pub policies: Json<Vec<Policy>>,
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Repository for the `benefit_documents` table
#[derive(Debug, Clone)]
pub struct BenefitsRepository {
    pool: PgPool,
}

impl BenefitsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Fetches the owner's document row, if any
    pub async fn fetch(&self, owner: &str) -> Result<Option<BenefitDocumentRow>, DatabaseError> {
        let row = sqlx::query_as::<_, BenefitDocumentRow>(
            r#"
            SELECT owner, policies, version, created_at, updated_at
            FROM benefit_documents
            WHERE owner = $1
            "#,
        )
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// Fetches only the current version of the owner's document
    pub async fn fetch_version(&self, owner: &str) -> Result<Option<i64>, DatabaseError> {
        let version = sqlx::query_scalar::<_, i64>(
            "SELECT version FROM benefit_documents WHERE owner = $1",
        )
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;

        Ok(version)
    }

    /// Inserts a new document row at `version`
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::DuplicateEntry` if the owner already has a row.
    pub async fn insert(
        &self,
        owner: &str,
        policies: &[Policy],
        version: i64,
    ) -> Result<i64, DatabaseError> {
        let version = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO benefit_documents (owner, policies, version)
            VALUES ($1, $2, $3)
            RETURNING version
            "#,
        )
        .bind(owner)
        .bind(Json(policies))
        .bind(version)
        .fetch_one(&self.pool)
        .await?;

        Ok(version)
    }

    /// Replaces the owner's policies if the stored version is still `expected`
    ///
    /// Returns the new version, or `None` when no row matched. A miss means
    /// either the owner has no row or another writer got there first; the
    /// caller tells them apart with [`fetch_version`](Self::fetch_version).
    pub async fn compare_and_swap(
        &self,
        owner: &str,
        policies: &[Policy],
        expected: i64,
    ) -> Result<Option<i64>, DatabaseError> {
        let version = sqlx::query_scalar::<_, i64>(
            r#"
            UPDATE benefit_documents
            SET policies = $2, version = version + 1, updated_at = NOW()
            WHERE owner = $1 AND version = $3
            RETURNING version
            "#,
        )
        .bind(owner)
        .bind(Json(policies))
        .bind(expected)
        .fetch_optional(&self.pool)
        .await?;

        Ok(version)
    }

    /// Removes the owner's document, returning whether a row existed
    pub async fn delete(&self, owner: &str) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM benefit_documents WHERE owner = $1")
            .bind(owner)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
