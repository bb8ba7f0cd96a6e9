//! Infrastructure Database Layer
//!
//! PostgreSQL persistence for benefit documents using SQLx.
//!
//! # Storage Model
//!
//! Each owner has exactly one row in `benefit_documents`. The policies,
//! their ledgers and their claim logs are stored together as a JSONB value,
//! next to an integer `version` column. Writes are compare-and-swap on that
//! column, so two writers that read the same version cannot both commit.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{create_pool, run_migrations, DatabaseConfig, PostgresClaimStore};
//!
//! let pool = create_pool(DatabaseConfig::new("postgres://localhost/benefits")).await?;
//! run_migrations(&pool).await?;
//! let store = PostgresClaimStore::new(pool);
//! ```

pub mod pool;
pub mod error;
pub mod repositories;
pub mod adapters;

pub use pool::{DatabasePool, create_pool, run_migrations, DatabaseConfig};
pub use error::DatabaseError;
pub use repositories::{BenefitsRepository, BenefitDocumentRow};
pub use adapters::PostgresClaimStore;
