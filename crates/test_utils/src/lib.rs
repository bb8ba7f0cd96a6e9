//! Test Utilities Crate
//!
//! Shared test infrastructure for the benefit claims workspace.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built owners, policies and dates
//! - `builders`: Builders for documents, policies and claim requests
//! - `assertions`: Ledger and history assertion helpers
//! - `generators`: Property-based test data generators
//! - `tracing`: One-time log subscriber setup for tests
//! - `database`: PostgreSQL test containers

pub mod fixtures;
pub mod builders;
pub mod assertions;
pub mod generators;
pub mod tracing;
pub mod database;

pub use fixtures::*;
pub use builders::*;
pub use assertions::*;
pub use generators::*;
pub use self::tracing::init_test_tracing;
pub use database::*;
