//! Repository implementations
//!
//! Repositories own the SQL. They speak in row types and raw versions and
//! leave the translation to domain types to the adapters.

pub mod benefits;

pub use benefits::{BenefitsRepository, BenefitDocumentRow};
