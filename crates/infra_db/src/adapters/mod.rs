//! Domain Adapters
//!
//! Implementations of domain ports on top of the repository layer. Each
//! adapter translates between row types and domain models and maps database
//! failures onto the port's error type.

pub mod benefits;

pub use benefits::PostgresClaimStore;
