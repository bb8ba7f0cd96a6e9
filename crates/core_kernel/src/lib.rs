//! Core Kernel - Foundational types for the benefit claims system
//!
//! This crate provides the building blocks shared by the domain and
//! infrastructure crates:
//! - Amount and Percentage types with precise decimal arithmetic
//! - Owner and claim identifiers
//! - Port infrastructure (errors, markers, health checks)

pub mod money;
pub mod identifiers;
pub mod ports;
pub mod error;

pub use money::{Amount, Percentage, MoneyError, AMOUNT_SCALE};
pub use identifiers::{ClaimId, Owner};
pub use ports::{
    PortError, DomainPort, HealthCheckable, HealthCheckResult, AdapterHealth,
};
pub use error::CoreError;
