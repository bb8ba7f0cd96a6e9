//! Benefit Claims Domain
//!
//! This crate adjudicates benefit claims against an owner's policies and
//! keeps each policy's cumulative claimed total within its lifetime limit.
//!
//! # Claim Lifecycle
//!
//! ```text
//! ClaimRequest (proposed) -> adjudicate -> commit -> Claim (adjudicated, terminal)
//! ```
//!
//! Writes use optimistic concurrency: a commit carries the document version
//! it was computed from, and a commit that loses the race is re-read,
//! re-adjudicated and retried by [`ClaimsService`].

pub mod claim;
pub mod policy;
pub mod document;
pub mod adjudication;
pub mod history;
pub mod ports;
pub mod service;
pub mod config;
pub mod error;

pub use claim::{Claim, ClaimOutcome, ClaimRequest};
pub use policy::{Policy, CoverageTerms, BenefitSummary};
pub use document::{BenefitDocument, DocumentVersion, VersionedDocument};
pub use adjudication::{adjudicate, adjudicate_in, commit, decide, AdjudicationDecision, CommittedClaim};
pub use history::{project, ClaimHistory, ClaimView};
pub use ports::ClaimStore;
#[cfg(any(test, feature = "mock"))]
pub use ports::mock::InMemoryClaimStore;
pub use service::{ClaimsService, ClaimReceipt};
pub use config::ClaimsConfig;
pub use error::{ClaimError, StoreError};
