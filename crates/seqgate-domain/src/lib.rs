//! seqgate-domain: Core authorization and file-resolution logic
//!
//! This crate contains the decision core of the seqgate gateway:
//! - Username normalization under an optional email-domain policy
//! - Group-membership authorization evaluation
//! - Query-to-predicate translation (selectors and named filters)
//! - Cursor-driven file-set aggregation with the reference-consistency
//!   invariant
//! - Terminal outcome delivery with cancellation
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │               seqgate-domain                 │
//! ├─────────────────────────────────────────────┤
//! │  identity.rs   - Username normalization     │
//! │  auth.rs       - Authorization evaluator    │
//! │  query/        - Selectors, filters and     │
//! │                  predicate construction     │
//! │  aggregator/   - File-set aggregation       │
//! │  channel.rs    - Terminal outcome delivery  │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! Both pipelines are request-scoped: one evaluator or aggregator
//! instance per incoming request, sharing only the read-only store
//! handle and validated process-wide options.

pub mod aggregator;
pub mod auth;
pub mod channel;
pub mod config;
pub mod error;
pub mod identity;
pub mod outcome;
pub mod query;

#[cfg(test)]
mod identity_proptest;

// Re-export commonly used types at the crate root
pub use aggregator::FileSetAggregator;
pub use auth::AuthorizationEvaluator;
pub use channel::{CancelHandle, OutcomeReceiver};
pub use config::CoreOptions;
pub use error::{ContractViolation, DomainResult};
pub use outcome::{AuthOutcome, ResolveOutcome, ResolvedFile};
pub use query::FileQuery;
