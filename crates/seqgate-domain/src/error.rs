//! Domain error types.
//!
//! A [`ContractViolation`] is a bug in the caller, never a business
//! outcome: it aborts the call synchronously and no terminal event is
//! emitted for it. Expected failures (invalid query, unknown user,
//! missing files) travel inside the outcome enums instead.

use thiserror::Error;

/// Caller contract violations, raised synchronously.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ContractViolation {
    /// An identity string is required.
    #[error("identity is required")]
    MissingIdentity,

    /// A non-empty set of access group ids is required.
    #[error("access group ids are required")]
    MissingAccessGroups,

    /// A host name is required.
    #[error("host name is required")]
    MissingHost,

    /// The query carries neither an accession nor a file name.
    #[error("sample accession number or file name should be given")]
    SelectorMissing,
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, ContractViolation>;
