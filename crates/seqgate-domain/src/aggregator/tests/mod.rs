//! Tests for the file-set aggregation module.
//!
//! Organized by functionality:
//! - Predicate short-circuits (invalid query, contract violations)
//! - Host path resolution and wildcard fallback
//! - Reference consistency checking
//! - Store failure reporting
//! - Channel delivery and cancellation
