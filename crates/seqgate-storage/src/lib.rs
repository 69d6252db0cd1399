//! seqgate-storage: Storage abstraction layer
//!
//! This crate provides the read-only store abstraction for seqgate,
//! including:
//! - MetadataStore trait for membership counts and file record queries
//! - Record predicate model (equality, inequality, set membership, existence)
//! - Lazy, cancellable record cursor
//! - In-memory implementation for testing
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │              seqgate-storage                 │
//! ├─────────────────────────────────────────────┤
//! │  traits.rs   - MetadataStore trait,         │
//! │                predicate model, cursor      │
//! │  memory.rs   - In-memory implementation     │
//! └─────────────────────────────────────────────┘
//! ```

pub mod error;
pub mod memory;
pub mod traits;

// Re-export commonly used types
pub use error::{StorageError, StorageResult};
pub use memory::{FileDocument, MemoryMetadataStore};
pub use traits::{FieldTest, FileRecord, MetadataStore, RecordCursor, RecordPredicate};
