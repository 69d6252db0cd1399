//! In-memory storage implementation for testing.
//!
//! Documents are flat `field -> value` maps plus a per-host path map, and
//! predicate evaluation is a linear scan over all documents. Membership
//! rows are keyed by access group id with a member set per row.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use futures::StreamExt;
use tracing::debug;

use crate::error::StorageResult;
use crate::traits::{FileRecord, MetadataStore, RecordCursor, RecordPredicate};

/// A stored file metadata document.
///
/// `fields` holds the queryable metadata under dotted keys
/// (`avh.target`, `data_object`, `access_control_group_id`, ...);
/// `filepath_by_host` holds the per-host locations, `"*"` acting
/// as a wildcard.
#[derive(Debug, Clone, Default)]
pub struct FileDocument {
    pub fields: HashMap<String, String>,
    pub filepath_by_host: HashMap<String, String>,
}

impl FileDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    pub fn with_path(mut self, host: impl Into<String>, path: impl Into<String>) -> Self {
        self.filepath_by_host.insert(host.into(), path.into());
        self
    }

    fn project(&self) -> FileRecord {
        FileRecord {
            access_control_group_id: self.fields.get("access_control_group_id").cloned(),
            filepath_by_host: self.filepath_by_host.clone(),
            reference: self.fields.get("avh.reference").cloned(),
        }
    }
}

/// Decrements the open-cursor gauge when the owning stream is dropped.
struct CursorGuard(Arc<AtomicUsize>);

impl CursorGuard {
    fn new(gauge: Arc<AtomicUsize>) -> Self {
        gauge.fetch_add(1, Ordering::SeqCst);
        Self(gauge)
    }
}

impl Drop for CursorGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// In-memory implementation of MetadataStore.
///
/// Uses DashMap for thread-safe concurrent access without locks. Reads are
/// linear scans, which is fine for the test and development data sizes this
/// backend is meant for. The store keeps a gauge of open cursors so tests
/// can assert that cancellation releases the underlying query.
#[derive(Debug, Default)]
pub struct MemoryMetadataStore {
    /// Membership rows: access group id -> member usernames.
    groups: DashMap<String, HashSet<String>>,
    /// File documents keyed by insertion id.
    files: DashMap<u64, FileDocument>,
    next_file_id: AtomicU64,
    open_cursors: Arc<AtomicUsize>,
}

impl MemoryMetadataStore {
    /// Creates a new in-memory metadata store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new in-memory metadata store wrapped in Arc.
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Adds a member to an access group row, creating the row if needed.
    pub fn add_group_member(&self, group_id: impl Into<String>, member: impl Into<String>) {
        self.groups
            .entry(group_id.into())
            .or_default()
            .insert(member.into());
    }

    /// Adds a file document.
    pub fn add_file(&self, document: FileDocument) {
        let id = self.next_file_id.fetch_add(1, Ordering::SeqCst);
        self.files.insert(id, document);
    }

    /// Number of cursors handed out and not yet dropped.
    pub fn open_cursor_count(&self) -> usize {
        self.open_cursors.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MetadataStore for MemoryMetadataStore {
    async fn count_group_memberships(
        &self,
        member: &str,
        group_ids: &[String],
    ) -> StorageResult<u64> {
        // One row per stored group; a group id listed twice still counts once.
        let distinct: HashSet<&String> = group_ids.iter().collect();
        let count = distinct
            .into_iter()
            .filter(|gid| {
                self.groups
                    .get(gid.as_str())
                    .map_or(false, |members| members.contains(member))
            })
            .count();
        Ok(count as u64)
    }

    async fn open_file_cursor(&self, predicate: &RecordPredicate) -> StorageResult<RecordCursor> {
        let matching: Vec<StorageResult<FileRecord>> = self
            .files
            .iter()
            .filter(|doc| predicate.matches(&doc.fields))
            .map(|doc| Ok(doc.project()))
            .collect();
        debug!(matches = matching.len(), "opened file cursor");

        let guard = CursorGuard::new(Arc::clone(&self.open_cursors));
        let stream = futures::stream::iter(matching)
            .map(move |record| {
                let _held = &guard;
                record
            })
            .boxed();
        Ok(RecordCursor::new(stream))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::FieldTest;

    fn seeded_store() -> MemoryMetadataStore {
        let store = MemoryMetadataStore::new();
        store.add_group_member("6", "alice");
        store.add_group_member("6", "bob");
        store.add_group_member("7", "alice");
        store
    }

    #[tokio::test]
    async fn test_membership_count_requires_each_group() {
        let store = seeded_store();

        let both = vec!["6".to_string(), "7".to_string()];
        assert_eq!(store.count_group_memberships("alice", &both).await.unwrap(), 2);
        assert_eq!(store.count_group_memberships("bob", &both).await.unwrap(), 1);
        assert_eq!(store.count_group_memberships("carol", &both).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_membership_count_ignores_duplicate_group_ids() {
        let store = seeded_store();

        let dup = vec!["6".to_string(), "6".to_string(), "6".to_string()];
        assert_eq!(store.count_group_memberships("alice", &dup).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_membership_count_for_unknown_group_is_zero() {
        let store = seeded_store();

        let unknown = vec!["42".to_string()];
        assert_eq!(
            store.count_group_memberships("alice", &unknown).await.unwrap(),
            0
        );
    }

    #[tokio::test]
    async fn test_cursor_returns_matching_projections() {
        let store = MemoryMetadataStore::new();
        store.add_file(
            FileDocument::new()
                .with_field("data_object", "x.cram")
                .with_field("access_control_group_id", "6")
                .with_field("avh.reference", "/refs/hs37.fa")
                .with_path("hostA", "/seq/x.cram"),
        );
        store.add_file(
            FileDocument::new()
                .with_field("data_object", "y.cram")
                .with_path("hostA", "/seq/y.cram"),
        );

        let predicate = RecordPredicate::new().and(FieldTest::eq("data_object", "x.cram"));
        let mut cursor = store.open_file_cursor(&predicate).await.unwrap();

        let record = cursor.next().await.unwrap().unwrap();
        assert_eq!(record.access_control_group_id.as_deref(), Some("6"));
        assert_eq!(record.reference.as_deref(), Some("/refs/hs37.fa"));
        assert_eq!(
            record.filepath_by_host.get("hostA").map(String::as_str),
            Some("/seq/x.cram")
        );
        assert!(cursor.next().await.is_none());
    }

    #[tokio::test]
    async fn test_empty_predicate_matches_all_documents() {
        let store = MemoryMetadataStore::new();
        store.add_file(FileDocument::new().with_field("data_object", "a"));
        store.add_file(FileDocument::new().with_field("data_object", "b"));

        let mut cursor = store
            .open_file_cursor(&RecordPredicate::new())
            .await
            .unwrap();
        let mut seen = 0;
        while let Some(result) = cursor.next().await {
            result.unwrap();
            seen += 1;
        }
        assert_eq!(seen, 2);
    }

    #[tokio::test]
    async fn test_closing_cursor_releases_query() {
        let store = MemoryMetadataStore::new();
        store.add_file(FileDocument::new().with_field("data_object", "a"));
        store.add_file(FileDocument::new().with_field("data_object", "b"));

        let mut cursor = store
            .open_file_cursor(&RecordPredicate::new())
            .await
            .unwrap();
        assert_eq!(store.open_cursor_count(), 1);

        // Partial consumption then close must still release the query.
        cursor.next().await.unwrap().unwrap();
        cursor.close();
        assert_eq!(store.open_cursor_count(), 0);
    }
}
