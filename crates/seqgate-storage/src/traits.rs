//! MetadataStore trait definition, record predicate model and cursor.

use std::collections::HashMap;
use std::fmt;

use async_trait::async_trait;
use futures::stream::{BoxStream, StreamExt};

use crate::error::StorageResult;

/// A single test within a record predicate.
///
/// Field names are dotted paths into the stored document
/// (e.g. `avh.sample_accession_number`, `data_object`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldTest {
    /// Field is present and equal to the value.
    Eq { field: String, value: String },
    /// Field is absent or not equal to the value.
    Ne { field: String, value: String },
    /// Field is present and equal to one of the values.
    In { field: String, values: Vec<String> },
    /// Field is present, whatever its value.
    Exists { field: String },
    /// Field is absent.
    NotExists { field: String },
}

impl FieldTest {
    pub fn eq(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Eq {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn ne(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Ne {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn is_in(field: impl Into<String>, values: Vec<String>) -> Self {
        Self::In {
            field: field.into(),
            values,
        }
    }

    pub fn exists(field: impl Into<String>) -> Self {
        Self::Exists {
            field: field.into(),
        }
    }

    pub fn not_exists(field: impl Into<String>) -> Self {
        Self::NotExists {
            field: field.into(),
        }
    }

    /// Evaluates this test against a flat field map.
    pub fn matches(&self, fields: &HashMap<String, String>) -> bool {
        match self {
            FieldTest::Eq { field, value } => fields.get(field) == Some(value),
            FieldTest::Ne { field, value } => fields.get(field) != Some(value),
            FieldTest::In { field, values } => fields
                .get(field)
                .map_or(false, |v| values.iter().any(|c| c == v)),
            FieldTest::Exists { field } => fields.contains_key(field),
            FieldTest::NotExists { field } => !fields.contains_key(field),
        }
    }
}

/// Conjunction of field tests.
///
/// An empty predicate matches every record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordPredicate {
    tests: Vec<FieldTest>,
}

impl RecordPredicate {
    /// Creates an empty predicate.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a test to the conjunction.
    pub fn push(&mut self, test: FieldTest) {
        self.tests.push(test);
    }

    /// Builder form of [`RecordPredicate::push`].
    pub fn and(mut self, test: FieldTest) -> Self {
        self.push(test);
        self
    }

    /// Adds all tests to the conjunction.
    pub fn extend(&mut self, tests: impl IntoIterator<Item = FieldTest>) {
        self.tests.extend(tests);
    }

    /// The tests making up the conjunction.
    pub fn tests(&self) -> &[FieldTest] {
        &self.tests
    }

    pub fn is_empty(&self) -> bool {
        self.tests.is_empty()
    }

    /// Evaluates the whole conjunction against a flat field map.
    pub fn matches(&self, fields: &HashMap<String, String>) -> bool {
        self.tests.iter().all(|t| t.matches(fields))
    }
}

/// Projection of a stored file document: just enough to locate the file
/// on a host, attribute it to an access group and check reference
/// consistency downstream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileRecord {
    /// Access control group owning the file, if recorded.
    pub access_control_group_id: Option<String>,
    /// Per-host file paths; the `"*"` key is a wildcard for any host.
    pub filepath_by_host: HashMap<String, String>,
    /// Path of the reference genome the file was aligned against.
    pub reference: Option<String>,
}

/// A lazy, cancellable sequence of matching file records.
///
/// Records are produced one at a time; nothing is materialized in advance.
/// Dropping the cursor (or calling [`RecordCursor::close`]) releases the
/// underlying store query, including after partial consumption.
pub struct RecordCursor {
    inner: BoxStream<'static, StorageResult<FileRecord>>,
}

impl RecordCursor {
    /// Wraps a record stream in a cursor.
    pub fn new(stream: BoxStream<'static, StorageResult<FileRecord>>) -> Self {
        Self { inner: stream }
    }

    /// Builds a cursor over an already-known sequence of results.
    pub fn from_results(results: Vec<StorageResult<FileRecord>>) -> Self {
        Self::new(futures::stream::iter(results).boxed())
    }

    /// Yields the next record, or `None` at end of sequence.
    pub async fn next(&mut self) -> Option<StorageResult<FileRecord>> {
        self.inner.next().await
    }

    /// Closes the cursor, releasing the underlying query.
    pub fn close(self) {}
}

impl fmt::Debug for RecordCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordCursor").finish_non_exhaustive()
    }
}

/// Abstract read-only interface to the metadata store.
///
/// Implementations must be thread-safe (Send + Sync) and support
/// async operations. This core never writes to the store and never
/// retries a failed operation.
#[async_trait]
pub trait MetadataStore: Send + Sync + 'static {
    /// Counts membership rows whose member set contains `member` and whose
    /// access group id is one of `group_ids`.
    async fn count_group_memberships(
        &self,
        member: &str,
        group_ids: &[String],
    ) -> StorageResult<u64>;

    /// Opens a lazy cursor over file records matching the predicate.
    async fn open_file_cursor(&self, predicate: &RecordPredicate) -> StorageResult<RecordCursor>;
}
