//! File-set aggregation.
//!
//! Maps a client query to the location and access info of sequencing
//! files co-located with a given host. Matching records are streamed
//! from the store one at a time, accumulated, resolved per host and
//! checked for reference consistency before the final set is emitted.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, warn};

use seqgate_storage::{MetadataStore, RecordPredicate};

use crate::channel::{self, CancelHandle, OutcomeReceiver};
use crate::config::CoreOptions;
use crate::error::{ContractViolation, DomainResult};
use crate::outcome::{ResolveOutcome, ResolvedFile};
use crate::query::{build_predicate, FileQuery, PredicateOutcome};

/// Host key acting as a wildcard location for any host.
const WILDCARD_HOST: &str = "*";

const DB_ERROR_REASON: &str = "failed to map input to files, DB error";

/// Request-scoped file-set aggregator.
///
/// One instance per incoming request; shares only the read-only store
/// handle and validated options.
pub struct FileSetAggregator<S> {
    store: Arc<S>,
    options: CoreOptions,
}

impl<S> Clone for FileSetAggregator<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            options: self.options.clone(),
        }
    }
}

impl<S: MetadataStore> FileSetAggregator<S> {
    /// Creates a new aggregator over the given store handle.
    pub fn new(store: Arc<S>, options: CoreOptions) -> Self {
        Self { store, options }
    }

    /// Resolves the query to a file set for `host`.
    ///
    /// A missing host or a query with no selector is a caller bug and
    /// aborts synchronously; every other path yields exactly one
    /// terminal [`ResolveOutcome`]. No store operation is retried.
    pub async fn resolve(&self, query: &FileQuery, host: &str) -> DomainResult<ResolveOutcome> {
        check_contract(host)?;
        let prepared = build_predicate(query)?;
        Ok(self.finish(prepared, query, host).await)
    }

    /// Channel form of [`FileSetAggregator::resolve`].
    ///
    /// Contract violations surface synchronously, before anything is
    /// spawned. Cancelling through the returned handle drops the
    /// evaluation, which closes the record cursor and releases the
    /// underlying store query; a cancelled call delivers no outcome.
    pub fn resolve_channel(
        &self,
        query: FileQuery,
        host: impl Into<String>,
    ) -> DomainResult<(OutcomeReceiver<ResolveOutcome>, CancelHandle)> {
        let host = host.into();
        check_contract(&host)?;
        let prepared = build_predicate(&query)?;
        let aggregator = self.clone();
        Ok(channel::deliver(async move {
            aggregator.finish(prepared, &query, &host).await
        }))
    }

    async fn finish(
        &self,
        prepared: PredicateOutcome,
        query: &FileQuery,
        host: &str,
    ) -> ResolveOutcome {
        let predicate = match prepared {
            PredicateOutcome::Invalid => {
                return ResolveOutcome::NoData {
                    reason: "Invalid query".to_string(),
                }
            }
            PredicateOutcome::Predicate(predicate) => predicate,
        };
        self.aggregate(predicate, &describe(query), host).await
    }

    async fn aggregate(
        &self,
        predicate: RecordPredicate,
        description: &str,
        host: &str,
    ) -> ResolveOutcome {
        debug!(?predicate, host, "file selection predicate");

        let mut cursor = match self.store.open_file_cursor(&predicate).await {
            Ok(cursor) => cursor,
            Err(err) => {
                warn!(error = %err, "failed to open file record cursor");
                return ResolveOutcome::Error {
                    reason: DB_ERROR_REASON.to_string(),
                };
            }
        };

        let mut records = Vec::new();
        loop {
            match cursor.next().await {
                Some(Ok(record)) => records.push(record),
                Some(Err(err)) => {
                    warn!(error = %err, "store error while streaming file records");
                    cursor.close();
                    return ResolveOutcome::Error {
                        reason: DB_ERROR_REASON.to_string(),
                    };
                }
                None => break,
            }
        }
        cursor.close();

        if records.is_empty() {
            return ResolveOutcome::NoData {
                reason: format!("No files for {description}"),
            };
        }

        let resolved: Vec<ResolvedFile> = records
            .iter()
            .filter_map(|record| {
                let file = record
                    .filepath_by_host
                    .get(host)
                    .or_else(|| record.filepath_by_host.get(WILDCARD_HOST))?;
                let reference = record.reference.as_deref().filter(|r| !r.is_empty())?;
                Some(ResolvedFile {
                    file: file.clone(),
                    access_group: record.access_control_group_id.clone().unwrap_or_default(),
                    reference: reference.to_string(),
                })
            })
            .collect();

        if resolved.is_empty() {
            return ResolveOutcome::NoData {
                reason: format!("No reference for {description}"),
            };
        }

        // Merging is only defined over a single reference genome, and
        // multiple paths may hold the same .fa file, so compare file
        // names unless multiref mode waives the check.
        if !self.options.multiref {
            let first = basename(&resolved[0].reference);
            let all_match = resolved
                .iter()
                .all(|candidate| basename(&candidate.reference) == first);
            if !all_match {
                return ResolveOutcome::NoData {
                    reason: format!("Not all references match for {description}"),
                };
            }
        }

        ResolveOutcome::Data(resolved)
    }
}

fn check_contract(host: &str) -> DomainResult<()> {
    if host.is_empty() {
        return Err(ContractViolation::MissingHost);
    }
    Ok(())
}

/// Human-readable description of what the query selected, used in
/// `NoData` diagnostics.
fn describe(query: &FileQuery) -> String {
    if let Some(accession) = query.accession.as_deref() {
        return accession.to_string();
    }
    let name = query.name.as_deref().unwrap_or_default();
    match query.directory.as_deref() {
        Some(directory) => format!("{name} in {directory}"),
        None => name.to_string(),
    }
}

fn basename(path: &str) -> &str {
    Path::new(path)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(path)
}

#[cfg(test)]
mod tests;
