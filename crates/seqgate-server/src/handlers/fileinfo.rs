//! Query-to-file-set resolution handler.

use std::sync::Arc;

use tracing::debug;

use seqgate_domain::{
    CancelHandle, CoreOptions, DomainResult, FileQuery, FileSetAggregator, OutcomeReceiver,
    ResolveOutcome,
};
use seqgate_storage::MetadataStore;

/// Handler for file-set resolution requests.
///
/// Builds a request-scoped [`FileSetAggregator`] per call; only the
/// store handle and the validated options are shared.
pub struct FileinfoHandler<S> {
    store: Arc<S>,
    options: CoreOptions,
}

impl<S: MetadataStore> FileinfoHandler<S> {
    /// Creates a new fileinfo handler.
    pub fn new(store: Arc<S>, options: CoreOptions) -> Self {
        Self { store, options }
    }

    /// Starts a file-set resolution for one request.
    ///
    /// `host` selects which per-host file location is served. Returns
    /// synchronously with an error on a violated caller contract
    /// (empty host, no selector in the query); otherwise the receiver
    /// yields the single terminal outcome unless the handle cancels
    /// the request first.
    pub fn resolve(
        &self,
        query: FileQuery,
        host: impl Into<String>,
    ) -> DomainResult<(OutcomeReceiver<ResolveOutcome>, CancelHandle)> {
        let host = host.into();
        debug!(host = %host, "file resolution requested");
        let aggregator = FileSetAggregator::new(Arc::clone(&self.store), self.options.clone());
        aggregator.resolve_channel(query, host)
    }
}
