//! Access-group authorization handler.

use std::sync::Arc;

use tracing::debug;

use seqgate_domain::{
    AuthOutcome, AuthorizationEvaluator, CancelHandle, CoreOptions, DomainResult, OutcomeReceiver,
};
use seqgate_storage::MetadataStore;

/// Handler for access-group authorization requests.
///
/// Builds a request-scoped [`AuthorizationEvaluator`] per call; only
/// the store handle and the validated options are shared.
pub struct AuthorizeHandler<S> {
    store: Arc<S>,
    options: CoreOptions,
}

impl<S: MetadataStore> AuthorizeHandler<S> {
    /// Creates a new authorize handler.
    pub fn new(store: Arc<S>, options: CoreOptions) -> Self {
        Self { store, options }
    }

    /// Starts an authorization check for one request.
    ///
    /// Returns synchronously with an error on a violated caller
    /// contract (empty identity or group set); otherwise the receiver
    /// yields the single terminal outcome unless the handle cancels
    /// the request first.
    pub fn authorize(
        &self,
        identity: impl Into<String>,
        group_ids: Vec<String>,
    ) -> DomainResult<(OutcomeReceiver<AuthOutcome>, CancelHandle)> {
        let identity = identity.into();
        debug!(identity = %identity, groups = group_ids.len(), "authorization requested");
        let evaluator =
            AuthorizationEvaluator::new(Arc::clone(&self.store), self.options.clone());
        evaluator.authorize_channel(identity, group_ids)
    }
}
