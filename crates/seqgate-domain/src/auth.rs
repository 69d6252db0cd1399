//! Group-membership authorization.
//!
//! Relies on the data access group being known for each data source and
//! the user belonging to the whole set of required access groups: the
//! membership count reported by the store must equal the number of
//! distinct required group ids, so membership of *every* group is
//! required, not just one.

use std::sync::Arc;

use tracing::debug;

use seqgate_storage::MetadataStore;

use crate::channel::{self, CancelHandle, OutcomeReceiver};
use crate::config::CoreOptions;
use crate::error::{ContractViolation, DomainResult};
use crate::identity;
use crate::outcome::AuthOutcome;

/// Request-scoped authorization evaluator.
///
/// One instance per incoming request; shares only the read-only store
/// handle and validated options.
pub struct AuthorizationEvaluator<S> {
    store: Arc<S>,
    options: CoreOptions,
}

impl<S> Clone for AuthorizationEvaluator<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            options: self.options.clone(),
        }
    }
}

impl<S: MetadataStore> AuthorizationEvaluator<S> {
    /// Creates a new evaluator over the given store handle.
    pub fn new(store: Arc<S>, options: CoreOptions) -> Self {
        Self { store, options }
    }

    /// Authorizes `identity` against the required access groups.
    ///
    /// Contract violations (empty identity, empty group set) abort the
    /// call synchronously; every other path yields exactly one terminal
    /// [`AuthOutcome`]. No store operation is retried.
    pub async fn authorize(
        &self,
        identity: &str,
        group_ids: &[String],
    ) -> DomainResult<AuthOutcome> {
        check_contract(identity, group_ids)?;
        Ok(self.evaluate(identity.to_string(), group_ids.to_vec()).await)
    }

    /// Channel form of [`AuthorizationEvaluator::authorize`].
    ///
    /// The contract is checked before the evaluation is spawned, so a
    /// violated contract never produces a terminal event. The returned
    /// handle cancels the in-flight evaluation; a cancelled call
    /// delivers no outcome.
    pub fn authorize_channel(
        &self,
        identity: impl Into<String>,
        group_ids: Vec<String>,
    ) -> DomainResult<(OutcomeReceiver<AuthOutcome>, CancelHandle)> {
        let identity = identity.into();
        check_contract(&identity, &group_ids)?;
        let evaluator = self.clone();
        Ok(channel::deliver(async move {
            evaluator.evaluate(identity, group_ids).await
        }))
    }

    async fn evaluate(&self, identity: String, group_ids: Vec<String>) -> AuthOutcome {
        if group_ids.iter().any(|id| id.is_empty()) {
            return AuthOutcome::Failed {
                identity,
                reason: "some access group ids are not defined".to_string(),
            };
        }

        let Some(username) = identity::normalize(&identity, self.options.email_domain.as_deref())
        else {
            let reason = format!("invalid user {identity}");
            return AuthOutcome::Failed { identity, reason };
        };

        let mut group_ids = group_ids;
        group_ids.sort();
        group_ids.dedup();
        debug!(username = %username, groups = ?group_ids, "access group membership query");

        match self
            .store
            .count_group_memberships(&username, &group_ids)
            .await
        {
            Err(err) => AuthOutcome::Failed {
                identity,
                reason: format!("failed to get authorisation info: {err}"),
            },
            Ok(count) if count == group_ids.len() as u64 => AuthOutcome::Authorized { identity },
            Ok(count) => AuthOutcome::Failed {
                identity,
                reason: format!(
                    "not authorised for {} of the files",
                    if count > 0 { "some" } else { "any" }
                ),
            },
        }
    }
}

fn check_contract(identity: &str, group_ids: &[String]) -> DomainResult<()> {
    if identity.is_empty() {
        return Err(ContractViolation::MissingIdentity);
    }
    if group_ids.is_empty() {
        return Err(ContractViolation::MissingAccessGroups);
    }
    Ok(())
}
