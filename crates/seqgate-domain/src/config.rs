//! Options for the decision core.
//!
//! The configuration collaborator validates these upstream (domain
//! format, boolean typing); the core treats them as trusted input and
//! receives them explicitly at component construction.

/// Validated process-wide options consumed by the decision core.
#[derive(Debug, Clone, Default)]
pub struct CoreOptions {
    /// Email domain usernames must belong to; `None` disables the policy.
    pub email_domain: Option<String>,
    /// Disables the cross-file reference-consistency check, allowing
    /// merges across files aligned to different reference genomes.
    pub multiref: bool,
}

impl CoreOptions {
    /// Creates options with no email-domain policy and multiref disabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the email-domain policy.
    pub fn with_email_domain(mut self, domain: impl Into<String>) -> Self {
        self.email_domain = Some(domain.into());
        self
    }

    /// Enables or disables multiref mode.
    pub fn with_multiref(mut self, multiref: bool) -> Self {
        self.multiref = multiref;
        self
    }
}
