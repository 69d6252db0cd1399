//! Terminal outcomes of the two request pipelines.
//!
//! Each authorize/resolve call produces exactly one terminal outcome;
//! after it, no further events for that call may be delivered.

/// A file location resolved for one host, together with its access
/// group and the reference genome it was aligned against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFile {
    /// Path of the sequence file on the selected host.
    pub file: String,
    /// Access control group owning the file; empty when not recorded.
    pub access_group: String,
    /// Path of the reference genome file.
    pub reference: String,
}

/// Terminal outcome of one authorization evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    /// The identity belongs to every required access group.
    Authorized { identity: String },
    /// Authorization failed; `reason` is the user-facing diagnostic.
    Failed { identity: String, reason: String },
}

/// Terminal outcome of one file-set resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveOutcome {
    /// The resolved file set, ready for the downstream merge controller.
    Data(Vec<ResolvedFile>),
    /// Nothing matched, or the match was unusable; expected and non-fatal.
    NoData { reason: String },
    /// A store failure terminated the resolution.
    Error { reason: String },
}
