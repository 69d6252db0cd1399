//! Client file-selection queries.
//!
//! A query selects files either by sample accession number (optionally
//! narrowed by the six named filters) or by exact file name, optionally
//! scoped to a directory. Queries are immutable once constructed,
//! created per request and consumed by exactly one evaluation.

mod filters;
mod resolver;

use std::collections::HashMap;

pub use filters::{build_filter_chain, FilterMode, FilterSpec, InvalidQuery, FILTER_SPECS};
pub use resolver::{build_predicate, PredicateOutcome};

/// A client file-selection query.
///
/// Exactly one selector kind is used per evaluation; when both are
/// supplied the accession takes precedence (documented precedence, not
/// an error).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileQuery {
    /// Sample accession number selector.
    pub accession: Option<String>,
    /// Exact file name selector.
    pub name: Option<String>,
    /// Directory scope for the name selector.
    pub directory: Option<String>,
    /// Raw named filter parameters (`target`, `target_not`, ...).
    params: HashMap<String, String>,
}

impl FileQuery {
    /// Creates a query selecting by sample accession number.
    pub fn by_accession(accession: impl Into<String>) -> Self {
        Self {
            accession: Some(accession.into()),
            ..Default::default()
        }
    }

    /// Creates a query selecting by exact file name.
    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    /// Scopes a name query to a directory.
    pub fn in_directory(mut self, directory: impl Into<String>) -> Self {
        self.directory = Some(directory.into());
        self
    }

    /// Sets a named filter parameter.
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Looks up a named filter parameter.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}
