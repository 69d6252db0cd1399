//! Selection predicate construction.
//!
//! Translates a client query into a store predicate. The accession path
//! restricts the record type to alignment formats and applies the six
//! named filters; the name path matches the data object exactly,
//! optionally scoped to a collection, and ignores the filters.

use seqgate_storage::{FieldTest, RecordPredicate};

use crate::error::{ContractViolation, DomainResult};

use super::filters::{build_filter_chain, InvalidQuery};
use super::FileQuery;

const ACCESSION_FIELD: &str = "avh.sample_accession_number";
const RECORD_TYPE_FIELD: &str = "avh.type";
const NAME_FIELD: &str = "data_object";
const DIRECTORY_FIELD: &str = "collection";

/// Record types selectable by accession.
pub const RECORD_TYPES: [&str; 3] = ["bam", "sam", "cram"];

/// Result of predicate construction.
///
/// `Invalid` (conflicting filter parameters) is an expected business
/// failure: the caller reports "Invalid query" and performs no store
/// access. A query with no selector at all is a caller bug and is
/// rejected synchronously instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PredicateOutcome {
    Predicate(RecordPredicate),
    Invalid,
}

/// Builds the full selection predicate for a query.
pub fn build_predicate(query: &FileQuery) -> DomainResult<PredicateOutcome> {
    if let Some(accession) = query.accession.as_deref() {
        let filter_tests = match build_filter_chain(query) {
            Ok(tests) => tests,
            Err(InvalidQuery) => return Ok(PredicateOutcome::Invalid),
        };
        let mut predicate = RecordPredicate::new()
            .and(FieldTest::eq(ACCESSION_FIELD, accession))
            .and(FieldTest::is_in(
                RECORD_TYPE_FIELD,
                RECORD_TYPES.iter().map(|t| t.to_string()).collect(),
            ));
        predicate.extend(filter_tests);
        return Ok(PredicateOutcome::Predicate(predicate));
    }

    if let Some(name) = query.name.as_deref() {
        let mut predicate = RecordPredicate::new().and(FieldTest::eq(NAME_FIELD, name));
        if let Some(directory) = query.directory.as_deref() {
            predicate.push(FieldTest::eq(DIRECTORY_FIELD, directory));
        }
        return Ok(PredicateOutcome::Predicate(predicate));
    }

    Err(ContractViolation::SelectorMissing)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn predicate(outcome: PredicateOutcome) -> RecordPredicate {
        match outcome {
            PredicateOutcome::Predicate(p) => p,
            PredicateOutcome::Invalid => panic!("expected a predicate, got Invalid"),
        }
    }

    #[test]
    fn test_accession_predicate_includes_type_and_defaults() {
        let built = predicate(build_predicate(&FileQuery::by_accession("XYZ1")).unwrap());
        assert_eq!(
            built.tests(),
            &[
                FieldTest::eq("avh.sample_accession_number", "XYZ1"),
                FieldTest::is_in(
                    "avh.type",
                    vec!["bam".to_string(), "sam".to_string(), "cram".to_string()],
                ),
                FieldTest::eq("avh.target", "1"),
                FieldTest::eq("avh.manual_qc", "1"),
                FieldTest::eq("avh.alignment", "1"),
            ]
        );
    }

    #[test]
    fn test_name_predicate_matches_data_object() {
        let built = predicate(build_predicate(&FileQuery::by_name("x.cram")).unwrap());
        assert_eq!(built.tests(), &[FieldTest::eq("data_object", "x.cram")]);
    }

    #[test]
    fn test_directory_scopes_name_predicate() {
        let query = FileQuery::by_name("x.cram").in_directory("dirA");
        let built = predicate(build_predicate(&query).unwrap());
        assert_eq!(
            built.tests(),
            &[
                FieldTest::eq("data_object", "x.cram"),
                FieldTest::eq("collection", "dirA"),
            ]
        );
    }

    #[test]
    fn test_filters_do_not_apply_on_name_path() {
        let query = FileQuery::by_name("x.cram").with_param("target", "0");
        let built = predicate(build_predicate(&query).unwrap());
        assert_eq!(built.tests(), &[FieldTest::eq("data_object", "x.cram")]);
    }

    #[test]
    fn test_conflicting_filters_make_accession_query_invalid() {
        let query = FileQuery::by_accession("XYZ1")
            .with_param("target", "1")
            .with_param("target_not", "1");
        assert_eq!(build_predicate(&query).unwrap(), PredicateOutcome::Invalid);
    }

    #[test]
    fn test_accession_takes_precedence_over_name() {
        let query = FileQuery {
            accession: Some("XYZ1".to_string()),
            name: Some("x.cram".to_string()),
            ..Default::default()
        };
        let built = predicate(build_predicate(&query).unwrap());
        assert_eq!(
            built.tests()[0],
            FieldTest::eq("avh.sample_accession_number", "XYZ1")
        );
        assert!(!built
            .tests()
            .iter()
            .any(|t| matches!(t, FieldTest::Eq { field, .. } if field == "data_object")));
    }

    #[test]
    fn test_no_selector_is_a_contract_violation() {
        assert_eq!(
            build_predicate(&FileQuery::default()),
            Err(ContractViolation::SelectorMissing)
        );
    }
}
