//! The six named query filters and the filter chain builder.
//!
//! Each filter owns a positive and a negative query parameter over one
//! store field. Per filter, the query resolves to one of five modes:
//! equals, not-equals, exists, not-exists, or omitted. Supplying both
//! parameters of one filter invalidates the whole query and no store
//! access happens.

use seqgate_storage::FieldTest;

use super::FileQuery;

/// Parameter value requesting a field-absence (or, negated, a
/// field-presence) test instead of a value comparison.
const ABSENT_VALUE: &str = "undef";

/// One named filter: its store field, parameter pair and default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterSpec {
    pub store_field: &'static str,
    pub positive_param: &'static str,
    pub negative_param: &'static str,
    pub default_value: Option<&'static str>,
}

/// The six fixed filters, in application order.
pub const FILTER_SPECS: [FilterSpec; 6] = [
    FilterSpec {
        store_field: "avh.target",
        positive_param: "target",
        negative_param: "target_not",
        default_value: Some("1"),
    },
    FilterSpec {
        store_field: "avh.manual_qc",
        positive_param: "manual_qc",
        negative_param: "manual_qc_not",
        default_value: Some("1"),
    },
    FilterSpec {
        store_field: "avh.alignment",
        positive_param: "alignment",
        negative_param: "alignment_not",
        default_value: Some("1"),
    },
    FilterSpec {
        store_field: "avh.alt_target",
        positive_param: "alt_target",
        negative_param: "alt_target_not",
        default_value: None,
    },
    FilterSpec {
        store_field: "avh.alt_process",
        positive_param: "alt_process",
        negative_param: "alt_process_not",
        default_value: None,
    },
    FilterSpec {
        store_field: "avh.alignment_filter",
        positive_param: "alignment_filter",
        negative_param: "alignment_filter_not",
        default_value: None,
    },
];

/// How one filter contributes to the selection predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterMode {
    /// Field is present and equal to the value.
    Equals(String),
    /// Field is absent or not equal to the value.
    NotEquals(String),
    /// Field is present, whatever its value.
    Exists,
    /// Field is absent.
    NotExists,
    /// This filter adds nothing to the predicate.
    Omitted,
}

/// The query supplied both the positive and the negative parameter of
/// one filter. The whole query is invalid; the caller must report
/// "Invalid query" without touching the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidQuery;

impl FilterSpec {
    /// Derives this filter's mode from the query parameters.
    pub fn mode_for(&self, query: &FileQuery) -> Result<FilterMode, InvalidQuery> {
        let positive = query.param(self.positive_param);
        let negative = query.param(self.negative_param);

        match (positive, negative) {
            (Some(_), Some(_)) => Err(InvalidQuery),
            (Some(value), None) => Ok(match value {
                ABSENT_VALUE => FilterMode::NotExists,
                "" => FilterMode::Omitted,
                _ => FilterMode::Equals(value.to_string()),
            }),
            (None, Some(value)) => Ok(match value {
                ABSENT_VALUE => FilterMode::Exists,
                "" => FilterMode::Omitted,
                _ => FilterMode::NotEquals(value.to_string()),
            }),
            (None, None) => Ok(self
                .default_value
                .map_or(FilterMode::Omitted, |default| {
                    FilterMode::Equals(default.to_string())
                })),
        }
    }

    fn test_for(&self, mode: FilterMode) -> Option<FieldTest> {
        match mode {
            FilterMode::Equals(value) => Some(FieldTest::eq(self.store_field, value)),
            FilterMode::NotEquals(value) => Some(FieldTest::ne(self.store_field, value)),
            FilterMode::Exists => Some(FieldTest::exists(self.store_field)),
            FilterMode::NotExists => Some(FieldTest::not_exists(self.store_field)),
            FilterMode::Omitted => None,
        }
    }
}

/// Builds the filter fragment of a selection predicate.
///
/// The empty conjunction is valid and matches everything for the
/// filter dimensions.
pub fn build_filter_chain(query: &FileQuery) -> Result<Vec<FieldTest>, InvalidQuery> {
    let mut tests = Vec::new();
    for spec in &FILTER_SPECS {
        if let Some(test) = spec.test_for(spec.mode_for(query)?) {
            tests.push(test);
        }
    }
    Ok(tests)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_apply_when_no_params_given() {
        let tests = build_filter_chain(&FileQuery::by_accession("XYZ1")).unwrap();
        assert_eq!(
            tests,
            vec![
                FieldTest::eq("avh.target", "1"),
                FieldTest::eq("avh.manual_qc", "1"),
                FieldTest::eq("avh.alignment", "1"),
            ]
        );
    }

    #[test]
    fn test_positive_value_becomes_equality() {
        let query = FileQuery::by_accession("XYZ1").with_param("alt_target", "1");
        let tests = build_filter_chain(&query).unwrap();
        assert!(tests.contains(&FieldTest::eq("avh.alt_target", "1")));
    }

    #[test]
    fn test_positive_undef_becomes_absence_test() {
        let query = FileQuery::by_accession("XYZ1").with_param("target", "undef");
        let tests = build_filter_chain(&query).unwrap();
        assert!(tests.contains(&FieldTest::not_exists("avh.target")));
        assert!(!tests.iter().any(|t| t == &FieldTest::eq("avh.target", "1")));
    }

    #[test]
    fn test_negative_undef_becomes_presence_test() {
        let query = FileQuery::by_accession("XYZ1").with_param("alt_process_not", "undef");
        let tests = build_filter_chain(&query).unwrap();
        assert!(tests.contains(&FieldTest::exists("avh.alt_process")));
    }

    #[test]
    fn test_negative_value_becomes_inequality() {
        let query = FileQuery::by_accession("XYZ1").with_param("alignment_filter_not", "phix");
        let tests = build_filter_chain(&query).unwrap();
        assert!(tests.contains(&FieldTest::ne("avh.alignment_filter", "phix")));
    }

    #[test]
    fn test_empty_value_suppresses_filter_and_default() {
        let query = FileQuery::by_accession("XYZ1").with_param("target", "");
        let tests = build_filter_chain(&query).unwrap();
        assert!(!tests.iter().any(|t| matches!(
            t,
            FieldTest::Eq { field, .. } | FieldTest::NotExists { field } if field == "avh.target"
        )));
        // The other defaults are untouched.
        assert!(tests.contains(&FieldTest::eq("avh.manual_qc", "1")));
    }

    #[test]
    fn test_no_default_means_no_test() {
        let tests = build_filter_chain(&FileQuery::by_accession("XYZ1")).unwrap();
        assert!(!tests
            .iter()
            .any(|t| matches!(t, FieldTest::Eq { field, .. } if field.starts_with("avh.alt"))));
    }

    #[test]
    fn test_conflicting_params_invalidate_whole_query() {
        for spec in &FILTER_SPECS {
            let query = FileQuery::by_accession("XYZ1")
                .with_param(spec.positive_param, "1")
                .with_param(spec.negative_param, "0");
            assert_eq!(
                build_filter_chain(&query),
                Err(InvalidQuery),
                "filter {} should conflict",
                spec.positive_param
            );
        }
    }

    #[test]
    fn test_conflict_applies_even_with_empty_values() {
        let query = FileQuery::by_accession("XYZ1")
            .with_param("manual_qc", "")
            .with_param("manual_qc_not", "");
        assert_eq!(build_filter_chain(&query), Err(InvalidQuery));
    }

    #[test]
    fn test_conflict_wins_regardless_of_other_filters() {
        let query = FileQuery::by_accession("XYZ1")
            .with_param("target", "1")
            .with_param("target_not", "0")
            .with_param("alignment", "undef")
            .with_param("alt_process_not", "");
        assert_eq!(build_filter_chain(&query), Err(InvalidQuery));
    }
}
