//! Inclusion/exclusion rules keyed by column index.
//!
//! A filter spec `column=value` adds `value` to the trigger list for
//! `column`. Rows are checked against the exclude-set first; a match there
//! drops the row no matter what the include-set says.

use std::collections::BTreeMap;
use std::fs;

use crate::error::TfrError;
use crate::state;

const USAGE: &str = "All filter arguments must have the format {column}={string}.";

/// Outcome of checking one row against the rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Excluded,
    Included,
    Undecided,
}

/// Trigger values per column, in the order they were added.
///
/// Columns may be negative or wider than any row; such entries never match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet {
    columns: BTreeMap<i64, Vec<String>>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from filter specs.
    ///
    /// A single spec naming a readable file is replaced by that file's
    /// entries, which is how state persisted by an earlier run is loaded.
    pub fn load<S: AsRef<str>>(specs: &[S]) -> Result<Self, TfrError> {
        if let [only] = specs
            && let Ok(content) = fs::read_to_string(only.as_ref())
        {
            log::debug!("loading filter state from '{}'", only.as_ref());
            return state::decode(&content);
        }
        Self::parse(specs)
    }

    /// Parse `column=value` specs, reporting every malformed one at once.
    pub fn parse<S: AsRef<str>>(specs: &[S]) -> Result<Self, TfrError> {
        let mut set = FilterSet::new();
        let mut problems = Vec::new();

        for spec in specs {
            let spec = spec.as_ref();
            let Some((column, value)) = spec.split_once('=') else {
                problems.push(format!("Invalid format {spec}. Contained no = sign"));
                continue;
            };
            match column.trim().parse::<i64>() {
                Ok(column) => set.insert(column, value),
                Err(_) => problems.push(format!(
                    "Invalid format {spec}, left side must be an integer"
                )),
            }
        }

        if !problems.is_empty() {
            return Err(TfrError::SpecFormat {
                usage: USAGE,
                problems,
            });
        }
        Ok(set)
    }

    /// Add a trigger value for `column`. Duplicates are kept.
    pub fn insert(&mut self, column: i64, value: impl Into<String>) {
        self.columns.entry(column).or_default().push(value.into());
    }

    /// Trigger values registered for `column`.
    pub fn values(&self, column: i64) -> &[String] {
        self.columns.get(&column).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Iterate `(column, value)` entries, values in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (i64, &str)> {
        self.columns
            .iter()
            .flat_map(|(&column, values)| values.iter().map(move |v| (column, v.as_str())))
    }

    /// Total number of trigger values across all columns.
    pub fn len(&self) -> usize {
        self.columns.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Does any rule match `row`?
    ///
    /// Field and trigger are both trimmed before the exact comparison.
    pub fn matches(&self, row: &[&str]) -> bool {
        self.columns.iter().any(|(&column, values)| {
            let Some(field) = usize::try_from(column).ok().and_then(|i| row.get(i)) else {
                return false;
            };
            let field = field.trim();
            values.iter().any(|v| v.trim() == field)
        })
    }
}

/// Check `row` against both sets, exclude-set first.
pub fn evaluate(row: &[&str], exclude: &FilterSet, include: &FilterSet) -> Decision {
    if exclude.matches(row) {
        Decision::Excluded
    } else if include.matches(row) {
        Decision::Included
    } else {
        Decision::Undecided
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::STATE_SEPARATOR;
    use std::io::Write;

    #[test]
    fn test_parse_groups_by_column() {
        let set = FilterSet::parse(&["0=potatoes", "1=7", "0=leeks"]).unwrap();
        assert_eq!(set.values(0), &["potatoes", "leeks"]);
        assert_eq!(set.values(1), &["7"]);
        assert!(set.values(2).is_empty());
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_parse_keeps_duplicates_and_equals_in_value() {
        let set = FilterSet::parse(&["0=a=b", "0=a=b"]).unwrap();
        assert_eq!(set.values(0), &["a=b", "a=b"]);
    }

    #[test]
    fn test_parse_aggregates_errors() {
        let err = FilterSet::parse(&["nope", "x=1", "2=ok"]).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("nope"));
        assert!(msg.contains("x=1"));
        assert!(!msg.contains("2=ok"));
    }

    #[test]
    fn test_matches_trims_field() {
        let set = FilterSet::parse(&["1=potatoes"]).unwrap();
        assert!(set.matches(&["4", " potatoes "]));
        assert!(!set.matches(&["4", "oranges"]));
    }

    #[test]
    fn test_out_of_range_columns_are_inert() {
        let set = FilterSet::parse(&["-1=a", "9=a"]).unwrap();
        assert!(!set.matches(&["a", "a"]));
    }

    #[test]
    fn test_evaluate_exclude_wins() {
        let exclude = FilterSet::parse(&["0=oranges"]).unwrap();
        let include = FilterSet::parse(&["1=7"]).unwrap();
        assert_eq!(evaluate(&["oranges", "7"], &exclude, &include), Decision::Excluded);
        assert_eq!(evaluate(&["apples", "7"], &exclude, &include), Decision::Included);
        assert_eq!(evaluate(&["apples", "3"], &exclude, &include), Decision::Undecided);
    }

    #[test]
    fn test_evaluate_empty_sets_undecided() {
        let empty = FilterSet::new();
        assert_eq!(evaluate(&["a"], &empty, &empty), Decision::Undecided);
    }

    #[test]
    fn test_load_plain_specs() {
        let set = FilterSet::load(&["0=a"]).unwrap();
        assert_eq!(set.values(0), &["a"]);
    }

    #[test]
    fn test_load_from_state_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "0=a{STATE_SEPARATOR}1=b,c{STATE_SEPARATOR}0=d\n").unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let set = FilterSet::load(&[path]).unwrap();
        assert_eq!(set.values(0), &["a", "d"]);
        assert_eq!(set.values(1), &["b,c"]);
    }

    #[test]
    fn test_load_empty_state_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let path = file.path().to_str().unwrap().to_string();
        assert!(FilterSet::load(&[path]).unwrap().is_empty());
    }

    #[test]
    fn test_load_malformed_state_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "garbage").unwrap();
        let path = file.path().to_str().unwrap().to_string();
        assert!(matches!(
            FilterSet::load(&[path]),
            Err(TfrError::SpecFormat { .. })
        ));
    }
}
