//! Column remapping.
//!
//! A remap spec `from=to` copies field `from` of the input row into field
//! `to` of the output row. Specs are applied in the order given, so when two
//! specs share a `to` target the later one wins.

use crate::error::TfrError;

const USAGE: &str =
    "All mappings must have the format {from}={to_column}, both sides must be integers.";

/// Output rows are never wider than this.
pub const MAX_WIDTH: usize = 1 << 16;

/// Ordered `(from, to)` pairs plus the resulting output width.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMap {
    pairs: Vec<(i64, usize)>,
    width: usize,
}

impl ColumnMap {
    /// Parse remap specs.
    ///
    /// Items without an `=` are ignored. Every malformed item is reported in
    /// a single [`TfrError::SpecFormat`].
    pub fn parse<S: AsRef<str>>(specs: &[S]) -> Result<Self, TfrError> {
        let mut map = ColumnMap::default();
        let mut problems = Vec::new();

        for spec in specs {
            let spec = spec.as_ref();
            let Some((from, to)) = spec.split_once('=') else {
                continue;
            };

            let from = from.trim().parse::<i64>();
            let to = to.trim().parse::<usize>();
            match (from, to) {
                (Ok(_), Ok(to)) if to >= MAX_WIDTH => problems.push(format!(
                    "Invalid format {spec}, right side must be below {MAX_WIDTH}"
                )),
                (Ok(from), Ok(to)) => map.push(from, to),
                (Err(_), _) => problems.push(format!(
                    "Invalid format {spec}, left side must be an integer"
                )),
                (_, Err(_)) => problems.push(format!(
                    "Invalid format {spec}, right side must be a non-negative integer"
                )),
            }
        }

        if !problems.is_empty() {
            return Err(TfrError::SpecFormat {
                usage: USAGE,
                problems,
            });
        }

        log::debug!("column map: {:?}", map.pairs);
        Ok(map)
    }

    /// Append a pair, growing the output width if `to` is past the end.
    ///
    /// Targets at or beyond [`MAX_WIDTH`] are ignored.
    pub fn push(&mut self, from: i64, to: usize) {
        if to >= MAX_WIDTH {
            log::warn!("ignoring mapping {from}={to}, target is past {MAX_WIDTH}");
            return;
        }
        self.width = self.width.max(to + 1);
        self.pairs.push((from, to));
    }

    pub fn pairs(&self) -> &[(i64, usize)] {
        &self.pairs
    }

    /// Number of fields in every output row.
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Build the output row for `row`.
    ///
    /// Pairs whose `from` is negative or past the end of `row` are skipped and
    /// leave their target empty. Moved values are trimmed and any occurrence of
    /// `output_separator` inside them is replaced by [`escape_separator`].
    pub fn apply(&self, row: &[&str], output_separator: &str) -> Vec<String> {
        let mut output = vec![String::new(); self.width];

        for &(from, to) in &self.pairs {
            let Some(value) = usize::try_from(from).ok().and_then(|i| row.get(i)) else {
                continue;
            };
            output[to] = escape_separator(value.trim(), output_separator);
        }

        output
    }
}

/// Replace every occurrence of `separator` in `value` with the separator
/// shifted up by one code point (`,` becomes `-`, `|` becomes `}`).
///
/// This is lossy: the original value cannot be recovered from the output.
pub fn escape_separator(value: &str, separator: &str) -> String {
    if separator.is_empty() || !value.contains(separator) {
        return value.to_string();
    }
    let shifted: String = separator
        .chars()
        .map(|c| char::from_u32(c as u32 + 1).unwrap_or(c))
        .collect();
    value.replace(separator, &shifted)
}
