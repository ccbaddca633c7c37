//! Persisted filter state.
//!
//! The exclude- and include-sets are written as `column=value` entries
//! joined by [`STATE_SEPARATOR`], either into two files in a state
//! directory or onto the diagnostic stream. The encoded text is valid
//! filter-spec input, so a later run can pass the file straight back to
//! `--filter-out` / `--filter-in`.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::TfrError;
use crate::filter::FilterSet;

/// Entry separator in persisted state (ASCII unit separator). Commas are
/// common in field values, this is not.
pub const STATE_SEPARATOR: char = '\u{1f}';

/// File holding the exclude-set inside the state directory.
pub const EXCLUDE_FILE: &str = "fout.txt";

/// File holding the include-set inside the state directory.
pub const INCLUDE_FILE: &str = "fin.txt";

/// Where the updated sets go at the end of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateTarget {
    /// `<dir>/fout.txt` and `<dir>/fin.txt`, replaced on every run.
    Directory(PathBuf),
    /// The diagnostic stream, exclude-set then include-set.
    Diagnostic,
}

/// Entries of `set` as `column=value` specs, columns ascending, values in
/// insertion order.
pub fn serialize(set: &FilterSet) -> Vec<String> {
    set.iter()
        .map(|(column, value)| format!("{column}={value}"))
        .collect()
}

/// Rebuild a set from specs produced by [`serialize`].
pub fn deserialize<S: AsRef<str>>(entries: &[S]) -> Result<FilterSet, TfrError> {
    FilterSet::parse(entries)
}

/// [`serialize`] joined into a single string.
pub fn encode(set: &FilterSet) -> String {
    serialize(set).join(STATE_SEPARATOR.to_string().as_str())
}

/// Inverse of [`encode`]. A trailing line terminator and empty entries are
/// ignored, so an empty file decodes to an empty set.
pub fn decode(text: &str) -> Result<FilterSet, TfrError> {
    let entries: Vec<&str> = text
        .trim_end_matches(['\n', '\r'])
        .split(STATE_SEPARATOR)
        .filter(|entry| !entry.is_empty())
        .collect();
    deserialize(&entries)
}

/// Write both sets to `target`; `diagnostic` is only used for
/// [`StateTarget::Diagnostic`].
pub fn store<W: Write>(
    exclude: &FilterSet,
    include: &FilterSet,
    target: &StateTarget,
    diagnostic: W,
) -> Result<(), TfrError> {
    match target {
        StateTarget::Directory(dir) => persist(exclude, include, dir),
        StateTarget::Diagnostic => emit(exclude, include, diagnostic),
    }
}

/// Truncate and rewrite `<dir>/fout.txt` and `<dir>/fin.txt`, creating
/// `dir` if needed.
pub fn persist(exclude: &FilterSet, include: &FilterSet, dir: &Path) -> Result<(), TfrError> {
    fs::create_dir_all(dir).map_err(|source| TfrError::Persistence {
        path: dir.to_path_buf(),
        source,
    })?;

    for (name, set) in [(EXCLUDE_FILE, exclude), (INCLUDE_FILE, include)] {
        let path = dir.join(name);
        fs::write(&path, encode(set))
            .map_err(|source| TfrError::Persistence { path: path.clone(), source })?;
        log::info!("wrote {} filter entries to {}", set.len(), path.display());
    }
    Ok(())
}

/// Write exclude-set then include-set to `out` with nothing in between.
pub fn emit<W: Write>(exclude: &FilterSet, include: &FilterSet, mut out: W) -> Result<(), TfrError> {
    let text = encode(exclude) + &encode(include);
    out.write_all(text.as_bytes())
        .and_then(|()| out.flush())
        .map_err(|source| TfrError::Persistence {
            path: PathBuf::from("<stderr>"),
            source,
        })
}
