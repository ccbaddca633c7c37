//! # csv-tfr
//!
//! Take a delimited table from stdin, [t]ransform it, [f]ilter it, then
//! [r]emember the filtering decisions for the next run.
//!
//! ## Overview
//!
//! - **Remap**: `from=to` specs copy input columns to output columns
//! - **Filter**: `column=value` rules exclude or include rows, exclude wins
//! - **Ask**: rows no rule decides can be put to the operator as a `y`/`n`
//!   prompt on the terminal, and the answer becomes a new rule
//! - **Remember**: the updated rules are written out in a form the next run
//!   accepts as filter input
//!
//! No quoting is supported: separators are plain split tokens.
//!
//! ## Example
//!
//! ```
//! use csv_tfr::{ColumnMap, Config, FilterSet, Pipeline};
//! use std::io::Cursor;
//!
//! let config = Config {
//!     column_map: ColumnMap::parse(&["1=0", "0=1"]).unwrap(),
//!     ..Config::default()
//! };
//! let exclude = FilterSet::parse(&["0=potatoes"]).unwrap();
//! let mut pipeline = Pipeline::new(config, exclude, FilterSet::new(), None).unwrap();
//!
//! let mut out = Vec::new();
//! let mut diagnostic = Vec::new();
//! pipeline
//!     .run(Cursor::new("oranges,7\npotatoes,4\n\n"), &mut out, &mut diagnostic)
//!     .unwrap();
//!
//! assert_eq!(out, b"7,oranges\n");
//! ```

pub mod column_map;
pub mod error;
pub mod filter;
pub mod pipeline;
pub mod prompt;
pub mod reader;
pub mod state;

pub use column_map::{ColumnMap, escape_separator};
pub use error::TfrError;
pub use filter::{Decision, FilterSet, evaluate};
pub use pipeline::{Config, Pipeline, RunSummary, render};
pub use prompt::{Prompter, Resolver, TtyPrompter};
pub use reader::read_lines;
pub use state::{STATE_SEPARATOR, StateTarget};
