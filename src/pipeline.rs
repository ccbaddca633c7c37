//! Pipeline driver: read, decide, remap, write, remember.
//!
//! Rows are handled strictly in input order in a single pass:
//!
//! 1. split on the input separator
//! 2. exclude-set check, then include-set check
//! 3. rows still undecided go to the operator (interactive mode), or pass
//!    when no include rules are in force
//! 4. surviving rows are remapped and joined with the output separator
//!
//! Decisions made interactively update the sets in place, so they apply to
//! every later row of the same run and are stored at the end.

use std::io::{BufRead, Write};

use crate::column_map::ColumnMap;
use crate::error::TfrError;
use crate::filter::{self, Decision, FilterSet};
use crate::prompt::{Prompter, Resolver};
use crate::reader::read_lines;
use crate::state::{self, StateTarget};

/// Everything a run needs besides its filter sets and streams.
#[derive(Debug, Clone)]
pub struct Config {
    pub input_separator: String,
    pub output_separator: String,
    pub column_map: ColumnMap,
    /// Column remembered on interactive answers; `None` disables prompting.
    pub interactive_column: Option<usize>,
    pub state_target: StateTarget,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_separator: ",".to_string(),
            output_separator: ",".to_string(),
            column_map: ColumnMap::default(),
            interactive_column: None,
            state_target: StateTarget::Diagnostic,
        }
    }
}

/// Record counts for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub input_count: usize,
    pub output_count: usize,
}

pub struct Pipeline {
    config: Config,
    exclude: FilterSet,
    include: FilterSet,
    resolver: Option<Resolver<Box<dyn Prompter>>>,
}

impl Pipeline {
    /// Build a pipeline. `prompter` is required exactly when
    /// `config.interactive_column` is set, and ignored otherwise.
    pub fn new(
        config: Config,
        exclude: FilterSet,
        include: FilterSet,
        prompter: Option<Box<dyn Prompter>>,
    ) -> Result<Self, TfrError> {
        if config.input_separator.is_empty() {
            return Err(TfrError::Usage("the input separator must not be empty".to_string()));
        }

        let resolver = match (config.interactive_column, prompter) {
            (Some(column), Some(prompter)) => Some(Resolver::new(prompter, column)),
            (Some(column), None) => {
                return Err(TfrError::Usage(format!(
                    "interactive filtering on column {column} needs a terminal"
                )));
            }
            (None, _) => None,
        };

        Ok(Self {
            config,
            exclude,
            include,
            resolver,
        })
    }

    pub fn exclude(&self) -> &FilterSet {
        &self.exclude
    }

    pub fn include(&self) -> &FilterSet {
        &self.include
    }

    /// Decide the fate of one row, asking the operator if needed.
    pub fn decide(&mut self, line: &str, row: &[&str]) -> Result<Decision, TfrError> {
        let decision = match filter::evaluate(row, &self.exclude, &self.include) {
            Decision::Undecided => match self.resolver.as_mut() {
                Some(resolver) => resolver.resolve(line, row, &mut self.exclude, &mut self.include)?,
                None if self.include.is_empty() => Decision::Included,
                None => Decision::Excluded,
            },
            decided => decided,
        };
        log::debug!("{decision:?}: {line}");
        Ok(decision)
    }

    /// Filter and remap `lines`, returning the surviving output rows.
    pub fn process(&mut self, lines: &[String]) -> Result<Vec<String>, TfrError> {
        let mut output = Vec::new();

        for line in lines {
            let row: Vec<&str> = line.split(self.config.input_separator.as_str()).collect();
            if self.decide(line, &row)? != Decision::Included {
                continue;
            }
            let sep = self.config.output_separator.as_str();
            output.push(self.config.column_map.apply(&row, sep).join(sep));
        }

        Ok(output)
    }

    /// Run end to end: read `input`, write the table to `output`, then store
    /// the filter sets (to `diagnostic` unless a state directory is set).
    ///
    /// Output is written before the sets are stored; a storage failure does
    /// not take the output back.
    pub fn run<R: BufRead, W: Write, D: Write>(
        &mut self,
        input: R,
        mut output: W,
        diagnostic: D,
    ) -> Result<RunSummary, TfrError> {
        let lines = read_lines(input)?;
        let rows = self.process(&lines)?;

        output
            .write_all(render(&rows).as_bytes())
            .and_then(|()| output.flush())
            .map_err(TfrError::Write)?;

        let summary = RunSummary {
            input_count: lines.len(),
            output_count: rows.len(),
        };
        log::info!(
            "{} records in -> {} out",
            summary.input_count,
            summary.output_count
        );

        state::store(&self.exclude, &self.include, &self.config.state_target, diagnostic)?;
        Ok(summary)
    }

    /// Hand back the (possibly updated) exclude- and include-sets.
    pub fn into_filter_sets(self) -> (FilterSet, FilterSet) {
        (self.exclude, self.include)
    }
}

/// Join output rows with newlines plus one trailing newline. No rows renders
/// as nothing at all.
pub fn render(rows: &[String]) -> String {
    if rows.is_empty() {
        return String::new();
    }
    let mut text = rows.join("\n");
    text.push('\n');
    text
}
