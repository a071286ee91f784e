//! CLI support for suela
//!
//! Provides programmatic access to the `suela` command's operations so that
//! other tools can embed them.

mod check;
mod run;

pub use check::{CheckOptions, CheckResult, execute_check};
pub use run::{RunOptions, execute_run, format_output};

use std::{
    fs,
    io::{self, Read},
    path::{Path, PathBuf},
};

use thiserror::Error;

use crate::{EvalError, Parser, SyntaxError, ast::Ast};

/// Errors that can occur during CLI operations
#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Syntax(#[from] SyntaxError),

    #[error("{0}")]
    Eval(#[from] EvalError),

    #[error("cannot read {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("cannot read standard input: {0}")]
    Stdin(#[source] io::Error),

    #[error("cannot encode result as JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no script provided; pass a file or pipe a script to stdin")]
    NoInput,
}

/// A named piece of script text.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptSource {
    /// Name used in diagnostics
    pub name: String,
    pub text: String,
}

impl ScriptSource {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        ScriptSource {
            name: name.into(),
            text: text.into(),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, CliError> {
        let text = fs::read_to_string(path).map_err(|source| CliError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(ScriptSource::new(path.display().to_string(), text))
    }

    pub fn from_reader(name: impl Into<String>, mut reader: impl Read) -> Result<Self, CliError> {
        let mut text = String::new();
        reader.read_to_string(&mut text).map_err(CliError::Stdin)?;
        Ok(ScriptSource::new(name, text))
    }

    /// Parses the source, returning the first syntax error as `Err`.
    pub fn parse(&self) -> Result<Ast, SyntaxError> {
        Parser::from_source(&self.name, &self.text).parse_checked()
    }
}
