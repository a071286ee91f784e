//! Validate suela scripts without running them

use super::{CliError, ScriptSource};

/// Options for the check command
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// Scripts to validate
    pub sources: Vec<ScriptSource>,
    /// Return each script's S-expression
    pub show_ast: bool,
}

/// Result of a check operation
#[derive(Debug, PartialEq)]
pub enum CheckResult {
    /// Every script parsed
    SyntaxValid,
    /// Every script parsed; one S-expression per script
    Trees(Vec<String>),
}

/// Execute a suela check operation
pub fn execute_check(options: &CheckOptions) -> Result<CheckResult, CliError> {
    if options.sources.is_empty() {
        return Err(CliError::NoInput);
    }

    let mut trees = Vec::with_capacity(options.sources.len());
    for source in &options.sources {
        let script = source.parse()?;
        trees.push(script.describe());
    }

    if options.show_ast {
        Ok(CheckResult::Trees(trees))
    } else {
        Ok(CheckResult::SyntaxValid)
    }
}
