//! Execute suela scripts

use tracing::info;

use super::{CliError, ScriptSource};
use crate::{Environment, Value, ast::Ast};

/// Options for the run command
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Scripts to run, in order, as one program
    pub sources: Vec<ScriptSource>,
    /// Print the result as JSON
    pub json: bool,
    /// Pretty-print JSON output
    pub pretty: bool,
}

/// Parses every source, then evaluates them in order in `env`.
///
/// Nothing runs unless all sources parse. The result is the value of the
/// last statement of the last source.
pub fn execute_run(options: &RunOptions, env: &mut Environment) -> Result<Value, CliError> {
    if options.sources.is_empty() {
        return Err(CliError::NoInput);
    }

    let mut statements = Vec::with_capacity(options.sources.len());
    for source in &options.sources {
        let script = source.parse()?;
        info!(source = %source.name, statements = script.children.len(), "parsed script");
        statements.push(Ast::statement(script.children));
    }

    let program = Ast::script(statements);
    Ok(env.try_eval(&program)?)
}

/// Renders a result for the terminal: canonical text, or JSON.
pub fn format_output(value: &Value, json: bool, pretty: bool) -> Result<String, CliError> {
    if !json {
        return Ok(value.to_string());
    }
    let json = value.to_json();
    let text = if pretty {
        serde_json::to_string_pretty(&json)?
    } else {
        serde_json::to_string(&json)?
    };
    Ok(text)
}
