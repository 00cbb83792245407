pub mod engine;
pub mod logging;

use engine::env::Environment;
use engine::eval::{LispError, eval};
use engine::parser::parse;
use engine::value::Value;
use tracing::{debug, instrument};

/// Parses `source` and evaluates it against `env`, returning the value of the
/// last top-level expression. `origin` names the source in logs.
#[instrument(level = "debug", skip(source, env), err)]
pub fn evaluate_source(
    source: &str,
    env: &mut Environment<'_>,
    origin: &str,
) -> Result<Value, LispError> {
    let tree = parse(source)?;
    debug!(origin, "Parsed source");
    eval(&tree, env)
}
