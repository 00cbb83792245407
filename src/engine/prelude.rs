//! The standard definitions every environment starts with unless the caller
//! opts out.

use crate::engine::env::Environment;
use crate::engine::eval::{LispError, eval};
use crate::engine::parser::parse;
use tracing::{debug, instrument};

pub const PRELUDE_SOURCE: &str = include_str!("prelude.lisp");

/// Evaluates the prelude into `env`.
#[instrument(level = "debug", skip(env), err)]
pub fn load_prelude(env: &mut Environment<'_>) -> Result<(), LispError> {
    let tree = parse(PRELUDE_SOURCE)?;
    eval(&tree, env)?;
    debug!("Loaded prelude");
    Ok(())
}
