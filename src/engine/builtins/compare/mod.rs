use crate::engine::builtins::{Arity, check_arity};
use crate::engine::env::Environment;
use crate::engine::eval::{LispError, eval};
use crate::engine::value::Value;
use std::cmp::Ordering;
use tracing::{debug, trace};

/// Structural equality; values of different variants are never equal.
#[tracing::instrument(level = "trace", skip(args, env), ret, err)]
pub fn equal(args: &[Value], env: &mut Environment<'_>) -> Result<Value, LispError> {
    trace!("Executing builtin 'eq'");
    check_arity("eq", args, Arity::Exactly(2))?;
    let lhs = eval(&args[0], env)?;
    let rhs = eval(&args[1], env)?;
    debug!(lhs = %lhs, rhs = %rhs, "Comparing for equality");
    Ok(Value::truth(lhs == rhs))
}

/// Same-variant ordering; any other pairing is `0`.
#[tracing::instrument(level = "trace", skip(args, env), ret, err)]
pub fn less_than(args: &[Value], env: &mut Environment<'_>) -> Result<Value, LispError> {
    trace!("Executing builtin '<'");
    check_arity("<", args, Arity::Exactly(2))?;
    let lhs = eval(&args[0], env)?;
    let rhs = eval(&args[1], env)?;
    Ok(Value::truth(lhs.partial_cmp(&rhs) == Some(Ordering::Less)))
}
