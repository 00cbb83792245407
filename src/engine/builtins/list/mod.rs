use crate::engine::builtins::{Arity, check_arity, eval_list};
use crate::engine::env::Environment;
use crate::engine::eval::{LispError, eval, force};
use crate::engine::value::Value;
use tracing::{error, trace};

/// Name of the list constructor. String literals desugar into calls to it.
pub const LIST: &str = "list";

#[tracing::instrument(level = "trace", skip(args, env), ret, err)]
pub fn list(args: &[Value], env: &mut Environment<'_>) -> Result<Value, LispError> {
    trace!("Executing builtin 'list'");
    let mut items = Vec::with_capacity(args.len());
    for arg in args {
        items.push(eval(arg, env)?);
    }
    Ok(Value::List(items))
}

/// `(push x l)` returns a new list with `x` in front of the items of `l`.
#[tracing::instrument(level = "trace", skip(args, env), ret, err)]
pub fn push(args: &[Value], env: &mut Environment<'_>) -> Result<Value, LispError> {
    trace!("Executing builtin 'push'");
    check_arity("push", args, Arity::Exactly(2))?;
    let head = eval(&args[0], env)?;
    let tail = eval_list(&args[1], env, "push")?;
    let mut items = Vec::with_capacity(tail.len() + 1);
    items.push(head);
    items.extend(tail);
    Ok(Value::List(items))
}

/// `(pop l)` returns every item but the first; popping `()` gives `()`.
#[tracing::instrument(level = "trace", skip(args, env), ret, err)]
pub fn pop(args: &[Value], env: &mut Environment<'_>) -> Result<Value, LispError> {
    trace!("Executing builtin 'pop'");
    check_arity("pop", args, Arity::Exactly(1))?;
    let items = eval_list(&args[0], env, "pop")?;
    Ok(Value::List(items.into_iter().skip(1).collect()))
}

/// `(el l)` returns the first item of `l`.
#[tracing::instrument(level = "trace", skip(args, env), ret, err)]
pub fn el(args: &[Value], env: &mut Environment<'_>) -> Result<Value, LispError> {
    trace!("Executing builtin 'el'");
    check_arity("el", args, Arity::Exactly(1))?;
    let items = eval_list(&args[0], env, "el")?;
    match items.first() {
        Some(first) => force(first, env),
        None => {
            error!("'el' called on an empty list");
            Err(LispError::ValueError("'el' of an empty list".to_string()))
        }
    }
}
