use crate::engine::builtins;
use crate::engine::env::Environment;
use crate::engine::special_forms::is_special_form;
use crate::engine::value::{Procedure, Value};
use thiserror::Error;
use tracing::{debug, error, instrument, trace};

const STACK_RED_ZONE: usize = 128 * 1024;
const STACK_GROW_SIZE: usize = 4 * 1024 * 1024;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LispError {
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Undefined symbol: {0}")]
    UndefinedSymbol(String),
    #[error("Not callable: {0}")]
    NotCallable(String),
    #[error("Type error: expected {expected}, found {found}")]
    TypeError { expected: String, found: String },
    #[error("Arity mismatch: {0}")]
    ArityMismatch(String),
    #[error("Cannot bind reserved keyword: {0}")]
    ReservedKeyword(String),
    #[error("Numeric error: {0}")]
    Numeric(String),
    #[error("Value error: {0}")]
    ValueError(String),
    #[error("Stack exhausted: procedure calls nested deeper than {limit}")]
    StackExhausted { limit: usize },
    #[error("Output error: {0}")]
    Output(String),
}

/// Evaluates `expr` against `env`.
///
/// Numbers, chars and procedures are self-evaluating. A name is looked up.
/// A list is code: with a list in head position it is a sequence, with a
/// name in head position it is a call, otherwise it is data.
#[instrument(level = "trace", skip(expr, env), fields(expr = %expr), ret, err)]
pub fn eval(expr: &Value, env: &mut Environment<'_>) -> Result<Value, LispError> {
    // Evaluation recurses on the host stack; grow it so the call depth limit
    // is what stops runaway recursion on any thread.
    stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || eval_inner(expr, env))
}

fn eval_inner(expr: &Value, env: &mut Environment<'_>) -> Result<Value, LispError> {
    match expr {
        Value::Number(_) | Value::Char(_) | Value::Procedure(_) => Ok(expr.clone()),
        Value::Name(name) => resolve(name, env),
        Value::List(items) => match items.first() {
            None => {
                trace!("List is empty, evaluating to empty list");
                Ok(Value::List(Vec::new()))
            }
            Some(Value::List(_)) => eval_sequence(items, env),
            Some(Value::Name(name)) => apply(name, &items[1..], env),
            Some(head) => {
                trace!(head = %head, "List head is not an operator, treating list as data");
                Ok(expr.clone())
            }
        },
    }
}

/// Evaluates each expression in order and returns the last result.
pub fn eval_sequence(exprs: &[Value], env: &mut Environment<'_>) -> Result<Value, LispError> {
    debug!(count = exprs.len(), "Evaluating sequence");
    let mut result = Value::List(Vec::new());
    for expr in exprs {
        result = eval(expr, env)?;
    }
    Ok(result)
}

/// Looks a name up. A name bound to another name is followed until a
/// non-name value is reached; revisiting a name is an error.
fn resolve(name: &str, env: &Environment<'_>) -> Result<Value, LispError> {
    let mut seen: Vec<&str> = vec![name];
    let mut current = name;
    loop {
        match env.get(current) {
            Some(Value::Name(alias)) => {
                if seen.contains(&alias.as_str()) {
                    error!(name, alias = %alias, "Name binding refers back to itself");
                    return Err(LispError::ValueError(format!(
                        "cyclic binding: '{}' resolves back to '{}'",
                        name, alias
                    )));
                }
                trace!(name = current, alias = %alias, "Following name bound to another name");
                seen.push(alias.as_str());
                current = alias.as_str();
            }
            Some(value) => return Ok(value.clone()),
            None => {
                error!(symbol_name = %current, "Undefined symbol encountered");
                return Err(LispError::UndefinedSymbol(current.to_string()));
            }
        }
    }
}

/// Evaluates a value found inside list data. Names are resolved, anything
/// else is already a value and is never re-run as code.
pub fn force(value: &Value, env: &Environment<'_>) -> Result<Value, LispError> {
    match value {
        Value::Name(name) => resolve(name, env),
        other => Ok(other.clone()),
    }
}

/// Dispatches a call: builtins first, then procedures bound in `env`.
fn apply(name: &str, args: &[Value], env: &mut Environment<'_>) -> Result<Value, LispError> {
    if let Some(builtin) = builtins::lookup(name) {
        trace!(operator = %name, special_form = is_special_form(name), "Dispatching to builtin");
        return builtin(args, env);
    }

    match env.get(name) {
        Some(Value::Procedure(procedure)) => {
            let procedure = procedure.clone();
            call_procedure(&procedure, args, env)
        }
        Some(other) => {
            error!(name, value = %other, "Attempted to call a non-procedure");
            Err(LispError::NotCallable(format!(
                "'{}' is bound to a {} ({}), not a procedure",
                name,
                other.kind(),
                other
            )))
        }
        None => {
            error!(symbol_name = %name, "Undefined operator encountered");
            Err(LispError::UndefinedSymbol(name.to_string()))
        }
    }
}

/// Calls a user procedure with dynamic binding.
///
/// Arguments are evaluated left to right in the caller's environment, then the
/// body runs in an overlay of the caller where each parameter is bound to its
/// argument. Surplus arguments are ignored and missing ones stay unbound.
#[instrument(level = "debug", skip(procedure, args, env), fields(procedure = %procedure.name), err)]
pub fn call_procedure(
    procedure: &Procedure,
    args: &[Value],
    env: &mut Environment<'_>,
) -> Result<Value, LispError> {
    let mut evaluated_args = Vec::with_capacity(args.len());
    for arg in args {
        evaluated_args.push(eval(arg, env)?);
    }

    if evaluated_args.len() != procedure.params.len() {
        debug!(
            expected = procedure.params.len(),
            got = evaluated_args.len(),
            "Argument count differs from parameter count"
        );
    }

    let mut call_env = Environment::new_enclosed(env)?;
    trace!(depth = call_env.depth(), "Entered procedure call");
    for (param, value) in procedure.params.iter().zip(evaluated_args) {
        trace!(param = %param, value = %value, "Bound parameter in call environment");
        call_env.define(param.clone(), value);
    }

    eval_sequence(&procedure.body, &mut call_env)
}
