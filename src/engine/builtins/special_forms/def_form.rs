use super::ensure_bindable;
use crate::engine::env::Environment;
use crate::engine::eval::LispError;
use crate::engine::special_forms::DEF;
use crate::engine::value::{Procedure, Value};
use std::rc::Rc;
use tracing::{debug, error, instrument, trace};

fn malformed(reason: String) -> LispError {
    error!(reason = %reason, "Malformed 'def'");
    LispError::Parse(format!("'{}' {}", DEF, reason))
}

/// `(def (name params...) body...)` stores a procedure under `name` in the
/// current environment and returns `name`. The body is kept unevaluated.
#[instrument(level = "trace", skip(args, env), ret, err)]
pub fn eval_def(args: &[Value], env: &mut Environment<'_>) -> Result<Value, LispError> {
    trace!("Executing 'def' special form");
    if args.len() < 2 {
        return Err(malformed(format!(
            "expects a (name params...) list and a body, got {} operand(s)",
            args.len()
        )));
    }

    let signature = match &args[0] {
        Value::List(items) if !items.is_empty() => items,
        other => {
            return Err(malformed(format!(
                "expects a (name params...) list, found {} {}",
                other.kind(),
                other
            )));
        }
    };

    let mut names = Vec::with_capacity(signature.len());
    for item in signature {
        match item {
            Value::Name(name) => names.push(name.clone()),
            other => {
                return Err(malformed(format!(
                    "names and parameters must be names, found {} {}",
                    other.kind(),
                    other
                )));
            }
        }
    }
    let name = names.remove(0);
    ensure_bindable(DEF, &name)?;

    let procedure = Procedure {
        name: name.clone(),
        params: names,
        body: args[1..].to_vec(),
    };
    debug!(name = %name, params = ?procedure.params, "Defined procedure using 'def'");
    env.define(name.clone(), Value::Procedure(Rc::new(procedure)));
    Ok(Value::Name(name))
}
