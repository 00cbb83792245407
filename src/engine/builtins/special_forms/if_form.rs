use crate::engine::builtins::{Arity, check_arity};
use crate::engine::env::Environment;
use crate::engine::eval::{LispError, eval as main_eval};
use crate::engine::special_forms::IF;
use crate::engine::value::Value;
use tracing::{debug, instrument, trace};

/// `(if c a b)`: evaluates `c`, then exactly one of `a` or `b`.
#[instrument(level = "trace", skip(args, env), ret, err)]
pub fn eval_if(args: &[Value], env: &mut Environment<'_>) -> Result<Value, LispError> {
    trace!("Executing 'if' special form");
    check_arity(IF, args, Arity::Exactly(3))?;

    let condition_result = main_eval(&args[0], env)?;
    debug!(condition = %condition_result, "Evaluated 'if' condition");

    if condition_result.is_truthy() {
        trace!("Condition is truthy, evaluating then-branch");
        main_eval(&args[1], env)
    } else {
        trace!("Condition is zero, evaluating else-branch");
        main_eval(&args[2], env)
    }
}
