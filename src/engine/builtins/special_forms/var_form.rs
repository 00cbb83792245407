use super::ensure_bindable;
use crate::engine::env::Environment;
use crate::engine::eval::{LispError, eval as main_eval};
use crate::engine::special_forms::VAR;
use crate::engine::value::Value;
use tracing::{debug, error, instrument, trace};

/// `(var name expr)` binds the value of `expr` in the current environment
/// and returns `name`.
#[instrument(level = "trace", skip(args, env), ret, err)]
pub fn eval_var(args: &[Value], env: &mut Environment<'_>) -> Result<Value, LispError> {
    trace!("Executing 'var' special form");
    if args.len() != 2 {
        error!(
            "'var' requires a name and a value, found {} operand(s)",
            args.len()
        );
        return Err(LispError::Parse(format!(
            "'{}' expects a name and a value, got {} operand(s)",
            VAR,
            args.len()
        )));
    }

    let var_name = match &args[0] {
        Value::Name(name) => name.clone(),
        other => {
            error!(found = %other, "First operand to 'var' must be a name");
            return Err(LispError::Parse(format!(
                "'{}' expects a name, found {} {}",
                VAR,
                other.kind(),
                other
            )));
        }
    };
    ensure_bindable(VAR, &var_name)?;

    let value = main_eval(&args[1], env)?;
    debug!(variable_name = %var_name, value = %value, "Defined variable using 'var'");
    env.define(var_name.clone(), value);
    Ok(Value::Name(var_name))
}
