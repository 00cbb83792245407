pub mod def_form;
pub mod if_form;
pub mod var_form;

pub use def_form::eval_def;
pub use if_form::eval_if;
pub use var_form::eval_var;

use crate::engine::builtins::is_builtin;
use crate::engine::eval::LispError;
use tracing::error;

/// Rejects binding a builtin name with `var` or `def`.
pub(crate) fn ensure_bindable(form: &str, name: &str) -> Result<(), LispError> {
    if is_builtin(name) {
        error!(attempted_keyword = %name, "Attempted to bind a reserved keyword using '{}'", form);
        return Err(LispError::ReservedKeyword(name.to_string()));
    }
    Ok(())
}
