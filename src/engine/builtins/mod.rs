//! The fixed registry of named operators. The evaluator consults it before
//! the environment, so builtins cannot be shadowed or redefined.

pub mod compare;
pub mod list;
pub mod math;
pub mod output;
pub mod special_forms;

use crate::engine::env::Environment;
use crate::engine::eval::{LispError, eval};
use crate::engine::special_forms as special_form_names;
use crate::engine::value::{Number, Value};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use tracing::error;

/// A builtin receives its operand expressions unevaluated, plus the current
/// environment, and evaluates what it needs.
pub type BuiltinFn = fn(&[Value], &mut Environment<'_>) -> Result<Value, LispError>;

static BUILTINS: Lazy<HashMap<&'static str, BuiltinFn>> = Lazy::new(|| {
    let table: [(&'static str, BuiltinFn); 17] = [
        ("+", math::add),
        ("-", math::subtract),
        ("*", math::multiply),
        ("/", math::divide),
        ("//", math::floor_divide),
        ("%", math::modulo),
        (special_form_names::IF, special_forms::eval_if),
        ("eq", compare::equal),
        ("<", compare::less_than),
        (special_form_names::VAR, special_forms::eval_var),
        (special_form_names::DEF, special_forms::eval_def),
        ("echo", output::echo),
        ("print", output::print),
        (list::LIST, list::list),
        ("push", list::push),
        ("pop", list::pop),
        ("el", list::el),
    ];
    HashMap::from(table)
});

/// Returns the builtin registered under `name`, if any.
pub fn lookup(name: &str) -> Option<BuiltinFn> {
    BUILTINS.get(name).copied()
}

pub fn is_builtin(name: &str) -> bool {
    BUILTINS.contains_key(name)
}

/// Every builtin name, sorted.
pub fn names() -> Vec<&'static str> {
    let mut names: Vec<_> = BUILTINS.keys().copied().collect();
    names.sort_unstable();
    names
}

/// Operand count accepted by a builtin.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Arity {
    Exactly(usize),
    AtLeast(usize),
}

pub(crate) fn check_arity(operator: &str, args: &[Value], arity: Arity) -> Result<(), LispError> {
    let ok = match arity {
        Arity::Exactly(n) => args.len() == n,
        Arity::AtLeast(n) => args.len() >= n,
    };
    if ok {
        return Ok(());
    }
    let expected = match arity {
        Arity::Exactly(n) => format!("{}", n),
        Arity::AtLeast(n) => format!("at least {}", n),
    };
    let arity_error = LispError::ArityMismatch(format!(
        "'{}' expects {} argument(s), got {}",
        operator,
        expected,
        args.len()
    ));
    error!(error = %arity_error, "Arity error in builtin '{}'", operator);
    Err(arity_error)
}

/// Evaluates `expr` and requires a number.
pub(crate) fn eval_number(
    expr: &Value,
    env: &mut Environment<'_>,
    operator: &str,
) -> Result<Number, LispError> {
    match eval(expr, env)? {
        Value::Number(n) => Ok(n),
        other => {
            let type_error = LispError::TypeError {
                expected: "Number".to_string(),
                found: format!("{} {}", other.kind(), other),
            };
            error!(operator = %operator, error = %type_error, "Type error in builtin");
            Err(type_error)
        }
    }
}

/// Evaluates `expr` and requires a list.
pub(crate) fn eval_list(
    expr: &Value,
    env: &mut Environment<'_>,
    operator: &str,
) -> Result<Vec<Value>, LispError> {
    match eval(expr, env)? {
        Value::List(items) => Ok(items),
        other => {
            let type_error = LispError::TypeError {
                expected: "List".to_string(),
                found: format!("{} {}", other.kind(), other),
            };
            error!(operator = %operator, error = %type_error, "Type error in builtin");
            Err(type_error)
        }
    }
}
