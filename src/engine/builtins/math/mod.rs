use crate::engine::builtins::{Arity, check_arity, eval_number};
use crate::engine::env::Environment;
use crate::engine::eval::LispError;
use crate::engine::value::{Number, Value};
use tracing::trace;

/// Left fold of `op` over the evaluated operands.
fn fold_numbers(
    operator: &str,
    args: &[Value],
    env: &mut Environment<'_>,
    op: fn(Number, Number) -> Result<Number, LispError>,
) -> Result<Value, LispError> {
    check_arity(operator, args, Arity::AtLeast(2))?;
    let mut acc = eval_number(&args[0], env, operator)?;
    for arg in &args[1..] {
        acc = op(acc, eval_number(arg, env, operator)?)?;
    }
    Ok(Value::Number(acc))
}

#[tracing::instrument(level = "trace", skip(args, env), ret, err)]
pub fn add(args: &[Value], env: &mut Environment<'_>) -> Result<Value, LispError> {
    trace!("Executing builtin '+'");
    fold_numbers("+", args, env, Number::add)
}

#[tracing::instrument(level = "trace", skip(args, env), ret, err)]
pub fn subtract(args: &[Value], env: &mut Environment<'_>) -> Result<Value, LispError> {
    trace!("Executing builtin '-'");
    fold_numbers("-", args, env, Number::sub)
}

#[tracing::instrument(level = "trace", skip(args, env), ret, err)]
pub fn multiply(args: &[Value], env: &mut Environment<'_>) -> Result<Value, LispError> {
    trace!("Executing builtin '*'");
    fold_numbers("*", args, env, Number::mul)
}

#[tracing::instrument(level = "trace", skip(args, env), ret, err)]
pub fn divide(args: &[Value], env: &mut Environment<'_>) -> Result<Value, LispError> {
    trace!("Executing builtin '/'");
    fold_numbers("/", args, env, Number::div)
}

#[tracing::instrument(level = "trace", skip(args, env), ret, err)]
pub fn floor_divide(args: &[Value], env: &mut Environment<'_>) -> Result<Value, LispError> {
    trace!("Executing builtin '//'");
    fold_numbers("//", args, env, Number::floor_div)
}

#[tracing::instrument(level = "trace", skip(args, env), ret, err)]
pub fn modulo(args: &[Value], env: &mut Environment<'_>) -> Result<Value, LispError> {
    trace!("Executing builtin '%'");
    check_arity("%", args, Arity::Exactly(2))?;
    let lhs = eval_number(&args[0], env, "%")?;
    let rhs = eval_number(&args[1], env, "%")?;
    Ok(Value::Number(lhs.modulo(rhs)?))
}

#[cfg(test)]
mod tests {
    use crate::engine::env::Environment;
    use crate::engine::eval::{LispError, eval};
    use crate::engine::parser::parse;
    use crate::engine::value::Value;
    use crate::logging::init_test_logging;

    fn eval_math_str(code: &str) -> Result<Value, LispError> {
        init_test_logging();
        let mut env = Environment::new();
        eval(&parse(code)?, &mut env)
    }

    fn rendered(code: &str) -> String {
        eval_math_str(code).unwrap().to_string()
    }

    #[test]
    fn plus_and_minus() {
        assert_eq!(rendered("(+ 1 1)"), "2");
        assert_eq!(rendered("(+ (+ 5 2) 1)"), "8");
        assert_eq!(rendered("(+ 1 1 1)"), "3");
        assert_eq!(rendered("(- (- 5 2) 1)"), "2");
        assert_eq!(rendered("(+ 1 0.5)"), "1.5");
    }

    #[test]
    fn divide_always_floats() {
        assert_eq!(rendered("(/ 1 1)"), "1.0");
        assert_eq!(rendered("(/ 1 2)"), "0.5");
        assert_eq!(rendered("(/ 10 3)"), "3.3333333333333335");
        assert_eq!(rendered("(/ 5.5 2)"), "2.75");
        assert_eq!(rendered("(/ -10 5)"), "-2.0");
        assert_eq!(rendered("(/ 100 5 2)"), "10.0");
    }

    #[test]
    fn floor_divide() {
        assert_eq!(rendered("(// 1 1)"), "1");
        assert_eq!(rendered("(// 13.5 1)"), "13.0");
        assert_eq!(rendered("(// 1 2)"), "0");
        assert_eq!(rendered("(// 10 3)"), "3");
        assert_eq!(rendered("(// 5.5 2)"), "2.0");
        assert_eq!(rendered("(// -10 5)"), "-2");
        assert_eq!(rendered("(// -7 2)"), "-4");
    }

    #[test]
    fn modulo() {
        assert_eq!(rendered("(% 1 1)"), "0");
        assert_eq!(rendered("(% 13.5 1)"), "0.5");
        assert_eq!(rendered("(% 1 2)"), "1");
        assert_eq!(rendered("(% 10 3)"), "1");
        assert_eq!(rendered("(% 5.5 2)"), "1.5");
        assert_eq!(rendered("(% -10 5)"), "0");
        assert_eq!(rendered("(% -7 2)"), "1");
    }

    #[test]
    fn division_by_zero_is_numeric_error() {
        assert!(matches!(eval_math_str("(/ 1 0)"), Err(LispError::Numeric(_))));
        assert!(matches!(eval_math_str("(// 1 0)"), Err(LispError::Numeric(_))));
        assert!(matches!(eval_math_str("(% 1 0)"), Err(LispError::Numeric(_))));
    }

    #[test]
    fn arity_and_type_errors() {
        assert!(matches!(eval_math_str("(+ 1)"), Err(LispError::ArityMismatch(_))));
        assert!(matches!(eval_math_str("(% 1 2 3)"), Err(LispError::ArityMismatch(_))));
        assert!(matches!(
            eval_math_str("(+ 1 'a')"),
            Err(LispError::TypeError { .. })
        ));
    }
}
