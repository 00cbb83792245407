use crate::engine::builtins::{Arity, check_arity};
use crate::engine::env::Environment;
use crate::engine::eval::{LispError, eval};
use crate::engine::value::Value;
use tracing::{instrument, trace};

/// Writes the raw text of its operand without a newline.
#[instrument(level = "trace", skip(args, env), ret, err)]
pub fn echo(args: &[Value], env: &mut Environment<'_>) -> Result<Value, LispError> {
    trace!("Executing builtin 'echo'");
    check_arity("echo", args, Arity::Exactly(1))?;
    let value = eval(&args[0], env)?;
    env.emit(&value.raw_text())?;
    Ok(value)
}

/// Writes the display form of its operand followed by a newline.
#[instrument(level = "trace", skip(args, env), ret, err)]
pub fn print(args: &[Value], env: &mut Environment<'_>) -> Result<Value, LispError> {
    trace!("Executing builtin 'print'");
    check_arity("print", args, Arity::Exactly(1))?;
    let value = eval(&args[0], env)?;
    env.emit(&format!("{}\n", value))?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use crate::engine::env::Environment;
    use crate::engine::eval::{LispError, eval};
    use crate::engine::parser::parse;
    use crate::engine::value::Value;
    use crate::logging::init_test_logging;
    use std::cell::RefCell;
    use std::io::{self, Write};
    use std::rc::Rc;

    fn capture(code: &str) -> (Result<Value, LispError>, String) {
        init_test_logging();
        let buffer = Rc::new(RefCell::new(Vec::<u8>::new()));
        let mut env = Environment::with_output(buffer.clone());
        let result = parse(code).and_then(|tree| eval(&tree, &mut env));
        let written = String::from_utf8_lossy(&buffer.borrow()).into_owned();
        (result, written)
    }

    #[test]
    fn echo_writes_raw_text() {
        let (result, written) = capture("(echo \"hello\")");
        assert_eq!(written, "hello");
        assert_eq!(result.map(|v| v.raw_text()), Ok("hello".to_string()));

        let (_, written) = capture("(echo 'x') (echo 12) (echo (list 1 'a'))");
        assert_eq!(written, "x12(1 'a')");
    }

    #[test]
    fn print_writes_display_form_and_newline() {
        let (result, written) = capture("(print (/ 3 2))");
        assert_eq!(written, "1.5\n");
        assert_eq!(result, Ok(Value::float(1.5)));

        let (_, written) = capture("(print \"ab\")");
        assert_eq!(written, "('a' 'b')\n");
    }

    #[test]
    fn output_arity_is_checked() {
        let (result, written) = capture("(print 1 2)");
        assert!(matches!(result, Err(LispError::ArityMismatch(_))));
        assert!(written.is_empty());
    }

    struct BrokenSink;

    impl Write for BrokenSink {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn failing_sink_is_an_output_error() {
        init_test_logging();
        let mut env = Environment::with_output(Rc::new(RefCell::new(BrokenSink)));
        let result = eval(&parse("(echo 1)").unwrap(), &mut env);
        assert!(matches!(result, Err(LispError::Output(_))));
    }
}
