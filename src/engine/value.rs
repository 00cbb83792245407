use crate::engine::eval::LispError;
use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;

/// A numeric literal or result. Integers stay integral until an operation
/// such as `/` forces a floating result.
#[derive(Debug, Clone, Copy)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    pub fn as_f64(self) -> f64 {
        match self {
            Number::Int(i) => i as f64,
            Number::Float(f) => f,
        }
    }

    pub fn is_zero(self) -> bool {
        match self {
            Number::Int(i) => i == 0,
            Number::Float(f) => f == 0.0,
        }
    }

    pub fn add(self, rhs: Number) -> Result<Number, LispError> {
        match (self, rhs) {
            (Number::Int(a), Number::Int(b)) => a
                .checked_add(b)
                .map(Number::Int)
                .ok_or_else(|| overflow("+")),
            (a, b) => finite(a.as_f64() + b.as_f64(), "+"),
        }
    }

    pub fn sub(self, rhs: Number) -> Result<Number, LispError> {
        match (self, rhs) {
            (Number::Int(a), Number::Int(b)) => a
                .checked_sub(b)
                .map(Number::Int)
                .ok_or_else(|| overflow("-")),
            (a, b) => finite(a.as_f64() - b.as_f64(), "-"),
        }
    }

    pub fn mul(self, rhs: Number) -> Result<Number, LispError> {
        match (self, rhs) {
            (Number::Int(a), Number::Int(b)) => a
                .checked_mul(b)
                .map(Number::Int)
                .ok_or_else(|| overflow("*")),
            (a, b) => finite(a.as_f64() * b.as_f64(), "*"),
        }
    }

    /// True division, always floating.
    pub fn div(self, rhs: Number) -> Result<Number, LispError> {
        if rhs.is_zero() {
            return Err(LispError::Numeric("division by zero in '/'".to_string()));
        }
        finite(self.as_f64() / rhs.as_f64(), "/")
    }

    /// Floor division. Integral when both operands are integers.
    pub fn floor_div(self, rhs: Number) -> Result<Number, LispError> {
        if rhs.is_zero() {
            return Err(LispError::Numeric("division by zero in '//'".to_string()));
        }
        match (self, rhs) {
            (Number::Int(a), Number::Int(b)) => {
                let quotient = a.checked_div(b).ok_or_else(|| overflow("//"))?;
                if a % b != 0 && ((a < 0) != (b < 0)) {
                    Ok(Number::Int(quotient - 1))
                } else {
                    Ok(Number::Int(quotient))
                }
            }
            (a, b) => finite((a.as_f64() / b.as_f64()).floor(), "//"),
        }
    }

    /// Modulo whose sign follows the divisor.
    pub fn modulo(self, rhs: Number) -> Result<Number, LispError> {
        if rhs.is_zero() {
            return Err(LispError::Numeric("division by zero in '%'".to_string()));
        }
        match (self, rhs) {
            (Number::Int(a), Number::Int(b)) => {
                let rem = a.checked_rem(b).ok_or_else(|| overflow("%"))?;
                if rem != 0 && ((rem < 0) != (b < 0)) {
                    Ok(Number::Int(rem + b))
                } else {
                    Ok(Number::Int(rem))
                }
            }
            (a, b) => {
                let (a, b) = (a.as_f64(), b.as_f64());
                finite(a - b * (a / b).floor(), "%")
            }
        }
    }
}

fn overflow(op: &str) -> LispError {
    LispError::Numeric(format!("integer overflow in '{}'", op))
}

fn finite(value: f64, op: &str) -> Result<Number, LispError> {
    if value.is_finite() {
        Ok(Number::Float(value))
    } else {
        Err(LispError::Numeric(format!(
            "'{}' produced a non-finite result ({})",
            op, value
        )))
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => a == b,
            (a, b) => a.as_f64() == b.as_f64(),
        }
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => Some(a.cmp(b)),
            (a, b) => a.as_f64().partial_cmp(&b.as_f64()),
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(i) => write!(f, "{}", i),
            // Debug keeps the fractional part: 1.0 rather than 1
            Number::Float(x) => write!(f, "{:?}", x),
        }
    }
}

/// A user definition created by `def`.
#[derive(Debug, Clone, PartialEq)]
pub struct Procedure {
    pub name: String,
    pub params: Vec<String>,
    pub body: Vec<Value>,
}

/// The only runtime datum. `List` doubles as source-code node and data value;
/// which one it is depends on where the evaluator meets it.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(Number),
    Char(char),
    Name(String),
    List(Vec<Value>),
    Procedure(Rc<Procedure>),
}

impl Value {
    pub fn int(i: i64) -> Value {
        Value::Number(Number::Int(i))
    }

    pub fn float(f: f64) -> Value {
        Value::Number(Number::Float(f))
    }

    pub fn name(s: &str) -> Value {
        Value::Name(s.to_string())
    }

    pub fn truth(flag: bool) -> Value {
        Value::int(if flag { 1 } else { 0 })
    }

    /// Name of the variant, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Number(_) => "Number",
            Value::Char(_) => "Char",
            Value::Name(_) => "Name",
            Value::List(_) => "List",
            Value::Procedure(_) => "Procedure",
        }
    }

    /// Only a numeric zero is false.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Number(n) if n.is_zero())
    }

    /// The text `echo` writes: chars unquoted, and a list of chars as the
    /// string it spells.
    pub fn raw_text(&self) -> String {
        match self {
            Value::Char(c) => c.to_string(),
            Value::List(items) if items.iter().all(|v| matches!(v, Value::Char(_))) => items
                .iter()
                .filter_map(|v| match v {
                    Value::Char(c) => Some(*c),
                    _ => None,
                })
                .collect(),
            other => other.to_string(),
        }
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a.partial_cmp(b),
            (Value::Char(a), Value::Char(b)) => Some(a.cmp(b)),
            (Value::Name(a), Value::Name(b)) => Some(a.cmp(b)),
            (Value::List(a), Value::List(b)) => {
                for (x, y) in a.iter().zip(b.iter()) {
                    match x.partial_cmp(y)? {
                        Ordering::Equal => continue,
                        decided => return Some(decided),
                    }
                }
                Some(a.len().cmp(&b.len()))
            }
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::Char(c) => write!(f, "{:?}", c),
            Value::Name(s) => write!(f, "{}", s),
            Value::List(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, ")")
            }
            Value::Procedure(p) => write!(f, "<procedure {} ({})>", p.name, p.params.join(" ")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_compare_across_representations() {
        assert_eq!(Number::Int(1), Number::Float(1.0));
        assert!(Number::Int(1) < Number::Float(1.5));
        assert_ne!(Value::int(1), Value::Char('1'));
    }

    #[test]
    fn integer_arithmetic_stays_integral() {
        assert!(matches!(Number::Int(2).add(Number::Int(3)), Ok(Number::Int(5))));
        assert!(matches!(Number::Int(2).mul(Number::Float(1.5)), Ok(Number::Float(f)) if f == 3.0));
        assert!(matches!(Number::Int(1).div(Number::Int(1)), Ok(Number::Float(f)) if f == 1.0));
    }

    #[test]
    fn floor_division_and_modulo_follow_divisor_sign() {
        assert!(matches!(Number::Int(-7).floor_div(Number::Int(2)), Ok(Number::Int(-4))));
        assert!(matches!(Number::Int(10).floor_div(Number::Int(-5)), Ok(Number::Int(-2))));
        assert!(matches!(Number::Int(-7).modulo(Number::Int(2)), Ok(Number::Int(1))));
        assert!(matches!(Number::Float(5.5).modulo(Number::Int(2)), Ok(Number::Float(f)) if f == 1.5));
    }

    #[test]
    fn zero_divisor_and_overflow_are_numeric_errors() {
        assert!(matches!(Number::Int(1).div(Number::Int(0)), Err(LispError::Numeric(_))));
        assert!(matches!(Number::Int(1).modulo(Number::Float(0.0)), Err(LispError::Numeric(_))));
        assert!(matches!(Number::Int(i64::MAX).add(Number::Int(1)), Err(LispError::Numeric(_))));
    }

    #[test]
    fn display_forms() {
        assert_eq!(Value::float(1.0).to_string(), "1.0");
        assert_eq!(Value::float(10.0 / 3.0).to_string(), "3.3333333333333335");
        assert_eq!(Value::Char('\n').to_string(), "'\\n'");
        assert_eq!(
            Value::List(vec![Value::int(1), Value::List(vec![]), Value::Char('a')]).to_string(),
            "(1 () 'a')"
        );
    }

    #[test]
    fn raw_text_spells_char_lists() {
        let hi = Value::List(vec![Value::Char('h'), Value::Char('i')]);
        assert_eq!(hi.raw_text(), "hi");
        assert_eq!(Value::Char('%').raw_text(), "%");
        assert_eq!(Value::List(vec![Value::int(1)]).raw_text(), "(1)");
    }

    #[test]
    fn list_ordering_is_lexicographic() {
        let a = Value::List(vec![Value::int(1), Value::int(2)]);
        let b = Value::List(vec![Value::int(1), Value::int(3)]);
        assert!(a < b);
        assert_eq!(Value::int(1).partial_cmp(&Value::Char('a')), None);
    }
}
