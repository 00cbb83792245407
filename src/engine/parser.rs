use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{escaped_transform, is_not, tag},
    character::complete::{char, digit1},
    combinator::{all_consuming, opt, recognize, value},
    number::complete::recognize_float,
    sequence::pair,
};
use tracing::{debug, error, trace, warn};

use crate::engine::eval::LispError;
use crate::engine::builtins::list::LIST;
use crate::engine::value::{Number, Value};

/// Characters allowed in a name besides alphanumerics.
const NAME_SYMBOLS: &str = "*+-/<>=!@#$%^&[]";

/// One top-level piece of source text.
#[derive(Debug, Clone, PartialEq)]
enum Token {
    /// A run of non-space characters at depth 0 (quoted payloads included).
    Atom(String),
    /// The raw text between a `(` and its matching `)`.
    Group(String),
}

/// Splits `input` into depth-0 atoms and parenthesized groups. Group text is
/// kept raw and tokenized again when the tree is built.
#[tracing::instrument(level = "trace", skip(input), fields(input = %input))]
fn tokenize(input: &str) -> Result<Vec<Token>, LispError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for c in input.chars() {
        if let Some(q) = quote {
            current.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }

        match c {
            '(' => {
                if depth == 0 {
                    flush_atom(&mut tokens, &mut current);
                } else {
                    current.push(c);
                }
                depth += 1;
            }
            ')' => {
                if depth == 0 {
                    error!("Unbalanced ')' with no open group");
                    return Err(LispError::Parse("unexpected ')'".to_string()));
                }
                depth -= 1;
                if depth == 0 {
                    tokens.push(Token::Group(std::mem::take(&mut current)));
                } else {
                    current.push(c);
                }
            }
            '\'' | '"' => {
                quote = Some(c);
                current.push(c);
            }
            c if c.is_whitespace() && depth == 0 => flush_atom(&mut tokens, &mut current),
            _ => current.push(c),
        }
    }

    if let Some(q) = quote {
        error!(quote = %q, "Unterminated quoted literal");
        return Err(LispError::Parse(format!(
            "unterminated {} literal: {}",
            if q == '"' { "string" } else { "char" },
            current
        )));
    }

    if depth > 0 {
        // Missing closing parens are tolerated: the group ends with the input.
        warn!(open_groups = depth, "Closing implicitly unbalanced '('");
        tokens.push(Token::Group(current));
    } else {
        flush_atom(&mut tokens, &mut current);
    }

    trace!(?tokens, "Tokenized input");
    Ok(tokens)
}

fn flush_atom(tokens: &mut Vec<Token>, current: &mut String) {
    if !current.is_empty() {
        tokens.push(Token::Atom(std::mem::take(current)));
    }
}

/// Parses source text into a tree.
///
/// A lone atom becomes a leaf; anything else becomes a `List` of the parsed
/// tokens, so multi-statement input reads as a sequence.
#[tracing::instrument(level = "debug", skip(input), fields(input = %input), err)]
pub fn parse(input: &str) -> Result<Value, LispError> {
    let tokens = tokenize(input)?;
    match tokens.as_slice() {
        [] => {
            error!("No expression found in input");
            Err(LispError::Parse("empty input".to_string()))
        }
        [Token::Atom(atom)] if !is_string_literal(atom) => classify_atom(atom),
        _ => build_list(tokens),
    }
}

fn build_list(tokens: Vec<Token>) -> Result<Value, LispError> {
    tokens
        .into_iter()
        .map(build_node)
        .collect::<Result<Vec<_>, _>>()
        .map(Value::List)
}

fn build_node(token: Token) -> Result<Value, LispError> {
    match token {
        Token::Atom(atom) if is_string_literal(&atom) => desugar_string(&atom),
        Token::Atom(atom) => classify_atom(&atom),
        Token::Group(inner) => {
            let tokens = tokenize(&inner)?;
            if tokens.is_empty() {
                error!("Empty group has no expression");
                return Err(LispError::Parse("empty group: ()".to_string()));
            }
            build_list(tokens)
        }
    }
}

fn is_string_literal(atom: &str) -> bool {
    atom.len() >= 2 && atom.starts_with('"') && atom.ends_with('"')
}

/// `"ab"` becomes `(list 'a' 'b')`.
fn desugar_string(atom: &str) -> Result<Value, LispError> {
    let text = decode_escapes(&atom[1..atom.len() - 1])?;
    trace!(%text, "Desugaring string literal into a char list");
    let mut items = Vec::with_capacity(text.chars().count() + 1);
    items.push(Value::name(LIST));
    items.extend(text.chars().map(Value::Char));
    Ok(Value::List(items))
}

/// Classifies a single atom: integer, float, char, then name.
#[tracing::instrument(level = "trace", ret, err)]
pub fn classify_atom(atom: &str) -> Result<Value, LispError> {
    if let Ok((_, digits)) = all_consuming(integer_literal).parse(atom) {
        if let Ok(i) = digits.parse::<i64>() {
            return Ok(Value::Number(Number::Int(i)));
        }
        debug!(literal = %digits, "Integer literal out of range, reading it as a float");
    }

    if let Ok((_, text)) = all_consuming(recognize_float::<&str, nom::error::Error<&str>>).parse(atom) {
        if let Ok(f) = text.parse::<f64>() {
            return Ok(Value::Number(Number::Float(f)));
        }
    }

    if atom.len() >= 2 && atom.starts_with('\'') && atom.ends_with('\'') {
        let payload = decode_escapes(&atom[1..atom.len() - 1])?;
        let mut chars = payload.chars();
        return match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(Value::Char(c)),
            _ => {
                error!(literal = %atom, "Char literal does not hold exactly one character");
                Err(LispError::Parse(format!("{} is not a char", atom)))
            }
        };
    }

    if is_name(atom) {
        return Ok(Value::Name(atom.to_string()));
    }

    error!(token = %atom, "Token matches no literal form");
    Err(LispError::Parse(format!("invalid token: {}", atom)))
}

fn integer_literal(input: &str) -> IResult<&str, &str> {
    recognize(pair(opt(char('-')), digit1)).parse(input)
}

fn is_name(atom: &str) -> bool {
    let mut chars = atom.chars();
    match chars.next() {
        Some(first) if !first.is_ascii_digit() && is_name_char(first) => chars.all(is_name_char),
        _ => false,
    }
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || NAME_SYMBOLS.contains(c)
}

/// Resolves backslash escapes inside a quoted payload.
fn decode_escapes(payload: &str) -> Result<String, LispError> {
    let result: IResult<&str, String> = all_consuming(escaped_transform(
        is_not("\\"),
        '\\',
        alt((
            value("\n", tag("n")),
            value("\t", tag("t")),
            value("\r", tag("r")),
            value("\0", tag("0")),
            value("\\", tag("\\")),
            value("'", tag("'")),
            value("\"", tag("\"")),
        )),
    ))
    .parse(payload);

    result.map(|(_, decoded)| decoded).map_err(|e| {
        error!(%payload, "Invalid escape sequence");
        LispError::Parse(format!("invalid escape sequence in {:?}: {}", payload, e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::init_test_logging;

    fn list(items: Vec<Value>) -> Value {
        Value::List(items)
    }

    #[test]
    fn tokenize_splits_atoms_and_groups() {
        init_test_logging();
        assert_eq!(
            tokenize("def (fact n)  (if 1 2 3)").unwrap(),
            vec![
                Token::Atom("def".to_string()),
                Token::Group("fact n".to_string()),
                Token::Group("if 1 2 3".to_string()),
            ]
        );
    }

    #[test]
    fn tokenize_keeps_quoted_payloads_whole() {
        init_test_logging();
        assert_eq!(
            tokenize("echo ' ' \"a (b) c\"").unwrap(),
            vec![
                Token::Atom("echo".to_string()),
                Token::Atom("' '".to_string()),
                Token::Atom("\"a (b) c\"".to_string()),
            ]
        );
        assert_eq!(
            tokenize("(print \")\")").unwrap(),
            vec![Token::Group("print \")\"".to_string())]
        );
    }

    #[test]
    fn parse_single_atoms() {
        init_test_logging();
        assert_eq!(parse("42"), Ok(Value::int(42)));
        assert_eq!(parse("  -7 "), Ok(Value::int(-7)));
        assert_eq!(parse("1."), Ok(Value::float(1.0)));
        assert_eq!(parse("1.5e2"), Ok(Value::float(150.0)));
        assert_eq!(parse("'a'"), Ok(Value::Char('a')));
        assert_eq!(parse("' '"), Ok(Value::Char(' ')));
        assert_eq!(parse("'\\n'"), Ok(Value::Char('\n')));
        assert_eq!(parse("foo"), Ok(Value::name("foo")));
        assert_eq!(parse("//"), Ok(Value::name("//")));
        assert_eq!(parse("[x]"), Ok(Value::name("[x]")));
    }

    #[test]
    fn parse_group_is_a_sequence_of_one_call() {
        init_test_logging();
        assert_eq!(
            parse("(+ 1 2)"),
            Ok(list(vec![list(vec![
                Value::name("+"),
                Value::int(1),
                Value::int(2)
            ])]))
        );
    }

    #[test]
    fn parse_nested_groups() {
        init_test_logging();
        let expected = list(vec![list(vec![
            Value::name("def"),
            list(vec![Value::name("sq"), Value::name("x")]),
            list(vec![Value::name("*"), Value::name("x"), Value::name("x")]),
        ])]);
        assert_eq!(parse("(def (sq x)\n  (* x x))"), Ok(expected));
    }

    #[test]
    fn parse_multiple_statements() {
        init_test_logging();
        let parsed = parse("(var x 5) (var y 10) (+ x y)").unwrap();
        match parsed {
            Value::List(items) => {
                assert_eq!(items.len(), 3);
                assert!(items.iter().all(|i| matches!(i, Value::List(_))));
            }
            other => panic!("expected a list, got {:?}", other),
        }
    }

    #[test]
    fn string_desugars_to_char_list() {
        init_test_logging();
        assert_eq!(parse("\"ab\""), parse("(list 'a' 'b')"));
        assert_eq!(
            parse("(var s \"a b\")"),
            Ok(list(vec![list(vec![
                Value::name("var"),
                Value::name("s"),
                list(vec![
                    Value::name("list"),
                    Value::Char('a'),
                    Value::Char(' '),
                    Value::Char('b'),
                ]),
            ])]))
        );
    }

    #[test]
    fn string_escapes_are_decoded() {
        init_test_logging();
        assert_eq!(
            parse("\"a\\\"b\""),
            parse("(list 'a' '\"' 'b')")
        );
    }

    #[test]
    fn missing_closing_parens_are_tolerated() {
        init_test_logging();
        assert_eq!(parse("(+ (+ 5 2) (+ 3 9)"), parse("(+ (+ 5 2) (+ 3 9))"));
    }

    #[test]
    fn parse_errors() {
        init_test_logging();
        assert!(matches!(parse(""), Err(LispError::Parse(_))));
        assert!(matches!(parse("   \n"), Err(LispError::Parse(_))));
        assert!(matches!(parse("(a))"), Err(LispError::Parse(_))));
        assert!(matches!(parse("'ab'"), Err(LispError::Parse(_))));
        assert!(matches!(parse("''"), Err(LispError::Parse(_))));
        assert!(matches!(parse("'a"), Err(LispError::Parse(_))));
        assert!(matches!(parse("(echo \"abc)"), Err(LispError::Parse(_))));
        assert!(matches!(parse("123%"), Err(LispError::Parse(_))));
        assert!(matches!(parse("1abc"), Err(LispError::Parse(_))));
        assert!(matches!(parse("a_b"), Err(LispError::Parse(_))));
    }

    #[test]
    fn empty_groups_are_rejected() {
        init_test_logging();
        assert!(matches!(parse("()"), Err(LispError::Parse(_))));
        assert!(matches!(parse("(("), Err(LispError::Parse(_))));
        assert!(matches!(parse("(list ( ))"), Err(LispError::Parse(_))));
        assert_eq!(
            parse("(list)"),
            Ok(list(vec![list(vec![Value::name("list")])]))
        );
    }
}
