use lazy_static::lazy_static;
use llisp::engine::builtins;
use owo_colors::OwoColorize;
use regex::Regex;
use rustyline::highlight::{Highlighter, MatchingBracketHighlighter};
use rustyline_derive::{Completer, Helper, Hinter, Validator};
use std::borrow::Cow::{self, Borrowed, Owned};

lazy_static! {
    static ref STRING_RE: Regex = Regex::new(r#""([^"\\]|\\.)*"?"#).unwrap();
    static ref CHAR_RE: Regex = Regex::new(r"'([^'\\]|\\.)*'?").unwrap();
    static ref NUMBER_RE: Regex = Regex::new(r"-?\d+(\.\d*)?([eE][+-]?\d+)?").unwrap();
    static ref PARENS_RE: Regex = Regex::new(r"[()]").unwrap();
    static ref BUILTIN_NAMES: Vec<&'static str> = builtins::names();
    static ref NAME_RE: Regex = Regex::new(r"[A-Za-z*+\-/<>=!@#$%^&\[\]][A-Za-z0-9*+\-/<>=!@#$%^&\[\]]*").unwrap();
}

fn is_builtin_name(word: &str) -> bool {
    BUILTIN_NAMES
        .binary_search_by(|known| (**known).cmp(word))
        .is_ok()
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum TokenKind {
    Str,
    Char,
    Number,
    Paren,
    Builtin,
    Name,
}

/// Splits `line` into styled spans. Anything unmatched is passed through.
fn spans(line: &str) -> Vec<(Option<TokenKind>, &str)> {
    let rules: [(&Regex, TokenKind); 5] = [
        (&*STRING_RE, TokenKind::Str),
        (&*CHAR_RE, TokenKind::Char),
        (&*NUMBER_RE, TokenKind::Number),
        (&*PARENS_RE, TokenKind::Paren),
        (&*NAME_RE, TokenKind::Name),
    ];

    let mut out = Vec::new();
    let mut pos = 0;
    while pos < line.len() {
        let matched = rules.iter().find_map(|(regex, kind)| {
            regex
                .find_at(line, pos)
                .filter(|m| m.start() == pos && m.end() > pos)
                .map(|m| (*kind, m.end()))
        });
        match matched {
            Some((TokenKind::Name, end)) if is_builtin_name(&line[pos..end]) => {
                out.push((Some(TokenKind::Builtin), &line[pos..end]));
                pos = end;
            }
            Some((kind, end)) => {
                out.push((Some(kind), &line[pos..end]));
                pos = end;
            }
            None => {
                let end = line[pos..]
                    .chars()
                    .next()
                    .map_or(line.len(), |c| pos + c.len_utf8());
                out.push((None, &line[pos..end]));
                pos = end;
            }
        }
    }
    out
}

#[derive(Default)]
pub struct LispHighlighter {
    matching_bracket_highlighter: MatchingBracketHighlighter,
}

impl Highlighter for LispHighlighter {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.is_empty() {
            return Borrowed(line);
        }
        let mut styled = String::with_capacity(line.len() * 2);
        for (kind, text) in spans(line) {
            let painted = match kind {
                Some(TokenKind::Str) | Some(TokenKind::Char) => text.green().to_string(),
                Some(TokenKind::Number) => text.magenta().to_string(),
                Some(TokenKind::Paren) => text.blue().to_string(),
                Some(TokenKind::Builtin) => text.cyan().bold().to_string(),
                Some(TokenKind::Name) | None => text.to_string(),
            };
            styled.push_str(&painted);
        }
        Owned(styled)
    }

    fn highlight_char(&self, line: &str, pos: usize, forced: bool) -> bool {
        self.matching_bracket_highlighter.highlight_char(line, pos, forced) || !line.is_empty()
    }
}

#[derive(Helper, Completer, Hinter, Validator)]
pub struct ReplHelper {
    highlighter: LispHighlighter,
}

impl ReplHelper {
    pub fn new() -> Self {
        Self {
            highlighter: LispHighlighter::default(),
        }
    }
}

impl Default for ReplHelper {
    fn default() -> Self {
        Self::new()
    }
}

impl Highlighter for ReplHelper {
    fn highlight<'l>(&self, line: &'l str, pos: usize) -> Cow<'l, str> {
        self.highlighter.highlight(line, pos)
    }

    fn highlight_prompt<'b, 's: 'b, 'p: 'b>(
        &'s self,
        prompt: &'p str,
        default: bool,
    ) -> Cow<'b, str> {
        if default {
            Owned(prompt.bold().to_string())
        } else {
            Borrowed(prompt)
        }
    }

    fn highlight_char(&self, line: &str, pos: usize, forced: bool) -> bool {
        self.highlighter.highlight_char(line, pos, forced)
    }
}
