use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, trace};

use super::token::{keyword_or_ident, Token, TokenKind};
use crate::diagnostics::Diagnostic;

lazy_static! {
    static ref NUMBER: Regex = Regex::new(r"^[0-9]+(\.[0-9]+)?").unwrap();
    static ref MALFORMED_NUMBER: Regex =
        Regex::new(r"^[0-9]+(\.[0-9]+)?[A-Za-z_][A-Za-z0-9_]*").unwrap();
    static ref INCLUDE: Regex = Regex::new(r"^#call\b").unwrap();
    static ref IDENTIFIER: Regex = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*").unwrap();
    static ref COMMENT: Regex = Regex::new(r"^#[^\n]*").unwrap();
}

const TWO_CHAR_OPERATORS: [(&str, TokenKind); 6] = [
    ("++", TokenKind::Increment),
    ("--", TokenKind::Decrement),
    ("==", TokenKind::Eq),
    ("!=", TokenKind::NotEq),
    ("<=", TokenKind::Le),
    (">=", TokenKind::Ge),
];

/// What a single rule recognised at the cursor, with the byte length it covers.
#[derive(Debug, PartialEq)]
enum Scanned {
    Token(TokenKind, usize),
    Newline,
    Skip(usize),
    Invalid(String, usize),
}

type Rule = fn(&str) -> Option<Scanned>;

fn newline(s: &str) -> Option<Scanned> {
    s.starts_with('\n').then_some(Scanned::Newline)
}

fn whitespace(s: &str) -> Option<Scanned> {
    let len = s
        .chars()
        .take_while(|c| matches!(c, ' ' | '\t' | '\r'))
        .count();
    (len > 0).then_some(Scanned::Skip(len))
}

fn number(s: &str) -> Option<Scanned> {
    if let Some(m) = MALFORMED_NUMBER.find(s) {
        return Some(Scanned::Invalid(
            format!("Invalid number format '{}'", m.as_str()),
            m.end(),
        ));
    }
    NUMBER
        .find(s)
        .map(|m| Scanned::Token(TokenKind::Number, m.end()))
}

fn string(s: &str) -> Option<Scanned> {
    if !s.starts_with('"') {
        return None;
    }
    let body = &s[1..];
    match body.find(['"', '\n']) {
        Some(end) if body[end..].starts_with('"') => {
            Some(Scanned::Token(TokenKind::String, end + 2))
        }
        Some(end) => Some(Scanned::Invalid(
            "Unterminated string literal".to_string(),
            end + 1,
        )),
        None => Some(Scanned::Invalid(
            "Unterminated string literal".to_string(),
            s.len(),
        )),
    }
}

fn include(s: &str) -> Option<Scanned> {
    INCLUDE
        .find(s)
        .map(|m| Scanned::Token(TokenKind::IncludeImport, m.end()))
}

fn identifier(s: &str) -> Option<Scanned> {
    IDENTIFIER
        .find(s)
        .map(|m| Scanned::Token(keyword_or_ident(m.as_str()), m.end()))
}

fn comment(s: &str) -> Option<Scanned> {
    COMMENT.find(s).map(|m| Scanned::Skip(m.end()))
}

fn operator(s: &str) -> Option<Scanned> {
    for (op, kind) in TWO_CHAR_OPERATORS {
        if s.starts_with(op) {
            return Some(Scanned::Token(kind, op.len()));
        }
    }
    if s.starts_with("//") {
        return Some(Scanned::Invalid("Unexpected symbol '//'".to_string(), 2));
    }

    let kind = match s.chars().next()? {
        '=' => TokenKind::Assign,
        '<' => TokenKind::LessThan,
        '>' => TokenKind::GreatThan,
        '+' => TokenKind::Plus,
        '-' => TokenKind::Minus,
        '*' => TokenKind::Mul,
        '/' => TokenKind::Div,
        '(' => TokenKind::LeftP,
        ')' => TokenKind::RightP,
        '{' => TokenKind::LeftBrace,
        '}' => TokenKind::RightBrace,
        ';' => TokenKind::Semicolon,
        ',' => TokenKind::Comma,
        _ => return None,
    };
    Some(Scanned::Token(kind, 1))
}

fn mismatch(s: &str) -> Scanned {
    match s.chars().next() {
        Some(c) => Scanned::Invalid(format!("Unexpected symbol '{c}'"), c.len_utf8()),
        None => Scanned::Skip(0),
    }
}

fn scan_token(s: &str) -> Scanned {
    // Order matters: `++` before `+`, `#call` before a `#` comment, identifiers
    // before the keyword lookup.
    let rules: [Rule; 8] = [
        newline, whitespace, number, string, include, identifier, comment, operator,
    ];
    rules
        .iter()
        .find_map(|rule| rule(s))
        .unwrap_or_else(|| mismatch(s))
}

#[derive(Debug, Default)]
pub struct Scan {
    pub tokens: Vec<Token>,
    pub diagnostics: Vec<Diagnostic>,
}

pub fn scan(source_code: &str) -> Scan {
    let mut result = Scan::default();
    let mut line: i64 = 1;
    let mut column = 1;
    let mut position = 0;

    while position < source_code.len() {
        let rest = &source_code[position..];

        let advanced = match scan_token(rest) {
            Scanned::Token(kind, len) => {
                let token = Token::new(kind, &rest[..len], line, column);
                trace!(?token, "scanned");
                result.tokens.push(token);
                len
            }
            Scanned::Newline => {
                line += 1;
                column = 0;
                1
            }
            Scanned::Skip(len) => len,
            Scanned::Invalid(message, len) => {
                result
                    .diagnostics
                    .push(Diagnostic::lexical(message, line, column));
                len
            }
        };
        let advanced = advanced.max(1);
        column += rest[..advanced].chars().count();
        position += advanced;
    }

    debug!(
        tokens = result.tokens.len(),
        errors = result.diagnostics.len(),
        "tokenization completed"
    );
    result
}
