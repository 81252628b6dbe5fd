use std::{collections::HashMap, fmt::Display};

use lazy_static::lazy_static;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    ProgramStart,
    FunctionDefinition,
    IntType,
    FloatType,
    StringType,
    BoolType,
    Output,
    Input,
    If,
    Else,
    While,
    For,
    Return,
    IncludeImport,
    Namespace,
    Identifier,
    Number,
    String,
    Increment,
    Decrement,
    Eq,
    NotEq,
    Le,
    Ge,
    Assign,
    LessThan,
    GreatThan,
    Plus,
    Minus,
    Mul,
    Div,
    LeftP,
    RightP,
    LeftBrace,
    RightBrace,
    Semicolon,
    Comma,
    /// Virtual end-of-stream marker, never produced by the scanner.
    Eof,
}

impl TokenKind {
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::ProgramStart => "PROGRAM_START",
            TokenKind::FunctionDefinition => "FUNCTION_DEFINITION",
            TokenKind::IntType => "INT_TYPE",
            TokenKind::FloatType => "FLOAT_TYPE",
            TokenKind::StringType => "STRING_TYPE",
            TokenKind::BoolType => "BOOL_TYPE",
            TokenKind::Output => "OUTPUT",
            TokenKind::Input => "INPUT",
            TokenKind::If => "IF",
            TokenKind::Else => "ELSE",
            TokenKind::While => "WHILE",
            TokenKind::For => "FOR",
            TokenKind::Return => "RETURN",
            TokenKind::IncludeImport => "INCLUDE_IMPORT",
            TokenKind::Namespace => "NAMESPACE",
            TokenKind::Identifier => "IDENTIFIER",
            TokenKind::Number => "NUMBER",
            TokenKind::String => "STRING",
            TokenKind::Increment => "INCREMENT",
            TokenKind::Decrement => "DECREMENT",
            TokenKind::Eq => "EQ",
            TokenKind::NotEq => "NOT_EQ",
            TokenKind::Le => "LE",
            TokenKind::Ge => "GE",
            TokenKind::Assign => "ASSIGN",
            TokenKind::LessThan => "LESS_THAN",
            TokenKind::GreatThan => "GREAT_THAN",
            TokenKind::Plus => "PLUS",
            TokenKind::Minus => "MINUS",
            TokenKind::Mul => "MUL",
            TokenKind::Div => "DIV",
            TokenKind::LeftP => "LPAREN",
            TokenKind::RightP => "RPAREN",
            TokenKind::LeftBrace => "LBRACE",
            TokenKind::RightBrace => "RBRACE",
            TokenKind::Semicolon => "SEMICOLON",
            TokenKind::Comma => "COMMA",
            TokenKind::Eof => "EOF",
        }
    }

    pub fn is_type(&self) -> bool {
        matches!(
            self,
            TokenKind::IntType | TokenKind::FloatType | TokenKind::StringType | TokenKind::BoolType
        )
    }

    pub fn is_relational(&self) -> bool {
        matches!(
            self,
            TokenKind::Eq
                | TokenKind::NotEq
                | TokenKind::LessThan
                | TokenKind::GreatThan
                | TokenKind::Le
                | TokenKind::Ge
        )
    }

    pub fn is_additive(&self) -> bool {
        matches!(self, TokenKind::Plus | TokenKind::Minus)
    }

    pub fn is_multiplicative(&self) -> bool {
        matches!(self, TokenKind::Mul | TokenKind::Div)
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

lazy_static! {
    static ref KEYWORDS: HashMap<&'static str, TokenKind> = HashMap::from([
        ("battle", TokenKind::ProgramStart),
        ("strategy", TokenKind::FunctionDefinition),
        ("soldier", TokenKind::IntType),
        ("force", TokenKind::FloatType),
        ("intel", TokenKind::StringType),
        ("flag", TokenKind::BoolType),
        ("shout", TokenKind::Output),
        ("scout", TokenKind::Input),
        ("shield", TokenKind::If),
        ("retreat", TokenKind::Else),
        ("march", TokenKind::While),
        ("deploy", TokenKind::For),
        ("victory", TokenKind::Return),
        ("#call", TokenKind::IncludeImport),
        ("camp", TokenKind::Namespace),
    ]);
    pub static ref EOF: Token = Token::new(TokenKind::Eof, "", -1, 0);
}

/// Tag for an identifier-shaped lexeme: its keyword kind, or a plain identifier.
pub fn keyword_or_ident(lexeme: &str) -> TokenKind {
    KEYWORDS
        .get(lexeme)
        .copied()
        .unwrap_or(TokenKind::Identifier)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub line: i64,
    pub column: usize,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: &str, line: i64, column: usize) -> Self {
        Self {
            kind,
            lexeme: lexeme.to_owned(),
            line,
            column,
        }
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Type: {:<20}  Value: {:<10}  Line: {:<3}  Column: {}",
            self.kind.name(),
            self.lexeme,
            self.line,
            self.column
        )
    }
}
