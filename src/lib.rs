//! WarLang to Python translator.
//!
//! The pipeline runs strictly left to right:
//! - `lexer` turns source text into tokens and lexical diagnostics.
//! - `parser` builds the syntax tree, recovering from syntax errors.
//! - `semantic` checks scopes, initialization and types.
//! - `emitter` writes the Python text once nothing above reported an error.

pub mod ast;
pub mod diagnostics;
pub mod emitter;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod semantic;

use tracing::info;

use ast::Node;
use diagnostics::Diagnostic;
pub use emitter::EmitOptions;
pub use error::EmitError;
use lexer::token::Token;

/// Everything one run produced.
#[derive(Debug, Clone)]
pub struct Translation {
    pub tokens: Vec<Token>,
    pub ast: Node,
    /// Lexical, syntax and semantic diagnostics, in that order.
    pub diagnostics: Vec<Diagnostic>,
    /// `None` when any diagnostic is an error.
    pub output: Option<String>,
}

impl Translation {
    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| !d.is_error())
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }
}

/// Runs every stage on `source` with fresh state.
pub fn translate(source: &str, options: &EmitOptions) -> Result<Translation, EmitError> {
    let scan = lexer::scanner::scan(source);
    let mut diagnostics = scan.diagnostics;

    let (ast, syntax_errors) = parser::parse(&scan.tokens);
    diagnostics.extend(syntax_errors);

    let analysis = semantic::analyze(&ast);
    diagnostics.extend(analysis.errors);
    diagnostics.extend(analysis.warnings);

    let output = if diagnostics.iter().any(Diagnostic::is_error) {
        info!("errors reported, skipping code generation");
        None
    } else {
        Some(emitter::generate(&ast, options)?)
    };

    Ok(Translation {
        tokens: scan.tokens,
        ast,
        diagnostics,
        output,
    })
}
