use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Lexical,
    Syntax,
    Semantic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// A user-facing problem found in the source. Collected, never raised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub stage: Stage,
    pub severity: Severity,
    pub message: String,
    pub line: i64,
    pub column: Option<usize>,
}

impl Diagnostic {
    pub fn lexical(message: impl Into<String>, line: i64, column: usize) -> Self {
        Self {
            stage: Stage::Lexical,
            severity: Severity::Error,
            message: message.into(),
            line,
            column: Some(column),
        }
    }

    pub fn syntax(message: impl Into<String>, line: i64) -> Self {
        Self {
            stage: Stage::Syntax,
            severity: Severity::Error,
            message: message.into(),
            line,
            column: None,
        }
    }

    pub fn semantic_error(message: impl Into<String>, line: i64) -> Self {
        Self {
            stage: Stage::Semantic,
            severity: Severity::Error,
            message: message.into(),
            line,
            column: None,
        }
    }

    pub fn semantic_warning(message: impl Into<String>, line: i64) -> Self {
        Self {
            stage: Stage::Semantic,
            severity: Severity::Warning,
            message: message.into(),
            line,
            column: None,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let stage = match self.stage {
            Stage::Lexical => "Lexical",
            Stage::Syntax => "Syntax",
            Stage::Semantic => "Semantic",
        };
        let severity = match self.severity {
            Severity::Error => "Error",
            Severity::Warning => "Warning",
        };
        write!(f, "[{stage} {severity}] {} at line {}", self.message, self.line)?;
        if let Some(column) = self.column {
            write!(f, ", column {column}")?;
        }
        Ok(())
    }
}
