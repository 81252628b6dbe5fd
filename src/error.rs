use thiserror::Error;

use crate::ast::NodeKind;

/// Raised by the generator when the tree breaks the parser's shape contract.
/// This is a bug in the pipeline, not a problem with the user's program.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmitError {
    #[error("internal error: unexpected {kind} node at line {line} while emitting {context}")]
    UnexpectedNode {
        kind: NodeKind,
        line: i64,
        context: &'static str,
    },
    #[error("internal error: malformed {kind} node at line {line}")]
    MalformedNode { kind: NodeKind, line: i64 },
}

impl EmitError {
    pub fn unexpected(kind: NodeKind, line: i64, context: &'static str) -> Self {
        Self::UnexpectedNode {
            kind,
            line,
            context,
        }
    }

    pub fn malformed(kind: NodeKind, line: i64) -> Self {
        Self::MalformedNode { kind, line }
    }
}
