use tracing::debug;

use crate::{
    ast::{Node, Visitor},
    error::EmitError,
};
use text::TextBuilder;

mod code_context;
mod text;

pub const ENTRY_GUARD: &str = "if __name__ == \"__main__\":";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitOptions {
    /// Spaces per indentation level.
    pub indent_width: usize,
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self { indent_width: 4 }
    }
}

/// Translates a checked tree into Python source. Only meaningful when no
/// stage reported an error for this tree.
pub fn generate(ast: &Node, options: &EmitOptions) -> Result<String, EmitError> {
    let mut text_builder = TextBuilder::new(options);
    text_builder.visit(ast)?;

    let code_context = text_builder.get_code_context();
    debug!(
        lines = code_context.get_line_count(),
        "code generation completed"
    );
    Ok(code_context.to_source())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ast::NodeKind, lexer::scanner::scan, parser::parse};
    use rstest::*;

    fn emit(source: &str) -> String {
        emit_with(source, &EmitOptions::default())
    }

    fn emit_with(source: &str, options: &EmitOptions) -> String {
        let scan = scan(source);
        let (ast, errors) = parse(&scan.tokens);
        assert!(errors.is_empty(), "{errors:?}");
        generate(&ast, options).unwrap()
    }

    #[rstest]
    #[case::declaration("battle() { soldier x = 5; }", "\
if __name__ == \"__main__\":
    x = 5
")]
    #[case::bare_declaration("battle() { intel s; }", "\
if __name__ == \"__main__\":
    s = None
")]
    #[case::if_else("battle() { shield (x > 0) { shout(x); } retreat { shout(0); } }", "\
if __name__ == \"__main__\":
    if (x > 0):
        print(x)
    else:
        print(0)
")]
    #[case::for_increment("battle() { deploy(soldier i=0; i<3; i++) { shout(i); } }", "\
if __name__ == \"__main__\":
    i = 0
    while (i < 3):
        print(i)
        i += 1
")]
    #[case::for_assignment("battle() { deploy(soldier i = 10; i > 0; i = i - 3) { shout(i); shout(\"tick\"); } }", "\
if __name__ == \"__main__\":
    i = 10
    while (i > 0):
        print(i)
        print(\"tick\")
        i = (i - 3)
")]
    #[case::for_decrement_without_init("battle() { deploy(n > 0; n--) { } }", "\
if __name__ == \"__main__\":
    while (n > 0):
        n -= 1
")]
    #[case::for_empty("battle() { deploy(soldier i = 0; Ally; ) { } }", "\
if __name__ == \"__main__\":
    i = 0
    while True:
        pass
")]
    #[case::while_loop("battle() { march (n < 10) { n = n * 2; } }", "\
if __name__ == \"__main__\":
    while (n < 10):
        n = (n * 2)
")]
    #[case::io("battle() { scout(name); shout(\"Hello\", name, 1 + 2 * 3); }", "\
if __name__ == \"__main__\":
    name = input()
    print(\"Hello\", name, (1 + (2 * 3)))
")]
    #[case::booleans("battle() { flag a = Ally; flag b = Enemy; flag c = flag; }", "\
if __name__ == \"__main__\":
    a = True
    b = False
    c = False
")]
    #[case::grouping("battle() { x = (a - b) - (c - d); }", "\
if __name__ == \"__main__\":
    x = ((a - b) - (c - d))
")]
    #[case::empty_blocks("battle() { shield (Ally) { } retreat { } }", "\
if __name__ == \"__main__\":
    if True:
        pass
    else:
        pass
")]
    #[case::empty_program("battle() { }", "\
if __name__ == \"__main__\":
    pass
")]
    #[case::nested("battle() { march (Ally) { shield (x == 1) { deploy(soldier i = 0; i < 2; i++) { shout(i); } } } }", "\
if __name__ == \"__main__\":
    while True:
        if (x == 1):
            i = 0
            while (i < 2):
                print(i)
                i += 1
")]
    #[case::imports_and_globals("#call math\n#call random\nsoldier g = 1;\nforce h;\nbattle() { shout(g); }", "\
import math
import random

g = 1
h = None

if __name__ == \"__main__\":
    print(g)
")]
    fn test_generate(#[case] source: &str, #[case] expected: &str) {
        assert_eq!(emit(source), expected);
    }

    #[rstest]
    fn test_indent_width() {
        let options = EmitOptions { indent_width: 2 };
        assert_eq!(
            emit_with("battle() { shield (Ally) { shout(1); } }", &options),
            "if __name__ == \"__main__\":\n  if True:\n    print(1)\n"
        );
    }

    #[rstest]
    fn test_placeholder_is_internal_error() {
        let scan = scan("battle() { x = ; }");
        let (ast, errors) = parse(&scan.tokens);
        assert_eq!(errors.len(), 1);
        assert_eq!(
            generate(&ast, &EmitOptions::default()),
            Err(EmitError::unexpected(NodeKind::Error, 1, "expression"))
        );
    }

    #[rstest]
    fn test_missing_entry_is_internal_error() {
        let scan = scan("soldier x;");
        let (ast, _) = parse(&scan.tokens);
        let error = generate(&ast, &EmitOptions::default()).unwrap_err();
        assert!(matches!(
            error,
            EmitError::UnexpectedNode {
                kind: NodeKind::Error,
                context: "statement",
                ..
            }
        ));
    }

    #[rstest]
    fn test_malformed_node() {
        let ast = Node::new(NodeKind::InputStmt, vec![], None, 7);
        assert_eq!(
            generate(&ast, &EmitOptions::default()),
            Err(EmitError::malformed(NodeKind::InputStmt, 7))
        );
        assert_eq!(
            EmitError::malformed(NodeKind::InputStmt, 7).to_string(),
            "internal error: malformed InputStmt node at line 7"
        );
    }
}
