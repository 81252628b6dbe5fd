use crate::ast::*;

/// Renders a tree one node per line, two spaces of indent per level.
#[derive(Default)]
pub struct AstPrinter {
    level: usize,
}

impl Visitor<String> for AstPrinter {
    fn visit(&mut self, node: &Node) -> String {
        let indent = "  ".repeat(self.level);
        let line = match &node.value {
            Some(value) if !value.is_empty() => format!("{indent}{}: {value}\n", node.kind),
            _ => format!("{indent}{}\n", node.kind),
        };

        self.level += 1;
        let children = self.visit_children(node).concat();
        self.level -= 1;

        line + &children
    }
}
