use super::{code_context::CodeContext, EmitOptions, ENTRY_GUARD};
use crate::{
    ast::{Node, NodeKind, Visitor},
    error::EmitError,
};

pub struct TextBuilder {
    code_context: CodeContext,
}

impl TextBuilder {
    pub fn new(options: &EmitOptions) -> Self {
        TextBuilder {
            code_context: CodeContext::new(options.indent_width),
        }
    }

    pub fn get_code_context(&self) -> &CodeContext {
        &self.code_context
    }

    fn visit_all(&mut self, node: &Node) -> Result<(), EmitError> {
        for child in &node.children {
            self.visit(child)?;
        }
        Ok(())
    }

    fn visit_block(&mut self, block: &Node) -> Result<(), EmitError> {
        self.code_context.indent();
        let start = self.code_context.get_line_count();
        self.visit_all(block)?;
        self.pad_empty_body(start);
        self.code_context.dedent();
        Ok(())
    }

    fn visit_declaration(&mut self, node: &Node) -> Result<(), EmitError> {
        let (_, name, init) = node
            .declaration_parts()
            .ok_or_else(|| EmitError::malformed(node.kind, node.line))?;
        let value = match init {
            Some(init) => self.expression(init)?,
            None => "None".to_string(),
        };
        self.code_context.add(&format!("{} = {value}", name.value()));
        Ok(())
    }

    fn visit_assignment(&mut self, node: &Node) -> Result<(), EmitError> {
        let (name, expr) = node
            .assignment_parts()
            .ok_or_else(|| EmitError::malformed(node.kind, node.line))?;
        let value = self.expression(expr)?;
        self.code_context.add(&format!("{} = {value}", name.value()));
        Ok(())
    }

    fn visit_if(&mut self, node: &Node) -> Result<(), EmitError> {
        let (condition, block, else_part) = match node.children.as_slice() {
            [condition, block] => (condition, block, None),
            [condition, block, else_part] => (condition, block, Some(else_part)),
            _ => return Err(EmitError::malformed(node.kind, node.line)),
        };
        let condition = self.expression(condition)?;
        self.code_context.add(&format!("if {condition}:"));
        self.visit(block)?;

        if let Some(else_part) = else_part {
            self.code_context.add("else:");
            self.visit(else_part)?;
        }
        Ok(())
    }

    fn visit_while(&mut self, node: &Node) -> Result<(), EmitError> {
        let [condition, block] = node.children.as_slice() else {
            return Err(EmitError::malformed(node.kind, node.line));
        };
        let condition = self.expression(condition)?;
        self.code_context.add(&format!("while {condition}:"));
        self.visit(block)
    }

    /// `deploy(init; cond; update) { body }` becomes `init` followed by a
    /// while loop whose last statement is the update.
    fn visit_for(&mut self, node: &Node) -> Result<(), EmitError> {
        let parts = node
            .for_parts()
            .ok_or_else(|| EmitError::malformed(node.kind, node.line))?;

        if let Some(init) = parts.init {
            self.visit(init)?;
        }
        let condition = self.expression(parts.condition)?;
        self.code_context.add(&format!("while {condition}:"));

        self.code_context.indent();
        let start = self.code_context.get_line_count();
        let statements = parts
            .body
            .child(0)
            .ok_or_else(|| EmitError::malformed(parts.body.kind, parts.body.line))?;
        self.visit(statements)?;

        let update = parts.update;
        match update.kind {
            NodeKind::Assignment => self.visit_assignment(update)?,
            NodeKind::Increment => {
                let (name, step) = update
                    .increment_parts()
                    .ok_or_else(|| EmitError::malformed(update.kind, update.line))?;
                self.code_context.add(&format!("{name} {step}= 1"));
            }
            NodeKind::EmptyUpdate => (),
            kind => return Err(EmitError::unexpected(kind, update.line, "loop update")),
        }
        self.pad_empty_body(start);
        self.code_context.dedent();
        Ok(())
    }

    fn visit_output(&mut self, node: &Node) -> Result<(), EmitError> {
        let args = node
            .children
            .iter()
            .map(|arg| self.expression(arg))
            .collect::<Result<Vec<_>, _>>()?;
        self.code_context
            .add(&format!("print({})", args.join(", ")));
        Ok(())
    }

    fn visit_input(&mut self, node: &Node) -> Result<(), EmitError> {
        let name = node
            .child(0)
            .ok_or_else(|| EmitError::malformed(node.kind, node.line))?;
        self.code_context
            .add(&format!("{} = input()", name.value()));
        Ok(())
    }

    fn pad_empty_body(&mut self, start: usize) {
        if self.code_context.get_line_count() == start {
            self.code_context.add("pass");
        }
    }

    /// Renders an expression. Binary nodes are always parenthesised so the
    /// source grouping survives whatever precedence the target has.
    fn expression(&self, node: &Node) -> Result<String, EmitError> {
        match node.kind {
            kind if kind.is_binary() => {
                let (left, op, right) = node
                    .binary_parts()
                    .ok_or_else(|| EmitError::malformed(node.kind, node.line))?;
                Ok(format!(
                    "({} {op} {})",
                    self.expression(left)?,
                    self.expression(right)?
                ))
            }
            NodeKind::Number | NodeKind::String => Ok(node.value().to_string()),
            NodeKind::Identifier => Ok(match node.value() {
                "Ally" => "True".to_string(),
                "Enemy" => "False".to_string(),
                name => name.to_string(),
            }),
            NodeKind::Bool if node.value() == "Ally" => Ok("True".to_string()),
            NodeKind::Bool => Ok("False".to_string()),
            kind => Err(EmitError::unexpected(kind, node.line, "expression")),
        }
    }
}

impl Visitor<Result<(), EmitError>> for TextBuilder {
    fn visit(&mut self, node: &Node) -> Result<(), EmitError> {
        match node.kind {
            NodeKind::Program | NodeKind::StatementList | NodeKind::ElsePart => {
                self.visit_all(node)?;
            }
            NodeKind::ImportList | NodeKind::GlobalDeclarations => {
                self.visit_all(node)?;
                self.code_context.add_blank();
            }
            NodeKind::IncludeStmt => {
                let name = node
                    .child(0)
                    .ok_or_else(|| EmitError::malformed(node.kind, node.line))?;
                self.code_context
                    .add(&format!("import {}", name.value()));
            }
            NodeKind::MainFunction => {
                self.code_context.add(ENTRY_GUARD);
                self.visit_all(node)?;
            }
            NodeKind::Block => self.visit_block(node)?,
            NodeKind::Declaration => self.visit_declaration(node)?,
            NodeKind::Assignment => self.visit_assignment(node)?,
            NodeKind::IfStmt => self.visit_if(node)?,
            NodeKind::WhileStmt => self.visit_while(node)?,
            NodeKind::ForStmt => self.visit_for(node)?,
            NodeKind::OutputStmt => self.visit_output(node)?,
            NodeKind::InputStmt => self.visit_input(node)?,
            NodeKind::Increment
            | NodeKind::EmptyUpdate
            | NodeKind::RelationalExpr
            | NodeKind::AdditiveExpr
            | NodeKind::TermExpr
            | NodeKind::Number
            | NodeKind::String
            | NodeKind::Identifier
            | NodeKind::Bool
            | NodeKind::Op
            | NodeKind::Type
            | NodeKind::AssignOp
            | NodeKind::ImportName
            | NodeKind::Error => {
                return Err(EmitError::unexpected(node.kind, node.line, "statement"));
            }
        }
        Ok(())
    }
}
