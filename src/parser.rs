pub mod ast_printer;

use tracing::debug;

use crate::{
    ast::{Node, NodeKind},
    diagnostics::Diagnostic,
    lexer::token::{Token, TokenKind, EOF},
};

/*
program := import_list? global_declarations? main_function
import_list := include_stmt+
include_stmt := "#call" ident
global_declarations := declaration+
main_function := "battle" "(" ")" block
block := "{" statement* "}"
statement := declaration | assignment | if_stmt | while_stmt | for_stmt
                | output_stmt | input_stmt
declaration := type ident ["=" expression] ";"
type := "soldier" | "force" | "intel" | "flag"
assignment := ident "=" expression ";"
if_stmt := "shield" "(" expression ")" block ["retreat" block]
while_stmt := "march" "(" expression ")" block
for_stmt := "deploy" "(" [declaration | assignment] expression ";" for_update ")" block
for_update := ident "=" expression | ident "++" | ident "--" | <empty>
output_stmt := "shout" "(" expression ("," expression)* ")" ";"
input_stmt := "scout" "(" ident ")" ";"

expression := relational
relational := additive (("==" | "!=" | "<" | ">" | "<=" | ">=") additive)*
additive := term (("+" | "-") term)*
term := factor (("*" | "/") factor)*
factor := number | string | ident | "flag" | "(" expression ")"
*/

/// Parses the whole token sequence. Never stops at the first problem: syntax
/// errors are collected and the returned tree is always structurally complete.
pub fn parse(tokens: &[Token]) -> (Node, Vec<Diagnostic>) {
    let mut parser = Parser::new(tokens);
    let program = parser.program();
    debug!(errors = parser.errors.len(), "parsing completed");
    (program, parser.errors)
}

struct Parser<'a> {
    tokens: &'a [Token],
    position: usize,
    errors: Vec<Diagnostic>,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            position: 0,
            errors: vec![],
        }
    }

    fn program(&mut self) -> Node {
        let mut children = vec![];
        if let Some(imports) = self.import_list() {
            children.push(imports);
        }
        if let Some(globals) = self.global_declarations() {
            children.push(globals);
        }
        children.push(self.main_function());

        if self.current().kind != TokenKind::Eof {
            self.error(format!(
                "Unexpected token {} after entry block",
                self.current().kind
            ));
        }
        self.make_node(NodeKind::Program, children, None, None)
    }

    fn import_list(&mut self) -> Option<Node> {
        let mut children = vec![];
        while self.current().kind == TokenKind::IncludeImport {
            children.push(self.include_stmt());
        }
        if children.is_empty() {
            return None;
        }
        Some(self.make_node(NodeKind::ImportList, children, None, None))
    }

    fn include_stmt(&mut self) -> Node {
        let marker = self.current();
        self.match_next(TokenKind::IncludeImport);
        let mut children = vec![];
        if let Some(name) = self.match_next(TokenKind::Identifier) {
            children.push(self.leaf(NodeKind::ImportName, name));
        }
        self.make_node(NodeKind::IncludeStmt, children, None, Some(marker))
    }

    fn global_declarations(&mut self) -> Option<Node> {
        let mut children = vec![];
        while self.current().kind.is_type() {
            if let Some(declaration) = self.declaration() {
                children.push(declaration);
            }
        }
        if children.is_empty() {
            return None;
        }
        Some(self.make_node(NodeKind::GlobalDeclarations, children, None, None))
    }

    fn main_function(&mut self) -> Node {
        let Some(keyword) = self.match_next(TokenKind::ProgramStart) else {
            return self.make_node(
                NodeKind::Error,
                vec![],
                Some(NodeKind::MainFunction.to_string()),
                None,
            );
        };
        self.match_next(TokenKind::LeftP);
        self.match_next(TokenKind::RightP);
        let block = self.block();
        self.make_node(NodeKind::MainFunction, vec![block], None, Some(keyword))
    }

    fn block(&mut self) -> Node {
        let start = self.current();
        self.match_next(TokenKind::LeftBrace);
        let statements = self.statement_list();
        self.match_next(TokenKind::RightBrace);
        self.make_node(NodeKind::Block, vec![statements], None, Some(start))
    }

    fn statement_list(&mut self) -> Node {
        let mut children = vec![];
        while !matches!(
            self.current().kind,
            TokenKind::RightBrace | TokenKind::Eof
        ) {
            if let Some(statement) = self.statement() {
                children.push(statement);
            }
        }
        self.make_node(NodeKind::StatementList, children, None, None)
    }

    fn statement(&mut self) -> Option<Node> {
        let token = self.current();
        match token.kind {
            kind if kind.is_type() => self.declaration(),
            TokenKind::Identifier => self.assignment(true),
            TokenKind::If => Some(self.if_stmt()),
            TokenKind::While => Some(self.while_stmt()),
            TokenKind::For => Some(self.for_stmt()),
            TokenKind::Output => Some(self.output_stmt()),
            TokenKind::Input => Some(self.input_stmt()),
            kind => {
                self.error(format!("Unexpected token {kind}"));
                self.advance();
                None
            }
        }
    }

    fn declaration(&mut self) -> Option<Node> {
        let type_token = self.current();
        self.advance();
        let mut children = vec![self.leaf(NodeKind::Type, type_token)];

        let name = self.match_next(TokenKind::Identifier)?;
        children.push(self.leaf(NodeKind::Identifier, name));

        if self.current().kind == TokenKind::Assign {
            let assign = self.current();
            self.advance();
            children.push(self.leaf(NodeKind::AssignOp, assign));
            children.push(self.expression());
        }

        self.match_next(TokenKind::Semicolon);
        Some(self.make_node(NodeKind::Declaration, children, None, None))
    }

    /// `terminated` is false for the update clause of a bounded loop.
    fn assignment(&mut self, terminated: bool) -> Option<Node> {
        let name = self.match_next(TokenKind::Identifier)?;
        let mut children = vec![self.leaf(NodeKind::Identifier, name)];

        let assign = self.current();
        self.match_next(TokenKind::Assign);
        children.push(Node::leaf(NodeKind::AssignOp, "=", assign.line));
        children.push(self.expression());

        if terminated {
            self.match_next(TokenKind::Semicolon);
        }
        Some(self.make_node(NodeKind::Assignment, children, None, None))
    }

    fn if_stmt(&mut self) -> Node {
        self.match_next(TokenKind::If);
        self.match_next(TokenKind::LeftP);
        let mut children = vec![self.expression()];
        self.match_next(TokenKind::RightP);
        children.push(self.block());

        if self.current().kind == TokenKind::Else {
            self.advance();
            let block = self.block();
            children.push(self.make_node(NodeKind::ElsePart, vec![block], None, None));
        }
        self.make_node(NodeKind::IfStmt, children, None, None)
    }

    fn while_stmt(&mut self) -> Node {
        self.match_next(TokenKind::While);
        self.match_next(TokenKind::LeftP);
        let mut children = vec![self.expression()];
        self.match_next(TokenKind::RightP);
        children.push(self.block());
        self.make_node(NodeKind::WhileStmt, children, None, None)
    }

    fn for_stmt(&mut self) -> Node {
        self.match_next(TokenKind::For);
        self.match_next(TokenKind::LeftP);

        let mut children = vec![];
        let init = if self.current().kind.is_type() {
            self.declaration()
        } else if self.current().kind == TokenKind::Identifier
            && self.peek(1).kind == TokenKind::Assign
        {
            self.assignment(true)
        } else {
            None
        };
        children.extend(init);

        children.push(self.expression());
        self.match_next(TokenKind::Semicolon);
        children.push(self.for_update());
        self.match_next(TokenKind::RightP);
        children.push(self.block());
        self.make_node(NodeKind::ForStmt, children, None, None)
    }

    fn for_update(&mut self) -> Node {
        let token = self.current();
        if token.kind == TokenKind::Identifier {
            match self.peek(1).kind {
                TokenKind::Assign => {
                    if let Some(assignment) = self.assignment(false) {
                        return assignment;
                    }
                }
                TokenKind::Increment | TokenKind::Decrement => {
                    let step = self.peek(1);
                    self.advance();
                    self.advance();
                    let value = format!("{}{}", token.lexeme, step.lexeme);
                    return self.make_node(NodeKind::Increment, vec![], Some(value), Some(token));
                }
                _ => (),
            }
        }
        self.make_node(NodeKind::EmptyUpdate, vec![], None, None)
    }

    fn output_stmt(&mut self) -> Node {
        self.match_next(TokenKind::Output);
        self.match_next(TokenKind::LeftP);
        let mut children = vec![self.expression()];
        while self.current().kind == TokenKind::Comma {
            self.advance();
            children.push(self.expression());
        }
        self.match_next(TokenKind::RightP);
        self.match_next(TokenKind::Semicolon);
        self.make_node(NodeKind::OutputStmt, children, None, None)
    }

    fn input_stmt(&mut self) -> Node {
        let keyword = self.current();
        self.match_next(TokenKind::Input);
        self.match_next(TokenKind::LeftP);
        let mut children = vec![];
        if let Some(name) = self.match_next(TokenKind::Identifier) {
            children.push(self.leaf(NodeKind::Identifier, name));
        }
        self.match_next(TokenKind::RightP);
        self.match_next(TokenKind::Semicolon);
        self.make_node(NodeKind::InputStmt, children, None, Some(keyword))
    }

    fn expression(&mut self) -> Node {
        self.relational()
    }

    fn relational(&mut self) -> Node {
        let mut node = self.additive();
        while self.current().kind.is_relational() {
            node = self.binary(NodeKind::RelationalExpr, node, Self::additive);
        }
        node
    }

    fn additive(&mut self) -> Node {
        let mut node = self.term();
        while self.current().kind.is_additive() {
            node = self.binary(NodeKind::AdditiveExpr, node, Self::term);
        }
        node
    }

    fn term(&mut self) -> Node {
        let mut node = self.factor();
        while self.current().kind.is_multiplicative() {
            node = self.binary(NodeKind::TermExpr, node, Self::factor);
        }
        node
    }

    /// Consumes the operator at the cursor and the operand after it.
    fn binary(&mut self, kind: NodeKind, left: Node, operand: fn(&mut Self) -> Node) -> Node {
        let op = self.current();
        self.advance();
        let op = self.leaf(NodeKind::Op, op);
        let right = operand(self);
        self.make_node(kind, vec![left, op, right], None, None)
    }

    fn factor(&mut self) -> Node {
        let token = self.current();
        let kind = match token.kind {
            TokenKind::Number => NodeKind::Number,
            TokenKind::String => NodeKind::String,
            TokenKind::Identifier => NodeKind::Identifier,
            TokenKind::BoolType => NodeKind::Bool,
            TokenKind::LeftP => {
                self.advance();
                let node = self.expression();
                self.match_next(TokenKind::RightP);
                return node;
            }
            found => {
                self.error(format!("Expected expression but found {found}"));
                if !matches!(
                    found,
                    TokenKind::RightP
                        | TokenKind::Semicolon
                        | TokenKind::RightBrace
                        | TokenKind::Eof
                ) {
                    self.advance();
                }
                return self.make_node(NodeKind::Error, vec![], None, None);
            }
        };
        self.advance();
        self.leaf(kind, token)
    }

    fn current(&self) -> &'a Token {
        self.peek(0)
    }

    /// Reading past the end yields the synthetic end-of-stream token.
    fn peek(&self, offset: usize) -> &'a Token {
        self.tokens.get(self.position + offset).unwrap_or(&*EOF)
    }

    fn advance(&mut self) {
        if self.position < self.tokens.len() {
            self.position += 1;
        }
    }

    fn match_next(&mut self, target: TokenKind) -> Option<&'a Token> {
        let token = self.current();
        if token.kind == target {
            self.advance();
            return Some(token);
        }
        self.error(format!("Expected {target} but found {}", token.kind));
        None
    }

    fn error(&mut self, message: String) {
        let line = self.current().line;
        self.errors.push(Diagnostic::syntax(message, line));
    }

    fn leaf(&self, kind: NodeKind, token: &Token) -> Node {
        Node::leaf(kind, &token.lexeme, token.line)
    }

    fn make_node(
        &self,
        kind: NodeKind,
        children: Vec<Node>,
        value: Option<String>,
        token: Option<&Token>,
    ) -> Node {
        let line = if let Some(token) = token {
            token.line
        } else if let Some(first) = children.first() {
            first.line
        } else if self.position > 0 {
            self.tokens[self.position - 1].line
        } else {
            0
        };
        Node::new(kind, children, value, line)
    }
}
