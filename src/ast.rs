use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Program,
    ImportList,
    IncludeStmt,
    GlobalDeclarations,
    MainFunction,
    Block,
    StatementList,
    Declaration,
    Assignment,
    IfStmt,
    ElsePart,
    WhileStmt,
    ForStmt,
    Increment,
    EmptyUpdate,
    OutputStmt,
    InputStmt,
    RelationalExpr,
    AdditiveExpr,
    TermExpr,
    Number,
    String,
    Identifier,
    Bool,
    Op,
    Type,
    AssignOp,
    ImportName,
    /// Placeholder standing in for a construct the parser could not read.
    Error,
}

impl NodeKind {
    pub fn is_binary(&self) -> bool {
        matches!(
            self,
            NodeKind::RelationalExpr | NodeKind::AdditiveExpr | NodeKind::TermExpr
        )
    }
}

impl Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

/// One node of the syntax tree. Children are owned, the tree is never shared.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub children: Vec<Node>,
    pub value: Option<String>,
    pub line: i64,
}

impl Node {
    pub fn new(kind: NodeKind, children: Vec<Node>, value: Option<String>, line: i64) -> Self {
        Self {
            kind,
            children,
            value,
            line,
        }
    }

    pub fn leaf(kind: NodeKind, value: &str, line: i64) -> Self {
        Self::new(kind, vec![], Some(value.to_owned()), line)
    }

    pub fn child(&self, i: usize) -> Option<&Node> {
        self.children.get(i)
    }

    pub fn value(&self) -> &str {
        self.value.as_deref().unwrap_or("")
    }

    /// `Declaration := Type Identifier (AssignOp Expr)?`
    pub fn declaration_parts(&self) -> Option<(&Node, &Node, Option<&Node>)> {
        match self.children.as_slice() {
            [ty, name] => Some((ty, name, None)),
            [ty, name, _, expr] => Some((ty, name, Some(expr))),
            _ => None,
        }
    }

    /// `Assignment := Identifier AssignOp Expr`
    pub fn assignment_parts(&self) -> Option<(&Node, &Node)> {
        match self.children.as_slice() {
            [name, _, expr] => Some((name, expr)),
            _ => None,
        }
    }

    /// `left Op right` of a relational, additive or term node.
    pub fn binary_parts(&self) -> Option<(&Node, &str, &Node)> {
        match self.children.as_slice() {
            [left, op, right] => Some((left, op.value(), right)),
            _ => None,
        }
    }

    pub fn for_parts(&self) -> Option<ForParts<'_>> {
        match self.children.as_slice() {
            [condition, update, body] => Some(ForParts {
                init: None,
                condition,
                update,
                body,
            }),
            [init, condition, update, body] => Some(ForParts {
                init: Some(init),
                condition,
                update,
                body,
            }),
            _ => None,
        }
    }

    /// Variable name and step (`+` or `-`) of an `Increment` update.
    pub fn increment_parts(&self) -> Option<(&str, char)> {
        let value = self.value();
        if let Some(name) = value.strip_suffix("++") {
            Some((name, '+'))
        } else {
            value.strip_suffix("--").map(|name| (name, '-'))
        }
    }
}

pub struct ForParts<'a> {
    pub init: Option<&'a Node>,
    pub condition: &'a Node,
    pub update: &'a Node,
    pub body: &'a Node,
}

pub trait Visitor<T> {
    fn visit(&mut self, node: &Node) -> T;

    fn visit_children(&mut self, node: &Node) -> Vec<T> {
        node.children.iter().map(|child| self.visit(child)).collect()
    }
}
