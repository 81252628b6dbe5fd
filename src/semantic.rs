pub mod symbol_table;
pub mod types;

use tracing::{debug, trace};

use crate::{
    ast::{Node, NodeKind, Visitor},
    diagnostics::Diagnostic,
};
use symbol_table::SymbolTable;
use types::Type;

const BOOLEAN_LITERALS: [&str; 2] = ["Ally", "Enemy"];

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Analysis {
    pub errors: Vec<Diagnostic>,
    pub warnings: Vec<Diagnostic>,
}

/// Walks the whole tree once with a fresh symbol table and reports every
/// semantic problem found, in document order.
pub fn analyze(ast: &Node) -> Analysis {
    let mut analyzer = SemanticAnalyzer::new();
    analyzer.visit(ast);
    debug!(
        errors = analyzer.analysis.errors.len(),
        warnings = analyzer.analysis.warnings.len(),
        "semantic analysis completed"
    );
    analyzer.analysis
}

pub struct SemanticAnalyzer {
    symbols: SymbolTable,
    analysis: Analysis,
}

impl SemanticAnalyzer {
    pub fn new() -> Self {
        Self {
            symbols: SymbolTable::new(),
            analysis: Analysis::default(),
        }
    }

    fn error(&mut self, message: impl Into<String>, line: i64) {
        self.analysis
            .errors
            .push(Diagnostic::semantic_error(message, line));
    }

    fn warning(&mut self, message: impl Into<String>, line: i64) {
        self.analysis
            .warnings
            .push(Diagnostic::semantic_warning(message, line));
    }

    fn scoped(&mut self, node: &Node) {
        self.symbols.enter_scope();
        trace!(depth = self.symbols.depth(), kind = %node.kind, "entering scope");
        self.visit_children(node);
        trace!("leaving scope\n{}", self.symbols);
        self.symbols.exit_scope();
    }

    fn declaration(&mut self, node: &Node) {
        let Some((ty, name, init)) = node.declaration_parts() else {
            self.visit_children(node);
            return;
        };
        let var_type = Type::from_keyword(ty.value());

        let initialized = match init {
            Some(init) => {
                let value_type = self.visit(init);
                self.check_assignment(var_type, value_type, node.line);
                true
            }
            None => false,
        };

        if !self
            .symbols
            .add(name.value(), var_type, node.line, initialized)
        {
            self.error(
                format!("Variable '{}' already declared in this scope", name.value()),
                node.line,
            );
        }
    }

    fn assignment(&mut self, node: &Node) {
        let Some((name, expr)) = node.assignment_parts() else {
            self.visit_children(node);
            return;
        };
        let Some(var_type) = self.symbols.lookup(name.value()).map(|s| s.data_type) else {
            self.error(format!("Variable '{}' not declared", name.value()), node.line);
            return;
        };

        let value_type = self.visit(expr);
        self.check_assignment(var_type, value_type, node.line);
        self.symbols.mark_initialized(name.value());
    }

    fn input(&mut self, node: &Node) {
        let Some(name) = node.child(0) else {
            return;
        };
        if !self.symbols.mark_initialized(name.value()) {
            self.error(format!("Variable '{}' not declared", name.value()), name.line);
        }
    }

    fn read_variable(&mut self, name: &str, line: i64) -> Type {
        if BOOLEAN_LITERALS.contains(&name) {
            return Type::Flag;
        }
        match self.symbols.lookup(name).copied() {
            Some(symbol) => {
                if !symbol.initialized {
                    self.warning(
                        format!("Variable '{name}' used but might not be initialized"),
                        line,
                    );
                }
                symbol.data_type
            }
            None => {
                self.error(format!("Variable '{name}' not declared"), line);
                Type::Unknown
            }
        }
    }

    fn binary(&mut self, node: &Node, rule: fn(Type, Type) -> Result<Type, &'static str>) -> Type {
        let Some((left, _, right)) = node.binary_parts() else {
            self.visit_children(node);
            return Type::Unknown;
        };
        let left = self.visit(left);
        let right = self.visit(right);
        match rule(left, right) {
            Ok(result) => result,
            Err(message) => {
                self.error(message, node.line);
                Type::Error
            }
        }
    }

    fn check_assignment(&mut self, var_type: Type, value_type: Type, line: i64) {
        if let Some(message) = var_type.assignment_mismatch(value_type) {
            self.error(message, line);
        }
    }
}

impl Default for SemanticAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl Visitor<Type> for SemanticAnalyzer {
    fn visit(&mut self, node: &Node) -> Type {
        match node.kind {
            // A loop header gets its own frame so the induction variable
            // dies with the loop.
            NodeKind::Block | NodeKind::ForStmt => self.scoped(node),
            NodeKind::Declaration => self.declaration(node),
            NodeKind::Assignment => self.assignment(node),
            NodeKind::InputStmt => self.input(node),
            NodeKind::Increment => {
                if let Some((name, _)) = node.increment_parts() {
                    self.read_variable(name, node.line);
                }
            }
            NodeKind::Identifier => return self.read_variable(node.value(), node.line),
            NodeKind::Number if node.value().contains('.') => return Type::Force,
            NodeKind::Number => return Type::Soldier,
            NodeKind::String => return Type::Intel,
            NodeKind::Bool => return Type::Flag,
            NodeKind::AdditiveExpr => return self.binary(node, Type::additive),
            NodeKind::TermExpr => return self.binary(node, Type::multiplicative),
            NodeKind::Program
            | NodeKind::ImportList
            | NodeKind::IncludeStmt
            | NodeKind::GlobalDeclarations
            | NodeKind::MainFunction
            | NodeKind::StatementList
            | NodeKind::IfStmt
            | NodeKind::ElsePart
            | NodeKind::WhileStmt
            | NodeKind::EmptyUpdate
            | NodeKind::OutputStmt
            | NodeKind::RelationalExpr
            | NodeKind::Op
            | NodeKind::Type
            | NodeKind::AssignOp
            | NodeKind::ImportName
            | NodeKind::Error => {
                self.visit_children(node);
            }
        }
        Type::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{lexer::scanner::scan, parser::parse};
    use rstest::*;

    fn analyze_source(source: &str) -> (Vec<String>, Vec<String>) {
        let scan = scan(&format!("battle() {{\n{source}\n}}"));
        let (ast, syntax_errors) = parse(&scan.tokens);
        assert!(syntax_errors.is_empty(), "{syntax_errors:?}");
        let analysis = analyze(&ast);
        (
            analysis.errors.iter().map(|e| e.to_string()).collect(),
            analysis.warnings.iter().map(|w| w.to_string()).collect(),
        )
    }

    fn errors(source: &str) -> Vec<String> {
        analyze_source(source).0
    }

    fn warnings(source: &str) -> Vec<String> {
        analyze_source(source).1
    }

    #[rstest]
    #[case::initialized_int("soldier x = 5;\nshout(x);")]
    #[case::float_promotion("force f = 1 + 2.5 * 2;")]
    #[case::int_into_float("force f = 3;")]
    #[case::concat("intel s = \"a\" + \"b\";")]
    #[case::bool_literals("flag b = Ally;\nflag c = Enemy;")]
    #[case::flag_keyword_factor("flag b = flag;")]
    #[case::relational_initializer("soldier x = 1;\nflag b = x > 0;")]
    #[case::unchecked_float_to_string("intel s = 2.5;")]
    #[case::unchecked_bool_to_int("soldier n = Ally;")]
    #[case::shadowing("soldier x = 1;\nshield (x > 0) { intel x = \"inner\"; shout(x); }")]
    #[case::loop_variables("deploy(soldier i = 0; i < 3; i++) { }\ndeploy(soldier i = 5; i > 0; i--) { }")]
    fn test_valid(#[case] source: &str) {
        assert_eq!(analyze_source(source), (vec![], vec![]));
    }

    #[rstest]
    #[case::string_from_int(
        "intel s = 5;",
        "[Semantic Error] Type Mismatch: Cannot assign 'soldier' (int) to 'intel' (string) at line 2"
    )]
    #[case::int_from_float(
        "soldier x = 1 + 2.5;",
        "[Semantic Error] Type Mismatch: Cannot assign 'force' (float) to 'soldier' (int) at line 2"
    )]
    #[case::int_from_string(
        "soldier x;\nx = \"ten\";",
        "[Semantic Error] Type Mismatch: Cannot assign 'intel' (string) to 'soldier' (int) at line 3"
    )]
    #[case::redeclaration(
        "soldier x = 1;\nforce x = 2.0;",
        "[Semantic Error] Variable 'x' already declared in this scope at line 3"
    )]
    #[case::undeclared_assignment(
        "y = 4;",
        "[Semantic Error] Variable 'y' not declared at line 2"
    )]
    #[case::undeclared_read(
        "shout(y);",
        "[Semantic Error] Variable 'y' not declared at line 2"
    )]
    #[case::self_initializer(
        "soldier x = x;",
        "[Semantic Error] Variable 'x' not declared at line 2"
    )]
    #[case::string_plus_number(
        "shout(\"a\" + 1);",
        "[Semantic Error] Cannot add String (intel) with Number at line 2"
    )]
    #[case::boolean_math(
        "soldier n = Ally + 1;",
        "[Semantic Error] Cannot perform math on Boolean (flag) at line 2"
    )]
    #[case::boolean_product(
        "shout(2 * Enemy);",
        "[Semantic Error] Cannot perform math on Boolean (flag) at line 2"
    )]
    #[case::string_product(
        "intel s = \"a\" * \"b\";",
        "[Semantic Error] Cannot multiply/divide Strings at line 2"
    )]
    #[case::block_scope_ends(
        "shield (Ally) { soldier y = 1; }\nshout(y);",
        "[Semantic Error] Variable 'y' not declared at line 3"
    )]
    #[case::induction_variable_ends(
        "deploy(soldier i = 0; i < 3; i++) { shout(i); }\nshout(i);",
        "[Semantic Error] Variable 'i' not declared at line 3"
    )]
    #[case::undeclared_input(
        "scout(name);",
        "[Semantic Error] Variable 'name' not declared at line 2"
    )]
    fn test_single_error(#[case] source: &str, #[case] expected: &str) {
        assert_eq!(analyze_source(source), (vec![expected.to_string()], vec![]));
    }

    #[rstest]
    fn test_errors_do_not_stop_analysis() {
        let errors = errors("intel s = 5;\ny = 1;\nsoldier s;\nshout(\"a\" * 2);");
        assert_eq!(
            errors,
            vec![
                "[Semantic Error] Type Mismatch: Cannot assign 'soldier' (int) to 'intel' (string) at line 2",
                "[Semantic Error] Variable 'y' not declared at line 3",
                "[Semantic Error] Variable 's' already declared in this scope at line 4",
                "[Semantic Error] Cannot multiply/divide Strings at line 5",
            ]
        );
    }

    #[rstest]
    #[case::uninitialized("soldier x;\nshout(x);", vec![
        "[Semantic Warning] Variable 'x' used but might not be initialized at line 3",
    ])]
    #[case::assigned_in_nested_block("soldier x;\nshield (Ally) { x = 1; }\nshout(x);", vec![])]
    #[case::shadow_assignment_leaves_outer("soldier x;\nshield (Ally) {\nsoldier x;\nx = 1;\n}\nshout(x);", vec![
        "[Semantic Warning] Variable 'x' used but might not be initialized at line 7",
    ])]
    #[case::input_initializes("intel name;\nscout(name);\nshout(name);", vec![])]
    #[case::increment_reads("soldier i;\ndeploy(i < 3; i++) { }", vec![
        "[Semantic Warning] Variable 'i' used but might not be initialized at line 3",
        "[Semantic Warning] Variable 'i' used but might not be initialized at line 3",
    ])]
    fn test_warnings(#[case] source: &str, #[case] expected: Vec<&str>) {
        assert_eq!(errors(source), Vec::<String>::new());
        assert_eq!(warnings(source), expected);
    }

    #[rstest]
    fn test_globals_are_visible_in_entry_block() {
        let scan = scan("soldier g = 1;\nbattle() { g = g + 1; shout(g); }");
        let (ast, _) = parse(&scan.tokens);
        assert_eq!(analyze(&ast), Analysis::default());
    }

    #[rstest]
    fn test_analysis_is_repeatable() {
        let scan = scan("battle() {\nsoldier x;\nshout(x + \"s\");\ny = 2;\n}");
        let (ast, _) = parse(&scan.tokens);
        let first = analyze(&ast);
        assert_eq!(first.errors.len(), 2);
        assert_eq!(first.warnings.len(), 1);
        assert_eq!(analyze(&ast), first);
    }
}
