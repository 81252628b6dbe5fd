use std::{collections::BTreeMap, fmt::Display};

use super::types::Type;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Symbol {
    pub data_type: Type,
    pub line: i64,
    pub initialized: bool,
}

/// Stack of scope frames. The bottom frame is the global scope and is never popped.
#[derive(Debug, Clone)]
pub struct SymbolTable {
    scopes: Vec<BTreeMap<String, Symbol>>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self {
            scopes: vec![BTreeMap::new()],
        }
    }

    pub fn enter_scope(&mut self) {
        self.scopes.push(BTreeMap::new());
    }

    pub fn exit_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Declares `name` in the innermost frame. Returns false if that frame
    /// already holds it; outer frames may be shadowed freely.
    pub fn add(&mut self, name: &str, data_type: Type, line: i64, initialized: bool) -> bool {
        let Some(scope) = self.scopes.last_mut() else {
            return false;
        };
        if scope.contains_key(name) {
            return false;
        }
        scope.insert(
            name.to_string(),
            Symbol {
                data_type,
                line,
                initialized,
            },
        );
        true
    }

    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }

    /// Flags the nearest visible declaration of `name`, which may live in an
    /// outer frame.
    pub fn mark_initialized(&mut self, name: &str) -> bool {
        match self
            .scopes
            .iter_mut()
            .rev()
            .find_map(|scope| scope.get_mut(name))
        {
            Some(symbol) => {
                symbol.initialized = true;
                true
            }
            None => false,
        }
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for SymbolTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rule = "-".repeat(50);
        for (level, scope) in self.scopes.iter().enumerate().rev() {
            if level == 0 {
                writeln!(f, "GLOBAL SCOPE")?;
            } else {
                writeln!(f, "LOCAL SCOPE (level {level})")?;
            }
            writeln!(f, "{rule}")?;
            writeln!(f, "| {:<15} | {:<10} | {:<5} | {:<5} |", "Name", "Type", "Init", "Line")?;
            writeln!(f, "{rule}")?;
            for (name, symbol) in scope {
                let init = if symbol.initialized { "yes" } else { "no" };
                writeln!(
                    f,
                    "| {:<15} | {:<10} | {:<5} | {:<5} |",
                    name,
                    symbol.data_type.keyword(),
                    init,
                    symbol.line
                )?;
            }
            writeln!(f, "{rule}")?;
        }
        Ok(())
    }
}
