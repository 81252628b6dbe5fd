/// Append-only buffer of emitted lines with a running indentation depth.
#[derive(Debug, Clone)]
pub struct CodeContext {
    fragments: Vec<String>,
    depth: usize,
    indent_unit: String,
}

impl CodeContext {
    pub fn new(indent_width: usize) -> Self {
        Self {
            fragments: vec![],
            depth: 0,
            indent_unit: " ".repeat(indent_width),
        }
    }

    /// Adds one line at the current depth.
    pub fn add(&mut self, code: &str) -> &mut Self {
        let line = format!("{}{code}\n", self.indent_unit.repeat(self.depth));
        self.fragments.push(line);
        self
    }

    pub fn add_blank(&mut self) -> &mut Self {
        self.fragments.push("\n".to_string());
        self
    }

    pub fn indent(&mut self) {
        self.depth += 1;
    }

    pub fn dedent(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    pub fn get_line_count(&self) -> usize {
        self.fragments.len()
    }

    pub fn to_source(&self) -> String {
        self.fragments.concat()
    }
}
