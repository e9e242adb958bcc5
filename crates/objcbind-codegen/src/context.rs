use objcbind_spec::IndentStyle;

use crate::traits::SourceSink;

/// In-memory [`SourceSink`]: tracks indentation and buffers the emitted text.
#[derive(Debug, Clone)]
pub struct SourceWriter {
    /// Emitted text so far
    buffer: String,
    /// Current indentation level
    indent_level: usize,
    /// Characters per indent (e.g., 2 spaces)
    indent_width: usize,
    /// Whether to use tabs
    use_tabs: bool,
    /// Whether the next write starts a fresh line
    at_line_start: bool,
}

impl SourceWriter {
    pub fn new(style: IndentStyle) -> Self {
        let (use_tabs, indent_width) = match style {
            IndentStyle::Spaces(n) => (false, n),
            IndentStyle::Tabs => (true, 1),
        };
        Self {
            buffer: String::new(),
            indent_level: 0,
            indent_width,
            use_tabs,
            at_line_start: true,
        }
    }

    /// Get the current indentation string.
    pub fn indent_str(&self) -> String {
        let unit = if self.use_tabs { "\t" } else { " " };
        unit.repeat(self.indent_level * self.indent_width)
    }

    /// Emitted text so far.
    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    pub fn into_string(self) -> String {
        self.buffer
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    fn start_line(&mut self) {
        if self.at_line_start {
            let indent = self.indent_str();
            self.buffer.push_str(&indent);
            self.at_line_start = false;
        }
    }
}

impl Default for SourceWriter {
    fn default() -> Self {
        Self::new(IndentStyle::default())
    }
}

impl SourceSink for SourceWriter {
    fn write(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        self.start_line();
        self.buffer.push_str(text);
    }

    fn write_line(&mut self, text: &str) {
        // Blank lines carry no trailing indentation
        self.write(text);
        self.buffer.push('\n');
        self.at_line_start = true;
    }

    fn write_line_unindented(&mut self, text: &str) {
        if !self.at_line_start {
            self.buffer.push('\n');
        }
        self.buffer.push_str(text);
        self.buffer.push('\n');
        self.at_line_start = true;
    }

    fn indent(&mut self) {
        self.indent_level += 1;
    }

    fn dedent(&mut self) {
        self.indent_level = self.indent_level.saturating_sub(1);
    }

    fn indent_level(&self) -> usize {
        self.indent_level
    }
}
