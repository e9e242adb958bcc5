/// Line-oriented output stream the emitters write generated source into.
///
/// Indentation is applied at the start of each line, so a line may be built
/// from several [`write`](SourceSink::write) calls followed by one
/// [`write_line`](SourceSink::write_line).
pub trait SourceSink {
    /// Append text to the current line without ending it.
    fn write(&mut self, text: &str);

    /// Append text and end the line. An empty `text` produces an empty line.
    fn write_line(&mut self, text: &str);

    /// Write a whole line at column zero regardless of the indent level
    /// (preprocessor directives).
    fn write_line_unindented(&mut self, text: &str);

    /// Increase indentation by one level.
    fn indent(&mut self);

    /// Decrease indentation by one level.
    fn dedent(&mut self);

    /// Current indent level.
    fn indent_level(&self) -> usize;
}
