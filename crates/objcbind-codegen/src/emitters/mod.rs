pub mod class;

use objcbind_spec::BindingConfig;

use crate::traits::SourceSink;

/// Emit the definition of the resolution toggle for the whole binding.
///
/// Every class-resolution initializer tests the same symbol, so it is defined
/// once in the shared support header; a build can still override it with
/// `-D<symbol>=<0|1>`.
pub fn emit_toggle_definition(config: &BindingConfig, out: &mut dyn SourceSink) {
    let symbol = &config.toggle_symbol;
    out.write_line("/** Selects how generated classes resolve their managed counterpart");
    out.write_line(" *  1: by metadata token, 0: by namespace and type name");
    out.write_line(" */");
    out.write_line_unindented(&format!("#ifndef {symbol}"));
    out.write_line_unindented(&format!("#define {symbol} {}", config.toggle_value()));
    out.write_line_unindented("#endif");
    out.write_line("");
}
