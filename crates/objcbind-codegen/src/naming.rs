//! Names shared between the class emitter and every other generated component.
//!
//! These must stay stable across the whole generated output: members, the
//! assembly loader and the support header all refer to them.

/// Backing-handle field declared by hierarchy roots.
pub const BACKING_FIELD: &str = "_object";

/// Type of the backing-handle field (a runtime-managed object wrapper).
pub const BACKING_FIELD_TYPE: &str = "MonoEmbedObject";

/// Runtime routine releasing a backing handle.
pub const DESTROY_OBJECT_FN: &str = "mono_embeddinator_destroy_object";

/// Runtime routine resolving a class by metadata token.
pub const CLASS_FROM_TOKEN_FN: &str = "mono_class_get";

/// Runtime routine resolving a class by namespace and name.
pub const CLASS_FROM_NAME_FN: &str = "mono_class_from_name";

/// Type of the per-class cached handle variable.
pub const CLASS_HANDLE_TYPE: &str = "MonoClass";

/// Selector of the internal handle accessor.
pub const GC_HANDLE_ACCESSOR: &str = "xamarinGetGCHandle";

/// Selector of the super-chaining initializer.
pub const SUPER_INIT_SELECTOR: &str = "initForSuper";

/// Header shared by every generated file (toggle definition, runtime imports).
pub const SUPPORT_HEADER: &str = "objcbind-support.h";

/// Replace characters that cannot appear in a C identifier with `_`.
pub fn sanitize_identifier(raw: &str) -> String {
    let mut out: String = raw
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}

/// Routine that lazily loads an assembly, e.g. `__lookup_assembly_BankAssembly`.
pub fn assembly_lookup_fn(assembly_name: &str) -> String {
    format!("__lookup_assembly_{}", sanitize_identifier(assembly_name))
}

/// Image variable filled in by the assembly's lookup routine.
pub fn assembly_image_var(assembly_name: &str) -> String {
    format!("__{}_image", sanitize_identifier(assembly_name))
}

/// Per-class cached managed class handle, e.g. `Account_class`.
pub fn class_handle_var(class_name: &str) -> String {
    format!("{class_name}_class")
}

/// Metadata token as an 8-digit hexadecimal literal.
pub fn token_literal(token: u32) -> String {
    format!("0x{token:08X}")
}

/// Quote `value` as a C string literal.
///
/// Control characters without a short escape become three-digit octal
/// escapes of their UTF-8 bytes.
pub fn c_string_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                let mut buf = [0u8; 4];
                for byte in c.encode_utf8(&mut buf).bytes() {
                    out.push_str(&format!("\\{byte:03o}"));
                }
            }
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

/// File names for one class's generated sources.
pub fn header_file(class_name: &str) -> String {
    format!("{class_name}.h")
}

pub fn internal_header_file(class_name: &str) -> String {
    format!("{class_name}+Internal.h")
}

pub fn implementation_file(class_name: &str) -> String {
    format!("{class_name}.m")
}
