use objcbind_spec::types::error::{ErrorEntry, E_INVALID_IDENTIFIER, E_INVALID_TOKEN};
use objcbind_spec::validate::{check_config, check_descriptor, is_native_identifier};
use objcbind_spec::{BindingConfig, ClassDescriptor};

use crate::error::CodegenError;
use crate::naming;
use crate::phase::{EmitPhase, Operation};
use crate::traits::SourceSink;

/// Emits the declaration and definition of the native proxy for one managed class.
///
/// Driven as `begin_header → [define_no_default_init]* → end_header →
/// begin_implementation → end_implementation`; the driver writes member
/// declarations and definitions into the same streams between the calls.
/// Calls out of that order fail with [`CodegenError::PhaseOrder`] and write
/// nothing.
///
/// Ownership of the backing handle follows [`ClassDescriptor::owns_backing_handle`]:
/// only a non-static class whose base is not generated declares `_object`,
/// and only that class releases it in `dealloc`.
#[derive(Debug)]
pub struct ClassEmitter<'a> {
    desc: &'a ClassDescriptor,
    config: &'a BindingConfig,
    token: u32,
    phase: EmitPhase,
}

impl<'a> ClassEmitter<'a> {
    /// Check `desc` and `config` against the emitter contract and prepare to emit it.
    pub fn new(desc: &'a ClassDescriptor, config: &'a BindingConfig) -> Result<Self, CodegenError> {
        let mut report = check_config(config);
        report.merge(check_descriptor(desc, config.resolution));
        if !report.ok {
            return Err(CodegenError::ContractViolation {
                class: desc.name.clone(),
                entries: report.errors,
            });
        }
        let token = u32::try_from(desc.metadata_token).map_err(|_| {
            CodegenError::ContractViolation {
                class: desc.name.clone(),
                entries: vec![ErrorEntry::error(
                    E_INVALID_TOKEN,
                    format!("Metadata token {} is out of range", desc.metadata_token),
                    &desc.name,
                    "$.metadataToken",
                )],
            }
        })?;

        Ok(Self {
            desc,
            config,
            token,
            phase: EmitPhase::NotStarted,
        })
    }

    pub fn descriptor(&self) -> &ClassDescriptor {
        self.desc
    }

    pub fn phase(&self) -> EmitPhase {
        self.phase
    }

    fn transition(&mut self, op: Operation) -> Result<(), CodegenError> {
        let next = self.phase.advance(op).ok_or_else(|| CodegenError::PhaseOrder {
            class: self.desc.name.clone(),
            operation: op,
            phase: self.phase,
        })?;
        tracing::debug!(class = %self.desc.name, from = %self.phase, to = %next, %op, "emit phase");
        self.phase = next;
        Ok(())
    }

    // ─── Header ──────────────────────────────────────────────

    /// Documentation, `@interface` line and the instance-variable block.
    pub fn begin_header(&mut self, out: &mut dyn SourceSink) -> Result<(), CodegenError> {
        self.transition(Operation::BeginHeader)?;
        let desc = self.desc;

        out.write_line("");
        out.write_line(&format!("/** Class {}", desc.name));
        if !desc.assembly_qualified_name.is_empty() {
            out.write_line(&format!(
                " *  Corresponding .NET Qualified Name: `{}`",
                desc.assembly_qualified_name
            ));
        }
        out.write_line(" */");
        out.write(&format!("@interface {} : {}", desc.name, desc.base_type_name));
        if !desc.protocols.is_empty() {
            out.write(&format!(" <{}>", desc.protocols.join(", ")));
        }
        out.write_line(" {");
        if desc.owns_backing_handle() {
            out.indent();
            out.write_line("// This field is not meant to be accessed from user code");
            out.write_line(&format!(
                "@public {}* {};",
                naming::BACKING_FIELD_TYPE,
                naming::BACKING_FIELD
            ));
            out.dedent();
        }
        out.write_line("}");
        out.write_line("");
        Ok(())
    }

    /// Declare `-init` and `+new` unavailable.
    pub fn define_no_default_init(&mut self, out: &mut dyn SourceSink) -> Result<(), CodegenError> {
        self.transition(Operation::DefineNoDefaultInit)?;

        if self.desc.is_static {
            out.write_line("/** This is a static type and no instance can be initialized");
        } else {
            out.write_line("/** This type is not meant to be created using only default values");
        }
        out.write_line(" *  Both the `-init` and `+new` selectors cannot be used to create instances of this type.");
        out.write_line(" */");
        out.write_line("- (nullable instancetype)init NS_UNAVAILABLE;");
        out.write_line("+ (nullable instancetype)new NS_UNAVAILABLE;");
        out.write_line("");
        Ok(())
    }

    /// Super-chaining initializer declaration and `@end`.
    ///
    /// When `internal` is given, a class extension declaring the handle
    /// accessor is written there for other generated components to import.
    pub fn end_header(
        &mut self,
        out: &mut dyn SourceSink,
        internal: Option<&mut dyn SourceSink>,
    ) -> Result<(), CodegenError> {
        self.transition(Operation::EndHeader)?;

        if self.desc.has_instances() {
            out.write_line("/** This selector is not meant to be called from user code");
            out.write_line(" *  It exists solely to allow the correct subclassing of managed (.net) types");
            out.write_line(" */");
            out.write_line(&format!("- (nullable instancetype){};", naming::SUPER_INIT_SELECTOR));
            out.write_line("");
        }
        out.write_line("@end");
        out.write_line("");

        if let Some(internal) = internal {
            if self.desc.has_instances() {
                self.write_internal_declarations(internal);
            }
        }
        Ok(())
    }

    fn write_internal_declarations(&self, out: &mut dyn SourceSink) {
        out.write_line(&format!("/** Internal declarations of {}, for generated code only", self.desc.name));
        out.write_line(" */");
        out.write_line(&format!("@interface {} ()", self.desc.name));
        out.write_line(&format!("- (GCHandle){};", naming::GC_HANDLE_ACCESSOR));
        out.write_line("@end");
        out.write_line("");
    }

    // ─── Implementation ──────────────────────────────────────

    /// `@implementation` line, class-resolution initializer and teardown.
    ///
    /// `implementation_name` overrides the class name in the `@implementation`
    /// line and the initializer guard (generic instantiations sharing one
    /// template); the cached class handle keeps the descriptor's name.
    pub fn begin_implementation(
        &mut self,
        out: &mut dyn SourceSink,
        implementation_name: Option<&str>,
    ) -> Result<(), CodegenError> {
        if let Some(name) = implementation_name {
            if !is_native_identifier(name) {
                return Err(CodegenError::ContractViolation {
                    class: self.desc.name.clone(),
                    entries: vec![ErrorEntry::error(
                        E_INVALID_IDENTIFIER,
                        format!("Implementation name '{name}' is not a valid native identifier"),
                        &self.desc.name,
                        "$",
                    )],
                });
            }
        }
        self.transition(Operation::BeginImplementation)?;

        let name = implementation_name.unwrap_or(&self.desc.name);
        out.write_line("");
        out.write_line(&format!("@implementation {name} {{"));
        out.write_line("}");
        out.write_line("");
        self.write_initialize(out, name);
        self.write_dealloc(out);
        Ok(())
    }

    /// Runs once per class: the guard keeps a subclass's `+initialize` from
    /// re-resolving its base, and both resolution paths are always present.
    fn write_initialize(&self, out: &mut dyn SourceSink, name: &str) {
        let desc = self.desc;
        let class_var = naming::class_handle_var(&desc.name);
        let image = naming::assembly_image_var(&desc.assembly_name);

        out.write_line("+ (void) initialize");
        out.write_line("{");
        out.indent();
        out.write_line(&format!("if (self != [{name} class])"));
        out.indent();
        out.write_line("return;");
        out.dedent();
        out.write_line(&format!("{} ();", naming::assembly_lookup_fn(&desc.assembly_name)));

        out.write_line_unindented(&format!("#if {}", self.config.toggle_symbol));
        out.write_line(&format!(
            "{class_var} = {} ({image}, {});",
            naming::CLASS_FROM_TOKEN_FN,
            naming::token_literal(self.token)
        ));
        out.write_line_unindented("#else");
        out.write_line(&format!(
            "{class_var} = {} ({image}, {}, {});",
            naming::CLASS_FROM_NAME_FN,
            naming::c_string_literal(&desc.namespace),
            naming::c_string_literal(&desc.managed_name)
        ));
        out.write_line_unindented("#endif");
        out.dedent();
        out.write_line("}");
        out.write_line("");
    }

    fn write_dealloc(&self, out: &mut dyn SourceSink) {
        // Subclasses inherit the handle; only its owner destroys it.
        if !self.desc.owns_backing_handle() {
            return;
        }
        out.write_line("-(void) dealloc");
        out.write_line("{");
        out.indent();
        out.write_line(&format!("if ({})", naming::BACKING_FIELD));
        out.indent();
        out.write_line(&format!(
            "{} ({});",
            naming::DESTROY_OBJECT_FN,
            naming::BACKING_FIELD
        ));
        out.dedent();
        out.dedent();
        out.write_line("}");
        out.write_line("");
    }

    /// Handle accessor, super-chaining initializer and `@end`.
    pub fn end_implementation(&mut self, out: &mut dyn SourceSink) -> Result<(), CodegenError> {
        self.transition(Operation::EndImplementation)?;

        if self.desc.has_instances() {
            self.write_gc_handle_accessor(out);
            self.write_init_for_super(out);
        }
        out.write_line("@end");
        out.write_line("");
        Ok(())
    }

    fn write_gc_handle_accessor(&self, out: &mut dyn SourceSink) {
        out.write_line("// for internal use by generated bindings only");
        out.write_line(&format!("- (GCHandle){}", naming::GC_HANDLE_ACCESSOR));
        out.write_line("{");
        out.indent();
        out.write_line(&format!("return {}->_handle;", naming::BACKING_FIELD));
        out.dedent();
        out.write_line("}");
        out.write_line("");
    }

    fn write_init_for_super(&self, out: &mut dyn SourceSink) {
        out.write_line("// for internal use by generated bindings only");
        out.write_line(&format!("- (nullable instancetype) {} {{", naming::SUPER_INIT_SELECTOR));
        out.indent();
        // The chain walks up generated ancestors until it reaches the root,
        // whose foreign base only has a plain -init.
        if self.desc.base_is_generated() {
            out.write_line(&format!("return self = [super {}];", naming::SUPER_INIT_SELECTOR));
        } else {
            out.write_line("return self = [super init];");
        }
        out.dedent();
        out.write_line("}");
        out.write_line("");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::SourceWriter;
    use objcbind_spec::types::error::{E_INVALID_CONFIG, E_MISSING_FIELD};
    use objcbind_spec::{BaseKind, ResolutionStrategy};
    use pretty_assertions::assert_eq;

    fn account() -> ClassDescriptor {
        ClassDescriptor::new("Account", "BankAssembly", "NativeBase")
            .with_managed("Bank", "Account", "Bank.Account, BankAssembly")
            .with_token(0x0200_0005)
            .with_protocols(["Printable"])
    }

    fn savings() -> ClassDescriptor {
        ClassDescriptor::new("Savings", "BankAssembly", "Account")
            .with_managed("Bank", "Savings", "Bank.Savings, BankAssembly")
            .with_base_kind(BaseKind::Generated)
            .with_token(0x0200_0006)
    }

    fn header(desc: &ClassDescriptor) -> String {
        let config = BindingConfig::default();
        let mut emitter = ClassEmitter::new(desc, &config).unwrap();
        let mut out = SourceWriter::default();
        emitter.begin_header(&mut out).unwrap();
        emitter.end_header(&mut out, None).unwrap();
        out.into_string()
    }

    fn implementation(desc: &ClassDescriptor) -> String {
        let config = BindingConfig::default();
        let mut emitter = ClassEmitter::new(desc, &config).unwrap();
        let mut sink = SourceWriter::default();
        emitter.begin_header(&mut sink).unwrap();
        emitter.end_header(&mut sink, None).unwrap();
        let mut out = SourceWriter::default();
        emitter.begin_implementation(&mut out, None).unwrap();
        emitter.end_implementation(&mut out).unwrap();
        out.into_string()
    }

    #[test]
    fn test_root_class_header() {
        assert_eq!(
            header(&account()),
            "\n\
             /** Class Account\n \
             *  Corresponding .NET Qualified Name: `Bank.Account, BankAssembly`\n \
             */\n\
             @interface Account : NativeBase <Printable> {\n\
             \t// This field is not meant to be accessed from user code\n\
             \t@public MonoEmbedObject* _object;\n\
             }\n\
             \n\
             /** This selector is not meant to be called from user code\n \
             *  It exists solely to allow the correct subclassing of managed (.net) types\n \
             */\n\
             - (nullable instancetype)initForSuper;\n\
             \n\
             @end\n\
             \n"
        );
    }

    #[test]
    fn test_root_class_implementation() {
        assert_eq!(
            implementation(&account()),
            "\n\
             @implementation Account {\n\
             }\n\
             \n\
             + (void) initialize\n\
             {\n\
             \tif (self != [Account class])\n\
             \t\treturn;\n\
             \t__lookup_assembly_BankAssembly ();\n\
             #if TOKENLOOKUP\n\
             \tAccount_class = mono_class_get (__BankAssembly_image, 0x02000005);\n\
             #else\n\
             \tAccount_class = mono_class_from_name (__BankAssembly_image, \"Bank\", \"Account\");\n\
             #endif\n\
             }\n\
             \n\
             -(void) dealloc\n\
             {\n\
             \tif (_object)\n\
             \t\tmono_embeddinator_destroy_object (_object);\n\
             }\n\
             \n\
             // for internal use by generated bindings only\n\
             - (GCHandle)xamarinGetGCHandle\n\
             {\n\
             \treturn _object->_handle;\n\
             }\n\
             \n\
             // for internal use by generated bindings only\n\
             - (nullable instancetype) initForSuper {\n\
             \treturn self = [super init];\n\
             }\n\
             \n\
             @end\n\
             \n"
        );
    }

    #[test]
    fn test_generated_subclass_inherits_handle() {
        let h = header(&savings());
        assert!(h.contains("@interface Savings : Account {\n}\n"));
        assert!(!h.contains("_object"));
        assert!(h.contains("- (nullable instancetype)initForSuper;"));

        let m = implementation(&savings());
        assert!(!m.contains("dealloc"));
        assert!(!m.contains("mono_embeddinator_destroy_object"));
        assert!(m.contains("- (GCHandle)xamarinGetGCHandle"));
        assert!(m.contains("\treturn self = [super initForSuper];\n"));
        assert!(!m.contains("[super init]"));
    }

    #[test]
    fn test_static_class_has_no_instance_machinery() {
        for kind in [BaseKind::Foreign, BaseKind::Generated] {
            let desc = ClassDescriptor::new("MathUtil", "BankAssembly", "NSObject")
                .with_managed("Bank", "MathUtil", "Bank.MathUtil, BankAssembly")
                .with_base_kind(kind)
                .with_static(true)
                .with_token(0x0200_0009);
            let h = header(&desc);
            let m = implementation(&desc);
            for text in [&h, &m] {
                assert!(!text.contains("_object"));
                assert!(!text.contains("initForSuper"));
                assert!(!text.contains("xamarinGetGCHandle"));
                assert!(!text.contains("dealloc"));
            }
            assert!(h.contains("@interface MathUtil : NSObject {\n}\n\n@end\n"));
            assert!(m.contains("+ (void) initialize"));
        }
    }

    #[test]
    fn test_protocol_list_rendering() {
        let none = header(&account().with_protocols(Vec::<String>::new()));
        assert!(none.contains("@interface Account : NativeBase {\n"));
        assert!(!none.contains('<'));

        let many = header(&account().with_protocols(["Printable", "Comparable", "Hashable"]));
        assert!(many.contains("@interface Account : NativeBase <Printable, Comparable, Hashable> {\n"));
    }

    #[test]
    fn test_no_default_init_wording() {
        let config = BindingConfig::default();

        let desc = account();
        let mut emitter = ClassEmitter::new(&desc, &config).unwrap();
        let mut out = SourceWriter::default();
        emitter.begin_header(&mut out).unwrap();
        let start = out.as_str().len();
        emitter.define_no_default_init(&mut out).unwrap();
        assert_eq!(
            &out.as_str()[start..],
            "/** This type is not meant to be created using only default values\n \
             *  Both the `-init` and `+new` selectors cannot be used to create instances of this type.\n \
             */\n\
             - (nullable instancetype)init NS_UNAVAILABLE;\n\
             + (nullable instancetype)new NS_UNAVAILABLE;\n\
             \n"
        );

        let desc = account().with_static(true);
        let mut emitter = ClassEmitter::new(&desc, &config).unwrap();
        let mut out = SourceWriter::default();
        emitter.begin_header(&mut out).unwrap();
        emitter.define_no_default_init(&mut out).unwrap();
        assert!(out
            .as_str()
            .contains("/** This is a static type and no instance can be initialized\n"));
    }

    #[test]
    fn test_implementation_name_override() {
        let config = BindingConfig::default();
        let desc = account();
        let mut emitter = ClassEmitter::new(&desc, &config).unwrap();
        let mut sink = SourceWriter::default();
        emitter.begin_header(&mut sink).unwrap();
        emitter.end_header(&mut sink, None).unwrap();

        let mut out = SourceWriter::default();
        emitter
            .begin_implementation(&mut out, Some("Account_Int32"))
            .unwrap();
        let text = out.as_str();
        assert!(text.contains("@implementation Account_Int32 {\n"));
        assert!(text.contains("if (self != [Account_Int32 class])"));
        assert!(text.contains("\tAccount_class = mono_class_get"));
    }

    #[test]
    fn test_invalid_implementation_name_writes_nothing() {
        let config = BindingConfig::default();
        let desc = account();
        let mut emitter = ClassEmitter::new(&desc, &config).unwrap();
        let mut sink = SourceWriter::default();
        emitter.begin_header(&mut sink).unwrap();
        emitter.end_header(&mut sink, None).unwrap();

        let mut out = SourceWriter::default();
        let err = emitter
            .begin_implementation(&mut out, Some("Account<int>"))
            .unwrap_err();
        assert!(matches!(err, CodegenError::ContractViolation { .. }));
        assert!(out.is_empty());
        assert_eq!(emitter.phase(), EmitPhase::HeaderDone);
    }

    #[test]
    fn test_internal_declarations() {
        let config = BindingConfig::default();
        let desc = savings();
        let mut emitter = ClassEmitter::new(&desc, &config).unwrap();
        let mut out = SourceWriter::default();
        let mut internal = SourceWriter::default();
        emitter.begin_header(&mut out).unwrap();
        emitter.end_header(&mut out, Some(&mut internal)).unwrap();
        assert_eq!(
            internal.as_str(),
            "/** Internal declarations of Savings, for generated code only\n \
             */\n\
             @interface Savings ()\n\
             - (GCHandle)xamarinGetGCHandle;\n\
             @end\n\
             \n"
        );

        let desc = savings().with_static(true);
        let mut emitter = ClassEmitter::new(&desc, &config).unwrap();
        let mut internal = SourceWriter::default();
        emitter.begin_header(&mut out).unwrap();
        emitter.end_header(&mut out, Some(&mut internal)).unwrap();
        assert!(internal.is_empty());
    }

    #[test]
    fn test_out_of_order_calls_fail_without_output() {
        let config = BindingConfig::default();
        let desc = account();
        let mut emitter = ClassEmitter::new(&desc, &config).unwrap();
        let mut out = SourceWriter::default();

        let err = emitter.end_header(&mut out, None).unwrap_err();
        assert!(matches!(
            err,
            CodegenError::PhaseOrder {
                operation: Operation::EndHeader,
                phase: EmitPhase::NotStarted,
                ..
            }
        ));
        assert!(emitter.begin_implementation(&mut out, None).is_err());
        assert!(emitter.end_implementation(&mut out).is_err());
        assert!(out.is_empty());

        emitter.begin_header(&mut out).unwrap();
        assert!(emitter.begin_header(&mut out).is_err());
        emitter.end_header(&mut out, None).unwrap();
        assert!(emitter.define_no_default_init(&mut out).is_err());
        emitter.begin_implementation(&mut out, None).unwrap();
        emitter.end_implementation(&mut out).unwrap();
        assert!(emitter.phase().is_done());
        assert!(emitter.end_implementation(&mut out).is_err());
    }

    #[test]
    fn test_contract_violation_fails_construction() {
        let config = BindingConfig::default();
        let mut desc = account();
        desc.name.clear();
        let err = ClassEmitter::new(&desc, &config).unwrap_err();
        match err {
            CodegenError::ContractViolation { entries, .. } => {
                assert_eq!(entries[0].code, E_MISSING_FIELD);
            }
            e => panic!("Expected ContractViolation, got: {:?}", e),
        }

        let token_config = BindingConfig::new(ResolutionStrategy::Token);
        let desc = account().with_token(-5);
        assert!(ClassEmitter::new(&desc, &token_config).is_err());
    }

    #[test]
    fn test_blank_toggle_symbol_fails_construction() {
        let mut config = BindingConfig::default();
        config.toggle_symbol.clear();
        let desc = account();
        match ClassEmitter::new(&desc, &config).unwrap_err() {
            CodegenError::ContractViolation { class, entries } => {
                assert_eq!(class, "Account");
                assert_eq!(entries.len(), 1);
                assert_eq!(entries[0].code, E_INVALID_CONFIG);
            }
            e => panic!("Expected ContractViolation, got: {:?}", e),
        }
    }

    #[test]
    fn test_both_resolution_paths_under_either_strategy() {
        for strategy in [ResolutionStrategy::Token, ResolutionStrategy::Name] {
            let config = BindingConfig::new(strategy);
            let desc = account();
            let mut emitter = ClassEmitter::new(&desc, &config).unwrap();
            let mut out = SourceWriter::default();
            emitter.begin_header(&mut out).unwrap();
            emitter.end_header(&mut out, None).unwrap();
            let mut m = SourceWriter::default();
            emitter.begin_implementation(&mut m, None).unwrap();
            let text = m.as_str();
            let if_pos = text.find("#if TOKENLOOKUP\n").unwrap();
            let token_pos = text.find("mono_class_get (").unwrap();
            let else_pos = text.find("#else\n").unwrap();
            let name_pos = text.find("mono_class_from_name (").unwrap();
            let endif_pos = text.find("#endif\n").unwrap();
            assert!(if_pos < token_pos && token_pos < else_pos);
            assert!(else_pos < name_pos && name_pos < endif_pos);
        }
    }

    #[test]
    fn test_spaces_indentation() {
        let mut config = BindingConfig::default();
        config.indent = objcbind_spec::IndentStyle::Spaces(4);
        let desc = account();
        let mut emitter = ClassEmitter::new(&desc, &config).unwrap();
        let mut out = SourceWriter::new(config.indent);
        emitter.begin_header(&mut out).unwrap();
        assert!(out.as_str().contains("\n    @public MonoEmbedObject* _object;\n"));
    }
}
