use std::collections::BTreeMap;
use std::path::Path;

use objcbind_spec::hierarchy::{base_first_order, check_hierarchy};
use objcbind_spec::validate::check_config;
use objcbind_spec::{BaseKind, BindingConfig, ClassDescriptor};

use crate::context::SourceWriter;
use crate::emitters::{self, class::ClassEmitter};
use crate::error::CodegenError;
use crate::naming;
use crate::traits::SourceSink;

/// A collection of generated files, keyed by relative path.
#[derive(Debug, Clone, Default)]
pub struct GeneratedSources {
    /// Files keyed by relative path (sorted for deterministic output)
    files: BTreeMap<String, String>,
}

impl GeneratedSources {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file to the generated output.
    pub fn add_file(&mut self, path: impl Into<String>, content: impl Into<String>) {
        self.files.insert(path.into(), content.into());
    }

    /// Get all generated files.
    pub fn files(&self) -> &BTreeMap<String, String> {
        &self.files
    }

    /// Number of generated files.
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Write all generated files to the given output directory.
    pub fn write_to_disk(&self, output_dir: &Path) -> Result<(), std::io::Error> {
        for (rel_path, content) in &self.files {
            let full_path = output_dir.join(rel_path);
            if let Some(parent) = full_path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&full_path, content)?;
        }
        Ok(())
    }
}

/// Runs each class through both phase sequences with no members, producing
/// compilable proxy skeletons plus the shared support header.
#[derive(Debug, Clone, Default)]
pub struct SkeletonGenerator {
    config: BindingConfig,
}

impl SkeletonGenerator {
    pub fn new(config: BindingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BindingConfig {
        &self.config
    }

    /// Generate skeletons for a set of classes that are bound together.
    pub fn generate(&self, classes: &[ClassDescriptor]) -> Result<GeneratedSources, CodegenError> {
        let report = check_config(&self.config);
        if !report.ok {
            return Err(CodegenError::InvalidConfig {
                entries: report.errors,
            });
        }

        let named: Vec<(String, ClassDescriptor)> = classes
            .iter()
            .map(|c| (c.name.clone(), c.clone()))
            .collect();
        let report = check_hierarchy(&named);
        if !report.ok {
            return Err(CodegenError::Hierarchy {
                entries: report.errors,
            });
        }

        let mut output = GeneratedSources::new();

        {
            let mut out = self.new_writer();
            out.write_line("#import <Foundation/Foundation.h>");
            out.write_line("#import \"mono_embeddinator.h\"");
            out.write_line("");
            emitters::emit_toggle_definition(&self.config, &mut out);
            output.add_file(naming::SUPPORT_HEADER, out.into_string());
        }

        for desc in base_first_order(classes) {
            self.generate_class(desc, &mut output)?;
        }

        Ok(output)
    }

    fn generate_class(
        &self,
        desc: &ClassDescriptor,
        output: &mut GeneratedSources,
    ) -> Result<(), CodegenError> {
        let mut emitter = ClassEmitter::new(desc, &self.config)?;

        let mut header = self.new_writer();
        header.write_line(&format!("#import \"{}\"", naming::SUPPORT_HEADER));
        if desc.base_kind == BaseKind::Generated {
            header.write_line(&format!("#import \"{}\"", naming::header_file(&desc.base_type_name)));
        }
        let mut internal = self.new_writer();
        internal.write_line(&format!("#import \"{}\"", naming::header_file(&desc.name)));
        internal.write_line("");

        emitter.begin_header(&mut header)?;
        if desc.is_static || !desc.has_default_constructor {
            emitter.define_no_default_init(&mut header)?;
        }
        emitter.end_header(&mut header, Some(&mut internal))?;

        let mut implementation = self.new_writer();
        implementation.write_line(&format!("#import \"{}\"", naming::header_file(&desc.name)));
        if desc.has_instances() {
            implementation.write_line(&format!(
                "#import \"{}\"",
                naming::internal_header_file(&desc.name)
            ));
        }
        implementation.write_line("");
        implementation.write_line(&format!(
            "static {}* {} = nil;",
            naming::CLASS_HANDLE_TYPE,
            naming::class_handle_var(&desc.name)
        ));

        emitter.begin_implementation(&mut implementation, None)?;
        emitter.end_implementation(&mut implementation)?;

        output.add_file(naming::header_file(&desc.name), header.into_string());
        if desc.has_instances() {
            output.add_file(naming::internal_header_file(&desc.name), internal.into_string());
        }
        output.add_file(
            naming::implementation_file(&desc.name),
            implementation.into_string(),
        );
        tracing::debug!(class = %desc.name, "generated class skeleton");
        Ok(())
    }

    fn new_writer(&self) -> SourceWriter {
        SourceWriter::new(self.config.indent)
    }
}
