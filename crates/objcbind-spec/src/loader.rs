use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::hierarchy;
use crate::parser::{self, BindingFileType, CONFIG_FILE_NAME};
use crate::schema_def;
use crate::types::config::BindingConfig;
use crate::types::descriptor::ClassDescriptor;
use crate::types::error::{ErrorEntry, ValidationReport, E_PARSE_ERROR, W_NESTED_CONFIG};
use crate::validate;

/// A loaded binding directory: configuration plus every class descriptor
#[derive(Debug, Clone)]
pub struct LoadedBindings {
    /// Root directory (or the single descriptor file's parent)
    pub root: PathBuf,
    /// Parsed config, or the defaults when no config file exists
    pub config: BindingConfig,
    /// All parsed descriptors with their relative file paths
    pub classes: Vec<(String, ClassDescriptor)>,
}

impl LoadedBindings {
    /// Descriptors without their file paths, in load order.
    pub fn descriptors(&self) -> Vec<ClassDescriptor> {
        self.classes.iter().map(|(_, desc)| desc.clone()).collect()
    }
}

/// Load and parse every `*.class.json` below `dir`.
/// Accumulates errors instead of failing on the first one.
#[allow(clippy::result_large_err)]
pub fn load_bindings(dir: &Path) -> Result<(LoadedBindings, ValidationReport), LoadError> {
    let mut report = ValidationReport::success();

    if !dir.is_dir() {
        return Err(LoadError::DirectoryNotFound(
            dir.to_string_lossy().into_owned(),
        ));
    }

    let config = load_config(&dir.join(CONFIG_FILE_NAME))?;
    let schema = schema_def::generate_descriptor_schema();
    let mut classes = Vec::new();

    // Sorted walk so that load order (and thus output order) is stable
    for entry in WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        let path = entry.path();
        let rel_path = path
            .strip_prefix(dir)
            .unwrap_or(path)
            .to_string_lossy()
            .into_owned();

        match parser::detect_file_type(path) {
            Some(BindingFileType::Class) => {}
            // Only the root config is honoured
            Some(BindingFileType::Config) if rel_path != CONFIG_FILE_NAME => {
                tracing::warn!(file = %rel_path, "ignoring nested config file");
                report.push(
                    ErrorEntry::warning(
                        W_NESTED_CONFIG,
                        "Nested config file is ignored; only the root config applies",
                        &rel_path,
                        "$",
                    )
                    .with_suggestion(format!("Move the settings into the root {CONFIG_FILE_NAME}")),
                );
                continue;
            }
            _ => continue,
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                report.push(ErrorEntry::error(
                    E_PARSE_ERROR,
                    format!("Failed to read file: {e}"),
                    &rel_path,
                    "$",
                ));
                continue;
            }
        };

        if let Some(desc) = read_descriptor(&content, &rel_path, &schema, &mut report) {
            tracing::debug!(file = %rel_path, class = %desc.name, "loaded class descriptor");
            classes.push((rel_path, desc));
        }
    }

    let bindings = LoadedBindings {
        root: dir.to_path_buf(),
        config,
        classes,
    };

    Ok((bindings, report))
}

/// Load a single descriptor file, with the config from its directory if present.
#[allow(clippy::result_large_err)]
pub fn load_descriptor_file(path: &Path) -> Result<(LoadedBindings, ValidationReport), LoadError> {
    let mut report = ValidationReport::success();

    if !path.is_file() {
        return Err(LoadError::FileNotFound(path.to_string_lossy().into_owned()));
    }

    let root = path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();
    let config = load_config(&root.join(CONFIG_FILE_NAME))?;

    let file = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let content = std::fs::read_to_string(path)
        .map_err(|e| LoadError::IoError(path.to_string_lossy().into_owned(), e))?;

    let schema = schema_def::generate_descriptor_schema();
    let classes = read_descriptor(&content, &file, &schema, &mut report)
        .map(|desc| vec![(file, desc)])
        .unwrap_or_default();

    Ok((LoadedBindings { root, config, classes }, report))
}

/// Run config, descriptor contract and hierarchy checks over loaded bindings.
pub fn validate_bindings(bindings: &LoadedBindings) -> ValidationReport {
    let mut report = validate::check_config(&bindings.config);
    for (file, desc) in &bindings.classes {
        let class_report = validate::check_descriptor(desc, bindings.config.resolution);
        for entry in class_report.errors {
            report.push(entry.in_file(file));
        }
    }
    report.merge(hierarchy::check_hierarchy(&bindings.classes));
    report
}

fn load_config(config_path: &Path) -> Result<BindingConfig, LoadError> {
    if !config_path.exists() {
        return Ok(BindingConfig::default());
    }
    let content = std::fs::read_to_string(config_path)
        .map_err(|e| LoadError::IoError(config_path.to_string_lossy().into_owned(), e))?;
    parser::parse_config(&content, CONFIG_FILE_NAME).map_err(LoadError::ConfigParseError)
}

/// Schema-check then parse one descriptor, recording problems in `report`.
fn read_descriptor(
    content: &str,
    file: &str,
    schema: &serde_json::Value,
    report: &mut ValidationReport,
) -> Option<ClassDescriptor> {
    let value: serde_json::Value = match serde_json::from_str(content) {
        Ok(v) => v,
        Err(_) => {
            // Re-parse through the typed path for a located error entry
            if let Err(entry) = parser::parse_descriptor(content, file) {
                report.push(entry);
            }
            return None;
        }
    };

    let violations = schema_def::validate_against_schema(&value, schema, file);
    if !violations.is_empty() {
        for entry in violations {
            report.push(entry);
        }
        return None;
    }

    match parser::parse_descriptor_value(value, file) {
        Ok(desc) => Some(desc),
        Err(entry) => {
            report.push(entry);
            None
        }
    }
}

/// Errors that prevent loading entirely
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Binding directory not found: {0}")]
    DirectoryNotFound(String),

    #[error("Descriptor file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse objcbind.config.json: {0:?}")]
    ConfigParseError(ErrorEntry),

    #[error("I/O error reading {0}: {1}")]
    IoError(String, std::io::Error),
}
