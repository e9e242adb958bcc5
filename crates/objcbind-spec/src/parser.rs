use std::path::Path;

use crate::types::config::BindingConfig;
use crate::types::descriptor::ClassDescriptor;
use crate::types::error::{ErrorEntry, E_PARSE_ERROR};

/// Name of the optional configuration file at the root of a binding directory.
pub const CONFIG_FILE_NAME: &str = "objcbind.config.json";

/// Parse an objcbind.config.json file
#[allow(clippy::result_large_err)]
pub fn parse_config(content: &str, file_path: &str) -> Result<BindingConfig, ErrorEntry> {
    serde_json::from_str(content).map_err(|e| serde_error_to_entry(e, file_path))
}

/// Parse a *.class.json file
#[allow(clippy::result_large_err)]
pub fn parse_descriptor(content: &str, file_path: &str) -> Result<ClassDescriptor, ErrorEntry> {
    serde_json::from_str(content).map_err(|e| serde_error_to_entry(e, file_path))
}

/// Parse a descriptor that was already decoded to a JSON value
#[allow(clippy::result_large_err)]
pub fn parse_descriptor_value(
    value: serde_json::Value,
    file_path: &str,
) -> Result<ClassDescriptor, ErrorEntry> {
    serde_json::from_value(value).map_err(|e| serde_error_to_entry(e, file_path))
}

/// Detect binding file type from file name
pub fn detect_file_type(file_path: &Path) -> Option<BindingFileType> {
    let name = file_path.file_name()?.to_str()?;
    if name == CONFIG_FILE_NAME {
        Some(BindingFileType::Config)
    } else if name.ends_with(".class.json") {
        Some(BindingFileType::Class)
    } else {
        None
    }
}

/// Binding file types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingFileType {
    Config,
    Class,
}

/// Convert a serde_json error into a structured ErrorEntry
fn serde_error_to_entry(err: serde_json::Error, file_path: &str) -> ErrorEntry {
    let line = err.line();
    let col = err.column();
    let path = format!("$.line:{line}:col:{col}");

    ErrorEntry::error(
        E_PARSE_ERROR,
        format!("JSON parse error: {err}"),
        file_path,
        &path,
    )
    .with_suggestion("Check JSON syntax and field types")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::config::ResolutionStrategy;
    use crate::types::descriptor::BaseKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_valid_descriptor() {
        let json = r#"{
            "name": "Account",
            "namespace": "Bank",
            "managedName": "Account",
            "assemblyQualifiedName": "Bank.Account, BankAssembly",
            "assemblyName": "BankAssembly",
            "baseTypeName": "NSObject",
            "metadataToken": 33554437,
            "protocols": ["Printable"]
        }"#;

        let desc = parse_descriptor(json, "account.class.json").unwrap();
        assert_eq!(desc.name, "Account");
        assert_eq!(desc.metadata_token, 0x0200_0005);
        assert_eq!(desc.base_kind, BaseKind::Foreign);
        assert_eq!(desc.protocols, vec!["Printable".to_string()]);
    }

    #[test]
    fn test_parse_invalid_json() {
        let err = parse_descriptor("{ invalid json }", "bad.class.json").unwrap_err();
        assert_eq!(err.code, E_PARSE_ERROR);
        assert_eq!(err.file, "bad.class.json");
        assert!(err.message.contains("JSON parse error"));
        assert!(err.path.starts_with("$.line:1"));
    }

    #[test]
    fn test_parse_config() {
        let config = parse_config(r#"{ "resolution": "token" }"#, CONFIG_FILE_NAME).unwrap();
        assert_eq!(config.resolution, ResolutionStrategy::Token);
    }

    #[test]
    fn test_detect_file_type() {
        assert_eq!(
            detect_file_type(Path::new("bindings/objcbind.config.json")),
            Some(BindingFileType::Config)
        );
        assert_eq!(
            detect_file_type(Path::new("bindings/bank/account.class.json")),
            Some(BindingFileType::Class)
        );
        assert_eq!(detect_file_type(Path::new("README.md")), None);
    }
}
