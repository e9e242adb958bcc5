use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// ── Error code constants ──

pub const E_MISSING_FIELD: &str = "E_MISSING_FIELD";
pub const E_INVALID_IDENTIFIER: &str = "E_INVALID_IDENTIFIER";
pub const E_INVALID_TOKEN: &str = "E_INVALID_TOKEN";
pub const E_DUPLICATE_PROTOCOL: &str = "E_DUPLICATE_PROTOCOL";
pub const E_SELF_INHERITANCE: &str = "E_SELF_INHERITANCE";
pub const E_DUPLICATE_CLASS: &str = "E_DUPLICATE_CLASS";
pub const E_BASE_NOT_GENERATED: &str = "E_BASE_NOT_GENERATED";
pub const E_BASE_MISREPORTED: &str = "E_BASE_MISREPORTED";
pub const E_BASE_STATIC: &str = "E_BASE_STATIC";
pub const E_HIERARCHY_CYCLE: &str = "E_HIERARCHY_CYCLE";
pub const E_PARSE_ERROR: &str = "E_PARSE_ERROR";
pub const E_SCHEMA_VIOLATION: &str = "E_SCHEMA_VIOLATION";
pub const E_INVALID_CONFIG: &str = "E_INVALID_CONFIG";

pub const W_NESTED_CONFIG: &str = "W_NESTED_CONFIG";

/// Severity of a diagnostic entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// A single validation/parsing error entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEntry {
    /// Machine-readable stable error code
    pub code: String,
    /// Severity level
    pub severity: Severity,
    /// Human-readable error message
    pub message: String,
    /// Descriptor file (or class name when no file is known)
    pub file: String,
    /// JSONPath to the offending field
    pub path: String,
    /// Suggestion for fixing the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

/// Aggregated validation report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Whether the input is valid (no errors, warnings are ok)
    pub ok: bool,
    /// All collected errors and warnings
    pub errors: Vec<ErrorEntry>,
}

impl ValidationReport {
    /// Create a successful (empty) report
    pub fn success() -> Self {
        Self {
            ok: true,
            errors: Vec::new(),
        }
    }

    /// Create a report from a list of error entries
    pub fn from_errors(errors: Vec<ErrorEntry>) -> Self {
        let ok = !errors.iter().any(|e| e.severity == Severity::Error);
        Self { ok, errors }
    }

    /// Add an error entry and update the ok flag
    pub fn push(&mut self, entry: ErrorEntry) {
        if entry.severity == Severity::Error {
            self.ok = false;
        }
        self.errors.push(entry);
    }

    /// Merge another report into this one
    pub fn merge(&mut self, other: ValidationReport) {
        for entry in other.errors {
            self.push(entry);
        }
    }

    /// Count entries of a specific severity
    pub fn count(&self, severity: Severity) -> usize {
        self.errors.iter().filter(|e| e.severity == severity).count()
    }

    /// Check if any errors exist (not warnings)
    pub fn has_errors(&self) -> bool {
        !self.ok
    }
}

impl ErrorEntry {
    /// Create a new error entry
    pub fn error(code: &str, message: impl Into<String>, file: &str, path: &str) -> Self {
        Self {
            code: code.to_string(),
            severity: Severity::Error,
            message: message.into(),
            file: file.to_string(),
            path: path.to_string(),
            suggestion: None,
        }
    }

    /// Create a warning entry
    pub fn warning(code: &str, message: impl Into<String>, file: &str, path: &str) -> Self {
        Self {
            code: code.to_string(),
            severity: Severity::Warning,
            message: message.into(),
            file: file.to_string(),
            path: path.to_string(),
            suggestion: None,
        }
    }

    /// Add a suggestion to this entry
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Re-attribute the entry to a file (entries built without one carry the class name).
    pub fn in_file(mut self, file: &str) -> Self {
        self.file = file.to_string();
        self
    }
}
