use std::sync::OnceLock;

use indexmap::IndexSet;
use regex::Regex;

use crate::parser::CONFIG_FILE_NAME;
use crate::types::config::{BindingConfig, ResolutionStrategy};
use crate::types::descriptor::ClassDescriptor;
use crate::types::error::{
    ErrorEntry, ValidationReport, E_DUPLICATE_PROTOCOL, E_INVALID_CONFIG, E_INVALID_IDENTIFIER,
    E_INVALID_TOKEN, E_MISSING_FIELD, E_SELF_INHERITANCE,
};

/// Largest value a metadata token can take (tokens are 32-bit).
pub const MAX_METADATA_TOKEN: i64 = u32::MAX as i64;

fn identifier_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier pattern is valid"))
}

/// Whether `name` can be used verbatim as a native identifier.
pub fn is_native_identifier(name: &str) -> bool {
    identifier_re().is_match(name)
}

/// Check the binding configuration. Entries are attributed to the config file.
pub fn check_config(config: &BindingConfig) -> ValidationReport {
    let mut report = ValidationReport::success();
    if !is_native_identifier(&config.toggle_symbol) {
        report.push(
            ErrorEntry::error(
                E_INVALID_CONFIG,
                format!(
                    "Toggle symbol '{}' is not a valid preprocessor identifier",
                    config.toggle_symbol
                ),
                CONFIG_FILE_NAME,
                "$.toggleSymbol",
            )
            .with_suggestion("Use an identifier such as TOKENLOOKUP, or omit 'toggleSymbol'"),
        );
    }
    report
}

/// Check one descriptor against the emitter's input contract.
///
/// Entries are attributed to the class name; callers that know the source
/// file re-attribute them with [`ErrorEntry::in_file`].
pub fn check_descriptor(desc: &ClassDescriptor, resolution: ResolutionStrategy) -> ValidationReport {
    let mut report = ValidationReport::success();
    let file = if desc.name.is_empty() {
        "<unnamed>"
    } else {
        desc.name.as_str()
    };

    check_identifier(&desc.name, "name", "Class name", file, &mut report);
    check_identifier(
        &desc.base_type_name,
        "baseTypeName",
        "Base type name",
        file,
        &mut report,
    );

    if desc.assembly_name.is_empty() {
        report.push(
            ErrorEntry::error(
                E_MISSING_FIELD,
                "Assembly name is required",
                file,
                "$.assemblyName",
            )
            .with_suggestion("Set 'assemblyName' to the assembly that defines the class"),
        );
    }

    if !desc.synthetic {
        if desc.managed_name.is_empty() {
            report.push(
                ErrorEntry::error(
                    E_MISSING_FIELD,
                    "Managed name is required for a non-synthetic class",
                    file,
                    "$.managedName",
                )
                .with_suggestion("Set 'managedName', or mark the class as 'synthetic'"),
            );
        }
        if desc.assembly_qualified_name.is_empty() {
            report.push(
                ErrorEntry::error(
                    E_MISSING_FIELD,
                    "Assembly-qualified name is required for a non-synthetic class",
                    file,
                    "$.assemblyQualifiedName",
                )
                .with_suggestion("Set 'assemblyQualifiedName', or mark the class as 'synthetic'"),
            );
        }
    }

    if !desc.name.is_empty() && desc.name == desc.base_type_name {
        report.push(ErrorEntry::error(
            E_SELF_INHERITANCE,
            format!("Class '{}' names itself as its base type", desc.name),
            file,
            "$.baseTypeName",
        ));
    }

    let mut seen = IndexSet::new();
    for (i, protocol) in desc.protocols.iter().enumerate() {
        let path = format!("$.protocols[{i}]");
        if !is_native_identifier(protocol) {
            report.push(ErrorEntry::error(
                E_INVALID_IDENTIFIER,
                format!("Protocol name '{protocol}' is not a valid identifier"),
                file,
                &path,
            ));
        }
        if !seen.insert(protocol.as_str()) {
            report.push(
                ErrorEntry::error(
                    E_DUPLICATE_PROTOCOL,
                    format!("Protocol '{protocol}' is listed more than once"),
                    file,
                    &path,
                )
                .with_suggestion("Remove the duplicate entry"),
            );
        }
    }

    check_token(desc.metadata_token, resolution, file, &mut report);

    report
}

fn check_identifier(
    value: &str,
    field: &str,
    label: &str,
    file: &str,
    report: &mut ValidationReport,
) {
    let path = format!("$.{field}");
    if value.is_empty() {
        report.push(
            ErrorEntry::error(E_MISSING_FIELD, format!("{label} is required"), file, &path)
                .with_suggestion(format!("Add a '{field}' field")),
        );
    } else if !is_native_identifier(value) {
        report.push(ErrorEntry::error(
            E_INVALID_IDENTIFIER,
            format!("{label} '{value}' is not a valid native identifier"),
            file,
            &path,
        ));
    }
}

fn check_token(
    token: i64,
    resolution: ResolutionStrategy,
    file: &str,
    report: &mut ValidationReport,
) {
    let valid = match resolution {
        // The nil token cannot resolve anything.
        ResolutionStrategy::Token => (1..=MAX_METADATA_TOKEN).contains(&token),
        // Inactive branch, but it is still rendered as a 32-bit literal.
        ResolutionStrategy::Name => (0..=MAX_METADATA_TOKEN).contains(&token),
    };
    if !valid {
        let suggestion = match resolution {
            ResolutionStrategy::Token => {
                "Token resolution needs the class's TypeDef token (e.g. 0x02000005)"
            }
            ResolutionStrategy::Name => "Use 0 when the token is unknown",
        };
        report.push(
            ErrorEntry::error(
                E_INVALID_TOKEN,
                format!("Metadata token {token} is out of range"),
                file,
                "$.metadataToken",
            )
            .with_suggestion(suggestion),
        );
    }
}
