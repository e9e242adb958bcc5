use indexmap::{IndexMap, IndexSet};

use crate::types::descriptor::{BaseKind, ClassDescriptor};
use crate::types::error::{
    ErrorEntry, ValidationReport, E_BASE_MISREPORTED, E_BASE_NOT_GENERATED, E_BASE_STATIC,
    E_DUPLICATE_CLASS, E_HIERARCHY_CYCLE,
};

/// Check that the `baseKind` of every class agrees with the set of classes
/// being generated together.
///
/// `classes` pairs each descriptor with the file it was loaded from.
/// A single descriptor cannot tell whether its base really is generated;
/// this is where a root misreported as `generated` (or the reverse) is caught.
pub fn check_hierarchy(classes: &[(String, ClassDescriptor)]) -> ValidationReport {
    let mut report = ValidationReport::success();

    let mut index: IndexMap<&str, (&str, &ClassDescriptor)> = IndexMap::new();
    for (file, desc) in classes {
        if let Some((first_file, _)) = index.get(desc.name.as_str()) {
            report.push(
                ErrorEntry::error(
                    E_DUPLICATE_CLASS,
                    format!(
                        "Class '{}' is already defined in '{}'",
                        desc.name, first_file
                    ),
                    file,
                    "$.name",
                )
                .with_suggestion("Native class names must be unique across the binding"),
            );
            continue;
        }
        index.insert(desc.name.as_str(), (file.as_str(), desc));
    }

    for (file, desc) in index.values() {
        let base = index.get(desc.base_type_name.as_str()).map(|(_, b)| *b);
        match (desc.base_kind, base) {
            (BaseKind::Generated, None) => {
                report.push(
                    ErrorEntry::error(
                        E_BASE_NOT_GENERATED,
                        format!(
                            "Class '{}' declares a generated base '{}', but no such class is generated",
                            desc.name, desc.base_type_name
                        ),
                        file,
                        "$.baseKind",
                    )
                    .with_suggestion("Set 'baseKind' to \"foreign\" or add the base class descriptor"),
                );
            }
            // A static base never declares the backing handle, so nothing
            // in the chain would own it.
            (BaseKind::Generated, Some(base)) if base.is_static => {
                report.push(
                    ErrorEntry::error(
                        E_BASE_STATIC,
                        format!(
                            "Class '{}' derives from '{}', which is a static class",
                            desc.name, desc.base_type_name
                        ),
                        file,
                        "$.baseTypeName",
                    )
                    .with_suggestion("Static classes cannot be subclassed; derive from an instance class"),
                );
            }
            (BaseKind::Foreign, Some(_)) => {
                report.push(
                    ErrorEntry::error(
                        E_BASE_MISREPORTED,
                        format!(
                            "Class '{}' declares a foreign base '{}', but that class is generated",
                            desc.name, desc.base_type_name
                        ),
                        file,
                        "$.baseKind",
                    )
                    .with_suggestion("Set 'baseKind' to \"generated\""),
                );
            }
            _ => {}
        }
    }

    // Follow generated bases; a chain that revisits a class is a cycle.
    let mut reported: IndexSet<&str> = IndexSet::new();
    for (name, (file, _)) in &index {
        let mut chain: IndexSet<&str> = IndexSet::new();
        let mut current = *name;
        while let Some((_, desc)) = index.get(current) {
            if !chain.insert(current) {
                break;
            }
            if desc.base_kind != BaseKind::Generated {
                chain.clear();
                break;
            }
            current = desc.base_type_name.as_str();
        }
        if chain.contains(current) && current == *name && reported.insert(*name) {
            let path: Vec<&str> = chain.iter().copied().chain([current]).collect();
            report.push(ErrorEntry::error(
                E_HIERARCHY_CYCLE,
                format!("Inheritance cycle: {}", path.join(" -> ")),
                file,
                "$.baseTypeName",
            ));
            reported.extend(chain.iter().copied());
        }
    }

    report
}

/// Order classes so that every generated base precedes its subclasses.
///
/// Classes whose chain cannot be resolved keep their relative input order at
/// the end.
pub fn base_first_order(classes: &[ClassDescriptor]) -> Vec<&ClassDescriptor> {
    let by_name: IndexMap<&str, &ClassDescriptor> =
        classes.iter().map(|c| (c.name.as_str(), c)).collect();
    let mut placed: IndexSet<&str> = IndexSet::new();
    let mut ordered = Vec::with_capacity(classes.len());

    for desc in classes {
        let mut pending = Vec::new();
        let mut current = Some(desc);
        while let Some(c) = current {
            let seen = placed.contains(c.name.as_str())
                || pending.iter().any(|p: &&ClassDescriptor| p.name == c.name);
            if seen {
                break;
            }
            pending.push(c);
            current = match c.base_kind {
                BaseKind::Generated => by_name.get(c.base_type_name.as_str()).copied(),
                BaseKind::Foreign => None,
            };
        }
        for c in pending.into_iter().rev() {
            if placed.insert(c.name.as_str()) {
                ordered.push(c);
            }
        }
    }

    ordered
}
