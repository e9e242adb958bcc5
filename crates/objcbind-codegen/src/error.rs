use objcbind_spec::ErrorEntry;
use thiserror::Error;

use crate::phase::{EmitPhase, Operation};

#[derive(Debug, Error)]
pub enum CodegenError {
    #[error("contract violation in class '{class}': {}", summarize(.entries))]
    ContractViolation {
        class: String,
        entries: Vec<ErrorEntry>,
    },

    #[error("invalid binding configuration: {}", summarize(.entries))]
    InvalidConfig { entries: Vec<ErrorEntry> },

    #[error("inconsistent class hierarchy: {}", summarize(.entries))]
    Hierarchy { entries: Vec<ErrorEntry> },

    #[error("out-of-order call in class '{class}': {operation} is not allowed in phase {phase}")]
    PhaseOrder {
        class: String,
        operation: Operation,
        phase: EmitPhase,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn summarize(entries: &[ErrorEntry]) -> String {
    entries
        .iter()
        .map(|e| format!("{} ({})", e.message, e.path))
        .collect::<Vec<_>>()
        .join("; ")
}
