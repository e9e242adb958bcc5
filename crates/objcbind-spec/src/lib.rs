pub mod hierarchy;
pub mod loader;
pub mod parser;
pub mod schema_def;
pub mod types;
pub mod validate;

// Re-exports
pub use types::config::{BindingConfig, IndentStyle, ResolutionStrategy};
pub use types::descriptor::{BaseKind, ClassDescriptor};
pub use types::error::{ErrorEntry, Severity, ValidationReport};
