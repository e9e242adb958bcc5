pub mod context;
pub mod error;
pub mod generator;
pub mod naming;
pub mod phase;
pub mod traits;

// Class emitters
pub mod emitters;

// Re-exports
pub use context::SourceWriter;
pub use emitters::class::ClassEmitter;
pub use error::CodegenError;
pub use generator::{GeneratedSources, SkeletonGenerator};
pub use phase::{EmitPhase, Operation};
pub use traits::SourceSink;
