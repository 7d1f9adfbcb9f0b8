pub mod analyzer;
pub mod prompt;
pub mod providers;

pub use analyzer::{ConceptAnalyzer, ModelHandle, ModelOutput, MODEL_NOT_INITIALIZED};
pub use prompt::build_prompt;
