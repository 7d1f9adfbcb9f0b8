pub mod analysis;

pub use analysis::{AnalysisRequest, ServiceResponse};
