pub mod analysis;

pub use analysis::{AnalysisResult, ApiInfo, Endpoint};
