pub mod analyze_service;
pub mod gemini;
pub mod prompt;

pub use analyze_service::AnalyzeService;
pub use gemini::{GeminiClient, InferenceClient};
