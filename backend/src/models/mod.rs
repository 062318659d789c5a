pub mod analyze;

pub use analyze::AnalyzeImageRequest;
