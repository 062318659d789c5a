pub mod error;
pub mod i18n;

pub use error::{ApiError, ApiResult};
pub use i18n::{extract_language_from_header, normalize_language};
