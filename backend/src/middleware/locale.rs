//! Locale extraction middleware
//!
//! Reads the Accept-Language header and stores the preferred language in
//! the request extensions, where the analyze handler picks it up as a
//! fallback for bodies without a `lang` field.

use axum::{
    extract::Request,
    http::header::ACCEPT_LANGUAGE,
    middleware::Next,
    response::Response,
};

use crate::utils::extract_language_from_header;

/// Preferred language of the caller, if the request carried one
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestLocale(pub Option<String>);

impl RequestLocale {
    pub fn language(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

/// Middleware to extract locale from Accept-Language header
pub async fn locale_middleware(mut req: Request, next: Next) -> Response {
    let header = req
        .headers()
        .get(ACCEPT_LANGUAGE)
        .and_then(|v| v.to_str().ok());

    let locale = RequestLocale(extract_language_from_header(header));

    req.extensions_mut().insert(locale);

    next.run(req).await
}
