//! Gemini generateContent client
//!
//! # Architecture
//! ```text
//! ┌──────────────────┐
//! │ InferenceClient  │  ← Trait (one call, raw JSON back)
//! └────────┬─────────┘
//!          │
//!    ┌─────┴──────┐
//!    ▼            ▼
//! ┌────────┐  ┌──────────┐
//! │ Gemini │  │ Test     │
//! │ Client │  │ doubles  │
//! └────────┘  └──────────┘
//! ```

mod client;
mod models;

pub use client::{GeminiClient, InferenceClient};
pub use models::{Content, GenerateContentRequest, InlineData, Part};
