//! Yellow Core Library
//!
//! This crate provides the foundational utilities for the Yellow question
//! answering workspace:
//! - Error handling (`AppError`, `AppResult`)
//! - Logging infrastructure
//! - Configuration management

pub mod config;
pub mod error;
pub mod logging;

// Re-export commonly used types
pub use config::{AppConfig, QaSettings, SearchConfig};
pub use error::{AppError, AppResult};
