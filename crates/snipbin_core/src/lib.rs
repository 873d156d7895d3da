//! Core domain library for Snipbin (config, storage, models, rendering).

/// Assistant interface: rule-based helpers and the optional remote backend.
pub mod assist;
/// Configuration loading and defaults.
pub mod config;
/// Database access layer.
pub mod db;
/// Heuristic language detection.
pub mod detect;
/// Application error types (storage/domain).
pub mod error;
/// Paste and session identifier generation.
pub mod id;
/// Language registry loaded from a JSON resource.
pub mod languages;
/// Data models for API requests and persistence.
pub mod models;
/// Syntax highlighting and preview rendering.
pub mod render;

pub use config::{Config, DEFAULT_PORT};
pub use db::Database;
pub use error::AppError;
pub use languages::LanguageRegistry;
pub use render::Renderer;
