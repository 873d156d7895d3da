//! HTTP handlers for the JSON API.

/// Code assistance endpoints (detect, explain, complete, status).
pub mod assist;
/// Account registration, login, and logout.
pub mod auth;
/// Language registry endpoint.
pub mod language;
/// Paste CRUD, rendering, listing, and stats.
pub mod paste;
