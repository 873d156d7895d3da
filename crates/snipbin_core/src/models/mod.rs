//! Data models for persistence and API payloads.

/// Paste entity, request payloads, and lifecycle predicates.
pub mod paste;
/// User accounts and password hashing.
pub mod user;
