//! Database layer for Snipbin, backed by redb.
//!
//! Expired pastes are never purged here; expiry is enforced at read time by
//! the visibility predicate and the listing filters, and rows persist in
//! storage after they expire.

/// Paste storage operations.
pub mod paste;
/// redb table definitions.
pub mod tables;
/// User and session storage operations.
pub mod user;

#[cfg(test)]
mod tests;

use crate::error::AppError;
use std::sync::Arc;

/// Database handle with per-entity accessors sharing one redb instance.
pub struct Database {
    pub pastes: paste::PasteDb,
    pub users: user::UserDb,
}

impl Database {
    /// Open the database and initialize all tables.
    ///
    /// # Arguments
    /// - `path`: Directory that holds the redb file; created when missing.
    ///
    /// # Returns
    /// A fully initialized [`Database`].
    ///
    /// # Errors
    /// Returns an error when the directory cannot be created or redb cannot
    /// open/initialize the database.
    pub fn new(path: &str) -> Result<Self, AppError> {
        std::fs::create_dir_all(path).map_err(|err| {
            AppError::StorageMessage(format!("Failed to create data directory {}: {}", path, err))
        })?;
        let file = std::path::Path::new(path).join(tables::REDB_FILE_NAME);
        let db = Arc::new(redb::Database::create(file)?);
        let pastes = paste::PasteDb::new(db.clone())?;
        let users = user::UserDb::new(db)?;
        Ok(Self { pastes, users })
    }
}
