//! redb table definitions shared by storage modules.

use redb::TableDefinition;

/// File name for the redb database within the configured DB directory.
pub const REDB_FILE_NAME: &str = "data.redb";

/// Canonical paste rows (`Paste`, bincode-encoded).
pub const PASTES: TableDefinition<&str, &[u8]> = TableDefinition::new("pastes");
/// Creation index ordered by reverse-millis then id (newest first).
pub const PASTES_BY_CREATED: TableDefinition<(u64, &str), ()> =
    TableDefinition::new("pastes_by_created");

/// Canonical user rows (`User`, bincode-encoded).
pub const USERS: TableDefinition<&str, &[u8]> = TableDefinition::new("users");
/// Lowercased username -> user id.
pub const USERS_BY_NAME: TableDefinition<&str, &str> = TableDefinition::new("users_by_name");
/// Lowercased email -> user id.
pub const USERS_BY_EMAIL: TableDefinition<&str, &str> = TableDefinition::new("users_by_email");
/// Bearer session token -> user id.
pub const SESSIONS: TableDefinition<&str, &str> = TableDefinition::new("sessions");
