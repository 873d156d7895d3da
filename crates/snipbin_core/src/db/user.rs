//! User and session storage operations backed by redb.

use crate::db::tables::{SESSIONS, USERS, USERS_BY_EMAIL, USERS_BY_NAME};
use crate::error::AppError;
use crate::id::generate_session_token;
use crate::models::user::User;
use redb::{ReadableDatabase, ReadableTable};
use std::sync::Arc;

fn deserialize_user(bytes: &[u8]) -> Result<User, AppError> {
    Ok(bincode::deserialize(bytes)?)
}

/// Accessor for user and session redb tables.
pub struct UserDb {
    db: Arc<redb::Database>,
}

impl UserDb {
    /// Initialize user tables if they do not exist yet.
    ///
    /// # Errors
    /// Returns an error when redb transaction/table initialization fails.
    pub fn new(db: Arc<redb::Database>) -> Result<Self, AppError> {
        let write_txn = db.begin_write()?;
        write_txn.open_table(USERS)?;
        write_txn.open_table(USERS_BY_NAME)?;
        write_txn.open_table(USERS_BY_EMAIL)?;
        write_txn.open_table(SESSIONS)?;
        write_txn.commit()?;
        Ok(Self { db })
    }

    /// Insert a new user, enforcing username and email uniqueness.
    ///
    /// Uniqueness is case-insensitive; both indexes key on the lowercased
    /// value inside the same write transaction as the row insert.
    ///
    /// # Errors
    /// Returns [`AppError::Conflict`] when the username or email is taken, or
    /// an error when serialization or storage operations fail.
    pub fn create(&self, user: &User) -> Result<(), AppError> {
        let encoded = bincode::serialize(user)?;
        let name_key = user.username.to_lowercase();
        let email_key = user.email.to_lowercase();

        let write_txn = self.db.begin_write()?;
        {
            let mut users = write_txn.open_table(USERS)?;
            let mut by_name = write_txn.open_table(USERS_BY_NAME)?;
            let mut by_email = write_txn.open_table(USERS_BY_EMAIL)?;

            if by_name.get(name_key.as_str())?.is_some() {
                return Err(AppError::Conflict("Username already exists".to_string()));
            }
            if by_email.get(email_key.as_str())?.is_some() {
                return Err(AppError::Conflict("Email already registered".to_string()));
            }

            users.insert(user.id.as_str(), encoded.as_slice())?;
            by_name.insert(name_key.as_str(), user.id.as_str())?;
            by_email.insert(email_key.as_str(), user.id.as_str())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Fetch a user by id.
    ///
    /// # Errors
    /// Returns an error when storage access or deserialization fails.
    pub fn get(&self, id: &str) -> Result<Option<User>, AppError> {
        let read_txn = self.db.begin_read()?;
        let users = read_txn.open_table(USERS)?;
        match users.get(id)? {
            Some(value) => Ok(Some(deserialize_user(value.value())?)),
            None => Ok(None),
        }
    }

    /// Fetch a user by username (case-insensitive).
    ///
    /// # Errors
    /// Returns an error when storage access or deserialization fails.
    pub fn get_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let name_key = username.to_lowercase();
        let read_txn = self.db.begin_read()?;
        let by_name = read_txn.open_table(USERS_BY_NAME)?;
        let id = match by_name.get(name_key.as_str())? {
            Some(value) => value.value().to_string(),
            None => return Ok(None),
        };
        let users = read_txn.open_table(USERS)?;
        match users.get(id.as_str())? {
            Some(value) => Ok(Some(deserialize_user(value.value())?)),
            None => Ok(None),
        }
    }

    /// Count registered users.
    ///
    /// # Errors
    /// Returns an error when storage access fails.
    pub fn count(&self) -> Result<usize, AppError> {
        let read_txn = self.db.begin_read()?;
        let users = read_txn.open_table(USERS)?;
        let mut count = 0;
        for entry in users.iter()? {
            entry?;
            count += 1;
        }
        Ok(count)
    }

    /// Mint a new bearer session token for a user.
    ///
    /// # Errors
    /// Returns an error when storage operations fail.
    pub fn create_session(&self, user_id: &str) -> Result<String, AppError> {
        let token = generate_session_token();
        let write_txn = self.db.begin_write()?;
        {
            let mut sessions = write_txn.open_table(SESSIONS)?;
            sessions.insert(token.as_str(), user_id)?;
        }
        write_txn.commit()?;
        Ok(token)
    }

    /// Resolve a session token to its user.
    ///
    /// Unknown tokens and sessions whose user vanished both yield `None`.
    ///
    /// # Errors
    /// Returns an error when storage access or deserialization fails.
    pub fn session_user(&self, token: &str) -> Result<Option<User>, AppError> {
        let read_txn = self.db.begin_read()?;
        let sessions = read_txn.open_table(SESSIONS)?;
        let user_id = match sessions.get(token)? {
            Some(value) => value.value().to_string(),
            None => return Ok(None),
        };
        let users = read_txn.open_table(USERS)?;
        match users.get(user_id.as_str())? {
            Some(value) => Ok(Some(deserialize_user(value.value())?)),
            None => Ok(None),
        }
    }

    /// Invalidate a session token.
    ///
    /// # Returns
    /// `Ok(true)` when a session was removed, `Ok(false)` when unknown.
    ///
    /// # Errors
    /// Returns an error when storage operations fail.
    pub fn remove_session(&self, token: &str) -> Result<bool, AppError> {
        let write_txn = self.db.begin_write()?;
        let removed = {
            let mut sessions = write_txn.open_table(SESSIONS)?;
            // Bound so the removed row's guard drops before the table does.
            let removed = sessions.remove(token)?.is_some();
            removed
        };
        write_txn.commit()?;
        Ok(removed)
    }
}
