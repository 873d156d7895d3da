//! Paste storage operations backed by redb.

use crate::db::tables::{PASTES, PASTES_BY_CREATED};
use crate::error::AppError;
use crate::models::paste::{ListQuery, Paste, UpdatePasteRequest};
use chrono::{DateTime, Utc};
use redb::{ReadableDatabase, ReadableTable};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

/// Maximum id regenerations attempted before giving up on a create.
const MAX_ID_ATTEMPTS: usize = 5;

/// Default page size for listings.
pub const DEFAULT_PER_PAGE: usize = 20;
/// Hard cap on `per_page` to bound listing cost.
pub const MAX_PER_PAGE: usize = 100;

/// One page of listing results with navigation metadata.
#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub page: usize,
    pub per_page: usize,
    pub pages: usize,
    pub has_next: bool,
    pub has_prev: bool,
}

/// Aggregate counts over stored pastes.
#[derive(Debug, Serialize)]
pub struct PasteStats {
    pub total_pastes: usize,
    pub public_pastes: usize,
    pub top_languages: Vec<LanguageCount>,
}

/// Per-language paste count within the public set.
#[derive(Debug, Serialize)]
pub struct LanguageCount {
    pub language: String,
    pub count: usize,
}

pub(crate) fn reverse_timestamp_key(created_at: DateTime<Utc>) -> u64 {
    // Pre-epoch timestamps are clamped to preserve total ordering semantics for
    // expected runtime data while avoiding negative->u64 underflow.
    let millis = created_at.timestamp_millis().max(0) as u64;
    u64::MAX.saturating_sub(millis)
}

pub(crate) fn deserialize_paste(bytes: &[u8]) -> Result<Paste, AppError> {
    Ok(bincode::deserialize(bytes)?)
}

fn apply_update_request(paste: &mut Paste, update: &UpdatePasteRequest) {
    if let Some(title) = &update.title {
        let trimmed = title.trim();
        paste.title = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        };
    }
    if let Some(content) = &update.content {
        paste.content = content.clone();
    }
    if let Some(language) = &update.language {
        paste.language = language.clone();
    }
    if let Some(is_public) = update.is_public {
        paste.is_public = is_public;
    }
}

fn contains_case_insensitive(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

/// Accessor for paste-related redb tables.
pub struct PasteDb {
    db: Arc<redb::Database>,
}

impl PasteDb {
    /// Initialize paste tables if they do not exist yet.
    ///
    /// # Errors
    /// Returns an error when redb transaction/table initialization fails.
    pub fn new(db: Arc<redb::Database>) -> Result<Self, AppError> {
        let write_txn = db.begin_write()?;
        write_txn.open_table(PASTES)?;
        write_txn.open_table(PASTES_BY_CREATED)?;
        write_txn.commit()?;
        Ok(Self { db })
    }

    /// Insert a new paste row and its creation-index row atomically.
    ///
    /// # Errors
    /// Returns [`AppError::Conflict`] when the id already exists, or an error
    /// when serialization or storage operations fail.
    pub fn insert(&self, paste: &Paste) -> Result<(), AppError> {
        let encoded = bincode::serialize(paste)?;
        let recency_key = reverse_timestamp_key(paste.created_at);

        let write_txn = self.db.begin_write()?;
        {
            let mut pastes = write_txn.open_table(PASTES)?;
            let mut by_created = write_txn.open_table(PASTES_BY_CREATED)?;

            if pastes.get(paste.id.as_str())?.is_some() {
                return Err(AppError::Conflict(format!(
                    "Paste id '{}' already exists",
                    paste.id
                )));
            }

            pastes.insert(paste.id.as_str(), encoded.as_slice())?;
            by_created.insert((recency_key, paste.id.as_str()), ())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Persist a paste, regenerating its id on collision.
    ///
    /// Ids are random 8-character strings, so collisions are rare but real;
    /// a bounded number of fresh ids is tried before the conflict surfaces.
    ///
    /// # Returns
    /// The stored paste, whose id may differ from the one passed in.
    ///
    /// # Errors
    /// Returns an error when storage fails or every attempted id collided.
    pub fn create(&self, mut paste: Paste) -> Result<Paste, AppError> {
        for attempt in 0..MAX_ID_ATTEMPTS {
            match self.insert(&paste) {
                Ok(()) => return Ok(paste),
                Err(AppError::Conflict(_)) if attempt + 1 < MAX_ID_ATTEMPTS => {
                    tracing::warn!("Paste id '{}' collided; regenerating", paste.id);
                    paste.regenerate_id();
                }
                Err(err) => return Err(err),
            }
        }
        Err(AppError::StorageMessage(
            "Exhausted paste id generation attempts".to_string(),
        ))
    }

    /// Fetch a paste by id.
    ///
    /// # Returns
    /// `Ok(Some(paste))` when found, `Ok(None)` when missing. Expiry and
    /// visibility are the caller's concern.
    ///
    /// # Errors
    /// Returns an error when storage access or deserialization fails.
    pub fn get(&self, id: &str) -> Result<Option<Paste>, AppError> {
        let read_txn = self.db.begin_read()?;
        let pastes = read_txn.open_table(PASTES)?;
        match pastes.get(id)? {
            Some(value) => Ok(Some(deserialize_paste(value.value())?)),
            None => Ok(None),
        }
    }

    /// Increment the view counter and return the updated paste.
    ///
    /// Read-modify-write happens inside a single write transaction, so
    /// concurrent views serialize and none are lost.
    ///
    /// # Returns
    /// `Ok(Some(paste))` with the incremented count, `Ok(None)` when missing.
    ///
    /// # Errors
    /// Returns an error when storage access or serialization fails.
    pub fn record_view(&self, id: &str) -> Result<Option<Paste>, AppError> {
        let write_txn = self.db.begin_write()?;
        let updated = {
            let mut pastes = write_txn.open_table(PASTES)?;
            let mut paste = match pastes.get(id)? {
                Some(value) => deserialize_paste(value.value())?,
                None => return Ok(None),
            };
            paste.views += 1;
            let encoded = bincode::serialize(&paste)?;
            pastes.insert(id, encoded.as_slice())?;
            paste
        };
        write_txn.commit()?;
        Ok(Some(updated))
    }

    /// Apply an update payload to a paste by id.
    ///
    /// `created_at` is immutable, so the creation index needs no maintenance.
    ///
    /// # Returns
    /// `Ok(Some(paste))` when updated, `Ok(None)` when missing.
    ///
    /// # Errors
    /// Returns an error when storage access or serialization fails.
    pub fn update(&self, id: &str, update: &UpdatePasteRequest) -> Result<Option<Paste>, AppError> {
        let write_txn = self.db.begin_write()?;
        let updated = {
            let mut pastes = write_txn.open_table(PASTES)?;
            let mut paste = match pastes.get(id)? {
                Some(value) => deserialize_paste(value.value())?,
                None => return Ok(None),
            };
            apply_update_request(&mut paste, update);
            let encoded = bincode::serialize(&paste)?;
            pastes.insert(id, encoded.as_slice())?;
            paste
        };
        write_txn.commit()?;
        Ok(Some(updated))
    }

    /// Delete a paste and its index row.
    ///
    /// # Returns
    /// `Ok(true)` when a row was deleted, `Ok(false)` when missing.
    ///
    /// # Errors
    /// Returns an error when storage operations fail.
    pub fn delete(&self, id: &str) -> Result<bool, AppError> {
        let write_txn = self.db.begin_write()?;
        let deleted = {
            let mut pastes = write_txn.open_table(PASTES)?;
            let mut by_created = write_txn.open_table(PASTES_BY_CREATED)?;
            // Bound so the removed row's guard drops before the tables do.
            let deleted = match pastes.remove(id)? {
                Some(value) => {
                    let paste = deserialize_paste(value.value())?;
                    by_created.remove((reverse_timestamp_key(paste.created_at), id))?;
                    true
                }
                None => false,
            };
            deleted
        };
        write_txn.commit()?;
        Ok(deleted)
    }

    /// List public, unexpired pastes newest-first with optional filters.
    ///
    /// Filters: exact language id match (case-insensitive) and substring
    /// search over title and content (case-insensitive). Pagination metadata
    /// reflects the filtered total.
    ///
    /// # Errors
    /// Returns an error when storage access or deserialization fails.
    pub fn list_public(&self, query: &ListQuery) -> Result<Page<Paste>, AppError> {
        let page = query.page.unwrap_or(1).max(1);
        let per_page = query
            .per_page
            .unwrap_or(DEFAULT_PER_PAGE)
            .clamp(1, MAX_PER_PAGE);
        let language = query.language.as_deref().map(str::to_lowercase);
        let search = query.search.as_deref().map(str::to_lowercase);

        let mut matches = Vec::new();
        let read_txn = self.db.begin_read()?;
        let by_created = read_txn.open_table(PASTES_BY_CREATED)?;
        let pastes = read_txn.open_table(PASTES)?;

        // Index order is reverse-millis, so plain iteration is newest-first.
        for entry in by_created.iter()? {
            let (key, _) = entry?;
            let (_, id) = key.value();
            let Some(value) = pastes.get(id)? else {
                continue;
            };
            let paste = deserialize_paste(value.value())?;
            if !paste.is_public || paste.is_expired() {
                continue;
            }
            if let Some(language) = &language {
                if paste.language.to_lowercase() != *language {
                    continue;
                }
            }
            if let Some(search) = &search {
                let title_hit = paste
                    .title
                    .as_deref()
                    .is_some_and(|t| contains_case_insensitive(t, search));
                if !title_hit && !contains_case_insensitive(&paste.content, search) {
                    continue;
                }
            }
            matches.push(paste);
        }

        let total = matches.len();
        let pages = total.div_ceil(per_page);
        let items = matches
            .into_iter()
            .skip((page - 1) * per_page)
            .take(per_page)
            .collect();
        Ok(Page {
            items,
            total,
            page,
            per_page,
            pages,
            has_next: page < pages,
            has_prev: page > 1 && total > 0,
        })
    }

    /// List all pastes owned by a user, newest-first, including private and
    /// expired ones.
    ///
    /// # Errors
    /// Returns an error when storage access or deserialization fails.
    pub fn by_owner(&self, user_id: &str) -> Result<Vec<Paste>, AppError> {
        let mut owned = Vec::new();
        let read_txn = self.db.begin_read()?;
        let by_created = read_txn.open_table(PASTES_BY_CREATED)?;
        let pastes = read_txn.open_table(PASTES)?;
        for entry in by_created.iter()? {
            let (key, _) = entry?;
            let (_, id) = key.value();
            let Some(value) = pastes.get(id)? else {
                continue;
            };
            let paste = deserialize_paste(value.value())?;
            if paste.user_id.as_deref() == Some(user_id) {
                owned.push(paste);
            }
        }
        Ok(owned)
    }

    /// Aggregate counts: totals plus the five most common languages among
    /// public, unexpired pastes.
    ///
    /// # Errors
    /// Returns an error when storage access or deserialization fails.
    pub fn stats(&self) -> Result<PasteStats, AppError> {
        let mut total_pastes = 0;
        let mut public_pastes = 0;
        let mut by_language: HashMap<String, usize> = HashMap::new();

        let read_txn = self.db.begin_read()?;
        let pastes = read_txn.open_table(PASTES)?;
        for entry in pastes.iter()? {
            let (_, value) = entry?;
            let paste = deserialize_paste(value.value())?;
            total_pastes += 1;
            if paste.is_public && !paste.is_expired() {
                public_pastes += 1;
                *by_language.entry(paste.language.clone()).or_insert(0) += 1;
            }
        }

        let mut top_languages: Vec<LanguageCount> = by_language
            .into_iter()
            .map(|(language, count)| LanguageCount { language, count })
            .collect();
        top_languages.sort_by(|a, b| b.count.cmp(&a.count).then(a.language.cmp(&b.language)));
        top_languages.truncate(5);

        Ok(PasteStats {
            total_pastes,
            public_pastes,
            top_languages,
        })
    }
}
