//! Paste data model, lifecycle predicates, and rendering delegation.

use crate::id::generate_paste_id;
use crate::languages::LanguageRegistry;
use crate::render::{self, Renderer};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Default language id assigned when a paste specifies none.
pub const DEFAULT_LANGUAGE: &str = "text";

/// Paste row stored in the database and returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paste {
    pub id: String,
    pub title: Option<String>,
    pub content: String,
    pub language: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub is_public: bool,
    /// Owner reference; anonymous pastes carry `None`.
    pub user_id: Option<String>,
    pub views: u64,
}

/// Kind of preview a paste supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PreviewKind {
    Markdown,
    Html,
    Svg,
}

/// Request payload for creating a paste.
///
/// `content` is optional at the type level so a missing field surfaces as a
/// 400 with a message instead of a deserialization rejection.
#[derive(Debug, Default, Deserialize)]
pub struct CreatePasteRequest {
    pub content: Option<String>,
    pub title: Option<String>,
    pub language: Option<String>,
    pub expires_in: Option<String>,
    pub is_public: Option<bool>,
}

/// Request payload for updating a paste (owner only).
#[derive(Debug, Default, Clone, Deserialize)]
pub struct UpdatePasteRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub language: Option<String>,
    pub is_public: Option<bool>,
}

/// Query parameters for the public listing.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<usize>,
    pub per_page: Option<usize>,
    pub language: Option<String>,
    pub search: Option<String>,
}

impl Paste {
    /// Create a new paste with a fresh id and defaults applied.
    pub fn new(content: String) -> Self {
        Self {
            id: generate_paste_id(),
            title: None,
            content,
            language: DEFAULT_LANGUAGE.to_string(),
            created_at: Utc::now(),
            expires_at: None,
            is_public: true,
            user_id: None,
            views: 0,
        }
    }

    /// Replace the id with a freshly generated one.
    ///
    /// Used by the storage layer when an insert collides.
    pub fn regenerate_id(&mut self) {
        self.id = generate_paste_id();
    }

    /// True iff `expires_at` is set and strictly in the past.
    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| Utc::now() > at)
    }

    /// Whether any preview rendering is available for this language.
    pub fn is_previewable(&self) -> bool {
        self.preview_kind().is_some()
    }

    /// Preview kind derived from the language id (case-insensitive).
    pub fn preview_kind(&self) -> Option<PreviewKind> {
        match self.language.to_ascii_lowercase().as_str() {
            "markdown" | "md" => Some(PreviewKind::Markdown),
            "html" => Some(PreviewKind::Html),
            "svg" => Some(PreviewKind::Svg),
            _ => None,
        }
    }

    /// Visibility predicate applied by every read path.
    ///
    /// Expired pastes are invisible to everyone; private pastes only to the
    /// owner. Callers must map `false` to the same response as "not found".
    pub fn visible_to(&self, requester: Option<&str>) -> bool {
        if self.is_expired() {
            return false;
        }
        self.is_public || self.owned_by(requester)
    }

    /// True when `requester` is the authenticated owner of this paste.
    ///
    /// Anonymous pastes have no owner and are never owned by anyone.
    pub fn owned_by(&self, requester: Option<&str>) -> bool {
        matches!(
            (requester, self.user_id.as_deref()),
            (Some(r), Some(o)) if r == o
        )
    }

    /// Syntax-highlighted markup for the paste content.
    ///
    /// Degrades to an escaped plain-text block when the engine is unknown or
    /// the highlighter fails; never returns an error.
    pub fn highlighted(&self, renderer: &Renderer, registry: &LanguageRegistry) -> String {
        renderer.highlight(&self.content, registry.resolve(&self.language))
    }

    /// Sanitized Markdown preview, only for [`PreviewKind::Markdown`].
    pub fn markdown_preview(&self) -> Option<String> {
        match self.preview_kind() {
            Some(PreviewKind::Markdown) => Some(render::markdown_preview(&self.content)),
            _ => None,
        }
    }

    /// Content sanitized for display inside a sandboxed, script-disabled frame.
    pub fn html_sandbox(&self) -> String {
        render::html_sandbox(&self.content)
    }

    /// Content as an SVG document, wrapping fragments in a default envelope.
    pub fn svg_document(&self) -> String {
        render::svg_document(&self.content)
    }
}

/// Translate an `expires_in` choice into an absolute expiry timestamp.
///
/// Recognized choices: `never`, `10m`, `1h`, `1d`, `1w`, `1M`. Unknown values
/// behave like `never`.
pub fn expiry_from_choice(choice: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    match choice {
        "10m" => Some(now + Duration::minutes(10)),
        "1h" => Some(now + Duration::hours(1)),
        "1d" => Some(now + Duration::days(1)),
        "1w" => Some(now + Duration::weeks(1)),
        "1M" => Some(now + Duration::days(30)),
        _ => None,
    }
}
