//! Language registry: display metadata and highlighter engine names.
//!
//! The registry is loaded from a JSON resource at startup. A missing or
//! malformed resource degrades to a small built-in set rather than failing.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Engine token used when a language id is unknown.
pub const PLAIN_TEXT_ENGINE: &str = "txt";

/// One registered language.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Language {
    pub id: String,
    pub name: String,
    /// Token passed to the syntax-highlighting collaborator.
    pub highlighter: String,
    pub category: String,
    #[serde(default)]
    pub extensions: Vec<String>,
    #[serde(default)]
    pub preview: bool,
}

#[derive(Debug, Deserialize)]
struct RegistryFile {
    languages: Vec<Language>,
    #[serde(default)]
    categories: BTreeMap<String, String>,
}

/// Registry of languages available for highlighting and filtering.
#[derive(Debug, Clone)]
pub struct LanguageRegistry {
    languages: Vec<Language>,
    categories: BTreeMap<String, String>,
}

impl LanguageRegistry {
    /// Load the registry from a JSON resource.
    ///
    /// Falls back to [`LanguageRegistry::builtin`] with a warning when the
    /// file is missing or malformed; this path never fails.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(raw) => match serde_json::from_str::<RegistryFile>(&raw) {
                Ok(file) if !file.languages.is_empty() => Self {
                    languages: file.languages,
                    categories: file.categories,
                },
                Ok(_) => {
                    tracing::warn!("Language registry {} is empty; using built-in set", path.display());
                    Self::builtin()
                }
                Err(err) => {
                    tracing::warn!(
                        "Failed to parse language registry {}: {}; using built-in set",
                        path.display(),
                        err
                    );
                    Self::builtin()
                }
            },
            Err(err) => {
                tracing::warn!(
                    "Failed to read language registry {}: {}; using built-in set",
                    path.display(),
                    err
                );
                Self::builtin()
            }
        }
    }

    /// Minimal built-in registry used when the JSON resource is unavailable.
    pub fn builtin() -> Self {
        fn lang(id: &str, name: &str, highlighter: &str, category: &str, preview: bool) -> Language {
            Language {
                id: id.to_string(),
                name: name.to_string(),
                highlighter: highlighter.to_string(),
                category: category.to_string(),
                extensions: Vec::new(),
                preview,
            }
        }
        let languages = vec![
            lang("text", "Plain Text", PLAIN_TEXT_ENGINE, "text", false),
            lang("python", "Python", "python", "programming", false),
            lang("javascript", "JavaScript", "js", "web", false),
            lang("html", "HTML", "html", "web", true),
            lang("css", "CSS", "css", "web", false),
            lang("json", "JSON", "json", "data", false),
        ];
        let categories = BTreeMap::from([
            ("text".to_string(), "Text".to_string()),
            ("programming".to_string(), "Programming".to_string()),
            ("web".to_string(), "Web".to_string()),
            ("data".to_string(), "Data".to_string()),
        ]);
        Self {
            languages,
            categories,
        }
    }

    /// Resolve a language id to its highlighter engine token.
    ///
    /// Unknown ids resolve to the plain-text engine rather than failing.
    pub fn resolve(&self, language_id: &str) -> &str {
        self.languages
            .iter()
            .find(|lang| lang.id == language_id)
            .map(|lang| lang.highlighter.as_str())
            .unwrap_or(PLAIN_TEXT_ENGINE)
    }

    /// Look up a registered language by id.
    pub fn get(&self, language_id: &str) -> Option<&Language> {
        self.languages.iter().find(|lang| lang.id == language_id)
    }

    /// Ordered `(id, display_name)` choices for selection UIs.
    ///
    /// The `text` category comes first; remaining categories follow in
    /// case-insensitive alphabetical order, languages within each category
    /// alphabetical by display name.
    pub fn choices(&self) -> Vec<(String, String)> {
        let mut by_category: BTreeMap<String, Vec<(String, String)>> = BTreeMap::new();
        for lang in &self.languages {
            by_category
                .entry(lang.category.to_ascii_lowercase())
                .or_default()
                .push((lang.id.clone(), lang.name.clone()));
        }

        let mut choices = Vec::with_capacity(self.languages.len());
        if let Some(mut text_langs) = by_category.remove("text") {
            text_langs.sort_by(|a, b| a.1.cmp(&b.1));
            choices.extend(text_langs);
        }
        for (_, mut langs) in by_category {
            langs.sort_by(|a, b| a.1.cmp(&b.1));
            choices.extend(langs);
        }
        choices
    }

    /// All registered languages, in registration order.
    pub fn languages(&self) -> &[Language] {
        &self.languages
    }

    /// Category id to display-name map.
    pub fn categories(&self) -> &BTreeMap<String, String> {
        &self.categories
    }
}
