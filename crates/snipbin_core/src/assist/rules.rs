//! Rule-based code summarizer.
//!
//! Keyword presence checks producing a canned natural-language description.
//! When no remote credential is configured this is the permanent behavior,
//! not a temporary fallback.

/// Structural markers scanned for, with the phrase each contributes.
const MARKERS: &[(&[&str], &str)] = &[
    (&["def ", "fn ", "func ", "function "], "defines functions"),
    (&["class ", "struct ", "interface "], "defines classes"),
    (&["import ", "from ", "use ", "#include", "require("], "imports modules/libraries"),
    (&["if ", "switch ", "match "], "contains conditional logic"),
    (&["for ", "while ", "loop "], "contains loops"),
    (&["try:", "except", "catch", "rescue", "Result<"], "includes error handling"),
];

/// Compose a one-sentence description of a snippet.
///
/// Lists the structural markers found, e.g.
/// `"This python code defines functions, contains conditional logic."`;
/// with no markers present, emits a generic sentence naming the language.
pub fn explain_code(code: &str, language: &str) -> String {
    let found: Vec<&str> = MARKERS
        .iter()
        .filter(|(patterns, _)| patterns.iter().any(|p| code.contains(p)))
        .map(|(_, phrase)| *phrase)
        .collect();

    if found.is_empty() {
        format!(
            "This appears to be {} code with basic programming constructs.",
            language
        )
    } else {
        format!("This {} code {}.", language, found.join(", "))
    }
}
