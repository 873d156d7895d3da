//! Heuristic language detection over snippet text.
//!
//! Pure scoring, no I/O: each candidate earns one point per signature
//! substring present (case-insensitive) in the snippet. Highest score wins,
//! ties break toward the earlier-registered candidate, and an all-zero board
//! returns `"text"`. This stays available when no remote AI backend is
//! configured.

/// Candidate id returned when nothing matches.
pub const FALLBACK_LANGUAGE: &str = "text";

/// Signature substrings per candidate, in registration (tie-break) order.
/// All patterns are lowercase; the snippet is lowercased before matching.
const LANGUAGE_PATTERNS: &[(&str, &[&str])] = &[
    ("python", &["def ", "import ", "from ", "print(", "if __name__"]),
    ("javascript", &["function ", "const ", "let ", "var ", "console.log"]),
    ("java", &["public class", "public static void main", "system.out"]),
    ("cpp", &["#include", "using namespace", "std::", "cout <<"]),
    ("c", &["#include", "int main(", "printf("]),
    ("html", &["<html", "<head", "<body", "<!doctype"]),
    ("css", &["{", "}", ":", ";", "px", "color:"]),
    ("sql", &["select", "from", "where", "insert", "update"]),
    ("bash", &["#!/bin/bash", "echo ", "if [", "for "]),
    ("rust", &["fn main(", "let ", "println!", "use "]),
    ("go", &["package main", "func main(", "fmt.print", "import "]),
    ("php", &["<?php", "echo ", "$", "function "]),
    ("ruby", &["def ", "puts ", "end", "class "]),
    ("swift", &["func ", "var ", "let ", "print("]),
    ("kotlin", &["fun main(", "val ", "var ", "println("]),
];

/// Best-effort language detection for a snippet.
///
/// # Returns
/// The highest-scoring candidate id, or [`FALLBACK_LANGUAGE`] when no
/// signature matches at all.
pub fn detect_language(code: &str) -> &'static str {
    let lower = code.to_lowercase();
    let mut best: Option<(&'static str, usize)> = None;

    for (language, patterns) in LANGUAGE_PATTERNS {
        let score = patterns.iter().filter(|p| lower.contains(*p)).count();
        if score == 0 {
            continue;
        }
        match best {
            Some((_, best_score)) if best_score >= score => {}
            _ => best = Some((language, score)),
        }
    }

    best.map(|(language, _)| language)
        .unwrap_or(FALLBACK_LANGUAGE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn python_keywords_win() {
        let code = "import os\n\ndef main():\n    print(\"hi\")\n";
        assert_eq!(detect_language(code), "python");
    }

    #[test]
    fn no_matches_returns_text() {
        assert_eq!(detect_language("plain words only"), FALLBACK_LANGUAGE);
        assert_eq!(detect_language(""), FALLBACK_LANGUAGE);
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(
            detect_language("SELECT name FROM users WHERE id = 1"),
            "sql"
        );
    }

    #[test]
    fn ties_break_toward_first_registered_candidate() {
        // "def " scores one point for both python and ruby; python is
        // registered first and must win the tie.
        assert_eq!(detect_language("def greet"), "python");
    }

    #[test]
    fn distinctive_rust_snippet() {
        // Scores: rust 4 (fn main(, let , println!, use ) vs css 3 ({, }, ;).
        let code = "use rand;\nfn main() {\n    let x = 1;\n    println!(\"{}\", x);\n}\n";
        assert_eq!(detect_language(code), "rust");
    }
}
