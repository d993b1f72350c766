// SPDX-FileCopyrightText: 2026 Recuerdo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query text normalization shared by both retrieval engines.
//!
//! Turns raw user text into search terms: strips diacritics so accented
//! and unaccented spellings match, drops stop words and one-character
//! tokens, and keeps the remaining tokens in their original order.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Stop words in Spanish and English, filtered out of search queries.
///
/// Common function words match almost any indexed content and drown out
/// the terms that actually discriminate, so they never reach the index.
const STOP_WORDS: &[&str] = &[
    // Spanish
    "a", "al", "algo", "como", "con", "cual", "de", "del", "el", "en", "es",
    "eso", "esta", "esto", "fue", "ha", "hay", "la", "las", "le", "lo",
    "los", "me", "mi", "muy", "no", "nos", "o", "para", "pero", "por",
    "que", "se", "si", "sin", "so", "son", "su", "te", "tu", "un", "una",
    "uno", "y", "ya",
    // English
    "an", "and", "are", "as", "at", "be", "but", "by", "do", "for", "from",
    "has", "have", "he", "her", "his", "how", "i", "if", "in", "is", "it",
    "its", "my", "not", "of", "on", "or", "our", "she", "that", "the",
    "their", "them", "they", "this", "to", "was", "we", "what", "when",
    "which", "who", "will", "with", "you", "your",
];

/// Extract search tokens from raw text.
///
/// 1. NFKD-decompose and drop combining marks ("París" matches "Paris").
/// 2. Split on whitespace, strip non-alphanumeric characters per unit.
/// 3. Drop empty tokens, stop words, and tokens of length <= 1.
///
/// Order is preserved and duplicates are kept; callers decide whether
/// they care. Pure and deterministic. An empty result means "no
/// extractable keywords" and callers define their own fallback.
pub fn normalize(text: &str) -> Vec<String> {
    let decomposed: String = text.nfkd().filter(|c| !is_combining_mark(*c)).collect();

    let mut tokens = Vec::new();
    for word in decomposed.split_whitespace() {
        let clean: String = word.chars().filter(|c| c.is_alphanumeric()).collect();
        if clean.chars().count() <= 1 {
            continue;
        }
        if STOP_WORDS.contains(&clean.to_lowercase().as_str()) {
            continue;
        }
        tokens.push(clean);
    }
    tokens
}

/// Escape a user-controlled token for embedding into an FTS5 MATCH
/// expression.
///
/// Wraps the token in double quotes (an FTS5 string literal) with
/// internal quotes doubled, so punctuation in user text can never become
/// an unintended query operator.
pub fn escape_match_token(token: &str) -> String {
    format!("\"{}\"", token.replace('"', "\"\""))
}
