//! Query Preprocessing
//!
//! Builds the `QueryForms` bundle from raw user input. Callers detect the
//! empty result (`original_length == 0`) and short-circuit.

use crate::search::models::QueryForms;
use crate::text;

/// Preprocess a raw user query into all its normalized forms.
pub fn preprocess(raw: &str) -> QueryForms {
    let original = text::normalize_query(raw);
    if original.is_empty() {
        return QueryForms::default();
    }

    let cleaned = text::clean_user_query(raw);
    let no_space = text::no_space_form(&cleaned);
    let soundex = text::soundex_fr(&cleaned);

    let words_original: Vec<String> = original.split_whitespace().map(str::to_string).collect();
    let words_cleaned: Vec<String> = cleaned.split_whitespace().map(str::to_string).collect();

    QueryForms {
        original_length: original.chars().count(),
        cleaned_length: cleaned.chars().count(),
        no_space_length: no_space.chars().count(),
        words_original,
        words_cleaned,
        words_no_space: vec![no_space.clone()],
        original,
        cleaned,
        no_space,
        soundex,
    }
}
