//! Query Normalization
//!
//! Produces the normalized variants of a user query that the scoring
//! pipeline aligns against: a whitespace-normalized lowercase form, an
//! accent- and punctuation-free cleaned form, and a no-space form.

/// Lowercase, trim, and collapse internal whitespace runs to single spaces.
pub fn normalize_query(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for word in s.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        for ch in word.chars() {
            for lc in ch.to_lowercase() {
                out.push(lc);
            }
        }
    }
    out
}

/// Aggressive cleaning for index-side matching: normalize, fold accents
/// (NFD, combining marks dropped), expand the French ligatures, map
/// punctuation to spaces, and keep only ASCII alphanumerics.
pub fn clean_user_query(s: &str) -> String {
    use unicode_normalization::UnicodeNormalization;

    let lowered = normalize_query(s);
    let mut folded = String::with_capacity(lowered.len());
    for ch in lowered.nfd() {
        match ch {
            'œ' => folded.push_str("oe"),
            'æ' => folded.push_str("ae"),
            c if unicode_normalization::char::is_combining_mark(c) => {}
            c if c.is_ascii_alphanumeric() => folded.push(c),
            _ => folded.push(' '),
        }
    }

    // Punctuation replacement may have introduced new runs of spaces.
    let mut out = String::with_capacity(folded.len());
    for word in folded.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    out
}

/// The cleaned form with every space removed.
pub fn no_space_form(cleaned: &str) -> String {
    cleaned.chars().filter(|c| !c.is_whitespace()).collect()
}
