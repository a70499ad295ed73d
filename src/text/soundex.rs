//! French Soundex
//!
//! Per-token phonetic codes in the classic first-letter + three-digit
//! shape, with a small French adaptation pass. Codes for a multi-word
//! input are space-joined; the scoring side treats them opaquely.

/// Encode every whitespace-separated token of `s`; tokens that produce no
/// code (no letters) are skipped. Input is expected to be pre-cleaned
/// (lowercase, accents folded).
pub fn soundex_fr(s: &str) -> String {
    let mut out = String::new();
    for token in s.split_whitespace() {
        if let Some(code) = encode_token(token) {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(&code);
        }
    }
    out
}

fn digit(c: char) -> Option<u8> {
    match c {
        'b' | 'f' | 'p' | 'v' => Some(1),
        'c' | 'g' | 'j' | 'k' | 'q' | 's' | 'x' | 'z' => Some(2),
        'd' | 't' => Some(3),
        'l' => Some(4),
        'm' | 'n' => Some(5),
        'r' => Some(6),
        _ => None,
    }
}

fn encode_token(token: &str) -> Option<String> {
    // French adaptation: 'ph' sounds as 'f'.
    let prepared = token.to_lowercase().replace("ph", "f");
    let mut letters = prepared.chars().filter(|c| c.is_ascii_alphabetic());

    let first = letters.next()?;
    let mut code = String::with_capacity(4);
    code.push(first.to_ascii_uppercase());

    // Vowels separate identical codes; 'h' and 'w' do not.
    let mut prev = digit(first);
    for c in letters {
        match digit(c) {
            Some(d) => {
                if prev != Some(d) {
                    code.push((b'0' + d) as char);
                    if code.len() == 4 {
                        break;
                    }
                }
                prev = Some(d);
            }
            None => {
                if c != 'h' && c != 'w' {
                    prev = None;
                }
            }
        }
    }

    while code.len() < 4 {
        code.push('0');
    }
    Some(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classic_codes() {
        assert_eq!(soundex_fr("paris"), "P620");
        assert_eq!(soundex_fr("bordo"), "B630");
        assert_eq!(soundex_fr("jean"), "J500");
    }

    #[test]
    fn multi_word_codes_are_space_joined() {
        assert_eq!(soundex_fr("saint jean"), "S530 J500");
    }

    #[test]
    fn adjacent_identical_codes_collapse() {
        assert_eq!(soundex_fr("parisse"), "P620");
    }

    #[test]
    fn ph_encodes_as_f() {
        assert_eq!(soundex_fr("pharmacie"), "F652");
    }

    #[test]
    fn empty_and_non_alphabetic_inputs() {
        assert_eq!(soundex_fr(""), "");
        assert_eq!(soundex_fr("123"), "");
    }
}
