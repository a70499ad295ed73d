//! Text Primitives
//!
//! Pure string utilities consumed by the search pipeline: query
//! normalization, French phonetic encoding, and bounded edit distance.

pub mod distance;
pub mod normalize;
pub mod soundex;

pub use distance::{distance, dynamic_max};
pub use normalize::{clean_user_query, no_space_form, normalize_query};
pub use soundex::soundex_fr;
