/// meilirank - Hybrid Fuzzy Re-Ranking Engine
///
/// Library layering fuzzy re-scoring on top of a Meilisearch index:
/// multi-strategy candidate discovery, edit-distance word alignment,
/// French-phonetic scoring, and deterministic ranking.

pub mod config;
pub mod scoring;
pub mod search;
pub mod text;

#[cfg(test)]
mod tests;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
