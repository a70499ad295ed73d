//! Index Oracle
//!
//! The engine treats the full-text index as an opaque search oracle behind
//! the `SearchOracle` trait; `MeiliOracle` is the Meilisearch-backed
//! implementation. Filters are propagated verbatim.

use async_trait::async_trait;
use meilisearch_sdk::client::Client;
use serde::Serialize;
use serde_json::Value;

use super::error::Result;
use super::models::Candidate;

// ============================================================================
// Oracle Trait
// ============================================================================

/// One index-side search request.
#[derive(Debug, Clone, Default, Serialize)]
pub struct OracleParams {
    pub limit: usize,
    pub searchable_attributes: Vec<String>,
    /// Opaque filter expression, forwarded unchanged.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<Value>,
}

/// Narrow interface to the external full-text index.
#[async_trait]
pub trait SearchOracle: Send + Sync {
    /// Run one search and return the raw candidate bags. Any failure,
    /// including a non-conforming response shape, is an error.
    async fn search(&self, index: &str, query: &str, params: &OracleParams)
        -> Result<Vec<Candidate>>;
}

// ============================================================================
// Filter Mapping
// ============================================================================

/// Which query-builder call an opaque filter value maps onto.
#[derive(Debug, Clone, PartialEq)]
enum FilterExpr {
    /// One filter expression string.
    Single(String),
    /// A list of expressions, combined index-side.
    Multi(Vec<String>),
}

/// Meilisearch accepts either a filter expression or an array of
/// expressions; any other shape is the caller's mistake and is forwarded
/// as its JSON text.
fn filter_expr(filter: &Value) -> FilterExpr {
    match filter {
        Value::String(s) => FilterExpr::Single(s.clone()),
        Value::Array(parts) => FilterExpr::Multi(
            parts
                .iter()
                .map(|p| p.as_str().unwrap_or_default().to_string())
                .collect(),
        ),
        other => FilterExpr::Single(other.to_string()),
    }
}

// ============================================================================
// Meilisearch Oracle
// ============================================================================

pub struct MeiliOracle {
    client: Client,
    host: String,
}

impl MeiliOracle {
    pub fn new(host: &str, api_key: Option<&str>) -> Result<Self> {
        Ok(Self {
            client: Client::new(host, api_key)?,
            host: host.to_string(),
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Check if the index server is reachable.
    /// Uses raw reqwest to avoid SDK parsing errors on version mismatch.
    pub async fn health(&self) -> bool {
        let url = format!("{}/health", self.host);
        match reqwest::Client::new().get(&url).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }
}

#[async_trait]
impl SearchOracle for MeiliOracle {
    async fn search(
        &self,
        index: &str,
        query: &str,
        params: &OracleParams,
    ) -> Result<Vec<Candidate>> {
        let index = self.client.index(index);
        let filter = params.filter.as_ref().map(filter_expr);
        let attributes: Vec<&str> = params
            .searchable_attributes
            .iter()
            .map(String::as_str)
            .collect();

        let mut search = index.search();
        search.with_query(query).with_limit(params.limit);
        if !attributes.is_empty() {
            search.with_attributes_to_search_on(&attributes);
        }
        match &filter {
            None => {}
            Some(FilterExpr::Single(expr)) => {
                search.with_filter(expr);
            }
            Some(FilterExpr::Multi(parts)) => {
                search.with_array_filter(parts.iter().map(String::as_str).collect());
            }
        }

        let results = search.execute::<Candidate>().await?;
        Ok(results.hits.into_iter().map(|hit| hit.result).collect())
    }
}

// ============================================================================
// Tests
// ============================================================================
