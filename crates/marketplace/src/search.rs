use async_trait::async_trait;
use bazaar_core::{SearchError, SearchQuery};
use serde_json::Value;

use crate::scoped;

/// The external marketplace search capability.
///
/// Returns raw product records; interpreting them is the formatter's job.
#[async_trait]
pub trait ProductSearch: Send + Sync {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<Value>, SearchError>;

    /// Blocking form of [`ProductSearch::search`], run on a scoped single-use runtime.
    fn search_blocking(&self, query: &SearchQuery) -> Result<Vec<Value>, SearchError> {
        scoped::block_on(self.search(query))
            .map_err(|error| SearchError::Runtime(error.to_string()))?
    }
}

/// Filter block of a marketplace search request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchFilters {
    pub free_shipping: u8,
    pub max_price: Option<i64>,
    pub min_price: Option<i64>,
    pub min_rating: u8,
}

impl From<&SearchQuery> for SearchFilters {
    fn from(query: &SearchQuery) -> Self {
        Self {
            free_shipping: query.free_shipping_flag(),
            max_price: query.max_price,
            min_price: query.min_price,
            min_rating: query.min_rating,
        }
    }
}

impl SearchFilters {
    /// Flattens the filters into `filters.<name>` query-string pairs; unset bounds are omitted.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("filters.freeShipping", self.free_shipping.to_string())];
        if let Some(max_price) = self.max_price {
            pairs.push(("filters.maxPrice", max_price.to_string()));
        }
        if let Some(min_price) = self.min_price {
            pairs.push(("filters.minPrice", min_price.to_string()));
        }
        pairs.push(("filters.minRating", self.min_rating.to_string()));
        pairs
    }
}

/// Full query string for one search: the free-text `q` followed by the filters.
pub fn request_pairs(query: &SearchQuery) -> Vec<(&'static str, String)> {
    let mut pairs = vec![("q", query.query.clone())];
    pairs.extend(SearchFilters::from(query).query_pairs());
    pairs
}
