use std::time::Duration;

use async_trait::async_trait;
use bazaar_core::config::MarketplaceConfig;
use bazaar_core::{SearchError, SearchQuery};
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tracing::{debug, warn};

use crate::search::{request_pairs, ProductSearch};

const ERROR_BODY_LIMIT: usize = 512;

/// HTTP implementation of [`ProductSearch`] against the marketplace search API.
#[derive(Clone)]
pub struct MarketplaceClient {
    http: Client,
    search_url: String,
    token: SecretString,
}

impl std::fmt::Debug for MarketplaceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarketplaceClient").field("search_url", &self.search_url).finish()
    }
}

impl MarketplaceClient {
    pub fn new(
        search_url: impl Into<String>,
        token: SecretString,
        timeout: Duration,
    ) -> Result<Self, SearchError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| SearchError::Transport(error.to_string()))?;
        Ok(Self { http, search_url: search_url.into(), token })
    }

    pub fn from_config(config: &MarketplaceConfig) -> Result<Self, SearchError> {
        Self::new(
            config.search_url.clone(),
            config.token.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }
}

#[async_trait]
impl ProductSearch for MarketplaceClient {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<Value>, SearchError> {
        debug!(
            event_name = "marketplace.search.request",
            query = %query.query,
            free_shipping = query.free_shipping,
            min_rating = query.min_rating,
            "sending marketplace search"
        );

        let response = self
            .http
            .get(&self.search_url)
            .bearer_auth(self.token.expose_secret())
            .query(&request_pairs(query))
            .send()
            .await
            .map_err(|error| SearchError::Transport(error.to_string()))?;

        let status = response.status();
        if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            warn!(
                event_name = "marketplace.search.unauthorized",
                status = status.as_u16(),
                "marketplace rejected credentials"
            );
            return Err(SearchError::Unauthorized { status: status.as_u16() });
        }

        let body =
            response.text().await.map_err(|error| SearchError::Transport(error.to_string()))?;
        if !status.is_success() {
            return Err(SearchError::Rejected {
                status: status.as_u16(),
                body: truncate(&body, ERROR_BODY_LIMIT),
            });
        }

        let payload = serde_json::from_str::<Value>(&body)
            .map_err(|error| SearchError::MalformedResponse(error.to_string()))?;
        let products = parse_products(payload)?;

        debug!(
            event_name = "marketplace.search.completed",
            record_count = products.len(),
            "marketplace search returned"
        );
        Ok(products)
    }
}

/// Extracts the `products` list from a search response body.
///
/// A missing or null list means no results; any other non-array value is malformed.
pub fn parse_products(payload: Value) -> Result<Vec<Value>, SearchError> {
    let Value::Object(mut body) = payload else {
        return Err(SearchError::MalformedResponse(
            "search response is not a JSON object".to_string(),
        ));
    };

    match body.remove("products") {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(products)) => Ok(products),
        Some(_) => Err(SearchError::MalformedResponse(
            "`products` in search response is not a list".to_string(),
        )),
    }
}

fn truncate(body: &str, limit: usize) -> String {
    match body.char_indices().nth(limit) {
        Some((index, _)) => format!("{}...", &body[..index]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use bazaar_core::{SearchError, SearchQuery};
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::{parse_products, truncate, MarketplaceClient};
    use crate::search::ProductSearch;

    fn client_for_server(server: &MockServer) -> MarketplaceClient {
        MarketplaceClient::new(
            format!("{}/search", server.uri()),
            "tok".to_string().into(),
            Duration::from_secs(5),
        )
        .expect("client")
    }

    async fn respond_with(
        status: u16,
        body: &str,
    ) -> Result<Vec<serde_json::Value>, SearchError> {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&server)
            .await;

        client_for_server(&server).search(&SearchQuery::new("laptop")).await
    }

    #[test]
    fn products_list_is_returned_in_order() {
        let products = parse_products(json!({
            "products": [{ "name": "a" }, { "name": "b" }],
            "meta": { "count": 2 }
        }))
        .expect("products");

        assert_eq!(products, vec![json!({ "name": "a" }), json!({ "name": "b" })]);
    }

    #[test]
    fn missing_products_key_means_no_results() {
        assert_eq!(parse_products(json!({})), Ok(Vec::new()));
        assert_eq!(parse_products(json!({ "products": null })), Ok(Vec::new()));
    }

    #[test]
    fn non_list_products_are_malformed() {
        assert!(matches!(
            parse_products(json!({ "products": "none" })),
            Err(SearchError::MalformedResponse(_))
        ));
        assert!(matches!(parse_products(json!([1, 2])), Err(SearchError::MalformedResponse(_))));
    }

    #[test]
    fn error_bodies_are_truncated_on_char_boundaries() {
        assert_eq!(truncate("سلام دنیا", 4), "سلام...");
        assert_eq!(truncate("short", 10), "short");
    }

    #[test]
    fn debug_output_hides_token() {
        let client = MarketplaceClient::new(
            "https://example.invalid/search",
            "personal-token-value".to_string().into(),
            Duration::from_secs(1),
        )
        .expect("client");

        assert!(!format!("{client:?}").contains("personal-token-value"));
    }

    #[tokio::test]
    async fn search_sends_query_filters_and_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(header("authorization", "Bearer tok"))
            .and(query_param("q", "لپ‌تاپ"))
            .and(query_param("filters.freeShipping", "1"))
            .and(query_param("filters.maxPrice", "5"))
            .and(query_param("filters.minRating", "4"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "products": [{ "name": "a" }] })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let query = SearchQuery::new("لپ‌تاپ").with_free_shipping(true).with_price_range(None, Some(5));
        let products = client_for_server(&server).search(&query).await.expect("products");

        assert_eq!(products, vec![json!({ "name": "a" })]);
    }

    #[tokio::test]
    async fn unset_price_bounds_are_not_sent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "products": [] })))
            .mount(&server)
            .await;

        client_for_server(&server).search(&SearchQuery::new("honey")).await.expect("products");

        let requests = server.received_requests().await.expect("recorded requests");
        let query = requests[0].url.query().unwrap_or_default().to_string();
        assert!(!query.contains("maxPrice"));
        assert!(!query.contains("minPrice"));
        assert!(query.contains("filters.freeShipping=0"));
    }

    #[tokio::test]
    async fn credential_rejection_is_unauthorized() {
        assert_eq!(respond_with(401, "nope").await, Err(SearchError::Unauthorized { status: 401 }));
        assert_eq!(respond_with(403, "nope").await, Err(SearchError::Unauthorized { status: 403 }));
    }

    #[tokio::test]
    async fn server_failure_is_rejected_with_body() {
        assert_eq!(
            respond_with(500, "boom").await,
            Err(SearchError::Rejected { status: 500, body: "boom".to_string() })
        );
    }

    #[tokio::test]
    async fn non_json_success_body_is_malformed() {
        let result = respond_with(200, "<html>maintenance</html>").await;
        assert!(matches!(result, Err(SearchError::MalformedResponse(_))));
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_a_transport_error() {
        let client = MarketplaceClient::new(
            "http://127.0.0.1:9/search",
            "token".to_string().into(),
            Duration::from_secs(2),
        )
        .expect("client");

        let result = client.search(&SearchQuery::new("laptop")).await;
        assert!(matches!(result, Err(SearchError::Transport(_))));
    }
}
