use async_trait::async_trait;
use tracing::{debug, error, instrument, Span};

/// Confirms that a cargo is known to the cargo service
#[async_trait]
pub trait CargoClient: Send + Sync {
    /// Returns false both when the cargo is unknown and when it could not be
    /// verified. Callers never see the failure itself.
    async fn cargo_exists(&self, cargo_id: i64) -> bool;
}

/// [`CargoClient`] backed by the cargo service's `GET {base_url}/{id}` endpoint
#[derive(Clone)]
pub struct HttpCargoClient {
    client: reqwest::Client,
    base_url: String,
    span: Span,
}

impl HttpCargoClient {
    pub fn new(base_url: &str, span: Span) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            span,
        }
    }

    fn cargo_url(&self, cargo_id: i64) -> String {
        format!("{}/{}", self.base_url, cargo_id)
    }
}

#[async_trait]
impl CargoClient for HttpCargoClient {
    #[instrument(parent = &self.span, skip(self))]
    async fn cargo_exists(&self, cargo_id: i64) -> bool {
        let url = self.cargo_url(cargo_id);
        debug!("Checking cargo at {}", url);

        match self.client.get(&url).send().await {
            Ok(response) if response.status().is_success() => true,
            Ok(response) => {
                error!(status = %response.status(), "Cargo by id {} not found", cargo_id);
                false
            }
            Err(e) => {
                error!(error = %e, "Cargo by id {} not found", cargo_id);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[tokio::test]
    async fn test_existing_cargo() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/api/cargos/123");
                then.status(200).json_body(serde_json::json!({"id": 123}));
            })
            .await;

        let client = HttpCargoClient::new(&server.url("/api/cargos"), Span::none());

        assert!(client.cargo_exists(123).await);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_unknown_cargo() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/cargos/404");
                then.status(404);
            })
            .await;

        let client = HttpCargoClient::new(&server.url("/api/cargos"), Span::none());

        assert!(!client.cargo_exists(404).await);
    }

    #[tokio::test]
    async fn test_server_error_counts_as_missing() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/cargos/1");
                then.status(503);
            })
            .await;

        let client = HttpCargoClient::new(&server.url("/api/cargos"), Span::none());

        assert!(!client.cargo_exists(1).await);
    }

    #[tokio::test]
    async fn test_unreachable_service_counts_as_missing() {
        // Nothing listens on port 1
        let client = HttpCargoClient::new("http://127.0.0.1:1/api/cargos", Span::none());

        assert!(!client.cargo_exists(1).await);
    }

    #[test]
    fn test_trailing_slash_is_ignored() {
        let client = HttpCargoClient::new("http://cargo:8080/api/cargos/", Span::none());
        assert_eq!(client.cargo_url(7), "http://cargo:8080/api/cargos/7");
    }
}
