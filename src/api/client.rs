use std::time::Duration;

use reqwest::{Client, StatusCode};

use super::error::ApiError;
use super::types::ProductPage;

/// HTTP client for the public products listing endpoint.
pub struct ProductsClient {
    client: Client,
    base_url: String,
}

impl ProductsClient {
    /// Create a client for the given API origin with a per-request timeout.
    ///
    /// The base URL is taken as-is (no trailing slash), so tests can point
    /// the client at a local mock server.
    pub fn new(base_url: String, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("failed to build HTTP client");
        Self { client, base_url }
    }

    /// Fetch one page of the products listing.
    ///
    /// Anything short of a 200 response carrying a JSON product page is an
    /// [`ApiError`]; the caller decides whether to retry.
    pub async fn fetch_page(&self, page: u32, size: u32) -> Result<ProductPage, ApiError> {
        let url = format!("{}/api/products?page={page}&size={size}", self.base_url);

        let response = self.client.get(&url).send().await.map_err(classify)?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(ApiError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(classify)?;
        serde_json::from_str::<ProductPage>(&body).map_err(|e| ApiError::InvalidJson(e.to_string()))
    }
}

/// Timeouts can surface at send time or while reading the body; fold both
/// into the dedicated variant so retry logging names them as such.
fn classify(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        ApiError::Timeout
    } else {
        ApiError::Network(err)
    }
}
