//! Reqwest-based Admin API client.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use tracing::instrument;

use callshelf_core::CustomerId;

use crate::config::ShopifyConfig;

use super::ShopifyError;
use super::types::{
    CreateMetafield, Metafield, MetafieldEnvelope, MetafieldPayload, MetafieldsEnvelope,
    UpdateMetafield,
};

/// Bounded timeout applied to every outbound request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Value type tag written with every list metafield.
///
/// The canonical list encoding is a JSON array of strings, so the record is
/// declared as `json`. Reads and writes must agree on this; a mismatched
/// type tag on an existing record means some other writer is involved.
pub(crate) const LIST_VALUE_TYPE: &str = "json";

/// Shopify Admin API client.
///
/// Cheaply cloneable handle over a shared HTTP client with the access token
/// installed as a default header.
#[derive(Clone)]
pub struct AdminClient {
    inner: Arc<AdminClientInner>,
}

struct AdminClientInner {
    client: reqwest::Client,
    store: String,
    api_version: String,
}

impl AdminClient {
    /// Create a new Admin API client.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError::Parse` if the configured token cannot be used
    /// as a header value, or `ShopifyError::Http` if the HTTP client fails
    /// to build.
    pub fn new(config: &ShopifyConfig) -> Result<Self, ShopifyError> {
        let mut headers = HeaderMap::new();

        let mut token = HeaderValue::from_str(config.admin_token.expose_secret())
            .map_err(|e| ShopifyError::Parse(format!("invalid access token format: {e}")))?;
        // Keep the token out of any header Debug output.
        token.set_sensitive(true);
        headers.insert("X-Shopify-Access-Token", token);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            inner: Arc::new(AdminClientInner {
                client,
                store: config.store.clone(),
                api_version: config.api_version.clone(),
            }),
        })
    }

    /// Get the store domain.
    #[must_use]
    pub fn store(&self) -> &str {
        &self.inner.store
    }

    fn url(&self, path: &str) -> String {
        format!(
            "https://{}/admin/api/{}/{path}",
            self.inner.store, self.inner.api_version
        )
    }

    // =========================================================================
    // Metafield methods (REST)
    // =========================================================================

    /// Look up a customer metafield by namespace and key.
    ///
    /// Returns `Ok(None)` when no record exists at that coordinate. At most
    /// one record should exist per (customer, namespace, key); if Shopify
    /// ever returns more than one, only the first is honored.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error
    /// response.
    #[instrument(skip(self), fields(customer = %customer))]
    pub async fn get_metafield(
        &self,
        customer: &CustomerId,
        namespace: &str,
        key: &str,
    ) -> Result<Option<Metafield>, ShopifyError> {
        let url = self.url(&format!("customers/{}/metafields.json", customer.as_str()));

        let response = self
            .inner
            .client
            .get(&url)
            .query(&[("namespace", namespace), ("key", key)])
            .send()
            .await?;

        let envelope: MetafieldsEnvelope = self.parse_response(response).await?;
        Ok(envelope.metafields.into_iter().next())
    }

    /// Create a metafield on a customer.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error
    /// response.
    #[instrument(skip(self, value), fields(customer = %customer))]
    pub async fn create_metafield(
        &self,
        customer: &CustomerId,
        namespace: &str,
        key: &str,
        value: &str,
    ) -> Result<Metafield, ShopifyError> {
        let url = self.url("metafields.json");

        let payload = MetafieldPayload {
            metafield: CreateMetafield {
                namespace,
                key,
                value_type: LIST_VALUE_TYPE,
                value,
                owner_id: customer.as_str(),
                owner_resource: "customer",
            },
        };

        let response = self.inner.client.post(&url).json(&payload).send().await?;
        let envelope: MetafieldEnvelope = self.parse_response(response).await?;
        Ok(envelope.metafield)
    }

    /// Update an existing metafield by record ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error
    /// response.
    #[instrument(skip(self, value))]
    pub async fn update_metafield(&self, id: i64, value: &str) -> Result<Metafield, ShopifyError> {
        let url = self.url(&format!("metafields/{id}.json"));

        let payload = MetafieldPayload {
            metafield: UpdateMetafield {
                id,
                value_type: LIST_VALUE_TYPE,
                value,
            },
        };

        let response = self.inner.client.put(&url).json(&payload).send().await?;
        let envelope: MetafieldEnvelope = self.parse_response(response).await?;
        Ok(envelope.metafield)
    }

    // =========================================================================
    // Response handling
    // =========================================================================

    /// Handle an API response and parse the JSON body.
    pub(crate) async fn parse_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ShopifyError> {
        let status = response.status();

        if status.is_success() {
            return response
                .json()
                .await
                .map_err(|e| ShopifyError::Parse(format!("failed to parse response: {e}")));
        }

        Err(Self::parse_error(response).await)
    }

    /// Map a non-2xx response to an error, keeping the remote detail payload.
    async fn parse_error(response: reqwest::Response) -> ShopifyError {
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            return ShopifyError::RateLimited(retry_after);
        }

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return ShopifyError::Unauthorized(
                "Shopify rejected the access token".to_string(),
            );
        }

        let text = response.text().await.unwrap_or_default();
        let detail = serde_json::from_str(&text).unwrap_or(serde_json::Value::String(text));

        ShopifyError::Api {
            status: status.as_u16(),
            detail,
        }
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.inner.client
    }

    pub(crate) fn graphql_url(&self) -> String {
        self.url("graphql.json")
    }
}

impl std::fmt::Debug for AdminClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminClient")
            .field("store", &self.inner.store)
            .field("api_version", &self.inner.api_version)
            .finish_non_exhaustive()
    }
}
