//! HTTP client for the Biblio API
//!
//! Wraps every backend endpoint in a typed method. Non-2xx responses
//! are decoded from the backend's error envelope so callers see the
//! machine-readable code and message instead of raw response text.

use std::time::Duration;

use biblio_common::api::{
    Article, ArticleDraft, ArticlePage, ArticleWithReferences, ErrorEnvelope, Reference,
    ReferenceDraft,
};
use serde::de::DeserializeOwned;
use thiserror::Error;

const USER_AGENT: &str = concat!("biblio-ui/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Client-side request failures
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {status}: {code}: {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    #[error("Decode error: {0}")]
    Decode(String),
}

impl ClientError {
    /// True when the server answered 404 for the requested record.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::Api { status: 404, .. })
    }
}

/// Typed client for the article and reference endpoints
pub struct ArticleClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl ArticleClient {
    /// Create a client for the service at `base_url` (scheme, host, port).
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| ClientError::Network(e.to_string()))?;

        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self {
            http_client,
            base_url,
        })
    }

    /// Fetch one listing page. `params` is the already-derived query
    /// string (filters, sort, page) as key/value pairs.
    pub async fn list_articles(
        &self,
        params: &[(String, String)],
    ) -> Result<ArticlePage, ClientError> {
        let url = format!("{}/article", self.base_url);
        tracing::debug!(url = %url, params = ?params, "Listing articles");

        let response = self
            .http_client
            .get(&url)
            .query(params)
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        decode(response).await
    }

    /// Fetch a single article together with its references.
    pub async fn get_article(&self, article_id: i64) -> Result<ArticleWithReferences, ClientError> {
        let url = format!("{}/article/{}", self.base_url, article_id);
        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        decode(response).await
    }

    pub async fn create_article(&self, draft: &ArticleDraft) -> Result<Article, ClientError> {
        let url = format!("{}/article", self.base_url);
        tracing::debug!(url = %url, "Creating article");

        let response = self
            .http_client
            .post(&url)
            .json(draft)
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        decode(response).await
    }

    pub async fn update_article(
        &self,
        article_id: i64,
        draft: &ArticleDraft,
    ) -> Result<Article, ClientError> {
        let url = format!("{}/article/{}", self.base_url, article_id);
        tracing::debug!(url = %url, "Updating article");

        let response = self
            .http_client
            .put(&url)
            .json(draft)
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        decode(response).await
    }

    /// Delete an article. The server removes its references as well and
    /// returns the deleted record.
    pub async fn delete_article(&self, article_id: i64) -> Result<Article, ClientError> {
        let url = format!("{}/article/{}", self.base_url, article_id);
        tracing::debug!(url = %url, "Deleting article");

        let response = self
            .http_client
            .delete(&url)
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        decode(response).await
    }

    pub async fn list_references(&self, article_id: i64) -> Result<Vec<Reference>, ClientError> {
        let url = format!("{}/article/{}/references", self.base_url, article_id);
        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        decode(response).await
    }

    pub async fn create_reference(
        &self,
        article_id: i64,
        draft: &ReferenceDraft,
    ) -> Result<Reference, ClientError> {
        let url = format!("{}/article/{}/references", self.base_url, article_id);
        tracing::debug!(url = %url, "Creating reference");

        let response = self
            .http_client
            .post(&url)
            .json(draft)
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        decode(response).await
    }

    pub async fn get_reference(
        &self,
        article_id: i64,
        reference_id: i64,
    ) -> Result<Reference, ClientError> {
        let url = format!(
            "{}/article/{}/references/{}",
            self.base_url, article_id, reference_id
        );
        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        decode(response).await
    }

    pub async fn update_reference(
        &self,
        article_id: i64,
        reference_id: i64,
        draft: &ReferenceDraft,
    ) -> Result<Reference, ClientError> {
        let url = format!(
            "{}/article/{}/references/{}",
            self.base_url, article_id, reference_id
        );
        tracing::debug!(url = %url, "Updating reference");

        let response = self
            .http_client
            .put(&url)
            .json(draft)
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        decode(response).await
    }

    pub async fn delete_reference(
        &self,
        article_id: i64,
        reference_id: i64,
    ) -> Result<Reference, ClientError> {
        let url = format!(
            "{}/article/{}/references/{}",
            self.base_url, article_id, reference_id
        );
        tracing::debug!(url = %url, "Deleting reference");

        let response = self
            .http_client
            .delete(&url)
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        decode(response).await
    }
}

/// Turn a response into the expected type, or into `ClientError::Api`
/// built from the error envelope when the status is not 2xx.
async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
    let status = response.status();

    if !status.is_success() {
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        if let Ok(envelope) = serde_json::from_slice::<ErrorEnvelope>(&bytes) {
            return Err(ClientError::Api {
                status: status.as_u16(),
                code: envelope.error.code,
                message: envelope.error.message,
            });
        }

        // Not every error body carries the envelope (404 on an unknown
        // route, for example)
        return Err(ClientError::Api {
            status: status.as_u16(),
            code: "UNKNOWN".to_string(),
            message: String::from_utf8_lossy(&bytes).into_owned(),
        });
    }

    response
        .json()
        .await
        .map_err(|e| ClientError::Decode(e.to_string()))
}
