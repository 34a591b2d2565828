// src/form/api.rs

use async_trait::async_trait;
use serde::Deserialize;

use crate::{
    form::{
        error::ClientError,
        http::{self, FetchError},
        state::PointCreationRequest,
    },
    models::item::ItemView,
};

/// O backend do Ecoleta, visto pelo formulário.
#[async_trait]
pub trait PointsApi: Send + Sync {
    async fn list_items(&self) -> Result<Vec<ItemView>, ClientError>;

    async fn create_point(&self, request: &PointCreationRequest) -> Result<(), ClientError>;
}

// Corpo de erro padrão do backend: {"error": "..."}
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl PointsApi for BackendClient {
    async fn list_items(&self) -> Result<Vec<ItemView>, ClientError> {
        let url = format!("{}/items", self.base_url);
        http::get_json(&self.http, &url)
            .await
            .map_err(|e: FetchError| ClientError::StorageUnavailable(e.to_string()))
    }

    async fn create_point(&self, request: &PointCreationRequest) -> Result<(), ClientError> {
        let url = format!("{}/points", self.base_url);

        let response = self
            .http
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(url = %url, error = %e, "create point request failed");
                ClientError::SubmissionFailed(e.to_string())
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        // Usa a mensagem do backend quando houver
        let detail = match response.json::<ErrorBody>().await {
            Ok(body) => format!("HTTP {status}: {}", body.error),
            Err(_) => format!("HTTP {status}"),
        };
        tracing::warn!(url = %url, status = %status, "backend rejected point");
        Err(ClientError::SubmissionFailed(detail))
    }
}
