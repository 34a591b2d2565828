// Helpers comuns aos clientes HTTP do formulário.

use std::time::Duration;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Client com timeout fixo. Todas as chamadas de saída passam por ele.
pub fn build_client(timeout: Duration) -> anyhow::Result<reqwest::Client> {
    let client = reqwest::Client::builder().timeout(timeout).build()?;
    Ok(client)
}

// Falha de transporte ou de status, antes de virar um `ClientError`
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("requisição falhou: {0}")]
    Transport(reqwest::Error),
    #[error("HTTP {0}")]
    Status(StatusCode),
    #[error("resposta inválida: {0}")]
    Decode(reqwest::Error),
}

pub async fn get_json<T: DeserializeOwned>(
    client: &reqwest::Client,
    url: &str,
) -> Result<T, FetchError> {
    let response = client
        .get(url)
        .header("Accept", "application/json")
        .send()
        .await
        .map_err(|e| {
            tracing::error!(url = %url, error = %e, "upstream request failed");
            FetchError::Transport(e)
        })?;

    let status = response.status();
    if !status.is_success() {
        tracing::warn!(url = %url, status = %status, "upstream returned error");
        return Err(FetchError::Status(status));
    }

    response.json::<T>().await.map_err(|e| {
        tracing::error!(url = %url, error = %e, "failed to parse upstream response");
        FetchError::Decode(e)
    })
}
