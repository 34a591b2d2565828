// src/form/localities.rs

use async_trait::async_trait;
use serde::Deserialize;

use crate::form::{
    error::ClientError,
    http::{self, FetchError},
};

/// Consulta de UFs e municípios (API de localidades do IBGE).
#[async_trait]
pub trait LocalityLookup: Send + Sync {
    async fn states(&self) -> Result<Vec<String>, ClientError>;

    async fn cities(&self, uf: &str) -> Result<Vec<String>, ClientError>;
}

// Só os campos que usamos; o resto da resposta é ignorado.
#[derive(Debug, Deserialize)]
struct UfResponse {
    sigla: String,
}

#[derive(Debug, Deserialize)]
struct CityResponse {
    nome: String,
}

#[derive(Clone)]
pub struct IbgeClient {
    http: reqwest::Client,
    // .../localidades/estados
    states_url: String,
}

impl IbgeClient {
    pub fn new(http: reqwest::Client, states_url: impl Into<String>) -> Self {
        let states_url: String = states_url.into();
        Self {
            http,
            states_url: states_url.trim_end_matches('/').to_string(),
        }
    }
}

fn lookup_failed(err: FetchError) -> ClientError {
    ClientError::UpstreamLookupFailed(err.to_string())
}

#[async_trait]
impl LocalityLookup for IbgeClient {
    async fn states(&self) -> Result<Vec<String>, ClientError> {
        let ufs: Vec<UfResponse> = http::get_json(&self.http, &self.states_url)
            .await
            .map_err(lookup_failed)?;
        Ok(ufs.into_iter().map(|uf| uf.sigla).collect())
    }

    async fn cities(&self, uf: &str) -> Result<Vec<String>, ClientError> {
        let url = format!("{}/{}/municipios", self.states_url, uf);
        let cities: Vec<CityResponse> = http::get_json(&self.http, &url)
            .await
            .map_err(lookup_failed)?;
        Ok(cities.into_iter().map(|city| city.nome).collect())
    }
}
