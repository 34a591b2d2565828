// src/form/config.rs

use std::{env, time::Duration};

use anyhow::Context;

use crate::form::state::Position;

pub const IBGE_STATES_URL: &str = "https://servicodados.ibge.gov.br/api/v1/localidades/estados";

/// Configuração do cliente do formulário.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    // Base da API do backend (GET /items, POST /points)
    pub api_url: String,
    pub states_url: String,
    pub timeout: Duration,
    // Centro do mapa quando a geolocalização falha
    pub fallback_position: Position,
    // Posição do dispositivo, se conhecida
    pub device_position: Option<Position>,
}

impl ClientConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let parse_f64 = |key: &str| -> anyhow::Result<Option<f64>> {
            lookup(key)
                .map(|raw| raw.parse::<f64>().with_context(|| format!("{key} inválida: {raw}")))
                .transpose()
        };

        let timeout_secs = match lookup("HTTP_TIMEOUT_SECS") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("HTTP_TIMEOUT_SECS inválido: {raw}"))?,
            None => 10,
        };

        let fallback_position = Position {
            latitude: parse_f64("FALLBACK_LATITUDE")?.unwrap_or(0.0),
            longitude: parse_f64("FALLBACK_LONGITUDE")?.unwrap_or(0.0),
        };

        let device_position = match (parse_f64("DEVICE_LATITUDE")?, parse_f64("DEVICE_LONGITUDE")?) {
            (Some(latitude), Some(longitude)) => Some(Position { latitude, longitude }),
            _ => None,
        };

        Ok(Self {
            api_url: lookup("ECOLETA_API_URL").unwrap_or_else(|| "http://localhost:3333".to_string()),
            states_url: lookup("IBGE_STATES_URL").unwrap_or_else(|| IBGE_STATES_URL.to_string()),
            timeout: Duration::from_secs(timeout_secs),
            fallback_position,
            device_position,
        })
    }
}
