// src/form/geolocation.rs

use async_trait::async_trait;

use crate::form::{error::ClientError, state::Position};

/// Fonte da posição atual do dispositivo.
#[async_trait]
pub trait Geolocator: Send + Sync {
    async fn current_position(&self) -> Result<Position, ClientError>;
}

/// Posição conhecida de antemão (config / GPS externo). `None` = negada.
#[derive(Debug, Clone, Copy)]
pub struct ConfiguredGeolocator(pub Option<Position>);

#[async_trait]
impl Geolocator for ConfiguredGeolocator {
    async fn current_position(&self) -> Result<Position, ClientError> {
        self.0.ok_or_else(|| {
            ClientError::GeolocationUnavailable("posição do dispositivo não configurada".into())
        })
    }
}
