// src/config.rs

use std::{env, sync::Arc};

use anyhow::Context;
use sqlx::PgPool;

use crate::{
    db::{ItemRepository, ItemStore, PointRepository, PointStore},
    services::{CatalogService, PointService},
};

const DEFAULT_PORT: u16 = 3333;

/// Configuração do servidor, lida do ambiente (e do .env, se existir).
#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    // Base das URLs de imagem: `<app_base_url>/uploads/<arquivo>`
    pub app_base_url: String,
    pub uploads_dir: String,
    pub db_max_connections: u32,
    // None = qualquer origem
    pub allowed_origins: Option<Vec<String>>,
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Monta a configuração a partir de qualquer fonte chave -> valor.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").context("DATABASE_URL deve ser definida")?;

        let port = match lookup("PORT") {
            Some(raw) => raw.parse().with_context(|| format!("PORT inválida: {raw}"))?,
            None => DEFAULT_PORT,
        };

        let db_max_connections = match lookup("DB_MAX_CONNECTIONS") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("DB_MAX_CONNECTIONS inválido: {raw}"))?,
            None => 5,
        };

        let allowed_origins = lookup("ALLOWED_ORIGINS")
            .map(|s| {
                s.split(',')
                    .map(|origin| origin.trim().to_string())
                    .filter(|origin| !origin.is_empty())
                    .collect::<Vec<_>>()
            })
            .filter(|origins| !origins.is_empty());

        Ok(Self {
            database_url,
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            app_base_url: lookup("APP_BASE_URL")
                .unwrap_or_else(|| format!("http://localhost:{port}")),
            uploads_dir: lookup("UPLOADS_DIR").unwrap_or_else(|| "uploads".to_string()),
            db_max_connections,
            allowed_origins,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub catalog_service: CatalogService,
    pub point_service: PointService,
}

impl AppState {
    /// Monta o gráfico de dependências sobre a pool já aberta.
    pub fn new(db_pool: PgPool, settings: &Settings) -> Self {
        let item_repo = Arc::new(ItemRepository::new(db_pool.clone()));
        let point_repo = Arc::new(PointRepository::new(db_pool));
        Self::from_stores(item_repo, point_repo, &settings.app_base_url)
    }

    pub fn from_stores(
        item_store: Arc<dyn ItemStore>,
        point_store: Arc<dyn PointStore>,
        app_base_url: &str,
    ) -> Self {
        let catalog_service = CatalogService::new(item_store, app_base_url);
        let point_service = PointService::new(point_store, catalog_service.clone());
        Self {
            catalog_service,
            point_service,
        }
    }
}
