pub mod item_repo;
pub use item_repo::{ItemRepository, ItemStore};
pub mod point_repo;
pub use point_repo::{PointRepository, PointStore};

use std::time::Duration;

use sqlx::{PgPool, postgres::PgPoolOptions};

use crate::config::Settings;

/// Abre a pool e roda as migrações. Chamado uma vez no boot.
pub async fn connect(settings: &Settings) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(settings.db_max_connections)
        .acquire_timeout(Duration::from_secs(3))
        .connect(&settings.database_url)
        .await?;

    tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

    sqlx::migrate!().run(&pool).await?;

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    Ok(pool)
}
