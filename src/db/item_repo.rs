// src/db/item_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;

use crate::{common::error::AppError, models::item::Item};

/// Leitura do catálogo de itens. O serviço só enxerga este trait.
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Todos os itens, em ordem de id. Falha inteira ou resultado completo.
    async fn find_all(&self) -> Result<Vec<Item>, AppError>;

    /// Itens aceitos por um ponto.
    async fn find_by_point(&self, point_id: i32) -> Result<Vec<Item>, AppError>;
}

// O repositório de itens, responsável pelas consultas à tabela 'items'
#[derive(Clone)]
pub struct ItemRepository {
    pool: PgPool,
}

impl ItemRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ItemStore for ItemRepository {
    async fn find_all(&self) -> Result<Vec<Item>, AppError> {
        let items = sqlx::query_as::<_, Item>("SELECT id, title, image FROM items ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(items)
    }

    async fn find_by_point(&self, point_id: i32) -> Result<Vec<Item>, AppError> {
        let items = sqlx::query_as::<_, Item>(
            r#"
            SELECT i.id, i.title, i.image
            FROM items i
            JOIN point_items pi ON pi.item_id = i.id
            WHERE pi.point_id = $1
            ORDER BY i.id
            "#,
        )
        .bind(point_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }
}
