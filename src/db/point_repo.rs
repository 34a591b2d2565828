// src/db/point_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;

use crate::{
    common::error::AppError,
    models::point::{NewPoint, Point, PointFilter},
};

#[async_trait]
pub trait PointStore: Send + Sync {
    /// Grava o ponto e seus itens de forma atômica.
    async fn create(&self, point: &NewPoint) -> Result<Point, AppError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<Point>, AppError>;

    async fn find_filtered(&self, filter: &PointFilter) -> Result<Vec<Point>, AppError>;
}

#[derive(Clone)]
pub struct PointRepository {
    pool: PgPool,
}

impl PointRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PointStore for PointRepository {
    async fn create(&self, point: &NewPoint) -> Result<Point, AppError> {
        // --- INÍCIO DA TRANSAÇÃO ---
        let mut tx = self.pool.begin().await?;

        let created = sqlx::query_as::<_, Point>(
            r#"
            INSERT INTO points (name, email, whatsapp, latitude, longitude, city, uf)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, name, email, whatsapp, latitude, longitude, city, uf
            "#,
        )
        .bind(&point.name)
        .bind(&point.email)
        .bind(&point.whatsapp)
        .bind(point.latitude)
        .bind(point.longitude)
        .bind(&point.city)
        .bind(&point.uf)
        .fetch_one(&mut *tx)
        .await?;

        if !point.items.is_empty() {
            sqlx::query(
                "INSERT INTO point_items (point_id, item_id) SELECT $1, UNNEST($2::int4[])",
            )
            .bind(created.id)
            .bind(&point.items)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                // Item inexistente viola a FK de point_items.item_id
                if let sqlx::Error::Database(db_err) = &e {
                    if db_err.is_foreign_key_violation() {
                        return AppError::UnknownItem;
                    }
                }
                e.into()
            })?;
        }

        tx.commit().await?;
        // --- FIM DA TRANSAÇÃO ---

        Ok(created)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Point>, AppError> {
        let point = sqlx::query_as::<_, Point>(
            "SELECT id, name, email, whatsapp, latitude, longitude, city, uf FROM points WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(point)
    }

    async fn find_filtered(&self, filter: &PointFilter) -> Result<Vec<Point>, AppError> {
        // Filtros ausentes (NULL / array vazio) não restringem nada.
        let points = sqlx::query_as::<_, Point>(
            r#"
            SELECT p.id, p.name, p.email, p.whatsapp, p.latitude, p.longitude, p.city, p.uf
            FROM points p
            WHERE ($1::text IS NULL OR p.city = $1)
              AND ($2::text IS NULL OR p.uf = $2)
              AND (
                cardinality($3::int4[]) = 0
                OR EXISTS (
                    SELECT 1 FROM point_items pi
                    WHERE pi.point_id = p.id AND pi.item_id = ANY($3)
                )
              )
            ORDER BY p.id
            "#,
        )
        .bind(filter.city.as_deref())
        .bind(filter.uf.as_deref())
        .bind(&filter.items)
        .fetch_all(&self.pool)
        .await?;
        Ok(points)
    }
}
