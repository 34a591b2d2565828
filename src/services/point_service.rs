// src/services/point_service.rs

use std::sync::Arc;

use crate::{
    common::error::AppError,
    db::PointStore,
    models::point::{NewPoint, Point, PointDetail, PointFilter, PointQuery},
    services::catalog_service::CatalogService,
};

#[derive(Clone)]
pub struct PointService {
    point_store: Arc<dyn PointStore>,
    catalog: CatalogService,
}

impl PointService {
    pub fn new(point_store: Arc<dyn PointStore>, catalog: CatalogService) -> Self {
        Self { point_store, catalog }
    }

    // --- CREATE POINT ---
    pub async fn create_point(&self, mut payload: NewPoint) -> Result<Point, AppError> {
        // A chave de point_items é (point_id, item_id): ids repetidos viram um só.
        payload.items.sort_unstable();
        payload.items.dedup();

        let point = self.point_store.create(&payload).await?;
        tracing::info!(
            point_id = point.id,
            items = payload.items.len(),
            "Ponto de coleta criado"
        );
        Ok(point)
    }

    pub async fn get_point(&self, id: i32) -> Result<PointDetail, AppError> {
        let point = self
            .point_store
            .find_by_id(id)
            .await?
            .ok_or(AppError::PointNotFound)?;
        let items = self.catalog.items_for_point(point.id).await?;
        Ok(PointDetail { point, items })
    }

    pub async fn list_points(&self, query: PointQuery) -> Result<Vec<Point>, AppError> {
        let filter = parse_filter(query)?;
        self.point_store.find_filtered(&filter).await
    }
}

/// Interpreta a query string. `items=1, 2,,3` vira `[1, 2, 3]`; vazio não filtra.
pub fn parse_filter(query: PointQuery) -> Result<PointFilter, AppError> {
    let items = match query.items.as_deref() {
        None => Vec::new(),
        Some(raw) => raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                s.parse::<i32>()
                    .map_err(|_| AppError::InvalidItemFilter(s.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?,
    };

    Ok(PointFilter {
        city: query.city.filter(|c| !c.is_empty()),
        uf: query.uf.filter(|u| !u.is_empty()),
        items,
    })
}
