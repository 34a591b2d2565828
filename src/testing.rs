// Implementações em memória dos stores, usadas pelos testes.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::{
    common::error::AppError,
    db::{ItemStore, PointStore},
    models::{
        item::Item,
        point::{NewPoint, Point, PointFilter},
    },
};

#[derive(Default)]
struct Tables {
    items: Vec<Item>,
    points: Vec<Point>,
    point_items: Vec<(i32, i32)>,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn with_items(items: &[(i32, &str, &str)]) -> Self {
        let items = items
            .iter()
            .map(|&(id, title, image)| Item {
                id,
                title: title.to_string(),
                image: image.to_string(),
            })
            .collect();
        Self {
            tables: Mutex::new(Tables { items, ..Default::default() }),
        }
    }

    pub fn rename_image(&self, id: i32, image: &str) {
        let mut tables = self.tables.lock().unwrap();
        if let Some(item) = tables.items.iter_mut().find(|i| i.id == id) {
            item.image = image.to_string();
        }
    }
}

#[async_trait]
impl ItemStore for MemoryStore {
    async fn find_all(&self) -> Result<Vec<Item>, AppError> {
        let mut items = self.tables.lock().unwrap().items.clone();
        items.sort_by_key(|i| i.id);
        Ok(items)
    }

    async fn find_by_point(&self, point_id: i32) -> Result<Vec<Item>, AppError> {
        let tables = self.tables.lock().unwrap();
        let mut items: Vec<Item> = tables
            .items
            .iter()
            .filter(|i| tables.point_items.contains(&(point_id, i.id)))
            .cloned()
            .collect();
        items.sort_by_key(|i| i.id);
        Ok(items)
    }
}

#[async_trait]
impl PointStore for MemoryStore {
    async fn create(&self, point: &NewPoint) -> Result<Point, AppError> {
        let mut tables = self.tables.lock().unwrap();
        if point.items.iter().any(|id| !tables.items.iter().any(|i| i.id == *id)) {
            return Err(AppError::UnknownItem);
        }

        let created = Point {
            id: tables.points.len() as i32 + 1,
            name: point.name.clone(),
            email: point.email.clone(),
            whatsapp: point.whatsapp.clone(),
            latitude: point.latitude,
            longitude: point.longitude,
            city: point.city.clone(),
            uf: point.uf.clone(),
        };
        tables.points.push(created.clone());
        for item_id in &point.items {
            tables.point_items.push((created.id, *item_id));
        }
        Ok(created)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Point>, AppError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.points.iter().find(|p| p.id == id).cloned())
    }

    async fn find_filtered(&self, filter: &PointFilter) -> Result<Vec<Point>, AppError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .points
            .iter()
            .filter(|p| filter.city.as_ref().is_none_or(|c| &p.city == c))
            .filter(|p| filter.uf.as_ref().is_none_or(|u| &p.uf == u))
            .filter(|p| {
                filter.items.is_empty()
                    || filter
                        .items
                        .iter()
                        .any(|id| tables.point_items.contains(&(p.id, *id)))
            })
            .cloned()
            .collect())
    }
}

/// Store cujo banco está sempre fora do ar.
pub struct FailingItemStore;

#[async_trait]
impl ItemStore for FailingItemStore {
    async fn find_all(&self) -> Result<Vec<Item>, AppError> {
        Err(AppError::StorageUnavailable(sqlx::Error::PoolTimedOut))
    }

    async fn find_by_point(&self, _point_id: i32) -> Result<Vec<Item>, AppError> {
        Err(AppError::StorageUnavailable(sqlx::Error::PoolTimedOut))
    }
}

/// Sobe o router numa porta efêmera e devolve a URL base.
pub async fn serve(router: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}
