// src/services/catalog_service.rs

use std::sync::Arc;

use crate::{
    common::error::AppError,
    db::ItemStore,
    models::item::{Item, ItemView},
};

#[derive(Clone)]
pub struct CatalogService {
    item_store: Arc<dyn ItemStore>,
    // Base pública das imagens (APP_BASE_URL)
    base_url: String,
}

impl CatalogService {
    pub fn new(item_store: Arc<dyn ItemStore>, base_url: impl Into<String>) -> Self {
        Self { item_store, base_url: base_url.into() }
    }

    /// Lista os itens de coleta já projetados para o cliente.
    pub async fn list_items(&self) -> Result<Vec<ItemView>, AppError> {
        let items = self.item_store.find_all().await?;
        Ok(self.to_views(items))
    }

    /// Itens aceitos por um ponto, no mesmo formato do catálogo.
    pub async fn items_for_point(&self, point_id: i32) -> Result<Vec<ItemView>, AppError> {
        let items = self.item_store.find_by_point(point_id).await?;
        Ok(self.to_views(items))
    }

    fn to_views(&self, items: Vec<Item>) -> Vec<ItemView> {
        items
            .into_iter()
            .map(|item| ItemView::from_item(item, &self.base_url))
            .collect()
    }
}
