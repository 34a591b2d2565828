// src/models/item.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

// Linha da tabela 'items'. Nunca sai da API do jeito que está no banco.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Item {
    pub id: i32,
    pub title: String,
    // Nome do arquivo salvo em /uploads
    pub image: String,
}

// Projeção pública do item, com a URL da imagem já montada.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ItemView {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Lâmpadas")]
    pub title: String,
    #[schema(example = "http://localhost:3333/uploads/lampadas.svg")]
    pub image_url: String,
}

impl ItemView {
    /// Monta a view a partir da linha do banco: `<base>/uploads/<image>`.
    pub fn from_item(item: Item, base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        Self {
            image_url: format!("{}/uploads/{}", base, item.image),
            id: item.id,
            title: item.title,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(image: &str) -> Item {
        Item { id: 7, title: "Pilhas".into(), image: image.into() }
    }

    #[test]
    fn image_url_is_base_plus_uploads_plus_filename() {
        let view = ItemView::from_item(item("x.png"), "http://cdn.test");
        assert_eq!(view.image_url, "http://cdn.test/uploads/x.png");
        assert_eq!(view.id, 7);
        assert_eq!(view.title, "Pilhas");
    }

    #[test]
    fn trailing_slash_on_base_is_ignored() {
        let view = ItemView::from_item(item("x.png"), "http://cdn.test/");
        assert_eq!(view.image_url, "http://cdn.test/uploads/x.png");
    }

    #[test]
    fn serializes_with_snake_case_image_url() {
        let view = ItemView::from_item(item("oleo.svg"), "http://localhost:3333");
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": 7,
                "title": "Pilhas",
                "image_url": "http://localhost:3333/uploads/oleo.svg"
            })
        );
    }
}
