// src/docs.rs

use utoipa::OpenApi;
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Items ---
        handlers::items::list_items,

        // --- Points ---
        handlers::points::create_point,
        handlers::points::list_points,
        handlers::points::get_point,
    ),
    components(
        schemas(
            models::item::ItemView,
            models::point::Point,
            models::point::NewPoint,
            models::point::PointDetail,
        )
    ),
    tags(
        (name = "Items", description = "Catálogo de itens de coleta"),
        (name = "Points", description = "Cadastro e busca de pontos de coleta")
    )
)]
pub struct ApiDoc;
