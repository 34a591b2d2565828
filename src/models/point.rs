// src/models/point.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

use crate::models::item::ItemView;

// --- Ponto de coleta (tabela 'points') ---
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Point {
    pub id: i32,
    #[schema(example = "Mercado Acme")]
    pub name: String,
    #[schema(example = "contato@acme.com")]
    pub email: String,
    #[schema(example = "11999999999")]
    pub whatsapp: String,
    pub latitude: f64,
    pub longitude: f64,
    #[schema(example = "São Paulo")]
    pub city: String,
    #[schema(example = "SP")]
    pub uf: String,
}

// Corpo do POST /points. Exatamente os campos que o formulário envia.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct NewPoint {
    pub name: String,
    pub email: String,
    pub whatsapp: String,
    pub uf: String,
    pub city: String,
    pub latitude: f64,
    pub longitude: f64,
    pub items: Vec<i32>,
}

// Resposta do GET /points/{id}
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PointDetail {
    pub point: Point,
    pub items: Vec<ItemView>,
}

// Query string do GET /points (?city=&uf=&items=1,2)
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PointQuery {
    pub city: Option<String>,
    pub uf: Option<String>,
    /// Ids separados por vírgula; casa pontos que aceitam QUALQUER um deles.
    pub items: Option<String>,
}

// Filtro já interpretado, pronto para o repositório.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointFilter {
    pub city: Option<String>,
    pub uf: Option<String>,
    pub items: Vec<i32>,
}
