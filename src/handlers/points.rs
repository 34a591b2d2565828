// src/handlers/points.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::i18n::Locale,
    models::point::{NewPoint, Point, PointDetail, PointQuery},
};

// POST /points
#[utoipa::path(
    post,
    path = "/points",
    tag = "Points",
    request_body = NewPoint,
    responses(
        (status = 201, description = "Ponto criado", body = Point),
        (status = 400, description = "Item de coleta inexistente")
    )
)]
pub async fn create_point(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<NewPoint>,
) -> Result<impl IntoResponse, ApiError> {
    let point = app_state
        .point_service
        .create_point(payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(point)))
}

// GET /points?city=&uf=&items=
#[utoipa::path(
    get,
    path = "/points",
    tag = "Points",
    params(PointQuery),
    responses(
        (status = 200, description = "Pontos filtrados", body = [Point]),
        (status = 400, description = "Filtro de itens inválido")
    )
)]
pub async fn list_points(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(query): Query<PointQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let points = app_state
        .point_service
        .list_points(query)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(points)))
}

// GET /points/{id}
#[utoipa::path(
    get,
    path = "/points/{id}",
    tag = "Points",
    params(("id" = i32, Path, description = "Id do ponto")),
    responses(
        (status = 200, description = "Ponto e seus itens", body = PointDetail),
        (status = 404, description = "Ponto não encontrado")
    )
)]
pub async fn get_point(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let detail = app_state
        .point_service
        .get_point(id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(detail)))
}
