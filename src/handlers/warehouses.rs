// src/handlers/warehouses.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    models::catalog::{CreateWarehousePayload, UpdateWarehousePayload},
};

pub async fn create_warehouse(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateWarehousePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let warehouse = app_state
        .catalog_service
        .create_warehouse(&payload.name, payload.location.as_deref())
        .await?;

    Ok((StatusCode::CREATED, Json(warehouse)))
}

pub async fn list_warehouses(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let warehouses = app_state.catalog_service.list_warehouses().await?;
    Ok(Json(warehouses))
}

pub async fn get_warehouse(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let warehouse = app_state.catalog_service.get_warehouse(id).await?;
    Ok(Json(warehouse))
}

pub async fn update_warehouse(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateWarehousePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let warehouse = app_state
        .catalog_service
        .update_warehouse(id, payload.name.as_deref(), payload.location.as_deref())
        .await?;

    Ok(Json(warehouse))
}

pub async fn delete_warehouse(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.catalog_service.delete_warehouse(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
