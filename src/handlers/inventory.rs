// src/handlers/inventory.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::inventory::{NewStockMovement, StockMovementFilters, StockMovementType},
};
use crate::common::pagination::PaginationQuery;

// ---
// Payload: criação de movimentação
// ---
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateMovementPayload {
    pub product_id: Uuid,

    #[serde(rename = "type")]
    pub movement_type: StockMovementType,

    #[validate(range(min = 1, message = "A quantidade deve ser maior que zero."))]
    pub quantity: i64,

    pub from_warehouse_id: Option<Uuid>,
    pub to_warehouse_id: Option<Uuid>,
    pub reference_id: Option<Uuid>,
    pub notes: Option<String>,
}

pub async fn create_movement(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<CreateMovementPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let movement = app_state
        .movement_service
        .apply(NewStockMovement {
            product_id: payload.product_id,
            movement_type: payload.movement_type,
            quantity: payload.quantity,
            from_warehouse_id: payload.from_warehouse_id,
            to_warehouse_id: payload.to_warehouse_id,
            reference_id: payload.reference_id,
            notes: payload.notes,
            created_by: Some(user.id),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(movement)))
}

// Query string da listagem: filtros + paginação juntos.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovementListQuery {
    pub product_id: Option<Uuid>,
    pub warehouse_id: Option<Uuid>,
    #[serde(rename = "type")]
    pub movement_type: Option<StockMovementType>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

pub async fn list_movements(
    State(app_state): State<AppState>,
    Query(query): Query<MovementListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let (page, limit) = PaginationQuery { page: query.page, limit: query.limit }.sanitize();

    let filters = StockMovementFilters {
        product_id: query.product_id,
        warehouse_id: query.warehouse_id,
        movement_type: query.movement_type,
        start_date: query.start_date,
        end_date: query.end_date,
    };

    let result = app_state
        .movement_service
        .list_movements(&filters, page, limit)
        .await?;

    Ok(Json(result))
}

pub async fn get_movement(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let movement = app_state.movement_service.get_movement(id).await?;
    Ok(Json(movement))
}

// ---
// Saldos
// ---

pub async fn balances_by_product(
    State(app_state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let balances = app_state.movement_service.balances_by_product(product_id).await?;
    Ok(Json(balances))
}

pub async fn balances_by_warehouse(
    State(app_state): State<AppState>,
    Path(warehouse_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let balances = app_state
        .movement_service
        .balances_by_warehouse(warehouse_id)
        .await?;
    Ok(Json(balances))
}
