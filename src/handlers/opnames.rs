// src/handlers/opnames.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{error::AppError, pagination::PaginationQuery},
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::opname::{
        NewStockOpname, NewStockOpnameItem, StockOpnameFilters, StockOpnameStatus,
    },
};

// ---
// Payload: criação do stock opname (cabeçalho + linhas contadas)
// ---
#[derive(Debug, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateOpnameItemPayload {
    pub product_id: Uuid,

    // A quantidade de sistema NÃO vem daqui: é fotografada do saldo no
    // momento da criação.
    #[validate(range(min = 0, message = "A quantidade física não pode ser negativa."))]
    pub physical_quantity: i64,

    pub notes: Option<String>,
    pub batch_number: Option<String>,
    pub expiry_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateOpnamePayload {
    pub warehouse_id: Uuid,
    pub count_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,

    #[validate(length(min = 1, message = "Informe ao menos um item contado."))]
    #[validate(nested)]
    pub items: Vec<CreateOpnameItemPayload>,
}

pub async fn create_opname(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<CreateOpnamePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let opname = app_state
        .opname_service
        .create(NewStockOpname {
            warehouse_id: payload.warehouse_id,
            count_date: payload.count_date.unwrap_or_else(Utc::now),
            notes: payload.notes,
            items: payload
                .items
                .into_iter()
                .map(|item| NewStockOpnameItem {
                    product_id: item.product_id,
                    physical_quantity: item.physical_quantity,
                    notes: item.notes,
                    batch_number: item.batch_number,
                    expiry_date: item.expiry_date,
                })
                .collect(),
            created_by: user.id,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(opname)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpnameListQuery {
    pub warehouse_id: Option<Uuid>,
    pub status: Option<StockOpnameStatus>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

pub async fn list_opnames(
    State(app_state): State<AppState>,
    Query(query): Query<OpnameListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let (page, limit) = PaginationQuery { page: query.page, limit: query.limit }.sanitize();

    let filters = StockOpnameFilters {
        warehouse_id: query.warehouse_id,
        status: query.status,
        start_date: query.start_date,
        end_date: query.end_date,
    };

    let result = app_state.opname_service.list(&filters, page, limit).await?;
    Ok(Json(result))
}

pub async fn get_opname(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let opname = app_state.opname_service.get(id).await?;
    Ok(Json(opname))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetStatusPayload {
    pub status: StockOpnameStatus,
}

pub async fn set_opname_status(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<SetStatusPayload>,
) -> Result<impl IntoResponse, AppError> {
    let opname = app_state
        .opname_service
        .set_status(id, payload.status, user.id)
        .await?;
    Ok(Json(opname))
}

pub async fn process_opname(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let opname = app_state.opname_service.process(id, user.id).await?;
    Ok(Json(opname))
}
