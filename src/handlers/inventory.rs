use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::auth::AuthUser;
use crate::entities::{inventory_record, inventory_transaction, ItemKind, TransactionType};
use crate::errors::ServiceError;
use crate::handlers::common::{
    created_response, validate_input, PaginatedResponse, PaginationParams,
};
use crate::services::stock_ledger::{NewInventoryRecord, RecordFilter, StockAdjustment};
use crate::services::stock_status::StockStatus;
use crate::{ApiResponse, AppState};

/// Inventory record as returned by the API
#[derive(Debug, Serialize, ToSchema)]
pub struct InventoryRecordResponse {
    pub id: Uuid,
    pub item_id: Uuid,
    pub item_kind: ItemKind,
    pub item_name: String,
    pub item_sku: String,
    pub quantity: i32,
    pub minimum_stock: i32,
    pub maximum_stock: Option<i32>,
    pub reorder_point: i32,
    pub unit: String,
    pub stock_status: StockStatus,
    pub needs_reorder: bool,
    pub last_restocked_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<inventory_record::Model> for InventoryRecordResponse {
    fn from(record: inventory_record::Model) -> Self {
        let stock_status = record.stock_status();
        let needs_reorder = record.needs_reorder();
        Self {
            id: record.id,
            item_id: record.item_id,
            item_kind: record.item_kind,
            item_name: record.item_name,
            item_sku: record.item_sku,
            quantity: record.quantity,
            minimum_stock: record.minimum_stock,
            maximum_stock: record.maximum_stock,
            reorder_point: record.reorder_point,
            unit: record.unit,
            stock_status,
            needs_reorder,
            last_restocked_at: record.last_restocked_at,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// Ledger entry as returned by the API
#[derive(Debug, Serialize, ToSchema)]
pub struct TransactionResponse {
    pub id: Uuid,
    pub inventory_record_id: Uuid,
    pub transaction_type: TransactionType,
    pub quantity_change: i32,
    pub quantity_before: i32,
    pub quantity_after: i32,
    pub reference_id: Option<Uuid>,
    pub reference_type: Option<String>,
    pub notes: Option<String>,
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<inventory_transaction::Model> for TransactionResponse {
    fn from(tx: inventory_transaction::Model) -> Self {
        Self {
            id: tx.id,
            inventory_record_id: tx.inventory_record_id,
            transaction_type: tx.transaction_type,
            quantity_change: tx.quantity_change,
            quantity_before: tx.quantity_before,
            quantity_after: tx.quantity_after,
            reference_id: tx.reference_id,
            reference_type: tx.reference_type,
            notes: tx.notes,
            created_by: tx.created_by,
            created_at: tx.created_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateInventoryRecordRequest {
    pub item_id: Uuid,
    pub item_kind: ItemKind,
    #[validate(length(min = 1, max = 255))]
    pub item_name: String,
    #[validate(length(min = 1, max = 64))]
    pub item_sku: String,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub initial_quantity: i32,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub minimum_stock: i32,
    #[validate(range(min = 0))]
    pub maximum_stock: Option<i32>,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub reorder_point: i32,
    #[serde(default = "default_unit")]
    #[validate(length(min = 1, max = 32))]
    pub unit: String,
}

fn default_unit() -> String {
    "unit".to_string()
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AdjustStockRequest {
    pub item_id: Uuid,
    pub item_kind: ItemKind,
    /// Signed quantity change, must be non-zero
    pub delta: i32,
    #[serde(default = "default_transaction_type")]
    pub transaction_type: TransactionType,
    pub reference_id: Option<Uuid>,
    #[validate(length(max = 64))]
    pub reference_type: Option<String>,
    #[validate(length(max = 1024))]
    pub notes: Option<String>,
}

fn default_transaction_type() -> TransactionType {
    TransactionType::Adjustment
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AdjustStockResponse {
    pub transaction_id: Uuid,
    pub record: InventoryRecordResponse,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct InventoryListQuery {
    #[serde(default = "default_page")]
    pub page: u64,
    pub per_page: Option<u64>,
    pub item_kind: Option<ItemKind>,
    pub low_stock: Option<bool>,
}

fn default_page() -> u64 {
    1
}

/// List inventory records with optional filtering
#[utoipa::path(
    get,
    path = "/api/v1/inventory",
    params(InventoryListQuery),
    responses(
        (status = 200, description = "Inventory records returned",
            headers(("X-Request-Id" = String, description = "Unique request id for tracing"))
        ),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse),
        (status = 403, description = "Forbidden", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "inventory"
)]
pub async fn list_inventory(
    State(state): State<AppState>,
    Query(query): Query<InventoryListQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let (page, per_page) = PaginationParams {
        page: query.page,
        per_page: query.per_page,
    }
    .clamped(
        state.config.api_default_page_size as u64,
        state.config.api_max_page_size as u64,
    );
    let filter = RecordFilter {
        item_kind: query.item_kind,
        low_stock_only: query.low_stock.unwrap_or(false),
    };

    let (records, total) = state.stock_ledger.list_records(filter, page, per_page).await?;
    let data: Vec<InventoryRecordResponse> =
        records.into_iter().map(InventoryRecordResponse::from).collect();

    Ok(Json(ApiResponse::success(PaginatedResponse::new(
        data, page, per_page, total,
    ))))
}

/// Create a new inventory record
#[utoipa::path(
    post,
    path = "/api/v1/inventory",
    request_body = CreateInventoryRecordRequest,
    responses(
        (status = 201, description = "Inventory record created", body = InventoryRecordResponse,
            headers(("X-Request-Id" = String, description = "Unique request id for tracing"))
        ),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse),
        (status = 403, description = "Forbidden", body = crate::errors::ErrorResponse),
        (status = 409, description = "Record already exists for this item", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "inventory"
)]
pub async fn create_inventory(
    State(state): State<AppState>,
    Json(payload): Json<CreateInventoryRecordRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    validate_input(&payload)?;

    let record = state
        .stock_ledger
        .create_record(NewInventoryRecord {
            item_id: payload.item_id,
            item_kind: payload.item_kind,
            item_name: payload.item_name,
            item_sku: payload.item_sku,
            initial_quantity: payload.initial_quantity,
            minimum_stock: payload.minimum_stock,
            maximum_stock: payload.maximum_stock,
            reorder_point: payload.reorder_point,
            unit: payload.unit,
        })
        .await?;

    Ok(created_response(ApiResponse::success(
        InventoryRecordResponse::from(record),
    )))
}

/// Get a single inventory record by id
#[utoipa::path(
    get,
    path = "/api/v1/inventory/{id}",
    params(("id" = Uuid, Path, description = "Inventory record id")),
    responses(
        (status = 200, description = "Inventory record returned", body = InventoryRecordResponse,
            headers(("X-Request-Id" = String, description = "Unique request id for tracing"))
        ),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse),
        (status = 403, description = "Forbidden", body = crate::errors::ErrorResponse),
        (status = 404, description = "Record not found", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "inventory"
)]
pub async fn get_inventory(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let record = state.stock_ledger.get_record(id).await?;
    Ok(Json(ApiResponse::success(InventoryRecordResponse::from(
        record,
    ))))
}

/// Apply a signed stock adjustment to an item
#[utoipa::path(
    post,
    path = "/api/v1/inventory/adjust",
    request_body = AdjustStockRequest,
    responses(
        (status = 200, description = "Adjustment applied", body = AdjustStockResponse,
            headers(("X-Request-Id" = String, description = "Unique request id for tracing"))
        ),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse),
        (status = 403, description = "Forbidden", body = crate::errors::ErrorResponse),
        (status = 404, description = "No record for this item", body = crate::errors::ErrorResponse),
        (status = 422, description = "Adjustment would drive stock negative", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "inventory"
)]
pub async fn adjust_inventory(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<AdjustStockRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    validate_input(&payload)?;

    let outcome = state
        .stock_ledger
        .apply_adjustment(StockAdjustment {
            item_id: payload.item_id,
            item_kind: payload.item_kind,
            delta: payload.delta,
            transaction_type: payload.transaction_type,
            reference_id: payload.reference_id,
            reference_type: payload.reference_type,
            notes: payload.notes,
            actor_id: Some(user.user_id),
        })
        .await?;

    Ok(Json(ApiResponse::success(AdjustStockResponse {
        transaction_id: outcome.transaction_id,
        record: InventoryRecordResponse::from(outcome.record),
    })))
}

/// List the transaction history of a record, newest first
#[utoipa::path(
    get,
    path = "/api/v1/inventory/{id}/transactions",
    params(
        ("id" = Uuid, Path, description = "Inventory record id"),
        PaginationParams
    ),
    responses(
        (status = 200, description = "Transaction history returned",
            headers(("X-Request-Id" = String, description = "Unique request id for tracing"))
        ),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse),
        (status = 403, description = "Forbidden", body = crate::errors::ErrorResponse),
        (status = 404, description = "Record not found", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "inventory"
)]
pub async fn list_transactions(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl IntoResponse, ServiceError> {
    let (page, per_page) = pagination.clamped(
        state.config.api_default_page_size as u64,
        state.config.api_max_page_size as u64,
    );

    let (transactions, total) = state
        .stock_ledger
        .transaction_history(id, page, per_page)
        .await?;
    let data: Vec<TransactionResponse> =
        transactions.into_iter().map(TransactionResponse::from).collect();

    Ok(Json(ApiResponse::success(PaginatedResponse::new(
        data, page, per_page, total,
    ))))
}

/// List every record at or below its reorder point
#[utoipa::path(
    get,
    path = "/api/v1/inventory/alerts",
    responses(
        (status = 200, description = "Low stock records returned",
            headers(("X-Request-Id" = String, description = "Unique request id for tracing"))
        ),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse),
        (status = 403, description = "Forbidden", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "inventory"
)]
pub async fn low_stock_alerts(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ServiceError> {
    let records = state.stock_ledger.low_stock_alerts().await?;
    let data: Vec<InventoryRecordResponse> =
        records.into_iter().map(InventoryRecordResponse::from).collect();
    Ok(Json(ApiResponse::success(data)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_response_carries_classified_status() {
        let record = inventory_record::Model::new(
            Uuid::new_v4(),
            ItemKind::Product,
            "Widget".to_string(),
            "WID-001".to_string(),
            0,
            10,
            Some(1000),
            20,
            "unit".to_string(),
        );
        let response = InventoryRecordResponse::from(record);
        assert_eq!(response.stock_status, StockStatus::OutOfStock);
        assert!(response.needs_reorder);
    }

    #[test]
    fn adjust_request_defaults_to_adjustment_type() {
        let payload: AdjustStockRequest = serde_json::from_value(serde_json::json!({
            "item_id": Uuid::new_v4(),
            "item_kind": "product",
            "delta": -5
        }))
        .unwrap();
        assert_eq!(payload.transaction_type, TransactionType::Adjustment);
        assert!(payload.notes.is_none());
    }

    #[test]
    fn create_request_rejects_blank_sku() {
        let payload: CreateInventoryRecordRequest = serde_json::from_value(serde_json::json!({
            "item_id": Uuid::new_v4(),
            "item_kind": "raw_material",
            "item_name": "Steel rod",
            "item_sku": ""
        }))
        .unwrap();
        assert!(validate_input(&payload).is_err());
    }
}
