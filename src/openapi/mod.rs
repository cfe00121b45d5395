use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "ValorSales API",
        version = "1.0.0",
        description = r#"
# ValorSales Inventory API

Sales and inventory management for small distributors. Every stock movement
is recorded as a ledger transaction alongside the inventory record it
changed, so the quantity of a record always equals its initial quantity plus
the sum of its transaction history.

## Authentication

All API endpoints require a JWT bearer token. Include the token in the
Authorization header:

```
Authorization: Bearer <your-jwt-token>
```

Tokens carry roles; each endpoint is gated by a `resource:action`
permission resolved against a static role table.

## Error Handling

Errors use a consistent response format with appropriate HTTP status codes:

```json
{
  "error": "Not Found",
  "message": "No inventory record for product ...",
  "request_id": "b2f7...",
  "timestamp": "2026-01-01T00:00:00Z"
}
```

## Pagination

List endpoints accept `page` (default 1) and `per_page` (default 20,
max 100) query parameters.
        "#,
        contact(
            name = "ValorSales Support",
            email = "support@valorsales.io"
        ),
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development")
    ),
    tags(
        (name = "inventory", description = "Inventory records, adjustments and ledger history"),
        (name = "auth", description = "Token issuance"),
        (name = "health", description = "Health check endpoints")
    ),
    paths(
        crate::handlers::inventory::list_inventory,
        crate::handlers::inventory::create_inventory,
        crate::handlers::inventory::get_inventory,
        crate::handlers::inventory::adjust_inventory,
        crate::handlers::inventory::list_transactions,
        crate::handlers::inventory::low_stock_alerts,
    ),
    components(
        schemas(
            crate::ApiResponse<serde_json::Value>,
            crate::handlers::common::PaginatedResponse<serde_json::Value>,
            crate::handlers::common::PaginationMeta,

            crate::handlers::inventory::InventoryRecordResponse,
            crate::handlers::inventory::TransactionResponse,
            crate::handlers::inventory::CreateInventoryRecordRequest,
            crate::handlers::inventory::AdjustStockRequest,
            crate::handlers::inventory::AdjustStockResponse,
            crate::entities::ItemKind,
            crate::entities::TransactionType,
            crate::services::stock_status::StockStatus,

            crate::errors::ErrorResponse
        )
    )
)]
pub struct ApiDocV1;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDocV1::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_document_covers_inventory_paths() {
        let openapi = ApiDocV1::openapi();
        let json = serde_json::to_string_pretty(&openapi).unwrap();
        assert!(json.contains("ValorSales API"));
        assert!(json.contains("/api/v1/inventory"));
        assert!(json.contains("/api/v1/inventory/adjust"));
    }
}
