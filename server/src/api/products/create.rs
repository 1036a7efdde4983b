use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::NewProduct;
use crate::schema::{products, quantity_units};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateProductRequest {
    pub name: String,
    pub description: Option<String>,
    pub location_id: Option<Uuid>,
    /// Unit the stock amount is measured in
    pub qu_id_stock: Uuid,
    /// Unit the product is purchased in; defaults to the stock unit
    pub qu_id_purchase: Option<Uuid>,
    /// Days until a new batch's default best-before date; 0 means no default
    #[serde(default)]
    pub default_best_before_days: i32,
    #[serde(default)]
    pub min_stock_amount: Decimal,
    /// Exclude this product from recipe stock checks
    #[serde(default)]
    pub not_check_stock_fulfillment: bool,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CreateProductResponse {
    pub id: Uuid,
}

#[utoipa::path(
    post,
    path = "/api/products",
    tag = "products",
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Product created", body = CreateProductResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_product(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Json(request): Json<CreateProductRequest>,
) -> impl IntoResponse {
    if request.name.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Product name is required".to_string(),
            }),
        )
            .into_response();
    }

    if request.min_stock_amount < Decimal::ZERO {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Minimum stock amount cannot be negative".to_string(),
            }),
        )
            .into_response();
    }

    let mut conn = get_conn!(pool);

    let qu_id_purchase = request.qu_id_purchase.unwrap_or(request.qu_id_stock);

    // Both units must belong to this household
    let mut unit_ids = vec![request.qu_id_stock];
    if qu_id_purchase != request.qu_id_stock {
        unit_ids.push(qu_id_purchase);
    }
    let known_units: i64 = match quantity_units::table
        .filter(quantity_units::household_id.eq(user.household_id))
        .filter(quantity_units::id.eq_any(&unit_ids))
        .filter(quantity_units::deleted_at.is_null())
        .count()
        .get_result(&mut conn)
    {
        Ok(n) => n,
        Err(e) => {
            tracing::error!("Failed to verify quantity units: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to verify quantity units".to_string(),
                }),
            )
                .into_response();
        }
    };

    if known_units != unit_ids.len() as i64 {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Unknown quantity unit".to_string(),
            }),
        )
            .into_response();
    }

    let result = diesel::insert_into(products::table)
        .values(NewProduct {
            household_id: user.household_id,
            name: request.name.trim(),
            description: request.description.as_deref(),
            location_id: request.location_id,
            qu_id_stock: request.qu_id_stock,
            qu_id_purchase,
            default_best_before_days: request.default_best_before_days,
            min_stock_amount: request.min_stock_amount,
            not_check_stock_fulfillment: request.not_check_stock_fulfillment,
        })
        .returning(products::id)
        .get_result::<Uuid>(&mut conn);

    match result {
        Ok(id) => (StatusCode::CREATED, Json(CreateProductResponse { id })).into_response(),
        Err(e) => {
            tracing::error!("Failed to create product: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to create product".to_string(),
                }),
            )
                .into_response()
        }
    }
}
