use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::Product;
use crate::schema::{products, stock_entries};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProductResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub location_id: Option<Uuid>,
    pub qu_id_stock: Uuid,
    pub qu_id_purchase: Uuid,
    pub default_best_before_days: i32,
    pub min_stock_amount: Decimal,
    pub not_check_stock_fulfillment: bool,
    pub stock_amount: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[utoipa::path(
    get,
    path = "/api/products/{id}",
    tag = "products",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product details", body = ProductResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Product not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_product(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let mut conn = get_conn!(pool);

    let product: Product = match products::table
        .filter(products::id.eq(id))
        .filter(products::household_id.eq(user.household_id))
        .filter(products::deleted_at.is_null())
        .select(Product::as_select())
        .first(&mut conn)
    {
        Ok(p) => p,
        Err(diesel::NotFound) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: "Product not found".to_string(),
                }),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!("Failed to fetch product: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to fetch product".to_string(),
                }),
            )
                .into_response();
        }
    };

    let stock_amount: Decimal = match stock_entries::table
        .filter(stock_entries::product_id.eq(product.id))
        .select(diesel::dsl::sum(stock_entries::amount))
        .first::<Option<Decimal>>(&mut conn)
    {
        Ok(total) => total.unwrap_or(Decimal::ZERO),
        Err(e) => {
            tracing::error!("Failed to aggregate stock: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to aggregate stock".to_string(),
                }),
            )
                .into_response();
        }
    };

    let response = ProductResponse {
        id: product.id,
        name: product.name,
        description: product.description,
        location_id: product.location_id,
        qu_id_stock: product.qu_id_stock,
        qu_id_purchase: product.qu_id_purchase,
        default_best_before_days: product.default_best_before_days,
        min_stock_amount: product.min_stock_amount,
        not_check_stock_fulfillment: product.not_check_stock_fulfillment,
        stock_amount,
        created_at: product.created_at,
        updated_at: product.updated_at,
    };

    (StatusCode::OK, Json(response)).into_response()
}
