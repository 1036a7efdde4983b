use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::Product;
use crate::schema::products;
use crate::stock::stock_totals_by_product;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProductSummary {
    pub id: Uuid,
    pub name: String,
    pub location_id: Option<Uuid>,
    pub qu_id_stock: Uuid,
    pub min_stock_amount: Decimal,
    /// Sum of all batches currently in stock
    pub stock_amount: Decimal,
    pub below_min_stock: bool,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProductListResponse {
    pub products: Vec<ProductSummary>,
}

#[utoipa::path(
    get,
    path = "/api/products",
    tag = "products",
    responses(
        (status = 200, description = "Products with current stock totals", body = ProductListResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_products(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
) -> impl IntoResponse {
    let mut conn = get_conn!(pool);

    let rows: Vec<Product> = match products::table
        .filter(products::household_id.eq(user.household_id))
        .filter(products::deleted_at.is_null())
        .order(products::name.asc())
        .select(Product::as_select())
        .load(&mut conn)
    {
        Ok(rows) => rows,
        Err(e) => {
            tracing::error!("Failed to list products: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to list products".to_string(),
                }),
            )
                .into_response();
        }
    };

    let totals = match stock_totals_by_product(&mut conn, user.household_id) {
        Ok(t) => t,
        Err(e) => {
            tracing::error!("Failed to aggregate stock totals: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to aggregate stock".to_string(),
                }),
            )
                .into_response();
        }
    };

    let products = rows
        .into_iter()
        .map(|p| {
            let stock_amount = totals.get(&p.id).copied().unwrap_or(Decimal::ZERO);
            ProductSummary {
                below_min_stock: p.min_stock_amount > Decimal::ZERO
                    && stock_amount < p.min_stock_amount,
                id: p.id,
                name: p.name,
                location_id: p.location_id,
                qu_id_stock: p.qu_id_stock,
                min_stock_amount: p.min_stock_amount,
                stock_amount,
            }
        })
        .collect();

    (StatusCode::OK, Json(ProductListResponse { products })).into_response()
}
