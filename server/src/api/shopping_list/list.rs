use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::ShoppingListItem;
use crate::schema::shopping_list_items;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ShoppingListItemResponse {
    pub id: Uuid,
    pub product_id: Option<Uuid>,
    pub item: String,
    pub amount: Option<Decimal>,
    pub qu_id: Option<Uuid>,
    pub note: Option<String>,
    pub is_checked: bool,
    pub sort_order: i32,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ShoppingListResponse {
    pub items: Vec<ShoppingListItemResponse>,
}

#[utoipa::path(
    get,
    path = "/api/shopping-list",
    tag = "shopping_list",
    responses(
        (status = 200, description = "List of shopping list items", body = ShoppingListResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_items(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
) -> impl IntoResponse {
    let mut conn = get_conn!(pool);

    let rows: Vec<ShoppingListItem> = match shopping_list_items::table
        .filter(shopping_list_items::household_id.eq(user.household_id))
        .filter(shopping_list_items::deleted_at.is_null())
        .order(shopping_list_items::sort_order.asc())
        .select(ShoppingListItem::as_select())
        .load(&mut conn)
    {
        Ok(rows) => rows,
        Err(e) => {
            tracing::error!("Failed to list shopping list items: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to list shopping list items".to_string(),
                }),
            )
                .into_response();
        }
    };

    let items = rows
        .into_iter()
        .map(|i| ShoppingListItemResponse {
            id: i.id,
            product_id: i.product_id,
            item: i.item,
            amount: i.amount,
            qu_id: i.qu_id,
            note: i.note,
            is_checked: i.is_checked,
            sort_order: i.sort_order,
            updated_at: i.updated_at,
        })
        .collect();

    (StatusCode::OK, Json(ShoppingListResponse { items })).into_response()
}
