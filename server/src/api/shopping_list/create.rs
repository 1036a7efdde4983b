use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::NewShoppingListItem;
use crate::schema::shopping_list_items;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateShoppingListItemRequest {
    /// Free-text item name; defaults from the product when linked
    pub item: String,
    pub product_id: Option<Uuid>,
    pub amount: Option<Decimal>,
    pub qu_id: Option<Uuid>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateShoppingListRequest {
    pub items: Vec<CreateShoppingListItemRequest>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CreateShoppingListResponse {
    pub ids: Vec<Uuid>,
}

#[utoipa::path(
    post,
    path = "/api/shopping-list",
    tag = "shopping_list",
    request_body = CreateShoppingListRequest,
    responses(
        (status = 201, description = "Items created", body = CreateShoppingListResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_items(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Json(request): Json<CreateShoppingListRequest>,
) -> impl IntoResponse {
    if request.items.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "At least one item is required".to_string(),
            }),
        )
            .into_response();
    }

    if request.items.iter().any(|i| i.item.trim().is_empty()) {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Item name is required".to_string(),
            }),
        )
            .into_response();
    }

    let mut conn = get_conn!(pool);

    // Get current max sort_order for this household
    let max_sort_order: i32 = shopping_list_items::table
        .filter(shopping_list_items::household_id.eq(user.household_id))
        .select(diesel::dsl::max(shopping_list_items::sort_order))
        .first::<Option<i32>>(&mut conn)
        .unwrap_or(None)
        .unwrap_or(0);

    let mut ids = Vec::with_capacity(request.items.len());

    for (i, item_req) in request.items.iter().enumerate() {
        let new_item = NewShoppingListItem {
            household_id: user.household_id,
            product_id: item_req.product_id,
            item: item_req.item.trim(),
            amount: item_req.amount,
            qu_id: item_req.qu_id,
            note: item_req.note.as_deref(),
            is_checked: false,
            sort_order: max_sort_order + 1 + i as i32,
        };

        match diesel::insert_into(shopping_list_items::table)
            .values(&new_item)
            .returning(shopping_list_items::id)
            .get_result::<Uuid>(&mut conn)
        {
            Ok(id) => ids.push(id),
            Err(e) => {
                tracing::error!("Failed to create shopping list item: {}", e);
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse {
                        error: "Failed to create shopping list item".to_string(),
                    }),
                )
                    .into_response();
            }
        }
    }

    (StatusCode::CREATED, Json(CreateShoppingListResponse { ids })).into_response()
}
