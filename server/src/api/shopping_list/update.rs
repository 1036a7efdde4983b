use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::schema::shopping_list_items;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateShoppingListItemRequest {
    pub item: Option<String>,
    pub amount: Option<Decimal>,
    pub note: Option<String>,
    pub is_checked: Option<bool>,
    pub sort_order: Option<i32>,
}

#[utoipa::path(
    put,
    path = "/api/shopping-list/{id}",
    tag = "shopping_list",
    params(
        ("id" = Uuid, Path, description = "Shopping list item ID")
    ),
    request_body = UpdateShoppingListItemRequest,
    responses(
        (status = 204, description = "Item updated"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Item not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_item(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateShoppingListItemRequest>,
) -> impl IntoResponse {
    let mut conn = get_conn!(pool);

    #[derive(AsChangeset)]
    #[diesel(table_name = shopping_list_items)]
    struct ItemChanges<'a> {
        item: Option<&'a str>,
        amount: Option<Decimal>,
        note: Option<&'a str>,
        is_checked: Option<bool>,
        sort_order: Option<i32>,
        updated_at: chrono::DateTime<Utc>,
    }

    let changes = ItemChanges {
        item: request.item.as_deref(),
        amount: request.amount,
        note: request.note.as_deref(),
        is_checked: request.is_checked,
        sort_order: request.sort_order,
        updated_at: Utc::now(),
    };

    let updated = diesel::update(
        shopping_list_items::table
            .filter(shopping_list_items::id.eq(id))
            .filter(shopping_list_items::household_id.eq(user.household_id))
            .filter(shopping_list_items::deleted_at.is_null()),
    )
    .set(changes)
    .execute(&mut conn);

    match updated {
        Ok(0) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "Item not found".to_string(),
            }),
        )
            .into_response(),
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            tracing::error!("Failed to update shopping list item: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to update shopping list item".to_string(),
                }),
            )
                .into_response()
        }
    }
}
