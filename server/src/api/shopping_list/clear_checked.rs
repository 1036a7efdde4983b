use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::schema::shopping_list_items;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::Utc;
use diesel::prelude::*;
use std::sync::Arc;

#[utoipa::path(
    delete,
    path = "/api/shopping-list/clear-checked",
    tag = "shopping_list",
    responses(
        (status = 204, description = "Checked items cleared"),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn clear_checked(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
) -> impl IntoResponse {
    let mut conn = get_conn!(pool);

    let result = diesel::update(
        shopping_list_items::table
            .filter(shopping_list_items::household_id.eq(user.household_id))
            .filter(shopping_list_items::deleted_at.is_null())
            .filter(shopping_list_items::is_checked.eq(true)),
    )
    .set((
        shopping_list_items::deleted_at.eq(Utc::now()),
        shopping_list_items::updated_at.eq(Utc::now()),
    ))
    .execute(&mut conn);

    match result {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            tracing::error!("Failed to clear checked items: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to clear checked items".to_string(),
                }),
            )
                .into_response()
        }
    }
}
