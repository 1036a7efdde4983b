use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::schema::{locations, stock_entries};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use diesel::prelude::*;
use std::sync::Arc;
use uuid::Uuid;

#[utoipa::path(
    delete,
    path = "/api/locations/{id}",
    tag = "locations",
    params(
        ("id" = Uuid, Path, description = "Location ID")
    ),
    responses(
        (status = 204, description = "Location deleted"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Location not found", body = ErrorResponse),
        (status = 409, description = "Location still holds stock", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_location(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let mut conn = get_conn!(pool);

    let in_use: i64 = match stock_entries::table
        .filter(stock_entries::household_id.eq(user.household_id))
        .filter(stock_entries::location_id.eq(id))
        .count()
        .get_result(&mut conn)
    {
        Ok(n) => n,
        Err(e) => {
            tracing::error!("Failed to check location usage: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to check location usage".to_string(),
                }),
            )
                .into_response();
        }
    };

    if in_use > 0 {
        return (
            StatusCode::CONFLICT,
            Json(ErrorResponse {
                error: "Location still holds stock; transfer it first".to_string(),
            }),
        )
            .into_response();
    }

    let updated = diesel::update(
        locations::table
            .filter(locations::id.eq(id))
            .filter(locations::household_id.eq(user.household_id))
            .filter(locations::deleted_at.is_null()),
    )
    .set(locations::deleted_at.eq(Utc::now()))
    .execute(&mut conn);

    match updated {
        Ok(0) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "Location not found".to_string(),
            }),
        )
            .into_response(),
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            tracing::error!("Failed to delete location: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to delete location".to_string(),
                }),
            )
                .into_response()
        }
    }
}
