use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::schema::stock_entries;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::Utc;
use diesel::prelude::*;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct OpenRequest {
    pub entry_id: Uuid,
}

#[utoipa::path(
    post,
    path = "/api/stock/open",
    tag = "stock",
    request_body = OpenRequest,
    responses(
        (status = 204, description = "Batch marked as opened"),
        (status = 400, description = "Batch is already opened", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Stock entry not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn open_entry(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Json(request): Json<OpenRequest>,
) -> impl IntoResponse {
    let mut conn = get_conn!(pool);

    let opened: Option<Option<chrono::NaiveDate>> = match stock_entries::table
        .filter(stock_entries::id.eq(request.entry_id))
        .filter(stock_entries::household_id.eq(user.household_id))
        .select(stock_entries::opened_on)
        .first(&mut conn)
        .optional()
    {
        Ok(record) => record,
        Err(e) => {
            tracing::error!("Failed to fetch stock entry: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to fetch stock entry".to_string(),
                }),
            )
                .into_response();
        }
    };

    match opened {
        None => {
            return (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: "Stock entry not found".to_string(),
                }),
            )
                .into_response()
        }
        Some(Some(_)) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: "Batch is already opened".to_string(),
                }),
            )
                .into_response()
        }
        Some(None) => {}
    }

    let result = diesel::update(stock_entries::table.filter(stock_entries::id.eq(request.entry_id)))
        .set((
            stock_entries::opened_on.eq(Utc::now().date_naive()),
            stock_entries::updated_at.eq(Utc::now()),
        ))
        .execute(&mut conn);

    match result {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            tracing::error!("Failed to mark batch as opened: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to mark batch as opened".to_string(),
                }),
            )
                .into_response()
        }
    }
}
