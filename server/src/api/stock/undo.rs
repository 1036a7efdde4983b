use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::stock::{apply_undo, UndoFailure};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UndoResponse {
    /// Number of journal rows reversed
    pub rows_undone: usize,
}

#[utoipa::path(
    post,
    path = "/api/stock/undo/{correlation_id}",
    tag = "stock",
    params(
        ("correlation_id" = Uuid, Path, description = "Correlation ID of the action to undo")
    ),
    responses(
        (status = 200, description = "Action undone", body = UndoResponse),
        (status = 400, description = "Transaction type cannot be undone", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Nothing to undo", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn undo_transaction(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(correlation_id): Path<Uuid>,
) -> impl IntoResponse {
    let mut conn = get_conn!(pool);

    // An Err return rolls the whole undo back, including the flag flips.
    let result = conn.transaction::<_, UndoFailure, _>(|conn| {
        apply_undo(conn, user.household_id, correlation_id)
    });

    match result {
        Ok(rows_undone) => (StatusCode::OK, Json(UndoResponse { rows_undone })).into_response(),
        Err(UndoFailure::NothingToUndo) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "Nothing to undo".to_string(),
            }),
        )
            .into_response(),
        Err(UndoFailure::NotUndoable(tx)) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: format!("Transactions of type '{}' cannot be undone", tx),
            }),
        )
            .into_response(),
        Err(UndoFailure::Db(e)) => {
            tracing::error!("Failed to undo transaction: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to undo transaction".to_string(),
                }),
            )
                .into_response()
        }
    }
}
