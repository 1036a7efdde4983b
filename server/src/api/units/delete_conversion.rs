use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::schema::quantity_unit_conversions;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;
use std::sync::Arc;
use uuid::Uuid;

#[utoipa::path(
    delete,
    path = "/api/units/conversions/{id}",
    tag = "units",
    params(
        ("id" = Uuid, Path, description = "Conversion rule ID")
    ),
    responses(
        (status = 204, description = "Conversion rule deleted"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Conversion rule not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_conversion(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let mut conn = get_conn!(pool);

    let deleted = diesel::delete(
        quantity_unit_conversions::table
            .filter(quantity_unit_conversions::id.eq(id))
            .filter(quantity_unit_conversions::household_id.eq(user.household_id)),
    )
    .execute(&mut conn);

    match deleted {
        Ok(0) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "Conversion rule not found".to_string(),
            }),
        )
            .into_response(),
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            tracing::error!("Failed to delete conversion rule: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to delete conversion rule".to_string(),
                }),
            )
                .into_response()
        }
    }
}
