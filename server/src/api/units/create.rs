use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::NewQuantityUnit;
use crate::schema::quantity_units;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateUnitRequest {
    pub name: String,
    pub name_plural: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CreateUnitResponse {
    pub id: Uuid,
}

#[utoipa::path(
    post,
    path = "/api/units",
    tag = "units",
    request_body = CreateUnitRequest,
    responses(
        (status = 201, description = "Quantity unit created", body = CreateUnitResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_unit(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Json(request): Json<CreateUnitRequest>,
) -> impl IntoResponse {
    if request.name.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Unit name is required".to_string(),
            }),
        )
            .into_response();
    }

    let mut conn = get_conn!(pool);

    let result = diesel::insert_into(quantity_units::table)
        .values(NewQuantityUnit {
            household_id: user.household_id,
            name: request.name.trim(),
            name_plural: request.name_plural.as_deref(),
        })
        .returning(quantity_units::id)
        .get_result::<Uuid>(&mut conn);

    match result {
        Ok(id) => (StatusCode::CREATED, Json(CreateUnitResponse { id })).into_response(),
        Err(e) => {
            tracing::error!("Failed to create quantity unit: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to create quantity unit".to_string(),
                }),
            )
                .into_response()
        }
    }
}
