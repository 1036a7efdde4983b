use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::NewLocation;
use crate::schema::locations;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateLocationRequest {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub is_freezer: bool,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CreateLocationResponse {
    pub id: Uuid,
}

#[utoipa::path(
    post,
    path = "/api/locations",
    tag = "locations",
    request_body = CreateLocationRequest,
    responses(
        (status = 201, description = "Location created", body = CreateLocationResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_location(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Json(request): Json<CreateLocationRequest>,
) -> impl IntoResponse {
    if request.name.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Location name is required".to_string(),
            }),
        )
            .into_response();
    }

    let mut conn = get_conn!(pool);

    let result = diesel::insert_into(locations::table)
        .values(NewLocation {
            household_id: user.household_id,
            name: request.name.trim(),
            description: request.description.as_deref(),
            is_freezer: request.is_freezer,
        })
        .returning(locations::id)
        .get_result::<Uuid>(&mut conn);

    match result {
        Ok(id) => (StatusCode::CREATED, Json(CreateLocationResponse { id })).into_response(),
        Err(e) => {
            tracing::error!("Failed to create location: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to create location".to_string(),
                }),
            )
                .into_response()
        }
    }
}
