use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::schema::locations;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateLocationRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_freezer: Option<bool>,
}

#[utoipa::path(
    put,
    path = "/api/locations/{id}",
    tag = "locations",
    params(
        ("id" = Uuid, Path, description = "Location ID")
    ),
    request_body = UpdateLocationRequest,
    responses(
        (status = 204, description = "Location updated"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Location not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_location(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateLocationRequest>,
) -> impl IntoResponse {
    let mut conn = get_conn!(pool);

    #[derive(AsChangeset)]
    #[diesel(table_name = locations)]
    struct LocationChanges<'a> {
        name: Option<&'a str>,
        description: Option<&'a str>,
        is_freezer: Option<bool>,
    }

    let changes = LocationChanges {
        name: request.name.as_deref(),
        description: request.description.as_deref(),
        is_freezer: request.is_freezer,
    };

    let updated = diesel::update(
        locations::table
            .filter(locations::id.eq(id))
            .filter(locations::household_id.eq(user.household_id))
            .filter(locations::deleted_at.is_null()),
    )
    .set(changes)
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
            tracing::error!("Failed to update location: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to update location".to_string(),
                }),
            )
                .into_response()
        }
    }
}
