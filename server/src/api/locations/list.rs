use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::Location;
use crate::schema::locations;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use diesel::prelude::*;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LocationResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub is_freezer: bool,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LocationListResponse {
    pub locations: Vec<LocationResponse>,
}

#[utoipa::path(
    get,
    path = "/api/locations",
    tag = "locations",
    responses(
        (status = 200, description = "List of locations", body = LocationListResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_locations(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
) -> impl IntoResponse {
    let mut conn = get_conn!(pool);

    let rows: Vec<Location> = match locations::table
        .filter(locations::household_id.eq(user.household_id))
        .filter(locations::deleted_at.is_null())
        .order(locations::name.asc())
        .select(Location::as_select())
        .load(&mut conn)
    {
        Ok(rows) => rows,
        Err(e) => {
            tracing::error!("Failed to list locations: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to list locations".to_string(),
                }),
            )
                .into_response();
        }
    };

    let locations = rows
        .into_iter()
        .map(|l| LocationResponse {
            id: l.id,
            name: l.name,
            description: l.description,
            is_freezer: l.is_freezer,
        })
        .collect();

    (StatusCode::OK, Json(LocationListResponse { locations })).into_response()
}
