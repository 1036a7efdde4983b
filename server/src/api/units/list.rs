use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::QuantityUnit;
use crate::schema::quantity_units;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use diesel::prelude::*;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UnitResponse {
    pub id: Uuid,
    pub name: String,
    pub name_plural: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UnitListResponse {
    pub units: Vec<UnitResponse>,
}

#[utoipa::path(
    get,
    path = "/api/units",
    tag = "units",
    responses(
        (status = 200, description = "List of quantity units", body = UnitListResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_units(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
) -> impl IntoResponse {
    let mut conn = get_conn!(pool);

    let rows: Vec<QuantityUnit> = match quantity_units::table
        .filter(quantity_units::household_id.eq(user.household_id))
        .filter(quantity_units::deleted_at.is_null())
        .order(quantity_units::name.asc())
        .select(QuantityUnit::as_select())
        .load(&mut conn)
    {
        Ok(rows) => rows,
        Err(e) => {
            tracing::error!("Failed to list quantity units: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to list quantity units".to_string(),
                }),
            )
                .into_response();
        }
    };

    let units = rows
        .into_iter()
        .map(|u| UnitResponse {
            id: u.id,
            name: u.name,
            name_plural: u.name_plural,
        })
        .collect();

    (StatusCode::OK, Json(UnitListResponse { units })).into_response()
}
