use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::QuantityUnitConversion;
use crate::schema::quantity_unit_conversions;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ConversionResponse {
    pub id: Uuid,
    pub product_id: Option<Uuid>,
    pub from_qu_id: Uuid,
    pub to_qu_id: Uuid,
    pub factor: Decimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ConversionListResponse {
    pub conversions: Vec<ConversionResponse>,
}

#[utoipa::path(
    get,
    path = "/api/units/conversions",
    tag = "units",
    responses(
        (status = 200, description = "List of conversion rules", body = ConversionListResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_conversions(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
) -> impl IntoResponse {
    let mut conn = get_conn!(pool);

    let rows: Vec<QuantityUnitConversion> = match quantity_unit_conversions::table
        .filter(quantity_unit_conversions::household_id.eq(user.household_id))
        .select(QuantityUnitConversion::as_select())
        .load(&mut conn)
    {
        Ok(rows) => rows,
        Err(e) => {
            tracing::error!("Failed to list conversion rules: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to list conversion rules".to_string(),
                }),
            )
                .into_response();
        }
    };

    let conversions = rows
        .into_iter()
        .map(|c| ConversionResponse {
            id: c.id,
            product_id: c.product_id,
            from_qu_id: c.from_qu_id,
            to_qu_id: c.to_qu_id,
            factor: c.factor,
        })
        .collect();

    (StatusCode::OK, Json(ConversionListResponse { conversions })).into_response()
}
