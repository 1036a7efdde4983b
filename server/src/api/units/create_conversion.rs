use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::NewQuantityUnitConversion;
use crate::schema::{quantity_unit_conversions, quantity_units};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateConversionRequest {
    /// Product the rule is specific to; null makes it household-global
    pub product_id: Option<Uuid>,
    pub from_qu_id: Uuid,
    pub to_qu_id: Uuid,
    pub factor: Decimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CreateConversionResponse {
    pub id: Uuid,
}

#[utoipa::path(
    post,
    path = "/api/units/conversions",
    tag = "units",
    request_body = CreateConversionRequest,
    responses(
        (status = 201, description = "Conversion rule created", body = CreateConversionResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_conversion(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Json(request): Json<CreateConversionRequest>,
) -> impl IntoResponse {
    if request.factor <= Decimal::ZERO {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Conversion factor must be positive".to_string(),
            }),
        )
            .into_response();
    }

    if request.from_qu_id == request.to_qu_id {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Conversion must be between two different units".to_string(),
            }),
        )
            .into_response();
    }

    let mut conn = get_conn!(pool);

    let known_units: i64 = match quantity_units::table
        .filter(quantity_units::household_id.eq(user.household_id))
        .filter(quantity_units::id.eq_any([request.from_qu_id, request.to_qu_id]))
        .filter(quantity_units::deleted_at.is_null())
        .count()
        .get_result(&mut conn)
    {
        Ok(n) => n,
        Err(e) => {
            tracing::error!("Failed to verify quantity units: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to verify quantity units".to_string(),
                }),
            )
                .into_response();
        }
    };

    if known_units != 2 {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Unknown quantity unit".to_string(),
            }),
        )
            .into_response();
    }

    let result = diesel::insert_into(quantity_unit_conversions::table)
        .values(NewQuantityUnitConversion {
            household_id: user.household_id,
            product_id: request.product_id,
            from_qu_id: request.from_qu_id,
            to_qu_id: request.to_qu_id,
            factor: request.factor,
        })
        .returning(quantity_unit_conversions::id)
        .get_result::<Uuid>(&mut conn);

    match result {
        Ok(id) => (StatusCode::CREATED, Json(CreateConversionResponse { id })).into_response(),
        Err(e) => {
            tracing::error!("Failed to create conversion rule: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to create conversion rule".to_string(),
                }),
            )
                .into_response()
        }
    }
}
