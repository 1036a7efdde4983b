use super::loader::load_recipe_graph;
use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::schema::recipes;
use crate::stock::stock_totals_by_product;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;
use larder_core::{compute_fulfillment, flatten_recipe, FlattenError};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FulfillmentQuery {
    /// Serving count to check for; defaults to the recipe's base servings
    pub servings: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct IngredientFulfillmentResponse {
    pub ingredient_id: Uuid,
    pub product_id: Option<Uuid>,
    /// Amount required at the requested servings, in the product's stock unit
    pub needed: Decimal,
    pub in_stock: Decimal,
    pub missing: Decimal,
    pub fulfilled: bool,
    /// Excluded from `can_make` and the ratio
    pub skipped: bool,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FulfillmentResponse {
    pub can_make: bool,
    pub fulfillment_ratio: Decimal,
    /// True when no ingredient is stock-checked; render as "no checks"
    pub nothing_to_check: bool,
    pub desired_servings: Decimal,
    pub ingredients: Vec<IngredientFulfillmentResponse>,
}

#[utoipa::path(
    get,
    path = "/api/recipes/{id}/fulfillment",
    tag = "recipes",
    params(
        ("id" = Uuid, Path, description = "Recipe ID"),
        FulfillmentQuery
    ),
    responses(
        (status = 200, description = "Stock fulfillment for the recipe", body = FulfillmentResponse),
        (status = 400, description = "Invalid servings", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse),
        (status = 422, description = "Recipe nesting contains a cycle", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_fulfillment(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<Uuid>,
    Query(query): Query<FulfillmentQuery>,
) -> impl IntoResponse {
    let mut conn = get_conn!(pool);

    let base_servings: Decimal = match recipes::table
        .filter(recipes::id.eq(id))
        .filter(recipes::household_id.eq(user.household_id))
        .filter(recipes::deleted_at.is_null())
        .select(recipes::base_servings)
        .first(&mut conn)
    {
        Ok(s) => s,
        Err(diesel::NotFound) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: "Recipe not found".to_string(),
                }),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!("Failed to fetch recipe: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to fetch recipe".to_string(),
                }),
            )
                .into_response();
        }
    };

    let desired_servings = query.servings.unwrap_or(base_servings);
    if desired_servings <= Decimal::ZERO {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Servings must be positive".to_string(),
            }),
        )
            .into_response();
    }

    let graph = match load_recipe_graph(&mut conn, user.household_id) {
        Ok(g) => g,
        Err(e) => {
            tracing::error!("Failed to load recipe graph: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to load recipe data".to_string(),
                }),
            )
                .into_response();
        }
    };

    let flat = match flatten_recipe(
        id,
        &graph.ingredients_by_recipe,
        &graph.nestings_by_recipe,
        &graph.base_servings_by_recipe,
        desired_servings,
    ) {
        Ok(flat) => flat,
        Err(FlattenError::CycleDetected(recipe_id)) => {
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ErrorResponse {
                    error: format!("Recipe nesting contains a cycle at {}", recipe_id),
                }),
            )
                .into_response()
        }
    };

    let totals = match stock_totals_by_product(&mut conn, user.household_id) {
        Ok(t) => t,
        Err(e) => {
            tracing::error!("Failed to aggregate stock totals: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to aggregate stock".to_string(),
                }),
            )
                .into_response();
        }
    };

    // Flattened amounts are already scaled to the desired servings; the
    // calculator must not scale again.
    let report = compute_fulfillment(&flat, &totals, desired_servings, desired_servings);

    let nothing_to_check = report.ingredients.iter().all(|i| i.skipped);
    let response = FulfillmentResponse {
        can_make: report.can_make,
        fulfillment_ratio: report.fulfillment_ratio,
        nothing_to_check,
        desired_servings,
        ingredients: report
            .ingredients
            .into_iter()
            .map(|i| IngredientFulfillmentResponse {
                ingredient_id: i.ingredient_id,
                product_id: i.product_id,
                needed: i.needed,
                in_stock: i.in_stock,
                missing: i.missing,
                fulfilled: i.fulfilled,
                skipped: i.skipped,
            })
            .collect(),
    };

    (StatusCode::OK, Json(response)).into_response()
}
