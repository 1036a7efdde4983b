use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::{Recipe, RecipeIngredient, RecipeNesting};
use crate::schema::{recipe_ingredients, recipe_nestings, recipes};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecipeIngredientResponse {
    pub id: Uuid,
    pub product_id: Option<Uuid>,
    pub amount: Decimal,
    pub qu_id: Option<Uuid>,
    pub note: Option<String>,
    pub variable_amount: bool,
    pub not_check_stock_fulfillment: bool,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecipeNestingResponse {
    pub includes_recipe_id: Uuid,
    pub servings: Decimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecipeResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub base_servings: Decimal,
    pub product_id: Option<Uuid>,
    pub ingredients: Vec<RecipeIngredientResponse>,
    pub nestings: Vec<RecipeNestingResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[utoipa::path(
    get,
    path = "/api/recipes/{id}",
    tag = "recipes",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    responses(
        (status = 200, description = "Recipe details", body = RecipeResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_recipe(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let mut conn = get_conn!(pool);

    let recipe: Recipe = match recipes::table
        .filter(recipes::id.eq(id))
        .filter(recipes::household_id.eq(user.household_id))
        .filter(recipes::deleted_at.is_null())
        .select(Recipe::as_select())
        .first(&mut conn)
    {
        Ok(r) => r,
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

    let ingredient_rows: Vec<RecipeIngredient> = match recipe_ingredients::table
        .filter(recipe_ingredients::recipe_id.eq(recipe.id))
        .order(recipe_ingredients::created_at.asc())
        .select(RecipeIngredient::as_select())
        .load(&mut conn)
    {
        Ok(rows) => rows,
        Err(e) => {
            tracing::error!("Failed to fetch recipe ingredients: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to fetch recipe ingredients".to_string(),
                }),
            )
                .into_response();
        }
    };

    let nesting_rows: Vec<RecipeNesting> = match recipe_nestings::table
        .filter(recipe_nestings::recipe_id.eq(recipe.id))
        .select(RecipeNesting::as_select())
        .load(&mut conn)
    {
        Ok(rows) => rows,
        Err(e) => {
            tracing::error!("Failed to fetch recipe nestings: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to fetch recipe nestings".to_string(),
                }),
            )
                .into_response();
        }
    };

    let response = RecipeResponse {
        id: recipe.id,
        name: recipe.name,
        description: recipe.description,
        base_servings: recipe.base_servings,
        product_id: recipe.product_id,
        ingredients: ingredient_rows
            .into_iter()
            .map(|i| RecipeIngredientResponse {
                id: i.id,
                product_id: i.product_id,
                amount: i.amount,
                qu_id: i.qu_id,
                note: i.note,
                variable_amount: i.variable_amount,
                not_check_stock_fulfillment: i.not_check_stock_fulfillment,
            })
            .collect(),
        nestings: nesting_rows
            .into_iter()
            .map(|n| RecipeNestingResponse {
                includes_recipe_id: n.includes_recipe_id,
                servings: n.servings,
            })
            .collect(),
        created_at: recipe.created_at,
        updated_at: recipe.updated_at,
    };

    (StatusCode::OK, Json(response)).into_response()
}
