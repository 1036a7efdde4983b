use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::{NewRecipe, NewRecipeIngredient, NewRecipeNesting};
use crate::schema::{recipe_ingredients, recipe_nestings, recipes};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RecipeIngredientRequest {
    pub product_id: Option<Uuid>,
    pub amount: Decimal,
    pub qu_id: Option<Uuid>,
    pub note: Option<String>,
    /// Amount is a placeholder ("to taste"); excluded from fulfillment
    /// and consumption
    #[serde(default)]
    pub variable_amount: bool,
    /// Informational ingredient; never counts toward fulfillment
    #[serde(default)]
    pub not_check_stock_fulfillment: bool,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RecipeNestingRequest {
    pub includes_recipe_id: Uuid,
    /// Servings of the included recipe this recipe needs
    pub servings: Decimal,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateRecipeRequest {
    pub name: String,
    pub description: Option<String>,
    /// Serving count the ingredient amounts are stored for
    pub base_servings: Decimal,
    /// Product this recipe produces when cooked, if any
    pub product_id: Option<Uuid>,
    #[serde(default)]
    pub ingredients: Vec<RecipeIngredientRequest>,
    #[serde(default)]
    pub nestings: Vec<RecipeNestingRequest>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CreateRecipeResponse {
    pub id: Uuid,
}

#[utoipa::path(
    post,
    path = "/api/recipes",
    tag = "recipes",
    request_body = CreateRecipeRequest,
    responses(
        (status = 201, description = "Recipe created", body = CreateRecipeResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_recipe(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Json(request): Json<CreateRecipeRequest>,
) -> impl IntoResponse {
    if request.name.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Recipe name is required".to_string(),
            }),
        )
            .into_response();
    }

    if request.base_servings <= Decimal::ZERO {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Base servings must be positive".to_string(),
            }),
        )
            .into_response();
    }

    if request
        .nestings
        .iter()
        .any(|n| n.servings <= Decimal::ZERO)
    {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Nesting servings must be positive".to_string(),
            }),
        )
            .into_response();
    }

    let mut conn = get_conn!(pool);

    // Nested recipes must already exist in this household
    let nested_ids: Vec<Uuid> = request.nestings.iter().map(|n| n.includes_recipe_id).collect();
    if !nested_ids.is_empty() {
        let known: i64 = match recipes::table
            .filter(recipes::household_id.eq(user.household_id))
            .filter(recipes::id.eq_any(&nested_ids))
            .filter(recipes::deleted_at.is_null())
            .count()
            .get_result(&mut conn)
        {
            Ok(n) => n,
            Err(e) => {
                tracing::error!("Failed to verify nested recipes: {}", e);
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse {
                        error: "Failed to verify nested recipes".to_string(),
                    }),
                )
                    .into_response();
            }
        };
        if known != nested_ids.len() as i64 {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: "Nested recipe not found".to_string(),
                }),
            )
                .into_response();
        }
    }

    let result = conn.transaction(|conn| {
        let recipe_id: Uuid = diesel::insert_into(recipes::table)
            .values(NewRecipe {
                household_id: user.household_id,
                name: request.name.trim(),
                description: request.description.as_deref(),
                base_servings: request.base_servings,
                product_id: request.product_id,
            })
            .returning(recipes::id)
            .get_result(conn)?;

        for ingredient in &request.ingredients {
            diesel::insert_into(recipe_ingredients::table)
                .values(NewRecipeIngredient {
                    recipe_id,
                    product_id: ingredient.product_id,
                    amount: ingredient.amount,
                    qu_id: ingredient.qu_id,
                    note: ingredient.note.as_deref(),
                    variable_amount: ingredient.variable_amount,
                    not_check_stock_fulfillment: ingredient.not_check_stock_fulfillment,
                })
                .execute(conn)?;
        }

        for nesting in &request.nestings {
            diesel::insert_into(recipe_nestings::table)
                .values(NewRecipeNesting {
                    recipe_id,
                    includes_recipe_id: nesting.includes_recipe_id,
                    servings: nesting.servings,
                })
                .execute(conn)?;
        }

        Ok::<_, diesel::result::Error>(recipe_id)
    });

    match result {
        Ok(id) => (StatusCode::CREATED, Json(CreateRecipeResponse { id })).into_response(),
        Err(e) => {
            tracing::error!("Failed to create recipe: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to create recipe".to_string(),
                }),
            )
                .into_response()
        }
    }
}
