use super::create::{RecipeIngredientRequest, RecipeNestingRequest};
use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::{NewRecipeIngredient, NewRecipeNesting};
use crate::schema::{recipe_ingredients, recipe_nestings, recipes};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

/// Partial update; `ingredients`/`nestings`, when given, replace the
/// stored lists wholesale.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateRecipeRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub base_servings: Option<Decimal>,
    pub product_id: Option<Uuid>,
    pub ingredients: Option<Vec<RecipeIngredientRequest>>,
    pub nestings: Option<Vec<RecipeNestingRequest>>,
}

#[utoipa::path(
    put,
    path = "/api/recipes/{id}",
    tag = "recipes",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    request_body = UpdateRecipeRequest,
    responses(
        (status = 204, description = "Recipe updated"),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_recipe(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateRecipeRequest>,
) -> impl IntoResponse {
    if let Some(base_servings) = request.base_servings {
        if base_servings <= Decimal::ZERO {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: "Base servings must be positive".to_string(),
                }),
            )
                .into_response();
        }
    }

    if let Some(nestings) = &request.nestings {
        if nestings.iter().any(|n| n.servings <= Decimal::ZERO) {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: "Nesting servings must be positive".to_string(),
                }),
            )
                .into_response();
        }
        if nestings.iter().any(|n| n.includes_recipe_id == id) {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: "A recipe cannot include itself".to_string(),
                }),
            )
                .into_response();
        }
    }

    let mut conn = get_conn!(pool);

    let exists = match recipes::table
        .filter(recipes::id.eq(id))
        .filter(recipes::household_id.eq(user.household_id))
        .filter(recipes::deleted_at.is_null())
        .select(recipes::id)
        .first::<Uuid>(&mut conn)
        .optional()
    {
        Ok(record) => record.is_some(),
        Err(e) => {
            tracing::error!("Failed to verify recipe: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to verify recipe".to_string(),
                }),
            )
                .into_response();
        }
    };

    if !exists {
        return (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "Recipe not found".to_string(),
            }),
        )
            .into_response();
    }

    let result = conn.transaction(|conn| {
        #[derive(AsChangeset)]
        #[diesel(table_name = recipes)]
        struct RecipeChanges<'a> {
            name: Option<&'a str>,
            description: Option<&'a str>,
            base_servings: Option<Decimal>,
            product_id: Option<Uuid>,
            updated_at: chrono::DateTime<Utc>,
        }

        diesel::update(recipes::table.filter(recipes::id.eq(id)))
            .set(RecipeChanges {
                name: request.name.as_deref(),
                description: request.description.as_deref(),
                base_servings: request.base_servings,
                product_id: request.product_id,
                updated_at: Utc::now(),
            })
            .execute(conn)?;

        if let Some(ingredients) = &request.ingredients {
            diesel::delete(
                recipe_ingredients::table.filter(recipe_ingredients::recipe_id.eq(id)),
            )
            .execute(conn)?;

            for ingredient in ingredients {
                diesel::insert_into(recipe_ingredients::table)
                    .values(NewRecipeIngredient {
                        recipe_id: id,
                        product_id: ingredient.product_id,
                        amount: ingredient.amount,
                        qu_id: ingredient.qu_id,
                        note: ingredient.note.as_deref(),
                        variable_amount: ingredient.variable_amount,
                        not_check_stock_fulfillment: ingredient.not_check_stock_fulfillment,
                    })
                    .execute(conn)?;
            }
        }

        if let Some(nestings) = &request.nestings {
            diesel::delete(recipe_nestings::table.filter(recipe_nestings::recipe_id.eq(id)))
                .execute(conn)?;

            for nesting in nestings {
                diesel::insert_into(recipe_nestings::table)
                    .values(NewRecipeNesting {
                        recipe_id: id,
                        includes_recipe_id: nesting.includes_recipe_id,
                        servings: nesting.servings,
                    })
                    .execute(conn)?;
            }
        }

        Ok::<_, diesel::result::Error>(())
    });

    match result {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            tracing::error!("Failed to update recipe: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to update recipe".to_string(),
                }),
            )
                .into_response()
        }
    }
}
