use super::loader::load_recipe_graph;
use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::{NewStockEntry, NewStockLogRow, Product, Recipe};
use crate::schema::{products, recipes, stock_entries, stock_log};
use crate::stock::{
    apply_consumption, load_live_batches, spawn_below_min_stock_check, stock_totals_by_product,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{Duration, Utc};
use diesel::prelude::*;
use larder_core::{compute_fulfillment, flatten_recipe, plan_consumption, FlattenError,
    TransactionType};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CookRequest {
    /// Serving count to cook; defaults to the recipe's base servings
    pub servings: Option<Decimal>,
    /// Also deduct ingredients flagged as not stock-checked. They never
    /// count toward fulfillment either way; this only controls whether
    /// cooking consumes them.
    #[serde(default = "default_consume_unchecked")]
    pub consume_unchecked: bool,
    /// Cook even when the fulfillment check reports missing ingredients;
    /// consumption is then best-effort per batch
    #[serde(default)]
    pub force: bool,
}

fn default_consume_unchecked() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ConsumedProduct {
    pub product_id: Uuid,
    pub amount: Decimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CookResponse {
    /// Undo handle covering every ingredient consumption of this cook
    pub correlation_id: Uuid,
    pub servings: Decimal,
    pub consumed: Vec<ConsumedProduct>,
    /// Stock entry added when the recipe produces a product
    pub produced_entry_id: Option<Uuid>,
}

#[utoipa::path(
    post,
    path = "/api/recipes/{id}/cook",
    tag = "recipes",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    request_body = CookRequest,
    responses(
        (status = 200, description = "Recipe cooked, ingredients consumed", body = CookResponse),
        (status = 400, description = "Invalid servings or missing ingredients", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse),
        (status = 422, description = "Recipe nesting contains a cycle", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn cook_recipe(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<Uuid>,
    Json(request): Json<CookRequest>,
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

    let servings = request.servings.unwrap_or(recipe.base_servings);
    if servings <= Decimal::ZERO {
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
        recipe.id,
        &graph.ingredients_by_recipe,
        &graph.nestings_by_recipe,
        &graph.base_servings_by_recipe,
        servings,
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

    // Gate on fulfillment unless the caller forces the cook.
    if !request.force {
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
        let report = compute_fulfillment(&flat, &totals, servings, servings);
        let has_checkable = report.ingredients.iter().any(|i| !i.skipped);
        if has_checkable && !report.can_make {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: "Not enough stock to cook this recipe".to_string(),
                }),
            )
                .into_response();
        }
    }

    // Amount to deduct per product. Variable-amount placeholders are
    // never consumed; unchecked ingredients only when requested.
    let mut to_consume: HashMap<Uuid, Decimal> = HashMap::new();
    for ingredient in &flat {
        if ingredient.variable_amount {
            continue;
        }
        let Some(product_id) = ingredient.product_id else {
            continue;
        };
        let unchecked =
            ingredient.not_check_stock_fulfillment || ingredient.product_skips_stock_check;
        if unchecked && !request.consume_unchecked {
            continue;
        }
        *to_consume.entry(product_id).or_default() += ingredient.amount;
    }

    let correlation_id = Uuid::new_v4();
    let mut consumed = Vec::with_capacity(to_consume.len());

    let result = conn.transaction(|conn| {
        for (&product_id, &amount) in &to_consume {
            if amount <= Decimal::ZERO {
                continue;
            }
            let batches = load_live_batches(conn, user.household_id, product_id)?;
            let plan = plan_consumption(&batches, amount);
            if plan.is_empty() {
                continue;
            }
            apply_consumption(
                conn,
                user.household_id,
                &batches,
                &plan,
                correlation_id,
                TransactionType::Cook,
            )?;
            consumed.push(ConsumedProduct {
                product_id,
                amount: plan.total_consumed,
            });
        }

        // Self-production: a recipe that yields a product adds a batch of
        // it, one stock unit per serving. Journaled under its own
        // correlation id so undoing the cook only reverses consumption.
        let mut produced_entry_id = None;
        if let Some(produced_product_id) = recipe.product_id {
            let product: Option<Product> = products::table
                .filter(products::id.eq(produced_product_id))
                .filter(products::household_id.eq(user.household_id))
                .filter(products::deleted_at.is_null())
                .select(Product::as_select())
                .first(conn)
                .optional()?;

            if let Some(product) = product {
                let today = Utc::now().date_naive();
                let best_before_date = (product.default_best_before_days > 0)
                    .then(|| today + Duration::days(product.default_best_before_days as i64));

                let entry_id: Uuid = diesel::insert_into(stock_entries::table)
                    .values(NewStockEntry {
                        household_id: user.household_id,
                        product_id: product.id,
                        amount: servings,
                        best_before_date,
                        purchased_on: today,
                        opened_on: None,
                        price: None,
                        location_id: product.location_id,
                    })
                    .returning(stock_entries::id)
                    .get_result(conn)?;

                diesel::insert_into(stock_log::table)
                    .values(NewStockLogRow {
                        household_id: user.household_id,
                        product_id: product.id,
                        entry_id,
                        amount: servings,
                        transaction_type: TransactionType::SelfProduction.as_str(),
                        best_before_date,
                        purchased_on: today,
                        opened_on: None,
                        price: None,
                        location_id: product.location_id,
                        correlation_id: Uuid::new_v4(),
                    })
                    .execute(conn)?;

                produced_entry_id = Some(entry_id);
            }
        }

        Ok::<_, diesel::result::Error>(produced_entry_id)
    });

    match result {
        Ok(produced_entry_id) => {
            spawn_below_min_stock_check(pool.clone(), user.household_id);
            (
                StatusCode::OK,
                Json(CookResponse {
                    correlation_id,
                    servings,
                    consumed,
                    produced_entry_id,
                }),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!("Failed to cook recipe: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to cook recipe".to_string(),
                }),
            )
                .into_response()
        }
    }
}
