pub mod cook;
pub mod create;
pub mod delete;
pub mod fulfillment;
pub mod get;
pub mod list;
pub mod loader;
pub mod update;

use crate::AppState;
use axum::routing::{get, post};
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for /api/recipes endpoints
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list::list_recipes).post(create::create_recipe))
        .route(
            "/{id}",
            get(get::get_recipe)
                .put(update::update_recipe)
                .delete(delete::delete_recipe),
        )
        .route("/{id}/fulfillment", get(fulfillment::get_fulfillment))
        .route("/{id}/cook", post(cook::cook_recipe))
}

#[derive(OpenApi)]
#[openapi(
    paths(
        create::create_recipe,
        list::list_recipes,
        get::get_recipe,
        update::update_recipe,
        delete::delete_recipe,
        fulfillment::get_fulfillment,
        cook::cook_recipe,
    ),
    components(schemas(
        create::CreateRecipeRequest,
        create::CreateRecipeResponse,
        create::RecipeIngredientRequest,
        create::RecipeNestingRequest,
        list::RecipeListResponse,
        list::RecipeSummary,
        get::RecipeResponse,
        get::RecipeIngredientResponse,
        get::RecipeNestingResponse,
        update::UpdateRecipeRequest,
        fulfillment::FulfillmentResponse,
        fulfillment::IngredientFulfillmentResponse,
        cook::CookRequest,
        cook::CookResponse,
        cook::ConsumedProduct,
    ))
)]
pub struct ApiDoc;
