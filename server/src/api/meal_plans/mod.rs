pub mod create;
pub mod delete;
pub mod list;

use crate::AppState;
use axum::routing::{delete as delete_method, get};
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for /api/meal-plans endpoints
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list::list_meal_plans).post(create::create_meal_plan))
        .route("/{id}", delete_method(delete::delete_meal_plan))
}

#[derive(OpenApi)]
#[openapi(
    paths(
        create::create_meal_plan,
        list::list_meal_plans,
        delete::delete_meal_plan
    ),
    components(schemas(
        create::CreateMealPlanRequest,
        create::CreateMealPlanResponse,
        list::MealPlanListResponse,
        list::MealPlanResponse,
        list::MealType,
    ))
)]
pub struct ApiDoc;
