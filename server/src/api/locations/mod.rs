pub mod create;
pub mod delete;
pub mod list;
pub mod update;

use crate::AppState;
use axum::routing::get;
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for /api/locations endpoints
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list::list_locations).post(create::create_location))
        .route(
            "/{id}",
            axum::routing::put(update::update_location).delete(delete::delete_location),
        )
}

#[derive(OpenApi)]
#[openapi(
    paths(
        create::create_location,
        list::list_locations,
        update::update_location,
        delete::delete_location,
    ),
    components(schemas(
        create::CreateLocationRequest,
        create::CreateLocationResponse,
        list::LocationListResponse,
        list::LocationResponse,
        update::UpdateLocationRequest,
    ))
)]
pub struct ApiDoc;
