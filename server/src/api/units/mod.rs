pub mod create;
pub mod create_conversion;
pub mod delete_conversion;
pub mod list;
pub mod list_conversions;

use crate::AppState;
use axum::routing::{delete, get};
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for /api/units endpoints
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list::list_units).post(create::create_unit))
        .route(
            "/conversions",
            get(list_conversions::list_conversions)
                .post(create_conversion::create_conversion),
        )
        .route(
            "/conversions/{id}",
            delete(delete_conversion::delete_conversion),
        )
}

#[derive(OpenApi)]
#[openapi(
    paths(
        create::create_unit,
        list::list_units,
        create_conversion::create_conversion,
        list_conversions::list_conversions,
        delete_conversion::delete_conversion,
    ),
    components(schemas(
        create::CreateUnitRequest,
        create::CreateUnitResponse,
        list::UnitListResponse,
        list::UnitResponse,
        create_conversion::CreateConversionRequest,
        create_conversion::CreateConversionResponse,
        list_conversions::ConversionListResponse,
        list_conversions::ConversionResponse,
    ))
)]
pub struct ApiDoc;
