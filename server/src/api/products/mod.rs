pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

use crate::AppState;
use axum::routing::get;
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for /api/products endpoints
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list::list_products).post(create::create_product))
        .route(
            "/{id}",
            get(get::get_product)
                .put(update::update_product)
                .delete(delete::delete_product),
        )
}

#[derive(OpenApi)]
#[openapi(
    paths(
        create::create_product,
        list::list_products,
        get::get_product,
        update::update_product,
        delete::delete_product,
    ),
    components(schemas(
        create::CreateProductRequest,
        create::CreateProductResponse,
        list::ProductListResponse,
        list::ProductSummary,
        get::ProductResponse,
        update::UpdateProductRequest,
    ))
)]
pub struct ApiDoc;
