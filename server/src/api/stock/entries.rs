use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::StockEntry;
use crate::schema::stock_entries;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct EntriesQuery {
    /// Restrict to one product
    pub product_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StockEntryResponse {
    pub id: Uuid,
    pub product_id: Uuid,
    pub amount: Decimal,
    pub best_before_date: Option<NaiveDate>,
    pub purchased_on: NaiveDate,
    pub opened_on: Option<NaiveDate>,
    pub price: Option<Decimal>,
    pub location_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StockEntryListResponse {
    pub entries: Vec<StockEntryResponse>,
}

#[utoipa::path(
    get,
    path = "/api/stock/entries",
    tag = "stock",
    params(EntriesQuery),
    responses(
        (status = 200, description = "Stock batches, soonest expiry first", body = StockEntryListResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_entries(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Query(query): Query<EntriesQuery>,
) -> impl IntoResponse {
    let mut conn = get_conn!(pool);

    let mut db_query = stock_entries::table
        .filter(stock_entries::household_id.eq(user.household_id))
        .into_boxed();

    if let Some(product_id) = query.product_id {
        db_query = db_query.filter(stock_entries::product_id.eq(product_id));
    }

    let rows: Vec<StockEntry> = match db_query
        .order((
            stock_entries::best_before_date.asc().nulls_last(),
            stock_entries::purchased_on.asc(),
        ))
        .select(StockEntry::as_select())
        .load(&mut conn)
    {
        Ok(rows) => rows,
        Err(e) => {
            tracing::error!("Failed to list stock entries: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to list stock entries".to_string(),
                }),
            )
                .into_response();
        }
    };

    let entries = rows
        .into_iter()
        .map(|e| StockEntryResponse {
            id: e.id,
            product_id: e.product_id,
            amount: e.amount,
            best_before_date: e.best_before_date,
            purchased_on: e.purchased_on,
            opened_on: e.opened_on,
            price: e.price,
            location_id: e.location_id,
        })
        .collect();

    (StatusCode::OK, Json(StockEntryListResponse { entries })).into_response()
}
