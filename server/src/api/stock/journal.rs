use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::StockLogRow;
use crate::schema::stock_log;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct JournalQuery {
    /// Restrict to one product
    pub product_id: Option<Uuid>,
    /// Restrict to one user-visible action
    pub correlation_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct JournalRowResponse {
    pub id: Uuid,
    pub product_id: Uuid,
    pub entry_id: Uuid,
    pub amount: Decimal,
    pub transaction_type: String,
    pub best_before_date: Option<NaiveDate>,
    pub correlation_id: Uuid,
    pub undone: bool,
    pub undone_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct JournalListResponse {
    pub rows: Vec<JournalRowResponse>,
}

#[utoipa::path(
    get,
    path = "/api/stock/journal",
    tag = "stock",
    params(JournalQuery),
    responses(
        (status = 200, description = "Stock journal, newest first", body = JournalListResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_journal(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Query(query): Query<JournalQuery>,
) -> impl IntoResponse {
    let mut conn = get_conn!(pool);

    let mut db_query = stock_log::table
        .filter(stock_log::household_id.eq(user.household_id))
        .into_boxed();

    if let Some(product_id) = query.product_id {
        db_query = db_query.filter(stock_log::product_id.eq(product_id));
    }
    if let Some(correlation_id) = query.correlation_id {
        db_query = db_query.filter(stock_log::correlation_id.eq(correlation_id));
    }

    let rows: Vec<StockLogRow> = match db_query
        .order(stock_log::created_at.desc())
        .limit(200)
        .select(StockLogRow::as_select())
        .load(&mut conn)
    {
        Ok(rows) => rows,
        Err(e) => {
            tracing::error!("Failed to list stock journal: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to list stock journal".to_string(),
                }),
            )
                .into_response();
        }
    };

    let rows = rows
        .into_iter()
        .map(|r| JournalRowResponse {
            id: r.id,
            product_id: r.product_id,
            entry_id: r.entry_id,
            amount: r.amount,
            transaction_type: r.transaction_type,
            best_before_date: r.best_before_date,
            correlation_id: r.correlation_id,
            undone: r.undone,
            undone_at: r.undone_at,
            created_at: r.created_at,
        })
        .collect();

    (StatusCode::OK, Json(JournalListResponse { rows })).into_response()
}
