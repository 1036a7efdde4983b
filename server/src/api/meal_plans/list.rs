use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::MealPlan;
use crate::schema::meal_plans;
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

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
            MealType::Snack => "snack",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "breakfast" => Some(MealType::Breakfast),
            "lunch" => Some(MealType::Lunch),
            "dinner" => Some(MealType::Dinner),
            "snack" => Some(MealType::Snack),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MealPlanQuery {
    /// First day of the range (inclusive)
    pub from: Option<NaiveDate>,
    /// Last day of the range (inclusive)
    pub to: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MealPlanResponse {
    pub id: Uuid,
    pub recipe_id: Uuid,
    pub meal_date: NaiveDate,
    pub meal_type: MealType,
    pub servings: Decimal,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MealPlanListResponse {
    pub meal_plans: Vec<MealPlanResponse>,
}

#[utoipa::path(
    get,
    path = "/api/meal-plans",
    tag = "meal_plans",
    params(MealPlanQuery),
    responses(
        (status = 200, description = "Meal plans in the date range", body = MealPlanListResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_meal_plans(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Query(query): Query<MealPlanQuery>,
) -> impl IntoResponse {
    let mut conn = get_conn!(pool);

    let mut db_query = meal_plans::table
        .filter(meal_plans::household_id.eq(user.household_id))
        .into_boxed();

    if let Some(from) = query.from {
        db_query = db_query.filter(meal_plans::meal_date.ge(from));
    }
    if let Some(to) = query.to {
        db_query = db_query.filter(meal_plans::meal_date.le(to));
    }

    let rows: Vec<MealPlan> = match db_query
        .order(meal_plans::meal_date.asc())
        .select(MealPlan::as_select())
        .load(&mut conn)
    {
        Ok(rows) => rows,
        Err(e) => {
            tracing::error!("Failed to list meal plans: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to list meal plans".to_string(),
                }),
            )
                .into_response();
        }
    };

    let meal_plans = rows
        .into_iter()
        .filter_map(|m| {
            let meal_type = MealType::parse(&m.meal_type)?;
            Some(MealPlanResponse {
                id: m.id,
                recipe_id: m.recipe_id,
                meal_date: m.meal_date,
                meal_type,
                servings: m.servings,
                notes: m.notes,
            })
        })
        .collect();

    (StatusCode::OK, Json(MealPlanListResponse { meal_plans })).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meal_type_round_trips_through_str() {
        for meal_type in [
            MealType::Breakfast,
            MealType::Lunch,
            MealType::Dinner,
            MealType::Snack,
        ] {
            assert_eq!(MealType::parse(meal_type.as_str()), Some(meal_type));
        }
        assert_eq!(MealType::parse("brunch"), None);
    }
}
