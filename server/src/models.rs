use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = crate::schema::households)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[allow(dead_code)]
pub struct Household {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::households)]
pub struct NewHousehold<'a> {
    pub name: &'a str,
}

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[allow(dead_code)]
pub struct User {
    pub id: Uuid,
    pub household_id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::users)]
pub struct NewUser<'a> {
    pub household_id: Uuid,
    pub username: &'a str,
    pub password_hash: &'a str,
}

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = crate::schema::sessions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[allow(dead_code)]
pub struct Session {
    pub id: Uuid,
    pub user_id: Uuid,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::sessions)]
pub struct NewSession<'a> {
    pub user_id: Uuid,
    pub token_hash: &'a str,
    pub expires_at: DateTime<Utc>,
}

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = crate::schema::locations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[allow(dead_code)]
pub struct Location {
    pub id: Uuid,
    pub household_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub is_freezer: bool,
    pub created_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::locations)]
pub struct NewLocation<'a> {
    pub household_id: Uuid,
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub is_freezer: bool,
}

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = crate::schema::quantity_units)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[allow(dead_code)]
pub struct QuantityUnit {
    pub id: Uuid,
    pub household_id: Uuid,
    pub name: String,
    pub name_plural: Option<String>,
    pub created_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::quantity_units)]
pub struct NewQuantityUnit<'a> {
    pub household_id: Uuid,
    pub name: &'a str,
    pub name_plural: Option<&'a str>,
}

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = crate::schema::quantity_unit_conversions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[allow(dead_code)]
pub struct QuantityUnitConversion {
    pub id: Uuid,
    pub household_id: Uuid,
    pub product_id: Option<Uuid>,
    pub from_qu_id: Uuid,
    pub to_qu_id: Uuid,
    pub factor: Decimal,
    pub created_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::quantity_unit_conversions)]
pub struct NewQuantityUnitConversion {
    pub household_id: Uuid,
    pub product_id: Option<Uuid>,
    pub from_qu_id: Uuid,
    pub to_qu_id: Uuid,
    pub factor: Decimal,
}

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = crate::schema::products)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[allow(dead_code)]
pub struct Product {
    pub id: Uuid,
    pub household_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub location_id: Option<Uuid>,
    pub qu_id_stock: Uuid,
    pub qu_id_purchase: Uuid,
    pub default_best_before_days: i32,
    pub min_stock_amount: Decimal,
    pub not_check_stock_fulfillment: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::products)]
pub struct NewProduct<'a> {
    pub household_id: Uuid,
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub location_id: Option<Uuid>,
    pub qu_id_stock: Uuid,
    pub qu_id_purchase: Uuid,
    pub default_best_before_days: i32,
    pub min_stock_amount: Decimal,
    pub not_check_stock_fulfillment: bool,
}

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::stock_entries)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[allow(dead_code)]
pub struct StockEntry {
    pub id: Uuid,
    pub household_id: Uuid,
    pub product_id: Uuid,
    pub amount: Decimal,
    pub best_before_date: Option<NaiveDate>,
    pub purchased_on: NaiveDate,
    pub opened_on: Option<NaiveDate>,
    pub price: Option<Decimal>,
    pub location_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::stock_entries)]
pub struct NewStockEntry {
    pub household_id: Uuid,
    pub product_id: Uuid,
    pub amount: Decimal,
    pub best_before_date: Option<NaiveDate>,
    pub purchased_on: NaiveDate,
    pub opened_on: Option<NaiveDate>,
    pub price: Option<Decimal>,
    pub location_id: Option<Uuid>,
}

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::stock_log)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[allow(dead_code)]
pub struct StockLogRow {
    pub id: Uuid,
    pub household_id: Uuid,
    pub product_id: Uuid,
    pub entry_id: Uuid,
    pub amount: Decimal,
    pub transaction_type: String,
    pub best_before_date: Option<NaiveDate>,
    pub purchased_on: NaiveDate,
    pub opened_on: Option<NaiveDate>,
    pub price: Option<Decimal>,
    pub location_id: Option<Uuid>,
    pub correlation_id: Uuid,
    pub undone: bool,
    pub undone_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::stock_log)]
pub struct NewStockLogRow<'a> {
    pub household_id: Uuid,
    pub product_id: Uuid,
    pub entry_id: Uuid,
    pub amount: Decimal,
    pub transaction_type: &'a str,
    pub best_before_date: Option<NaiveDate>,
    pub purchased_on: NaiveDate,
    pub opened_on: Option<NaiveDate>,
    pub price: Option<Decimal>,
    pub location_id: Option<Uuid>,
    pub correlation_id: Uuid,
}

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = crate::schema::recipes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[allow(dead_code)]
pub struct Recipe {
    pub id: Uuid,
    pub household_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub base_servings: Decimal,
    pub product_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::recipes)]
pub struct NewRecipe<'a> {
    pub household_id: Uuid,
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub base_servings: Decimal,
    pub product_id: Option<Uuid>,
}

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::recipe_ingredients)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[allow(dead_code)]
pub struct RecipeIngredient {
    pub id: Uuid,
    pub recipe_id: Uuid,
    pub product_id: Option<Uuid>,
    pub amount: Decimal,
    pub qu_id: Option<Uuid>,
    pub note: Option<String>,
    pub variable_amount: bool,
    pub not_check_stock_fulfillment: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::recipe_ingredients)]
pub struct NewRecipeIngredient<'a> {
    pub recipe_id: Uuid,
    pub product_id: Option<Uuid>,
    pub amount: Decimal,
    pub qu_id: Option<Uuid>,
    pub note: Option<&'a str>,
    pub variable_amount: bool,
    pub not_check_stock_fulfillment: bool,
}

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::recipe_nestings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[allow(dead_code)]
pub struct RecipeNesting {
    pub id: Uuid,
    pub recipe_id: Uuid,
    pub includes_recipe_id: Uuid,
    pub servings: Decimal,
    pub created_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::recipe_nestings)]
pub struct NewRecipeNesting {
    pub recipe_id: Uuid,
    pub includes_recipe_id: Uuid,
    pub servings: Decimal,
}

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = crate::schema::shopping_list_items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[allow(dead_code)]
pub struct ShoppingListItem {
    pub id: Uuid,
    pub household_id: Uuid,
    pub product_id: Option<Uuid>,
    pub item: String,
    pub amount: Option<Decimal>,
    pub qu_id: Option<Uuid>,
    pub note: Option<String>,
    pub is_checked: bool,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::shopping_list_items)]
pub struct NewShoppingListItem<'a> {
    pub household_id: Uuid,
    pub product_id: Option<Uuid>,
    pub item: &'a str,
    pub amount: Option<Decimal>,
    pub qu_id: Option<Uuid>,
    pub note: Option<&'a str>,
    pub is_checked: bool,
    pub sort_order: i32,
}

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = crate::schema::meal_plans)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[allow(dead_code)]
pub struct MealPlan {
    pub id: Uuid,
    pub household_id: Uuid,
    pub recipe_id: Uuid,
    pub meal_date: NaiveDate,
    pub meal_type: String,
    pub servings: Decimal,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::meal_plans)]
pub struct NewMealPlan<'a> {
    pub household_id: Uuid,
    pub recipe_id: Uuid,
    pub meal_date: NaiveDate,
    pub meal_type: &'a str,
    pub servings: Decimal,
    pub notes: Option<&'a str>,
}
