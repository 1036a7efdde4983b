use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One discrete batch of a product in stock.
///
/// A batch is acquired at one time and expires on its own schedule.
/// `best_before_date = None` means the batch never expires (or the date
/// is unknown); such batches are consumed last.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockBatch {
    pub id: Uuid,
    pub product_id: Uuid,
    pub amount: Decimal,
    pub best_before_date: Option<NaiveDate>,
    pub purchased_on: NaiveDate,
    pub opened_on: Option<NaiveDate>,
    pub price: Option<Decimal>,
    pub location_id: Option<Uuid>,
}
