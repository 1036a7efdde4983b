//! Pure stock and recipe engine for the larder server.
//!
//! Everything in this crate is synchronous computation over plain data:
//! unit conversion, recipe-nesting flattening, fulfillment scoring,
//! batch consumption planning, and the ledger transitions that make a
//! consumption reversible. Persistence lives in the server crate, which
//! applies the transitions this crate computes inside one database
//! transaction.

pub mod consumption;
pub mod conversion;
pub mod error;
pub mod flatten;
pub mod fulfillment;
pub mod ledger;
pub mod types;

pub use consumption::{plan_consumption, ConsumptionPlan, PlanItem};
pub use conversion::{resolve_amount, ConversionPolicy, ConversionRule, Unit};
pub use error::{ConversionError, FlattenError};
pub use flatten::{flatten_recipe, FlatIngredient, NestingEdge};
pub use fulfillment::{compute_fulfillment, FulfillmentReport, IngredientFulfillment};
pub use ledger::{
    consume_records, undo_actions, ConsumptionRecord, JournalRow, TransactionType, UndoAction,
};
pub use types::StockBatch;
