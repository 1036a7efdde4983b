//! Ledger transitions for consuming stock and undoing a consumption.
//!
//! A consumption writes one journal row per touched batch, capturing the
//! pre-consumption snapshot fields needed to reconstruct the batch. Undo
//! derives its actions from those rows: restore the amount when the batch
//! still exists, re-insert a fresh batch when it was fully consumed. Both
//! directions are pure here; the server applies the result inside one
//! database transaction.

use std::collections::HashSet;
use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::consumption::ConsumptionPlan;
use crate::types::StockBatch;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransactionType {
    Purchase,
    Consume,
    Spoiled,
    Cook,
    Transfer,
    InventoryCorrection,
    SelfProduction,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Purchase => "purchase",
            TransactionType::Consume => "consume",
            TransactionType::Spoiled => "spoiled",
            TransactionType::Cook => "cook",
            TransactionType::Transfer => "transfer",
            TransactionType::InventoryCorrection => "inventory-correction",
            TransactionType::SelfProduction => "self-production",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "purchase" => Some(TransactionType::Purchase),
            "consume" => Some(TransactionType::Consume),
            "spoiled" => Some(TransactionType::Spoiled),
            "cook" => Some(TransactionType::Cook),
            "transfer" => Some(TransactionType::Transfer),
            "inventory-correction" => Some(TransactionType::InventoryCorrection),
            "self-production" => Some(TransactionType::SelfProduction),
            _ => None,
        }
    }

    /// Only removals can be undone by replaying journal snapshots;
    /// additions and moves have their own inverse operations.
    pub fn is_undoable(&self) -> bool {
        matches!(
            self,
            TransactionType::Consume | TransactionType::Spoiled | TransactionType::Cook
        )
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One journal row to append for one plan item: the amount moved plus the
/// batch's pre-consumption snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsumptionRecord {
    pub entry_id: Uuid,
    pub product_id: Uuid,
    pub amount: Decimal,
    pub transaction_type: TransactionType,
    pub best_before_date: Option<NaiveDate>,
    pub purchased_on: NaiveDate,
    pub opened_on: Option<NaiveDate>,
    pub price: Option<Decimal>,
    pub location_id: Option<Uuid>,
    pub correlation_id: Uuid,
}

/// Pair each plan item with its batch snapshot. All rows share the
/// correlation id so one user-visible action undoes as a unit.
pub fn consume_records(
    plan: &ConsumptionPlan,
    batches: &[StockBatch],
    correlation_id: Uuid,
    transaction_type: TransactionType,
) -> Vec<ConsumptionRecord> {
    plan.items
        .iter()
        .filter_map(|item| {
            let batch = batches.iter().find(|b| b.id == item.entry_id)?;
            Some(ConsumptionRecord {
                entry_id: batch.id,
                product_id: batch.product_id,
                amount: item.amount_to_consume,
                transaction_type,
                best_before_date: batch.best_before_date,
                purchased_on: batch.purchased_on,
                opened_on: batch.opened_on,
                price: batch.price,
                location_id: batch.location_id,
                correlation_id,
            })
        })
        .collect()
}

/// What undo needs from a stored journal row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalRow {
    pub entry_id: Uuid,
    pub product_id: Uuid,
    pub amount: Decimal,
    pub transaction_type: TransactionType,
    pub best_before_date: Option<NaiveDate>,
    pub purchased_on: NaiveDate,
    pub opened_on: Option<NaiveDate>,
    pub price: Option<Decimal>,
    pub location_id: Option<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum UndoAction {
    /// The batch was only partially consumed and still exists: add the
    /// logged amount back.
    RestoreAmount { entry_id: Uuid, amount: Decimal },
    /// The batch was fully consumed and deleted: re-insert a fresh batch
    /// with the snapshot's field values. The new row gets a new identity.
    ReinsertBatch {
        product_id: Uuid,
        amount: Decimal,
        best_before_date: Option<NaiveDate>,
        purchased_on: NaiveDate,
        opened_on: Option<NaiveDate>,
        price: Option<Decimal>,
        location_id: Option<Uuid>,
    },
}

/// Derive the undo actions for a set of journal rows. `live_entry_ids`
/// is the set of batch ids that still exist in the ledger.
pub fn undo_actions(rows: &[JournalRow], live_entry_ids: &HashSet<Uuid>) -> Vec<UndoAction> {
    rows.iter()
        .map(|row| {
            if live_entry_ids.contains(&row.entry_id) {
                UndoAction::RestoreAmount {
                    entry_id: row.entry_id,
                    amount: row.amount,
                }
            } else {
                UndoAction::ReinsertBatch {
                    product_id: row.product_id,
                    amount: row.amount,
                    best_before_date: row.best_before_date,
                    purchased_on: row.purchased_on,
                    opened_on: row.opened_on,
                    price: row.price,
                    location_id: row.location_id,
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consumption::plan_consumption;
    use rust_decimal_macros::dec;

    fn batch(amount: Decimal, best_before: Option<&str>) -> StockBatch {
        StockBatch {
            id: Uuid::new_v4(),
            product_id: Uuid::new_v4(),
            amount,
            best_before_date: best_before.map(|d| d.parse().unwrap()),
            purchased_on: "2025-01-01".parse().unwrap(),
            opened_on: None,
            price: Some(dec!(1.99)),
            location_id: Some(Uuid::new_v4()),
        }
    }

    #[test]
    fn test_records_share_correlation_id_and_snapshot_fields() {
        let batches = vec![
            batch(dec!(5), Some("2025-01-01")),
            batch(dec!(3), Some("2025-03-01")),
        ];
        let plan = plan_consumption(&batches, dec!(6));
        let correlation = Uuid::new_v4();

        let records = consume_records(&plan, &batches, correlation, TransactionType::Consume);

        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.correlation_id == correlation));
        assert_eq!(records[0].entry_id, batches[0].id);
        assert_eq!(records[0].amount, dec!(5));
        assert_eq!(records[0].price, batches[0].price);
        assert_eq!(records[0].location_id, batches[0].location_id);
        assert_eq!(records[1].amount, dec!(1));
    }

    #[test]
    fn test_undo_restores_live_entry_and_reinserts_deleted() {
        let partial = batch(dec!(3), Some("2025-03-01"));
        let drained = batch(dec!(5), Some("2025-01-01"));
        let rows = vec![
            JournalRow {
                entry_id: drained.id,
                product_id: drained.product_id,
                amount: dec!(5),
                transaction_type: TransactionType::Consume,
                best_before_date: drained.best_before_date,
                purchased_on: drained.purchased_on,
                opened_on: None,
                price: drained.price,
                location_id: drained.location_id,
            },
            JournalRow {
                entry_id: partial.id,
                product_id: partial.product_id,
                amount: dec!(1),
                transaction_type: TransactionType::Consume,
                best_before_date: partial.best_before_date,
                purchased_on: partial.purchased_on,
                opened_on: None,
                price: partial.price,
                location_id: partial.location_id,
            },
        ];
        let live = HashSet::from([partial.id]);

        let actions = undo_actions(&rows, &live);

        assert_eq!(
            actions[0],
            UndoAction::ReinsertBatch {
                product_id: drained.product_id,
                amount: dec!(5),
                best_before_date: drained.best_before_date,
                purchased_on: drained.purchased_on,
                opened_on: None,
                price: drained.price,
                location_id: drained.location_id,
            }
        );
        assert_eq!(
            actions[1],
            UndoAction::RestoreAmount {
                entry_id: partial.id,
                amount: dec!(1),
            }
        );
    }

    #[test]
    fn test_transaction_type_round_trips_through_str() {
        for tx in [
            TransactionType::Purchase,
            TransactionType::Consume,
            TransactionType::Spoiled,
            TransactionType::Cook,
            TransactionType::Transfer,
            TransactionType::InventoryCorrection,
            TransactionType::SelfProduction,
        ] {
            assert_eq!(TransactionType::parse(tx.as_str()), Some(tx));
        }
        assert_eq!(TransactionType::parse("unknown"), None);
    }

    #[test]
    fn test_only_removals_are_undoable() {
        assert!(TransactionType::Consume.is_undoable());
        assert!(TransactionType::Spoiled.is_undoable());
        assert!(TransactionType::Cook.is_undoable());
        assert!(!TransactionType::Purchase.is_undoable());
        assert!(!TransactionType::Transfer.is_undoable());
        assert!(!TransactionType::InventoryCorrection.is_undoable());
    }
}
