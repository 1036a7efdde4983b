//! Consumption planning: which batches to take a quantity from.
//!
//! Batches are consumed soonest-expiry-first so urgent stock leaves the
//! shelf before it spoils; never-expiring batches go last. The plan is
//! pure data and is applied by the caller.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::StockBatch;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanItem {
    pub entry_id: Uuid,
    pub amount_to_consume: Decimal,
    /// Remaining amount after consumption; zero iff `delete_entry`.
    pub new_amount: Decimal,
    pub delete_entry: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsumptionPlan {
    pub items: Vec<PlanItem>,
    /// May be less than requested when stock is insufficient; a partial
    /// plan is valid and the caller decides whether to accept it.
    pub total_consumed: Decimal,
}

impl ConsumptionPlan {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Plan the removal of `requested` from the given batches.
///
/// Candidate batches (positive amount) are ordered by best-before date
/// ascending with dateless batches last, tie-broken by purchase date and
/// then id so the plan is deterministic. Consumption is greedy from the
/// front of that order; a batch drained to exactly zero is marked for
/// deletion.
pub fn plan_consumption(batches: &[StockBatch], requested: Decimal) -> ConsumptionPlan {
    let mut candidates: Vec<&StockBatch> = batches
        .iter()
        .filter(|b| b.amount > Decimal::ZERO)
        .collect();
    candidates.sort_by_key(|b| {
        (
            b.best_before_date.is_none(),
            b.best_before_date,
            b.purchased_on,
            b.id,
        )
    });

    let mut items = Vec::new();
    let mut remaining = requested;
    for batch in candidates {
        if remaining <= Decimal::ZERO {
            break;
        }
        let taken = batch.amount.min(remaining);
        items.push(PlanItem {
            entry_id: batch.id,
            amount_to_consume: taken,
            new_amount: batch.amount - taken,
            delete_entry: taken == batch.amount,
        });
        remaining -= taken;
    }

    let total_consumed = items.iter().map(|i| i.amount_to_consume).sum();
    ConsumptionPlan {
        items,
        total_consumed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn batch(amount: Decimal, best_before: Option<&str>) -> StockBatch {
        StockBatch {
            id: Uuid::new_v4(),
            product_id: Uuid::new_v4(),
            amount,
            best_before_date: best_before.map(|d| d.parse::<NaiveDate>().unwrap()),
            purchased_on: "2025-01-01".parse().unwrap(),
            opened_on: None,
            price: None,
            location_id: None,
        }
    }

    #[test]
    fn test_soonest_expiry_first_with_nulls_last() {
        let batches = vec![
            batch(dec!(1), Some("2026-01-01")),
            batch(dec!(1), None),
            batch(dec!(1), Some("2025-06-01")),
        ];

        let plan = plan_consumption(&batches, dec!(3));

        assert_eq!(plan.items[0].entry_id, batches[2].id);
        assert_eq!(plan.items[1].entry_id, batches[0].id);
        assert_eq!(plan.items[2].entry_id, batches[1].id);
    }

    #[test]
    fn test_partial_take_from_second_batch() {
        let a = batch(dec!(3), Some("2025-03-01"));
        let b = batch(dec!(5), Some("2025-01-01"));
        let batches = vec![a.clone(), b.clone()];

        let plan = plan_consumption(&batches, dec!(6));

        assert_eq!(plan.total_consumed, dec!(6));
        assert_eq!(plan.items.len(), 2);
        assert_eq!(plan.items[0].entry_id, b.id);
        assert_eq!(plan.items[0].amount_to_consume, dec!(5));
        assert!(plan.items[0].delete_entry);
        assert_eq!(plan.items[1].entry_id, a.id);
        assert_eq!(plan.items[1].amount_to_consume, dec!(1));
        assert_eq!(plan.items[1].new_amount, dec!(2));
        assert!(!plan.items[1].delete_entry);
    }

    #[test]
    fn test_conservation() {
        let batches = vec![
            batch(dec!(2.5), Some("2025-02-01")),
            batch(dec!(1.25), Some("2025-01-01")),
            batch(dec!(4), None),
        ];

        let plan = plan_consumption(&batches, dec!(5));

        let item_sum: Decimal = plan.items.iter().map(|i| i.amount_to_consume).sum();
        assert_eq!(item_sum, plan.total_consumed);
        assert_eq!(plan.total_consumed, dec!(5));
    }

    #[test]
    fn test_insufficient_stock_is_best_effort() {
        let batches = vec![batch(dec!(2), Some("2025-01-01")), batch(dec!(1), None)];

        let plan = plan_consumption(&batches, dec!(10));

        assert_eq!(plan.total_consumed, dec!(3));
        assert!(plan.items.iter().all(|i| i.delete_entry));
    }

    #[test]
    fn test_no_positive_batches_yields_empty_plan() {
        let batches = vec![batch(dec!(0), Some("2025-01-01"))];

        let plan = plan_consumption(&batches, dec!(1));

        assert!(plan.is_empty());
        assert_eq!(plan.total_consumed, dec!(0));
    }

    #[test]
    fn test_exact_drain_marks_delete() {
        let batches = vec![batch(dec!(4), Some("2025-01-01"))];

        let plan = plan_consumption(&batches, dec!(4));

        assert_eq!(plan.items.len(), 1);
        assert!(plan.items[0].delete_entry);
        assert_eq!(plan.items[0].new_amount, dec!(0));
    }

    #[test]
    fn test_tie_broken_by_purchase_date() {
        let mut older = batch(dec!(1), Some("2025-06-01"));
        older.purchased_on = "2024-01-01".parse().unwrap();
        let newer = batch(dec!(1), Some("2025-06-01"));
        let batches = vec![newer.clone(), older.clone()];

        let plan = plan_consumption(&batches, dec!(1));

        assert_eq!(plan.items[0].entry_id, older.id);
    }
}
