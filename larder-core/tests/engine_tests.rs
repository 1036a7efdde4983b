//! End-to-end engine scenarios: flatten → fulfill → plan → consume → undo,
//! applied against an in-memory ledger the way the server applies them
//! against the database.

use std::collections::{HashMap, HashSet};

use larder_core::{
    compute_fulfillment, consume_records, flatten_recipe, plan_consumption, undo_actions,
    ConsumptionPlan, FlatIngredient, JournalRow, NestingEdge, StockBatch, TransactionType,
    UndoAction,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

fn batch(product_id: Uuid, amount: Decimal, best_before: Option<&str>) -> StockBatch {
    StockBatch {
        id: Uuid::new_v4(),
        product_id,
        amount,
        best_before_date: best_before.map(|d| d.parse().unwrap()),
        purchased_on: "2025-01-01".parse().unwrap(),
        opened_on: None,
        price: Some(dec!(2.49)),
        location_id: Some(Uuid::new_v4()),
    }
}

/// Apply a plan to an in-memory ledger and return the journal rows, the
/// way the server does inside one transaction.
fn apply_plan(
    ledger: &mut Vec<StockBatch>,
    plan: &ConsumptionPlan,
    correlation_id: Uuid,
) -> Vec<JournalRow> {
    let records = consume_records(plan, ledger, correlation_id, TransactionType::Consume);
    for item in &plan.items {
        if item.delete_entry {
            ledger.retain(|b| b.id != item.entry_id);
        } else if let Some(b) = ledger.iter_mut().find(|b| b.id == item.entry_id) {
            b.amount = item.new_amount;
        }
    }
    records
        .iter()
        .map(|r| JournalRow {
            entry_id: r.entry_id,
            product_id: r.product_id,
            amount: r.amount,
            transaction_type: r.transaction_type,
            best_before_date: r.best_before_date,
            purchased_on: r.purchased_on,
            opened_on: r.opened_on,
            price: r.price,
            location_id: r.location_id,
        })
        .collect()
}

fn apply_undo(ledger: &mut Vec<StockBatch>, rows: &[JournalRow]) {
    let live: HashSet<Uuid> = ledger.iter().map(|b| b.id).collect();
    for action in undo_actions(rows, &live) {
        match action {
            UndoAction::RestoreAmount { entry_id, amount } => {
                if let Some(b) = ledger.iter_mut().find(|b| b.id == entry_id) {
                    b.amount += amount;
                }
            }
            UndoAction::ReinsertBatch {
                product_id,
                amount,
                best_before_date,
                purchased_on,
                opened_on,
                price,
                location_id,
            } => ledger.push(StockBatch {
                id: Uuid::new_v4(),
                product_id,
                amount,
                best_before_date,
                purchased_on,
                opened_on,
                price,
                location_id,
            }),
        }
    }
}

#[test]
fn consume_then_undo_restores_exact_amount() {
    let product = Uuid::new_v4();
    let mut ledger = vec![batch(product, dec!(10), Some("2025-06-01"))];

    let plan = plan_consumption(&ledger, dec!(4));
    let rows = apply_plan(&mut ledger, &plan, Uuid::new_v4());

    assert_eq!(ledger[0].amount, dec!(6));

    apply_undo(&mut ledger, &rows);

    // Exact decimal equality, not approximate.
    assert_eq!(ledger.len(), 1);
    assert_eq!(ledger[0].amount, dec!(10));
}

#[test]
fn undo_reinserts_fully_consumed_batches_with_same_fields() {
    let product = Uuid::new_v4();
    let original = batch(product, dec!(3), Some("2025-02-01"));
    let mut ledger = vec![original.clone()];

    let plan = plan_consumption(&ledger, dec!(3));
    let rows = apply_plan(&mut ledger, &plan, Uuid::new_v4());
    assert!(ledger.is_empty());

    apply_undo(&mut ledger, &rows);

    assert_eq!(ledger.len(), 1);
    let restored = &ledger[0];
    // Fresh identity, same data.
    assert_ne!(restored.id, original.id);
    assert_eq!(restored.amount, original.amount);
    assert_eq!(restored.best_before_date, original.best_before_date);
    assert_eq!(restored.purchased_on, original.purchased_on);
    assert_eq!(restored.price, original.price);
    assert_eq!(restored.location_id, original.location_id);
}

#[test]
fn multi_batch_consume_undoes_as_a_unit() {
    let product = Uuid::new_v4();
    let mut ledger = vec![
        batch(product, dec!(3), Some("2025-03-01")),
        batch(product, dec!(5), Some("2025-01-01")),
    ];

    let plan = plan_consumption(&ledger, dec!(6));
    let correlation = Uuid::new_v4();
    let rows = apply_plan(&mut ledger, &plan, correlation);

    let on_hand: Decimal = ledger.iter().map(|b| b.amount).sum();
    assert_eq!(on_hand, dec!(2));

    apply_undo(&mut ledger, &rows);

    let on_hand: Decimal = ledger.iter().map(|b| b.amount).sum();
    assert_eq!(on_hand, dec!(8));
}

#[test]
fn nested_recipe_fulfillment_end_to_end() {
    let flour = Uuid::new_v4();
    let yeast = Uuid::new_v4();
    let pizza = Uuid::new_v4();
    let dough = Uuid::new_v4();

    let dough_flour = FlatIngredient {
        ingredient_id: Uuid::new_v4(),
        recipe_id: dough,
        product_id: Some(flour),
        amount: dec!(500),
        unit_id: None,
        variable_amount: false,
        not_check_stock_fulfillment: false,
        product_skips_stock_check: false,
    };
    let dough_yeast = FlatIngredient {
        ingredient_id: Uuid::new_v4(),
        recipe_id: dough,
        product_id: Some(yeast),
        amount: dec!(7),
        unit_id: None,
        variable_amount: false,
        not_check_stock_fulfillment: false,
        product_skips_stock_check: false,
    };

    let ingredients = HashMap::from([(dough, vec![dough_flour, dough_yeast])]);
    // Pizza for 4 uses 2 servings of a dough recipe sized for 4.
    let nestings = HashMap::from([(
        pizza,
        vec![NestingEdge {
            includes_recipe_id: dough,
            servings: dec!(2),
        }],
    )]);
    let bases = HashMap::from([(pizza, dec!(4)), (dough, dec!(4))]);

    let flat = flatten_recipe(pizza, &ingredients, &nestings, &bases, dec!(4)).unwrap();
    // 500 * (2/4) = 250 flour, 7 * (2/4) = 3.5 yeast
    assert_eq!(flat[0].amount, dec!(250));
    assert_eq!(flat[1].amount, dec!(3.5));

    let stock = HashMap::from([(flour, dec!(250)), (yeast, dec!(2))]);
    let report = compute_fulfillment(&flat, &stock, dec!(4), dec!(4));

    assert!(!report.can_make);
    assert_eq!(report.fulfillment_ratio, dec!(0.5));
    assert_eq!(report.ingredients[1].missing, dec!(1.5));
}

#[test]
fn second_undo_has_nothing_to_do() {
    // The server filters journal rows on `undone = false`; after a first
    // undo flips them, the second fetch is empty and must be a no-op.
    let product = Uuid::new_v4();
    let mut ledger = vec![batch(product, dec!(10), None)];

    let plan = plan_consumption(&ledger, dec!(4));
    let rows = apply_plan(&mut ledger, &plan, Uuid::new_v4());

    apply_undo(&mut ledger, &rows);
    assert_eq!(ledger[0].amount, dec!(10));

    let no_rows: Vec<JournalRow> = Vec::new();
    apply_undo(&mut ledger, &no_rows);
    assert_eq!(ledger[0].amount, dec!(10));
    assert_eq!(ledger.len(), 1);
}
