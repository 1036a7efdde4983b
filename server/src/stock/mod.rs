//! Ledger write path shared by the stock and recipe endpoints.
//!
//! The engine crate computes plans and journal records as pure data; this
//! module applies them to the database. Every multi-row application runs
//! inside the caller's diesel transaction so a failure partway through a
//! plan rolls back the whole action.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::Utc;
use diesel::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use larder_core::{
    consume_records, undo_actions, ConsumptionPlan, JournalRow, StockBatch, TransactionType,
    UndoAction,
};

use crate::db::DbPool;
use crate::models::{NewShoppingListItem, NewStockEntry, NewStockLogRow, StockEntry, StockLogRow};
use crate::schema::{products, shopping_list_items, stock_entries, stock_log};

pub fn entry_to_batch(entry: StockEntry) -> StockBatch {
    StockBatch {
        id: entry.id,
        product_id: entry.product_id,
        amount: entry.amount,
        best_before_date: entry.best_before_date,
        purchased_on: entry.purchased_on,
        opened_on: entry.opened_on,
        price: entry.price,
        location_id: entry.location_id,
    }
}

/// Load a product's batches with positive amount, the planner's input.
pub fn load_live_batches(
    conn: &mut PgConnection,
    household_id: Uuid,
    product_id: Uuid,
) -> QueryResult<Vec<StockBatch>> {
    let entries: Vec<StockEntry> = stock_entries::table
        .filter(stock_entries::household_id.eq(household_id))
        .filter(stock_entries::product_id.eq(product_id))
        .filter(stock_entries::amount.gt(Decimal::ZERO))
        .select(StockEntry::as_select())
        .load(conn)?;
    Ok(entries.into_iter().map(entry_to_batch).collect())
}

/// On-hand amount per product, summed over all batches.
pub fn stock_totals_by_product(
    conn: &mut PgConnection,
    household_id: Uuid,
) -> QueryResult<HashMap<Uuid, Decimal>> {
    let totals: Vec<(Uuid, Option<Decimal>)> = stock_entries::table
        .filter(stock_entries::household_id.eq(household_id))
        .group_by(stock_entries::product_id)
        .select((
            stock_entries::product_id,
            diesel::dsl::sum(stock_entries::amount),
        ))
        .load(conn)?;

    Ok(totals
        .into_iter()
        .map(|(id, amount)| (id, amount.unwrap_or(Decimal::ZERO)))
        .collect())
}

/// Apply one product's consumption plan: mutate or delete the planned
/// batches and append one journal row per touched batch, all rows tagged
/// with `correlation_id`. Must be called inside a transaction.
pub fn apply_consumption(
    conn: &mut PgConnection,
    household_id: Uuid,
    batches: &[StockBatch],
    plan: &ConsumptionPlan,
    correlation_id: Uuid,
    transaction_type: TransactionType,
) -> QueryResult<()> {
    let records = consume_records(plan, batches, correlation_id, transaction_type);

    for item in &plan.items {
        if item.delete_entry {
            diesel::delete(stock_entries::table.filter(stock_entries::id.eq(item.entry_id)))
                .execute(conn)?;
        } else {
            diesel::update(stock_entries::table.filter(stock_entries::id.eq(item.entry_id)))
                .set((
                    stock_entries::amount.eq(item.new_amount),
                    stock_entries::updated_at.eq(Utc::now()),
                ))
                .execute(conn)?;
        }
    }

    let rows: Vec<NewStockLogRow> = records
        .iter()
        .map(|r| NewStockLogRow {
            household_id,
            product_id: r.product_id,
            entry_id: r.entry_id,
            amount: r.amount,
            transaction_type: r.transaction_type.as_str(),
            best_before_date: r.best_before_date,
            purchased_on: r.purchased_on,
            opened_on: r.opened_on,
            price: r.price,
            location_id: r.location_id,
            correlation_id: r.correlation_id,
        })
        .collect();

    diesel::insert_into(stock_log::table)
        .values(&rows)
        .execute(conn)?;

    Ok(())
}

pub enum UndoFailure {
    NothingToUndo,
    NotUndoable(String),
    Db(diesel::result::Error),
}

impl From<diesel::result::Error> for UndoFailure {
    fn from(e: diesel::result::Error) -> Self {
        UndoFailure::Db(e)
    }
}

/// Reverse every non-undone journal row of one correlation id: restore
/// amounts on batches that still exist, re-insert batches that were fully
/// consumed, then flip the rows to `undone`. Must be called inside a
/// transaction; returns the number of rows undone.
pub fn apply_undo(
    conn: &mut PgConnection,
    household_id: Uuid,
    correlation_id: Uuid,
) -> Result<usize, UndoFailure> {
    let rows: Vec<StockLogRow> = stock_log::table
        .filter(stock_log::household_id.eq(household_id))
        .filter(stock_log::correlation_id.eq(correlation_id))
        .filter(stock_log::undone.eq(false))
        .select(StockLogRow::as_select())
        .load(conn)?;

    if rows.is_empty() {
        return Err(UndoFailure::NothingToUndo);
    }

    let mut journal = Vec::with_capacity(rows.len());
    for row in &rows {
        let transaction_type = TransactionType::parse(&row.transaction_type)
            .ok_or_else(|| UndoFailure::NotUndoable(row.transaction_type.clone()))?;
        if !transaction_type.is_undoable() {
            return Err(UndoFailure::NotUndoable(row.transaction_type.clone()));
        }
        journal.push(JournalRow {
            entry_id: row.entry_id,
            product_id: row.product_id,
            amount: row.amount,
            transaction_type,
            best_before_date: row.best_before_date,
            purchased_on: row.purchased_on,
            opened_on: row.opened_on,
            price: row.price,
            location_id: row.location_id,
        });
    }

    let entry_ids: Vec<Uuid> = journal.iter().map(|r| r.entry_id).collect();
    let live: HashSet<Uuid> = stock_entries::table
        .filter(stock_entries::id.eq_any(&entry_ids))
        .select(stock_entries::id)
        .load::<Uuid>(conn)?
        .into_iter()
        .collect();

    for action in undo_actions(&journal, &live) {
        match action {
            UndoAction::RestoreAmount { entry_id, amount } => {
                diesel::update(stock_entries::table.filter(stock_entries::id.eq(entry_id)))
                    .set((
                        stock_entries::amount.eq(stock_entries::amount + amount),
                        stock_entries::updated_at.eq(Utc::now()),
                    ))
                    .execute(conn)?;
            }
            UndoAction::ReinsertBatch {
                product_id,
                amount,
                best_before_date,
                purchased_on,
                opened_on,
                price,
                location_id,
            } => {
                diesel::insert_into(stock_entries::table)
                    .values(NewStockEntry {
                        household_id,
                        product_id,
                        amount,
                        best_before_date,
                        purchased_on,
                        opened_on,
                        price,
                        location_id,
                    })
                    .execute(conn)?;
            }
        }
    }

    let row_ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
    diesel::update(stock_log::table.filter(stock_log::id.eq_any(&row_ids)))
        .set((
            stock_log::undone.eq(true),
            stock_log::undone_at.eq(Utc::now()),
        ))
        .execute(conn)?;

    Ok(rows.len())
}

/// Fire-and-forget check after a consumption: put products that fell
/// below their minimum stock on the shopping list. Failures are logged
/// and never surfaced to the consume operation.
pub fn spawn_below_min_stock_check(pool: Arc<DbPool>, household_id: Uuid) {
    tokio::task::spawn_blocking(move || {
        if let Err(e) = add_below_min_stock_to_shopping_list(&pool, household_id) {
            tracing::warn!(
                "Below-minimum shopping list check failed for household {}: {}",
                household_id,
                e
            );
        }
    });
}

fn add_below_min_stock_to_shopping_list(
    pool: &DbPool,
    household_id: Uuid,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut conn = pool.get()?;

    let tracked: Vec<(Uuid, String, Decimal, Uuid)> = products::table
        .filter(products::household_id.eq(household_id))
        .filter(products::deleted_at.is_null())
        .filter(products::min_stock_amount.gt(Decimal::ZERO))
        .select((
            products::id,
            products::name,
            products::min_stock_amount,
            products::qu_id_stock,
        ))
        .load(&mut conn)?;

    if tracked.is_empty() {
        return Ok(());
    }

    let totals = stock_totals_by_product(&mut conn, household_id)?;

    let already_listed: HashSet<Uuid> = shopping_list_items::table
        .filter(shopping_list_items::household_id.eq(household_id))
        .filter(shopping_list_items::deleted_at.is_null())
        .filter(shopping_list_items::is_checked.eq(false))
        .filter(shopping_list_items::product_id.is_not_null())
        .select(shopping_list_items::product_id.assume_not_null())
        .load::<Uuid>(&mut conn)?
        .into_iter()
        .collect();

    let max_sort_order: i32 = shopping_list_items::table
        .filter(shopping_list_items::household_id.eq(household_id))
        .select(diesel::dsl::max(shopping_list_items::sort_order))
        .first::<Option<i32>>(&mut conn)
        .unwrap_or(None)
        .unwrap_or(0);

    let mut next_sort_order = max_sort_order;
    for (product_id, name, min_stock_amount, qu_id_stock) in tracked {
        if already_listed.contains(&product_id) {
            continue;
        }
        let on_hand = totals.get(&product_id).copied().unwrap_or(Decimal::ZERO);
        if on_hand >= min_stock_amount {
            continue;
        }

        next_sort_order += 1;
        diesel::insert_into(shopping_list_items::table)
            .values(NewShoppingListItem {
                household_id,
                product_id: Some(product_id),
                item: &name,
                amount: Some(min_stock_amount - on_hand),
                qu_id: Some(qu_id_stock),
                note: None,
                is_checked: false,
                sort_order: next_sort_order,
            })
            .execute(&mut conn)?;

        tracing::info!(
            "Added {} to shopping list (stock {} below minimum {})",
            name,
            on_hand,
            min_stock_amount
        );
    }

    Ok(())
}
