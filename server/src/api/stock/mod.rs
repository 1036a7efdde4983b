pub mod consume;
pub mod entries;
pub mod inventory;
pub mod journal;
pub mod open;
pub mod purchase;
pub mod transfer;
pub mod undo;

use crate::AppState;
use axum::routing::{get, post};
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for /api/stock endpoints
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/purchase", post(purchase::purchase))
        .route("/entries", get(entries::list_entries))
        .route("/consume", post(consume::consume))
        .route("/open", post(open::open_entry))
        .route("/transfer", post(transfer::transfer_entry))
        .route("/inventory", post(inventory::inventory_correction))
        .route("/journal", get(journal::list_journal))
        .route("/undo/{correlation_id}", post(undo::undo_transaction))
}

#[derive(OpenApi)]
#[openapi(
    paths(
        purchase::purchase,
        entries::list_entries,
        consume::consume,
        open::open_entry,
        transfer::transfer_entry,
        inventory::inventory_correction,
        journal::list_journal,
        undo::undo_transaction,
    ),
    components(schemas(
        purchase::PurchaseRequest,
        purchase::PurchaseResponse,
        entries::StockEntryListResponse,
        entries::StockEntryResponse,
        consume::ConsumeRequest,
        consume::ConsumeResponse,
        open::OpenRequest,
        transfer::TransferRequest,
        transfer::TransferResponse,
        inventory::InventoryRequest,
        inventory::InventoryResponse,
        journal::JournalListResponse,
        journal::JournalRowResponse,
        undo::UndoResponse,
    ))
)]
pub struct ApiDoc;
