// Core services
pub mod stock_ledger;
pub mod stock_status;

pub use stock_ledger::{
    NewInventoryRecord, RecordFilter, StockAdjustment, StockAdjustmentOutcome, StockLedgerService,
};
pub use stock_status::{classify, StockStatus};
