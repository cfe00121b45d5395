pub mod inventory_record;
pub mod inventory_transaction;

pub use inventory_record::ItemKind;
pub use inventory_transaction::TransactionType;
