use crate::{
    db::DbPool,
    entities::{
        inventory_record::{self, Entity as InventoryRecord, ItemKind},
        inventory_transaction::{self, Entity as InventoryTransaction, TransactionType},
    },
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::Utc;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, Condition, EntityTrait, Order, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionError, TransactionTrait,
};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// Command describing a single stock movement.
#[derive(Debug, Clone)]
pub struct StockAdjustment {
    pub item_id: Uuid,
    pub item_kind: ItemKind,
    /// Signed quantity change. Positive adds stock, negative removes it.
    pub delta: i32,
    pub transaction_type: TransactionType,
    pub reference_id: Option<Uuid>,
    pub reference_type: Option<String>,
    pub notes: Option<String>,
    /// Identifier of the user or system actor applying the change
    pub actor_id: Option<String>,
}

/// Result of a committed stock adjustment.
#[derive(Debug, Clone)]
pub struct StockAdjustmentOutcome {
    pub transaction_id: Uuid,
    pub record: inventory_record::Model,
}

/// Parameters for registering a new item in the ledger.
#[derive(Debug, Clone)]
pub struct NewInventoryRecord {
    pub item_id: Uuid,
    pub item_kind: ItemKind,
    pub item_name: String,
    pub item_sku: String,
    pub initial_quantity: i32,
    pub minimum_stock: i32,
    pub maximum_stock: Option<i32>,
    pub reorder_point: i32,
    pub unit: String,
}

/// Filters for listing inventory records.
#[derive(Debug, Clone, Default)]
pub struct RecordFilter {
    pub item_kind: Option<ItemKind>,
    pub low_stock_only: bool,
}

/// Service owning all reads and writes of the stock ledger.
///
/// Every quantity change goes through [`apply_adjustment`], which updates the
/// record and appends a transaction row in one database transaction.
#[derive(Clone)]
pub struct StockLedgerService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl StockLedgerService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Applies a signed quantity change to an item's inventory record.
    ///
    /// The read-modify-write of the record and the append of the transaction
    /// row commit atomically. A change that would drive the quantity negative
    /// rolls back and leaves both tables untouched.
    #[instrument(skip(self), fields(item_id = %adjustment.item_id, delta = adjustment.delta))]
    pub async fn apply_adjustment(
        &self,
        adjustment: StockAdjustment,
    ) -> Result<StockAdjustmentOutcome, ServiceError> {
        if adjustment.delta == 0 {
            return Err(ServiceError::InvalidInput(
                "adjustment delta must be non-zero".to_string(),
            ));
        }

        let delta = adjustment.delta;
        let db = self.db_pool.as_ref();
        let outcome = db
            .transaction::<_, StockAdjustmentOutcome, ServiceError>(move |txn| {
                Box::pin(async move {
                    let record = InventoryRecord::find()
                        .filter(inventory_record::Column::ItemId.eq(adjustment.item_id))
                        .filter(inventory_record::Column::ItemKind.eq(adjustment.item_kind))
                        .one(txn)
                        .await
                        .map_err(ServiceError::db_error)?
                        .ok_or_else(|| {
                            ServiceError::NotFound(format!(
                                "No inventory record for {} {}",
                                adjustment.item_kind, adjustment.item_id
                            ))
                        })?;

                    let quantity_before = record.quantity;
                    let quantity_after = quantity_before
                        .checked_add(adjustment.delta)
                        .ok_or_else(|| {
                            ServiceError::InvalidInput(
                                "adjustment delta overflows quantity".to_string(),
                            )
                        })?;

                    if quantity_after < 0 {
                        return Err(ServiceError::insufficient_stock(
                            quantity_before,
                            adjustment.delta.unsigned_abs(),
                        ));
                    }

                    let now = Utc::now();
                    let mut active_record: inventory_record::ActiveModel = record.clone().into();
                    active_record.quantity = Set(quantity_after);
                    active_record.updated_at = Set(now);
                    if adjustment.delta > 0 {
                        active_record.last_restocked_at = Set(Some(now));
                    }

                    let updated_record = active_record
                        .update(txn)
                        .await
                        .map_err(ServiceError::db_error)?;

                    let transaction: inventory_transaction::ActiveModel =
                        inventory_transaction::Model::new(
                            record.id,
                            adjustment.transaction_type,
                            adjustment.delta,
                            quantity_before,
                            quantity_after,
                            adjustment.reference_id,
                            adjustment.reference_type,
                            adjustment.notes,
                            adjustment.actor_id,
                        )
                        .into();

                    let inserted = transaction
                        .insert(txn)
                        .await
                        .map_err(ServiceError::db_error)?;

                    info!(
                        "Adjusted {} {} by {}: {} -> {}",
                        adjustment.item_kind,
                        adjustment.item_id,
                        adjustment.delta,
                        quantity_before,
                        quantity_after
                    );

                    Ok(StockAdjustmentOutcome {
                        transaction_id: inserted.id,
                        record: updated_record,
                    })
                })
            })
            .await
            .map_err(|e| match e {
                TransactionError::Connection(db_err) => ServiceError::db_error(db_err),
                TransactionError::Transaction(service_err) => service_err,
            })?;

        // Events are advisory. A send failure must not undo a committed change.
        if let Err(e) = self
            .event_sender
            .send(Event::InventoryAdjusted {
                record_id: outcome.record.id,
                item_id: outcome.record.item_id,
                quantity_change: delta,
                new_quantity: outcome.record.quantity,
                transaction_id: outcome.transaction_id,
            })
            .await
        {
            warn!("Failed to publish inventory adjustment event: {}", e);
        }

        if outcome.record.needs_reorder() {
            if let Err(e) = self
                .event_sender
                .send(Event::InventoryBelowReorderPoint {
                    record_id: outcome.record.id,
                    item_id: outcome.record.item_id,
                    quantity: outcome.record.quantity,
                    reorder_point: outcome.record.reorder_point,
                })
                .await
            {
                warn!("Failed to publish reorder alert event: {}", e);
            }
        }

        Ok(outcome)
    }

    /// Registers a new item in the ledger.
    #[instrument(skip(self, new_record), fields(item_id = %new_record.item_id))]
    pub async fn create_record(
        &self,
        new_record: NewInventoryRecord,
    ) -> Result<inventory_record::Model, ServiceError> {
        if new_record.initial_quantity < 0 {
            return Err(ServiceError::InvalidInput(
                "initial quantity cannot be negative".to_string(),
            ));
        }

        let db = self.db_pool.as_ref();

        let existing = InventoryRecord::find()
            .filter(inventory_record::Column::ItemId.eq(new_record.item_id))
            .filter(inventory_record::Column::ItemKind.eq(new_record.item_kind))
            .one(db)
            .await
            .map_err(ServiceError::db_error)?;

        if existing.is_some() {
            return Err(ServiceError::Conflict(format!(
                "Inventory record already exists for {} {}",
                new_record.item_kind, new_record.item_id
            )));
        }

        let model = inventory_record::Model::new(
            new_record.item_id,
            new_record.item_kind,
            new_record.item_name,
            new_record.item_sku,
            new_record.initial_quantity,
            new_record.minimum_stock,
            new_record.maximum_stock,
            new_record.reorder_point,
            new_record.unit,
        );

        let active: inventory_record::ActiveModel = model.into();
        let created = active.insert(db).await.map_err(ServiceError::db_error)?;

        info!(
            "Created inventory record {} for {} {}",
            created.id, created.item_kind, created.item_id
        );

        if let Err(e) = self
            .event_sender
            .send(Event::InventoryRecordCreated {
                record_id: created.id,
                item_id: created.item_id,
            })
            .await
        {
            warn!("Failed to publish record creation event: {}", e);
        }

        Ok(created)
    }

    /// Fetches a single record by its ledger id.
    pub async fn get_record(&self, id: Uuid) -> Result<inventory_record::Model, ServiceError> {
        InventoryRecord::find_by_id(id)
            .one(self.db_pool.as_ref())
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Inventory record {} not found", id)))
    }

    /// Fetches a record by the item it tracks.
    pub async fn get_record_by_item(
        &self,
        item_id: Uuid,
        item_kind: ItemKind,
    ) -> Result<inventory_record::Model, ServiceError> {
        InventoryRecord::find()
            .filter(inventory_record::Column::ItemId.eq(item_id))
            .filter(inventory_record::Column::ItemKind.eq(item_kind))
            .one(self.db_pool.as_ref())
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!(
                    "No inventory record for {} {}",
                    item_kind, item_id
                ))
            })
    }

    /// Lists records with optional filters, newest first.
    pub async fn list_records(
        &self,
        filter: RecordFilter,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<inventory_record::Model>, u64), ServiceError> {
        let mut query = InventoryRecord::find();

        if let Some(kind) = filter.item_kind {
            query = query.filter(inventory_record::Column::ItemKind.eq(kind));
        }
        if filter.low_stock_only {
            query = query.filter(Self::low_stock_condition());
        }

        let paginator = query
            .order_by(inventory_record::Column::CreatedAt, Order::Desc)
            .paginate(self.db_pool.as_ref(), per_page);

        let total = paginator
            .num_items()
            .await
            .map_err(ServiceError::db_error)?;
        let records = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(ServiceError::db_error)?;

        Ok((records, total))
    }

    /// Returns the transaction history for a record, newest first.
    pub async fn transaction_history(
        &self,
        record_id: Uuid,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<inventory_transaction::Model>, u64), ServiceError> {
        // Surface a 404 rather than an empty page for unknown records
        self.get_record(record_id).await?;

        let paginator = InventoryTransaction::find()
            .filter(inventory_transaction::Column::InventoryRecordId.eq(record_id))
            .order_by(inventory_transaction::Column::CreatedAt, Order::Desc)
            .paginate(self.db_pool.as_ref(), per_page);

        let total = paginator
            .num_items()
            .await
            .map_err(ServiceError::db_error)?;
        let transactions = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(ServiceError::db_error)?;

        Ok((transactions, total))
    }

    /// Returns every record at or below its reorder point.
    ///
    /// A single set-based query, not a per-record scan.
    pub async fn low_stock_alerts(&self) -> Result<Vec<inventory_record::Model>, ServiceError> {
        InventoryRecord::find()
            .filter(Self::low_stock_condition())
            .order_by(inventory_record::Column::Quantity, Order::Asc)
            .all(self.db_pool.as_ref())
            .await
            .map_err(ServiceError::db_error)
    }

    fn low_stock_condition() -> Condition {
        Condition::all().add(
            Expr::col(inventory_record::Column::Quantity)
                .lte(Expr::col(inventory_record::Column::ReorderPoint)),
        )
    }
}
