use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;
use uuid::Uuid;

/// Inventory Transaction Type enumeration
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    #[sea_orm(string_value = "sale")]
    Sale,

    #[sea_orm(string_value = "purchase")]
    Purchase,

    #[sea_orm(string_value = "adjustment")]
    Adjustment,

    #[sea_orm(string_value = "return")]
    Return,
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionType::Sale => write!(f, "sale"),
            TransactionType::Purchase => write!(f, "purchase"),
            TransactionType::Adjustment => write!(f, "adjustment"),
            TransactionType::Return => write!(f, "return"),
        }
    }
}

/// Inventory Transaction entity model.
///
/// Rows are append-only: every quantity change on an inventory record
/// produces exactly one transaction capturing the before and after values.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "inventory_transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_type = "Uuid")]
    pub id: Uuid,

    #[sea_orm(column_type = "Uuid")]
    pub inventory_record_id: Uuid,

    pub transaction_type: TransactionType,

    /// Signed change applied to the record quantity
    pub quantity_change: i32,

    pub quantity_before: i32,

    pub quantity_after: i32,

    pub reference_id: Option<Uuid>,

    pub reference_type: Option<String>,

    pub notes: Option<String>,

    pub created_by: Option<String>,

    pub created_at: DateTime<Utc>,
}

/// Inventory Transaction entity relations
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "crate::entities::inventory_record::Entity",
        from = "Column::InventoryRecordId",
        to = "crate::entities::inventory_record::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    InventoryRecord,
}

impl Related<crate::entities::inventory_record::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InventoryRecord.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Creates a new Inventory Transaction.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        inventory_record_id: Uuid,
        transaction_type: TransactionType,
        quantity_change: i32,
        quantity_before: i32,
        quantity_after: i32,
        reference_id: Option<Uuid>,
        reference_type: Option<String>,
        notes: Option<String>,
        created_by: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            inventory_record_id,
            transaction_type,
            quantity_change,
            quantity_before,
            quantity_after,
            reference_id,
            reference_type,
            notes,
            created_by,
            created_at: Utc::now(),
        }
    }

}
