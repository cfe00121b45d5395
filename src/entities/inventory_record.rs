use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

/// The kind of item an inventory record tracks
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    #[sea_orm(string_value = "product")]
    Product,

    #[sea_orm(string_value = "raw_material")]
    RawMaterial,
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemKind::Product => write!(f, "product"),
            ItemKind::RawMaterial => write!(f, "raw_material"),
        }
    }
}

impl FromStr for ItemKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "product" => Ok(ItemKind::Product),
            "raw_material" => Ok(ItemKind::RawMaterial),
            other => Err(format!("unknown item kind: {}", other)),
        }
    }
}

/// Inventory Record entity model.
///
/// One row tracks the stock position of a single item (product or raw
/// material). The quantity is never allowed to go negative.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "inventory_records")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_type = "Uuid")]
    pub id: Uuid,

    #[sea_orm(column_type = "Uuid")]
    pub item_id: Uuid,

    pub item_kind: ItemKind,

    pub item_name: String,

    pub item_sku: String,

    pub quantity: i32,

    pub minimum_stock: i32,

    pub maximum_stock: Option<i32>,

    pub reorder_point: i32,

    pub unit: String,

    pub last_restocked_at: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// Inventory Record entity relations
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "crate::entities::inventory_transaction::Entity")]
    Transactions,
}

impl Related<crate::entities::inventory_transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Creates a new Inventory Record.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        item_id: Uuid,
        item_kind: ItemKind,
        item_name: String,
        item_sku: String,
        quantity: i32,
        minimum_stock: i32,
        maximum_stock: Option<i32>,
        reorder_point: i32,
        unit: String,
    ) -> Self {
        let now = Utc::now();

        Self {
            id: Uuid::new_v4(),
            item_id,
            item_kind,
            item_name,
            item_sku,
            quantity,
            minimum_stock,
            maximum_stock,
            reorder_point,
            unit,
            last_restocked_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Classifies the current stock position of this record.
    pub fn stock_status(&self) -> crate::services::stock_status::StockStatus {
        crate::services::stock_status::classify(
            self.quantity,
            self.minimum_stock,
            self.maximum_stock,
            self.reorder_point,
        )
    }

    /// Whether the record is at or below its reorder point.
    pub fn needs_reorder(&self) -> bool {
        self.quantity <= self.reorder_point
    }
}
