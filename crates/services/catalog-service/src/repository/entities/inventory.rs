//! Inventory database entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue::{Set, Unchanged};

use domain::Inventory;

use crate::repository::records::InventoryField;
use crate::repository::sea_table::Persisted;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "inventories")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub product_id: i64,
    pub warehouse_id: Option<i64>,
    pub quantity: i32,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id",
        on_delete = "Cascade"
    )]
    Product,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Inventory {
    fn from(model: Model) -> Self {
        Inventory {
            id: model.id,
            product_id: model.product_id,
            warehouse_id: model.warehouse_id,
            quantity: model.quantity,
            updated_at: model.updated_at,
        }
    }
}

impl Persisted for Inventory {
    type Entity = Entity;
    type ActiveModel = ActiveModel;

    fn column(field: InventoryField) -> Column {
        match field {
            InventoryField::Id => Column::Id,
            InventoryField::ProductId => Column::ProductId,
            InventoryField::WarehouseId => Column::WarehouseId,
            InventoryField::Quantity => Column::Quantity,
            InventoryField::UpdatedAt => Column::UpdatedAt,
        }
    }

    fn from_model(model: Model) -> Self {
        model.into()
    }

    fn to_active_model(&self) -> ActiveModel {
        ActiveModel {
            id: Unchanged(self.id),
            product_id: Set(self.product_id),
            warehouse_id: Set(self.warehouse_id),
            quantity: Set(self.quantity),
            updated_at: Set(self.updated_at),
        }
    }
}
