//! Warehouse database entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue::{Set, Unchanged};

use domain::Warehouse;

use crate::repository::records::WarehouseField;
use crate::repository::sea_table::Persisted;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "warehouses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub address: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Warehouse {
    fn from(model: Model) -> Self {
        Warehouse {
            id: model.id,
            name: model.name,
            address: model.address,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl Persisted for Warehouse {
    type Entity = Entity;
    type ActiveModel = ActiveModel;

    fn column(field: WarehouseField) -> Column {
        match field {
            WarehouseField::Id => Column::Id,
            WarehouseField::Name => Column::Name,
            WarehouseField::Address => Column::Address,
            WarehouseField::CreatedAt => Column::CreatedAt,
            WarehouseField::UpdatedAt => Column::UpdatedAt,
        }
    }

    fn from_model(model: Model) -> Self {
        model.into()
    }

    fn to_active_model(&self) -> ActiveModel {
        ActiveModel {
            id: Unchanged(self.id),
            name: Set(self.name.clone()),
            address: Set(self.address.clone()),
            created_at: Set(self.created_at),
            updated_at: Set(self.updated_at),
        }
    }
}
