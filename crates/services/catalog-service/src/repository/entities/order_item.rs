//! Order item database entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue::{Set, Unchanged};

use domain::OrderItem;

use crate::repository::records::OrderItemField;
use crate::repository::sea_table::Persisted;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "order_items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub order_id: i64,
    pub product_id: i64,
    pub quantity: i32,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub unit_price: Decimal,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for OrderItem {
    fn from(model: Model) -> Self {
        OrderItem {
            id: model.id,
            order_id: model.order_id,
            product_id: model.product_id,
            quantity: model.quantity,
            unit_price: model.unit_price,
        }
    }
}

impl Persisted for OrderItem {
    type Entity = Entity;
    type ActiveModel = ActiveModel;

    fn column(field: OrderItemField) -> Column {
        match field {
            OrderItemField::Id => Column::Id,
            OrderItemField::OrderId => Column::OrderId,
            OrderItemField::ProductId => Column::ProductId,
            OrderItemField::Quantity => Column::Quantity,
        }
    }

    fn from_model(model: Model) -> Self {
        model.into()
    }

    fn to_active_model(&self) -> ActiveModel {
        ActiveModel {
            id: Unchanged(self.id),
            order_id: Set(self.order_id),
            product_id: Set(self.product_id),
            quantity: Set(self.quantity),
            unit_price: Set(self.unit_price),
        }
    }
}
