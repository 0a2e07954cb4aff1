//! Product category database entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue::{Set, Unchanged};

use domain::ProductCategory;

use crate::repository::records::CategoryField;
use crate::repository::sea_table::Persisted;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "product_categories")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for ProductCategory {
    fn from(model: Model) -> Self {
        ProductCategory {
            id: model.id,
            name: model.name,
            description: model.description,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl Persisted for ProductCategory {
    type Entity = Entity;
    type ActiveModel = ActiveModel;

    fn column(field: CategoryField) -> Column {
        match field {
            CategoryField::Id => Column::Id,
            CategoryField::Name => Column::Name,
            CategoryField::CreatedAt => Column::CreatedAt,
        }
    }

    fn from_model(model: Model) -> Self {
        model.into()
    }

    fn to_active_model(&self) -> ActiveModel {
        ActiveModel {
            id: Unchanged(self.id),
            name: Set(self.name.clone()),
            description: Set(self.description.clone()),
            created_at: Set(self.created_at),
            updated_at: Set(self.updated_at),
        }
    }
}
