//! Product database entity for SeaORM.

use std::collections::HashMap;

use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue::{Set, Unchanged};
use sea_orm::DatabaseTransaction;

use common::AppResult;
use domain::{Attachment, Product, ProductCategory};

use super::{attachment, product_category};
use crate::repository::records::{ProductField, ProductRelation};
use crate::repository::sea_table::Persisted;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub price: Decimal,
    pub category_id: i64,
    pub attachment_id: Option<i64>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::product_category::Entity",
        from = "Column::CategoryId",
        to = "super::product_category::Column::Id"
    )]
    Category,
    #[sea_orm(
        belongs_to = "super::attachment::Entity",
        from = "Column::AttachmentId",
        to = "super::attachment::Column::Id"
    )]
    Attachment,
}

impl Related<super::product_category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::attachment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Attachment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Product {
    fn from(model: Model) -> Self {
        Product {
            id: model.id,
            name: model.name,
            description: model.description,
            price: model.price,
            category_id: model.category_id,
            attachment_id: model.attachment_id,
            created_at: model.created_at,
            updated_at: model.updated_at,
            category: None,
            attachment: None,
        }
    }
}

#[async_trait::async_trait]
impl Persisted for Product {
    type Entity = Entity;
    type ActiveModel = ActiveModel;

    fn column(field: ProductField) -> Column {
        match field {
            ProductField::Id => Column::Id,
            ProductField::Name => Column::Name,
            ProductField::Price => Column::Price,
            ProductField::CategoryId => Column::CategoryId,
            ProductField::AttachmentId => Column::AttachmentId,
            ProductField::CreatedAt => Column::CreatedAt,
            ProductField::UpdatedAt => Column::UpdatedAt,
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
            price: Set(self.price),
            category_id: Set(self.category_id),
            attachment_id: Set(self.attachment_id),
            created_at: Set(self.created_at),
            updated_at: Set(self.updated_at),
        }
    }

    /// One query per requested relation, whatever the number of rows
    async fn load_relations(
        rows: &mut [Self],
        includes: &[ProductRelation],
        txn: &DatabaseTransaction,
    ) -> AppResult<()> {
        if includes.contains(&ProductRelation::Category) {
            let ids: Vec<i64> = rows.iter().map(|p| p.category_id).collect();
            let categories: HashMap<i64, ProductCategory> = product_category::Entity::find()
                .filter(product_category::Column::Id.is_in(ids))
                .all(txn)
                .await?
                .into_iter()
                .map(|m| (m.id, ProductCategory::from(m)))
                .collect();

            for row in rows.iter_mut() {
                row.category = categories.get(&row.category_id).cloned();
            }
        }

        if includes.contains(&ProductRelation::Attachment) {
            let ids: Vec<i64> = rows.iter().filter_map(|p| p.attachment_id).collect();
            if ids.is_empty() {
                return Ok(());
            }
            let attachments: HashMap<i64, Attachment> = attachment::Entity::find()
                .filter(attachment::Column::Id.is_in(ids))
                .all(txn)
                .await?
                .into_iter()
                .map(|m| (m.id, Attachment::from(m)))
                .collect();

            for row in rows.iter_mut() {
                row.attachment = row
                    .attachment_id
                    .and_then(|id| attachments.get(&id).cloned());
            }
        }

        Ok(())
    }
}
