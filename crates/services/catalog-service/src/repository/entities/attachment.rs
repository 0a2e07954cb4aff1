//! Attachment database entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue::{Set, Unchanged};

use domain::Attachment;

use crate::repository::records::AttachmentField;
use crate::repository::sea_table::Persisted;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "attachments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub file_name: String,
    pub file_path: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Attachment {
    fn from(model: Model) -> Self {
        Attachment {
            id: model.id,
            file_name: model.file_name,
            file_path: model.file_path,
            created_at: model.created_at,
        }
    }
}

impl Persisted for Attachment {
    type Entity = Entity;
    type ActiveModel = ActiveModel;

    fn column(field: AttachmentField) -> Column {
        match field {
            AttachmentField::Id => Column::Id,
            AttachmentField::FileName => Column::FileName,
            AttachmentField::CreatedAt => Column::CreatedAt,
        }
    }

    fn from_model(model: Model) -> Self {
        model.into()
    }

    fn to_active_model(&self) -> ActiveModel {
        ActiveModel {
            id: Unchanged(self.id),
            file_name: Set(self.file_name.clone()),
            file_path: Set(self.file_path.clone()),
            created_at: Set(self.created_at),
        }
    }
}
