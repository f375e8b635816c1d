use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Sea-ORM Entity for the items table
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub owner_id: i32,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for crate::models::Item {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            description: model.description,
            owner_id: model.owner_id,
        }
    }
}

impl ActiveModel {
    /// New row owned by `owner_id`; the id is assigned by the database.
    pub fn for_owner(owner_id: i32, input: crate::models::CreateItem) -> Self {
        Self {
            id: NotSet,
            title: Set(input.title),
            description: Set(input.description),
            owner_id: Set(owner_id),
            created_at: Set(chrono::Utc::now().into()),
        }
    }
}
