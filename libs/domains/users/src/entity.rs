use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Sea-ORM Entity for the users table
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub email: String,
    #[serde(skip_serializing)]
    pub hashed_password: String,
    pub is_active: bool,
    #[sea_orm(unique)]
    #[serde(skip_serializing)]
    pub api_token: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for crate::models::User {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            hashed_password: model.hashed_password,
            is_active: model.is_active,
            api_token: model.api_token,
            created_at: model.created_at.into(),
        }
    }
}

impl From<crate::models::NewUser> for ActiveModel {
    fn from(input: crate::models::NewUser) -> Self {
        Self {
            id: NotSet,
            email: Set(input.email),
            hashed_password: Set(input.hashed_password),
            is_active: Set(true),
            api_token: Set(input.api_token),
            created_at: Set(chrono::Utc::now().into()),
        }
    }
}
