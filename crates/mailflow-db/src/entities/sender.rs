//! Sender entity: external correspondents referenced by incoming mail

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "senders")]
pub struct Model {
    /// Sender UUID (primary key)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Contact or organization name
    pub name: String,

    /// Contact email
    pub email: Option<String>,

    /// Contact phone number
    pub phone: Option<String>,

    /// Contact fax number
    pub fax: Option<String>,

    /// Organization the contact belongs to
    pub organization: Option<String>,

    /// Inactive senders are hidden from listings but keep their rows
    pub is_active: bool,

    /// User who created the sender
    pub created_by: Option<Uuid>,

    /// When the sender was created
    pub created_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::CreatedBy",
        to = "super::user::Column::Id"
    )]
    CreatedBy,

    #[sea_orm(has_many = "super::incoming_mail::Entity")]
    IncomingMails,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CreatedBy.def()
    }
}

impl Related<super::incoming_mail::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::IncomingMails.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
