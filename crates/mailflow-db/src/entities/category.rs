//! Category entity: single-valued classifier on mail records

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    /// Category UUID (primary key)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Display name
    pub name: String,

    /// Optional free-form description
    pub description: Option<String>,

    /// Hex color used by clients (e.g. "#3B82F6")
    pub color: String,

    /// Inactive categories are hidden from listings but keep their rows
    pub is_active: bool,

    /// User who created the category
    pub created_by: Option<Uuid>,

    /// When the category was created
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

    #[sea_orm(has_many = "super::outgoing_mail::Entity")]
    OutgoingMails,
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

impl Related<super::outgoing_mail::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OutgoingMails.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
