//! Tag entity: many-to-many descriptor attached to mail via `mail_tags`

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// What a tag describes about a mail record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum TagKind {
    #[sea_orm(string_value = "nature")]
    Nature,

    #[sea_orm(string_value = "priority")]
    Priority,

    #[sea_orm(string_value = "status")]
    Status,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tags")]
pub struct Model {
    /// Tag UUID (primary key)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Display name
    pub name: String,

    /// Tag kind (nature, priority or status)
    pub kind: TagKind,

    /// Hex color used by clients
    pub color: String,

    /// Inactive tags are hidden from listings but keep their rows
    pub is_active: bool,

    /// User who created the tag
    pub created_by: Option<Uuid>,

    /// When the tag was created
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

    #[sea_orm(has_many = "super::mail_tag::Entity")]
    MailTags,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CreatedBy.def()
    }
}

impl Related<super::mail_tag::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MailTags.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
