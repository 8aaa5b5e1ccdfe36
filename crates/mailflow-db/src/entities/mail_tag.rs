//! Mail/tag junction entity
//!
//! Incoming and outgoing mail live in separate tables, so the join rows
//! carry a `mail_type` discriminator next to the mail id. The schema
//! enforces uniqueness of the (mail_id, mail_type, tag_id) triple.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Which mail table a join row points into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum MailKind {
    #[sea_orm(string_value = "incoming")]
    Incoming,

    #[sea_orm(string_value = "outgoing")]
    Outgoing,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "mail_tags")]
pub struct Model {
    /// Join row UUID (primary key)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Id of the mail record in the table selected by `mail_type`
    pub mail_id: Uuid,

    /// Discriminator for the mail table
    pub mail_type: MailKind,

    /// Tag attached to the mail
    pub tag_id: Uuid,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::tag::Entity",
        from = "Column::TagId",
        to = "super::tag::Column::Id"
    )]
    Tag,
}

impl Related<super::tag::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tag.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
