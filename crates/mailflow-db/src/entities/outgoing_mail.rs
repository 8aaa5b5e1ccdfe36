//! Outgoing mail entity: correspondence authored internally
//!
//! Same shape as incoming mail minus the sender, with `content` instead of
//! `summary` and `send_date` instead of `arrival_date`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::incoming_mail::MailPriority;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "outgoing_mails")]
pub struct Model {
    /// Mail UUID (primary key)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Human-assigned tracking code; not unique at the schema level
    pub reference: String,

    /// Subject line
    pub subject: String,

    /// Body of the letter
    pub content: Option<String>,

    /// Single-valued classifier
    pub category_id: Uuid,

    /// Date the mail was sent
    pub send_date: Date,

    /// Handling priority
    pub priority: MailPriority,

    /// Pointer to the externally stored scan file
    pub scan_url: Option<String>,

    /// Whether the mail has been processed
    pub is_processed: bool,

    /// User who registered the mail
    pub created_by: Option<Uuid>,

    /// When the record was created
    pub created_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id"
    )]
    Category,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
