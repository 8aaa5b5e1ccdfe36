//! Incoming mail entity: correspondence received by the organization

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Handling priority of a mail record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum MailPriority {
    #[sea_orm(string_value = "low")]
    Low,

    #[sea_orm(string_value = "normal")]
    Normal,

    #[sea_orm(string_value = "high")]
    High,

    #[sea_orm(string_value = "urgent")]
    Urgent,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "incoming_mails")]
pub struct Model {
    /// Mail UUID (primary key)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Human-assigned tracking code; not unique at the schema level
    pub reference: String,

    /// Subject line
    pub subject: String,

    /// Short summary of the content
    pub summary: Option<String>,

    /// Single-valued classifier
    pub category_id: Uuid,

    /// External correspondent the mail came from
    pub sender_id: Uuid,

    /// Date the mail arrived
    pub arrival_date: Date,

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

    #[sea_orm(
        belongs_to = "super::sender::Entity",
        from = "Column::SenderId",
        to = "super::sender::Column::Id"
    )]
    Sender,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::sender::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sender.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
