//! User entity for authentication and user management

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User role in the system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum UserRole {
    /// System administrator with full access
    #[sea_orm(string_value = "admin")]
    Admin,

    /// Manages mail and reference data
    #[sea_orm(string_value = "manager")]
    Manager,

    /// Regular user
    #[sea_orm(string_value = "user")]
    User,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// User UUID (primary key)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// User email (unique)
    #[sea_orm(unique)]
    pub email: String,

    /// Argon2id password hash
    pub password_hash: String,

    /// Name shown in the UI and token claims
    pub display_name: String,

    /// User role (admin, manager or user)
    pub role: UserRole,

    /// Per-module permission overrides as a JSON array of
    /// `{module, actions}` objects
    pub permissions: Json,

    /// Whether the user account is active
    pub is_active: bool,

    /// When the user last logged in
    pub last_login: Option<ChronoDateTimeUtc>,

    /// When the user account was created
    pub created_at: ChronoDateTimeUtc,

    /// When the user account was last updated
    pub updated_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Categories created by this user
    #[sea_orm(has_many = "super::category::Entity")]
    Categories,

    /// Tags created by this user
    #[sea_orm(has_many = "super::tag::Entity")]
    Tags,

    /// Senders created by this user
    #[sea_orm(has_many = "super::sender::Entity")]
    Senders,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Categories.def()
    }
}

impl Related<super::tag::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tags.def()
    }
}

impl Related<super::sender::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Senders.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
