//! Relational storage for MailFlow: SeaORM entities and schema migrations.
//!
//! All persisted state lives here. The API crate talks to these entities
//! through its storage trait; nothing outside this crate issues raw SQL.

pub mod entities;
pub mod migrator;

pub use migrator::Migrator;

use sea_orm::{Database, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;

/// Connect to the database at `url` (SQLite or PostgreSQL).
pub async fn connect(url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(url).await
}

/// Bring the schema up to date.
pub async fn migrate(db: &DatabaseConnection) -> Result<(), DbErr> {
    Migrator::up(db, None).await
}
