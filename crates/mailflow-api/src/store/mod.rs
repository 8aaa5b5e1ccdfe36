//! Storage abstraction
//!
//! Every persistence operation the handlers need lives behind [`MailStore`],
//! so the HTTP layer never touches the database crate directly and tests can
//! run against any backend the trait admits. [`sql::SqlStore`] is the
//! concrete SeaORM-backed implementation.

pub mod sql;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{
    AppSettings, Category, CreateCategoryRequest, CreateIncomingMailRequest,
    CreateOutgoingMailRequest, CreateSenderRequest, CreateTagRequest, CreateUserRequest,
    IncomingMail, OutgoingMail, Sender, Statistics, Tag, UpdateCategoryRequest,
    UpdateIncomingMailRequest, UpdateOutgoingMailRequest, UpdateSenderRequest, UpdateTagRequest,
    UpdateUserRequest, User,
};
use crate::search::{SearchFilter, SearchHit};

pub use sql::SqlStore;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Target row does not exist
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Referential-integrity conflict (e.g. deleting reference data that is
    /// still in use, or reusing a unique email)
    #[error("{0}")]
    Conflict(String),

    /// Request references unknown rows or carries an unusable payload
    #[error("{0}")]
    InvalidInput(String),

    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

/// A user row with its password hash still attached. Only the login path
/// sees this; everything else works with [`User`].
#[derive(Debug, Clone)]
pub struct UserWithSecret {
    pub user: User,
    pub password_hash: String,
}

/// Persistence operations for the whole application.
///
/// Passwords cross this boundary already hashed; the store never sees
/// plain text.
#[async_trait]
pub trait MailStore: Send + Sync {
    // Users
    async fn find_user_for_login(&self, email: &str) -> Result<Option<UserWithSecret>, StoreError>;
    async fn touch_last_login(&self, id: Uuid) -> Result<(), StoreError>;
    async fn count_users(&self) -> Result<u64, StoreError>;
    async fn list_users(&self) -> Result<Vec<User>, StoreError>;
    async fn get_user(&self, id: Uuid) -> Result<User, StoreError>;
    async fn create_user(
        &self,
        req: &CreateUserRequest,
        password_hash: String,
    ) -> Result<User, StoreError>;
    async fn update_user(
        &self,
        id: Uuid,
        req: &UpdateUserRequest,
        password_hash: Option<String>,
    ) -> Result<User, StoreError>;
    async fn delete_user(&self, id: Uuid) -> Result<(), StoreError>;

    // Categories
    async fn list_categories(&self) -> Result<Vec<Category>, StoreError>;
    async fn create_category(
        &self,
        req: &CreateCategoryRequest,
        created_by: Option<Uuid>,
    ) -> Result<Category, StoreError>;
    async fn update_category(
        &self,
        id: Uuid,
        req: &UpdateCategoryRequest,
    ) -> Result<Category, StoreError>;
    /// Fails with [`StoreError::Conflict`] while any mail references the
    /// category.
    async fn delete_category(&self, id: Uuid) -> Result<(), StoreError>;

    // Tags
    async fn list_tags(&self) -> Result<Vec<Tag>, StoreError>;
    async fn create_tag(
        &self,
        req: &CreateTagRequest,
        created_by: Option<Uuid>,
    ) -> Result<Tag, StoreError>;
    async fn update_tag(&self, id: Uuid, req: &UpdateTagRequest) -> Result<Tag, StoreError>;
    /// Deleting a tag detaches it from all mail first.
    async fn delete_tag(&self, id: Uuid) -> Result<(), StoreError>;

    // Senders
    async fn list_senders(&self) -> Result<Vec<Sender>, StoreError>;
    async fn create_sender(
        &self,
        req: &CreateSenderRequest,
        created_by: Option<Uuid>,
    ) -> Result<Sender, StoreError>;
    async fn update_sender(
        &self,
        id: Uuid,
        req: &UpdateSenderRequest,
    ) -> Result<Sender, StoreError>;
    /// Fails with [`StoreError::Conflict`] while any incoming mail references
    /// the sender.
    async fn delete_sender(&self, id: Uuid) -> Result<(), StoreError>;

    // Mail records
    async fn list_incoming_mails(&self) -> Result<Vec<IncomingMail>, StoreError>;
    async fn create_incoming_mail(
        &self,
        req: &CreateIncomingMailRequest,
        created_by: Option<Uuid>,
    ) -> Result<IncomingMail, StoreError>;
    /// `req.tags = Some(_)` replaces the whole tag set transactionally;
    /// `None` leaves the existing tags untouched.
    async fn update_incoming_mail(
        &self,
        id: Uuid,
        req: &UpdateIncomingMailRequest,
    ) -> Result<IncomingMail, StoreError>;
    async fn delete_incoming_mail(&self, id: Uuid) -> Result<(), StoreError>;

    async fn list_outgoing_mails(&self) -> Result<Vec<OutgoingMail>, StoreError>;
    async fn create_outgoing_mail(
        &self,
        req: &CreateOutgoingMailRequest,
        created_by: Option<Uuid>,
    ) -> Result<OutgoingMail, StoreError>;
    async fn update_outgoing_mail(
        &self,
        id: Uuid,
        req: &UpdateOutgoingMailRequest,
    ) -> Result<OutgoingMail, StoreError>;
    async fn delete_outgoing_mail(&self, id: Uuid) -> Result<(), StoreError>;

    // Search and aggregates
    async fn search(&self, filter: &SearchFilter) -> Result<Vec<SearchHit>, StoreError>;
    async fn statistics(&self) -> Result<Statistics, StoreError>;

    // Settings
    async fn load_settings(&self) -> Result<AppSettings, StoreError>;
    async fn save_settings(&self, settings: &AppSettings) -> Result<AppSettings, StoreError>;
}
