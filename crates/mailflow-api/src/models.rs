//! Request/response models for the MailFlow API
//!
//! These mirror the persisted entities where needed, but are the only
//! shapes that cross the HTTP boundary. Password hashes never appear here.

use chrono::{DateTime, NaiveDate, Utc};
use mailflow_db::entities;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Error response body used by every failing endpoint
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Human-readable error message
    pub error: String,
    /// Machine-readable error code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
}

// ============================================================
// Users and authentication
// ============================================================

/// User role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// System administrator with full access
    Admin,
    /// Manages mail and reference data
    Manager,
    /// Regular user
    User,
}

impl UserRole {
    /// Stable string form, also used as the JWT role claim.
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Manager => "manager",
            UserRole::User => "user",
        }
    }

    /// Parse the JWT role claim back into a role.
    pub fn from_claim(claim: &str) -> Option<Self> {
        match claim {
            "admin" => Some(UserRole::Admin),
            "manager" => Some(UserRole::Manager),
            "user" => Some(UserRole::User),
            _ => None,
        }
    }
}

impl From<entities::UserRole> for UserRole {
    fn from(role: entities::UserRole) -> Self {
        match role {
            entities::UserRole::Admin => UserRole::Admin,
            entities::UserRole::Manager => UserRole::Manager,
            entities::UserRole::User => UserRole::User,
        }
    }
}

impl From<UserRole> for entities::UserRole {
    fn from(role: UserRole) -> Self {
        match role {
            UserRole::Admin => entities::UserRole::Admin,
            UserRole::Manager => entities::UserRole::Manager,
            UserRole::User => entities::UserRole::User,
        }
    }
}

/// Action a permission grants on a module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PermissionAction {
    Read,
    Write,
    Delete,
}

/// Per-module permission entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Permission {
    /// Module name (e.g. "incoming-mail", "categories")
    pub module: String,
    /// Allowed actions on the module
    pub actions: Vec<PermissionAction>,
}

/// Modules a permission entry can refer to
const PERMISSION_MODULES: &[&str] = &[
    "incoming-mail",
    "outgoing-mail",
    "categories",
    "tags",
    "senders",
    "search",
    "users",
    "settings",
];

impl Permission {
    /// Default permission set implied by a role. Used whenever a user is
    /// created or updated without an explicit permission list.
    pub fn defaults_for(role: UserRole) -> Vec<Permission> {
        use PermissionAction::*;

        let actions_for = |module: &str| -> Vec<PermissionAction> {
            match role {
                UserRole::Admin => vec![Read, Write, Delete],
                UserRole::Manager => match module {
                    "users" | "settings" => vec![Read],
                    _ => vec![Read, Write],
                },
                UserRole::User => vec![Read],
            }
        };

        PERMISSION_MODULES
            .iter()
            .map(|module| Permission {
                module: module.to_string(),
                actions: actions_for(module),
            })
            .collect()
    }
}

/// User information (never carries the password hash)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct User {
    /// User UUID
    pub id: Uuid,
    /// User email
    pub email: String,
    /// Name shown in clients
    pub display_name: String,
    /// User role
    pub role: UserRole,
    /// Per-module permissions
    pub permissions: Vec<Permission>,
    /// Whether the account is active
    pub is_active: bool,
    /// When the user last logged in
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login: Option<DateTime<Utc>>,
    /// When the user was created
    pub created_at: DateTime<Utc>,
}

impl From<entities::user::Model> for User {
    fn from(model: entities::user::Model) -> Self {
        let role: UserRole = model.role.into();
        // Unparseable permission blobs fall back to the role defaults.
        let permissions = serde_json::from_value(model.permissions)
            .unwrap_or_else(|_| Permission::defaults_for(role));

        Self {
            id: model.id,
            email: model.email,
            display_name: model.display_name,
            role,
            permissions,
            is_active: model.is_active,
            last_login: model.last_login,
            created_at: model.created_at,
        }
    }
}

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    /// User email
    pub email: String,
    /// Plain text password
    pub password: String,
}

/// Login response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    /// Authenticated user
    pub user: User,
    /// Signed bearer token, valid for 24 hours
    pub token: String,
}

/// Request to create a user (admin only)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateUserRequest {
    /// User email (must be unique)
    pub email: String,
    /// Plain text password, hashed before storage
    pub password: String,
    /// Name shown in clients
    pub display_name: String,
    /// User role
    pub role: UserRole,
    /// Explicit permissions; role defaults apply when omitted
    #[serde(default)]
    pub permissions: Option<Vec<Permission>>,
}

/// Partial update of a user (admin only)
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub role: Option<UserRole>,
    #[serde(default)]
    pub permissions: Option<Vec<Permission>>,
    /// Deactivation is the normal removal path; hard delete also exists
    #[serde(default)]
    pub is_active: Option<bool>,
    /// New plain text password
    #[serde(default)]
    pub password: Option<String>,
}

// ============================================================
// Reference data: categories, tags, senders
// ============================================================

/// Mail category
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Hex color (e.g. "#3B82F6")
    pub color: String,
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl From<entities::category::Model> for Category {
    fn from(model: entities::category::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            color: model.color,
            is_active: model.is_active,
            created_by: model.created_by,
            created_at: model.created_at,
        }
    }
}

/// Request to create a category
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateCategoryRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub color: String,
}

/// Partial update of a category
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateCategoryRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

/// What a tag describes about a mail record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TagKind {
    Nature,
    Priority,
    Status,
}

impl From<entities::TagKind> for TagKind {
    fn from(kind: entities::TagKind) -> Self {
        match kind {
            entities::TagKind::Nature => TagKind::Nature,
            entities::TagKind::Priority => TagKind::Priority,
            entities::TagKind::Status => TagKind::Status,
        }
    }
}

impl From<TagKind> for entities::TagKind {
    fn from(kind: TagKind) -> Self {
        match kind {
            TagKind::Nature => entities::TagKind::Nature,
            TagKind::Priority => entities::TagKind::Priority,
            TagKind::Status => entities::TagKind::Status,
        }
    }
}

/// Mail tag
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Tag {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: TagKind,
    pub color: String,
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl From<entities::tag::Model> for Tag {
    fn from(model: entities::tag::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            kind: model.kind.into(),
            color: model.color,
            is_active: model.is_active,
            created_by: model.created_by,
            created_at: model.created_at,
        }
    }
}

/// Request to create a tag
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateTagRequest {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: TagKind,
    pub color: String,
}

/// Partial update of a tag
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateTagRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<TagKind>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

/// Resolved tag attached to a mail record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TagRef {
    pub id: Uuid,
    pub name: String,
    pub color: String,
}

impl From<entities::tag::Model> for TagRef {
    fn from(model: entities::tag::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            color: model.color,
        }
    }
}

/// External correspondent
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Sender {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fax: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl From<entities::sender::Model> for Sender {
    fn from(model: entities::sender::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
            phone: model.phone,
            fax: model.fax,
            organization: model.organization,
            is_active: model.is_active,
            created_by: model.created_by,
            created_at: model.created_at,
        }
    }
}

/// Request to create a sender
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateSenderRequest {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub fax: Option<String>,
    #[serde(default)]
    pub organization: Option<String>,
}

/// Partial update of a sender
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateSenderRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub fax: Option<String>,
    #[serde(default)]
    pub organization: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

// ============================================================
// Mail records
// ============================================================

/// Handling priority of a mail record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MailPriority {
    Low,
    Normal,
    High,
    Urgent,
}

impl From<entities::MailPriority> for MailPriority {
    fn from(priority: entities::MailPriority) -> Self {
        match priority {
            entities::MailPriority::Low => MailPriority::Low,
            entities::MailPriority::Normal => MailPriority::Normal,
            entities::MailPriority::High => MailPriority::High,
            entities::MailPriority::Urgent => MailPriority::Urgent,
        }
    }
}

impl From<MailPriority> for entities::MailPriority {
    fn from(priority: MailPriority) -> Self {
        match priority {
            MailPriority::Low => entities::MailPriority::Low,
            MailPriority::Normal => entities::MailPriority::Normal,
            MailPriority::High => entities::MailPriority::High,
            MailPriority::Urgent => entities::MailPriority::Urgent,
        }
    }
}

/// Which mail table a record lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MailKind {
    Incoming,
    Outgoing,
}

impl From<entities::MailKind> for MailKind {
    fn from(kind: entities::MailKind) -> Self {
        match kind {
            entities::MailKind::Incoming => MailKind::Incoming,
            entities::MailKind::Outgoing => MailKind::Outgoing,
        }
    }
}

impl From<MailKind> for entities::MailKind {
    fn from(kind: MailKind) -> Self {
        match kind {
            MailKind::Incoming => entities::MailKind::Incoming,
            MailKind::Outgoing => entities::MailKind::Outgoing,
        }
    }
}

/// Incoming mail record, denormalized for client consumption
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct IncomingMail {
    pub id: Uuid,
    /// Human-assigned tracking code
    pub reference: String,
    pub subject: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    pub category_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_color: Option<String>,
    pub sender_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_email: Option<String>,
    pub arrival_date: NaiveDate,
    pub priority: MailPriority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scan_url: Option<String>,
    pub is_processed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    /// Resolved tag objects, in no guaranteed order
    pub tags: Vec<TagRef>,
}

/// Outgoing mail record, denormalized for client consumption
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OutgoingMail {
    pub id: Uuid,
    /// Human-assigned tracking code
    pub reference: String,
    pub subject: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub category_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_color: Option<String>,
    pub send_date: NaiveDate,
    pub priority: MailPriority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scan_url: Option<String>,
    pub is_processed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    /// Resolved tag objects, in no guaranteed order
    pub tags: Vec<TagRef>,
}

/// Request to register an incoming mail
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateIncomingMailRequest {
    pub reference: String,
    pub subject: String,
    #[serde(default)]
    pub summary: Option<String>,
    pub category_id: Uuid,
    pub sender_id: Uuid,
    pub arrival_date: NaiveDate,
    pub priority: MailPriority,
    #[serde(default)]
    pub scan_url: Option<String>,
    /// Tags to attach; may be empty
    #[serde(default)]
    pub tags: Vec<Uuid>,
}

/// Partial update of an incoming mail
///
/// `tags` distinguishes "don't touch" (omitted) from "clear" (empty list):
/// when present the whole tag set is replaced.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateIncomingMailRequest {
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub category_id: Option<Uuid>,
    #[serde(default)]
    pub sender_id: Option<Uuid>,
    #[serde(default)]
    pub arrival_date: Option<NaiveDate>,
    #[serde(default)]
    pub priority: Option<MailPriority>,
    #[serde(default)]
    pub scan_url: Option<String>,
    #[serde(default)]
    pub is_processed: Option<bool>,
    #[serde(default)]
    pub tags: Option<Vec<Uuid>>,
}

/// Request to register an outgoing mail
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateOutgoingMailRequest {
    pub reference: String,
    pub subject: String,
    #[serde(default)]
    pub content: Option<String>,
    pub category_id: Uuid,
    pub send_date: NaiveDate,
    pub priority: MailPriority,
    #[serde(default)]
    pub scan_url: Option<String>,
    /// Tags to attach; may be empty
    #[serde(default)]
    pub tags: Vec<Uuid>,
}

/// Partial update of an outgoing mail; see [`UpdateIncomingMailRequest`]
/// for the tag-replacement contract.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateOutgoingMailRequest {
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub category_id: Option<Uuid>,
    #[serde(default)]
    pub send_date: Option<NaiveDate>,
    #[serde(default)]
    pub priority: Option<MailPriority>,
    #[serde(default)]
    pub scan_url: Option<String>,
    #[serde(default)]
    pub is_processed: Option<bool>,
    #[serde(default)]
    pub tags: Option<Vec<Uuid>>,
}

// ============================================================
// Statistics and settings
// ============================================================

/// Mail volume counters
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Statistics {
    /// Total incoming mail records
    pub total_incoming: u64,
    /// Total outgoing mail records
    pub total_outgoing: u64,
    /// Records dated today, both directions combined
    pub total_today: u64,
}

/// Where scan files are stored per mail direction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct StorageFolders {
    pub incoming: String,
    pub outgoing: String,
}

impl Default for StorageFolders {
    fn default() -> Self {
        Self {
            incoming: "/mailflow/incoming".to_string(),
            outgoing: "/mailflow/outgoing".to_string(),
        }
    }
}

/// Notification delivery preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct NotificationSettings {
    pub email: bool,
    pub browser: bool,
    /// Only notify for urgent-priority mail
    pub urgent_only: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            email: false,
            browser: true,
            urgent_only: false,
        }
    }
}

/// Application settings document
///
/// Persisted as one key/value row per top-level field, JSON-encoded, so the
/// storage stays a flat key/value table while the API stays typed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct AppSettings {
    /// Rename uploaded scans according to `file_naming_pattern`
    pub auto_rename: bool,
    /// Pattern for stored scan filenames
    pub file_naming_pattern: String,
    pub storage_folders: StorageFolders,
    pub notifications: NotificationSettings,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            auto_rename: false,
            file_naming_pattern: "{date}_{reference}".to_string(),
            storage_folders: StorageFolders::default(),
            notifications: NotificationSettings::default(),
        }
    }
}
