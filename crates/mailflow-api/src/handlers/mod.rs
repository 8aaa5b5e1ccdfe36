//! HTTP request handlers, one module per resource

pub mod auth;
pub mod categories;
pub mod mails;
pub mod search;
pub mod senders;
pub mod settings;
pub mod system;
pub mod tags;
pub mod users;

pub use auth::*;
pub use categories::*;
pub use mails::*;
pub use search::*;
pub use senders::*;
pub use settings::*;
pub use system::*;
pub use tags::*;
pub use users::*;
