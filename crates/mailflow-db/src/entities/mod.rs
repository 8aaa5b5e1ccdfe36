//! Database entities

pub mod category;
pub mod incoming_mail;
pub mod mail_tag;
pub mod outgoing_mail;
pub mod sender;
pub mod setting;
pub mod tag;
pub mod user;

pub use category::Entity as Category;
pub use incoming_mail::Entity as IncomingMail;
pub use mail_tag::Entity as MailTag;
pub use outgoing_mail::Entity as OutgoingMail;
pub use sender::Entity as Sender;
pub use setting::Entity as Setting;
pub use tag::Entity as Tag;
pub use user::Entity as User;

pub use incoming_mail::MailPriority;
pub use mail_tag::MailKind;
pub use tag::TagKind;
pub use user::UserRole;

pub mod prelude {
    pub use super::category::Entity as Category;
    pub use super::incoming_mail::Entity as IncomingMail;
    pub use super::mail_tag::Entity as MailTag;
    pub use super::outgoing_mail::Entity as OutgoingMail;
    pub use super::sender::Entity as Sender;
    pub use super::setting::Entity as Setting;
    pub use super::tag::Entity as Tag;
    pub use super::user::Entity as User;
}
