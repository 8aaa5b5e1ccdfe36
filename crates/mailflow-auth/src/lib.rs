//! Authentication primitives for MailFlow: signed session tokens and
//! password hashing.

pub mod jwt;
pub mod password;

pub use jwt::{token_validity, JwtClaims, JwtError, JwtValidator};
pub use password::{hash_password, verify_password, PasswordError};
