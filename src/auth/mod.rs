//! Authentication - credential hashing and session persistence

pub mod credential;
pub mod session;

pub use credential::{authenticate, encrypt_password, make_salt, EMPTY_DIGEST};
pub use session::{Session, SessionStore};
