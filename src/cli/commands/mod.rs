//! CLI command implementations

pub mod completions;
pub mod init;
pub mod interest;
pub mod login;
pub mod logout;
pub mod member;
pub mod register;
pub mod validate;
pub mod whoami;
