//! Mingle: membership directory toolkit
//!
//! The identity and onboarding core of a membership service, as a Unix
//! toolkit: members register through an interactive multi-step wizard,
//! sign in with email and password, and join interest groups, with all
//! records stored as plain text YAML files.

pub mod auth;
pub mod cli;
pub mod core;
pub mod entities;
pub mod forms;
pub mod register;
pub mod schema;
pub mod yaml;
