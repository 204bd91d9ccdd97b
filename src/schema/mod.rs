//! Schema system - validation of stored records

pub mod registry;
pub mod validator;

pub use registry::SchemaRegistry;
pub use validator::{SchemaViolation, ValidationError, Validator};
