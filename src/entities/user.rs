//! Member identity record
//!
//! The `User` record is the sole owner of its credential material: the
//! salt and digest change only through [`User::set_password`] /
//! [`User::change_password`], and the plaintext lives only in a transient
//! holder that is never serialized and is discarded as soon as the digest
//! has been derived and validated.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::auth;
use crate::core::identity::{RecordId, RecordPrefix};

/// Minimum accepted password length
pub const MIN_PASSWORD_LEN: usize = 6;

/// Parameters for creating a member (the registration handoff payload)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateUserParams {
    pub name: String,
    pub email: String,
    pub password: String,
    pub about: String,
    pub interests: Vec<String>,
}

/// Errors from the credential validation gate
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialError {
    #[error("Password must be at least {MIN_PASSWORD_LEN} characters.")]
    TooShort,

    #[error("Password is required")]
    Required,
}

/// Credential validation gate.
///
/// Pure over its explicit arguments: the transient plaintext (if one was
/// supplied) and whether the record is newly created. Updates that never
/// touch the password pass `None` and are not re-gated.
pub fn validate_credentials(
    plaintext: Option<&str>,
    is_new: bool,
) -> Result<(), CredentialError> {
    if let Some(p) = plaintext {
        if p.len() < MIN_PASSWORD_LEN {
            return Err(CredentialError::TooShort);
        }
    }
    if is_new && plaintext.is_none() {
        return Err(CredentialError::Required);
    }
    Ok(())
}

/// A member identity record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier
    pub id: RecordId,

    /// Display name
    pub name: String,

    /// Email address (unique within the directory)
    pub email: String,

    /// Per-member random salt; written only together with the digest
    salt: String,

    /// Credential digest; never mutated except through the password path
    hashed_password: String,

    /// Administrator flag; never implicitly elevated
    #[serde(default)]
    pub admin: bool,

    /// Free-text biography
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub about: String,

    /// Names of joined interests
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interests: Vec<String>,

    /// Creation timestamp
    pub created: DateTime<Utc>,

    /// Last profile update, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<DateTime<Utc>>,

    /// Transient plaintext holder; present only between `set_password` and
    /// the validation gate, never serialized
    #[serde(skip)]
    password: Option<String>,
}

impl User {
    /// Build a new record from registration parameters.
    ///
    /// Runs the credential gate for a new record: an absent password fails
    /// with [`CredentialError::Required`], a short one with
    /// [`CredentialError::TooShort`]. On success the transient plaintext
    /// has already been discarded.
    pub fn create(params: CreateUserParams) -> Result<Self, CredentialError> {
        let mut user = Self {
            id: RecordId::new(RecordPrefix::Usr),
            name: params.name,
            email: params.email,
            salt: String::new(),
            hashed_password: String::new(),
            admin: false,
            about: params.about,
            interests: params.interests,
            created: Utc::now(),
            updated: None,
            password: None,
        };

        if !params.password.is_empty() {
            user.set_password(&params.password);
        }
        user.validate_credentials(true)?;
        user.clear_password();

        Ok(user)
    }

    /// Set a new password: holds the plaintext transiently, regenerates the
    /// salt, and recomputes the digest. This is the only mutation point for
    /// the salt/digest pair.
    pub fn set_password(&mut self, plaintext: &str) {
        self.password = Some(plaintext.to_string());
        self.salt = auth::make_salt();
        self.hashed_password = auth::encrypt_password(plaintext, &self.salt);
    }

    /// The dedicated password-change path for an existing record: set, gate,
    /// discard.
    pub fn change_password(&mut self, plaintext: &str) -> Result<(), CredentialError> {
        let previous_salt = std::mem::take(&mut self.salt);
        let previous_digest = std::mem::take(&mut self.hashed_password);

        self.set_password(plaintext);
        if let Err(e) = self.validate_credentials(false) {
            // Reject without leaving a half-written credential behind
            self.salt = previous_salt;
            self.hashed_password = previous_digest;
            self.clear_password();
            return Err(e);
        }
        self.clear_password();
        Ok(())
    }

    /// Run the credential gate against this record's transient state
    pub fn validate_credentials(&self, is_new: bool) -> Result<(), CredentialError> {
        validate_credentials(self.password.as_deref(), is_new)
    }

    /// Discard the transient plaintext
    pub fn clear_password(&mut self) {
        self.password = None;
    }

    /// Check a plaintext candidate against the stored credential
    pub fn authenticate(&self, plaintext: &str) -> bool {
        auth::authenticate(plaintext, &self.salt, &self.hashed_password)
    }

    /// Whether a credential digest is actually stored
    pub fn has_credential(&self) -> bool {
        !self.hashed_password.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(password: &str) -> CreateUserParams {
        CreateUserParams {
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            password: password.to_string(),
            about: "Analyst".to_string(),
            interests: vec!["Mathematics".to_string()],
        }
    }

    #[test]
    fn test_create_hashes_and_discards_plaintext() {
        let user = User::create(params("secret1")).unwrap();
        assert!(user.password.is_none());
        assert!(user.has_credential());
        assert!(!user.salt.is_empty());
        assert_ne!(user.hashed_password, "secret1");
        assert!(user.authenticate("secret1"));
        assert!(!user.authenticate("secret2"));
    }

    #[test]
    fn test_create_rejects_short_password() {
        let err = User::create(params("12345")).unwrap_err();
        assert_eq!(err, CredentialError::TooShort);
    }

    #[test]
    fn test_create_accepts_minimum_length() {
        assert!(User::create(params("123456")).is_ok());
    }

    #[test]
    fn test_create_requires_password() {
        let err = User::create(params("")).unwrap_err();
        assert_eq!(err, CredentialError::Required);
    }

    #[test]
    fn test_admin_defaults_to_false() {
        let user = User::create(params("secret1")).unwrap();
        assert!(!user.admin);
    }

    #[test]
    fn test_set_password_regenerates_salt() {
        let mut user = User::create(params("secret1")).unwrap();
        let old_salt = user.salt.clone();
        let old_digest = user.hashed_password.clone();

        user.set_password("secret1");
        assert_ne!(user.salt, old_salt);
        assert_ne!(user.hashed_password, old_digest);
        assert!(user.authenticate("secret1"));
        user.clear_password();
    }

    #[test]
    fn test_change_password_gates_and_restores() {
        let mut user = User::create(params("secret1")).unwrap();
        let err = user.change_password("short").unwrap_err();
        assert_eq!(err, CredentialError::TooShort);
        // The old credential still works after a rejected change
        assert!(user.authenticate("secret1"));
        assert!(user.password.is_none());

        user.change_password("longer-secret").unwrap();
        assert!(user.authenticate("longer-secret"));
        assert!(!user.authenticate("secret1"));
    }

    #[test]
    fn test_profile_update_never_triggers_gate() {
        let mut user = User::create(params("secret1")).unwrap();
        user.about = "Updated biography".to_string();
        // No transient plaintext, existing record: the gate has nothing to say
        assert!(user.validate_credentials(false).is_ok());
    }

    #[test]
    fn test_gate_is_pure_over_arguments() {
        assert_eq!(
            validate_credentials(Some("12345"), false),
            Err(CredentialError::TooShort)
        );
        assert_eq!(validate_credentials(Some("123456"), false), Ok(()));
        assert_eq!(validate_credentials(None, true), Err(CredentialError::Required));
        assert_eq!(validate_credentials(None, false), Ok(()));
    }

    #[test]
    fn test_serialization_omits_plaintext() {
        let mut user = User::create(params("secret1")).unwrap();
        user.set_password("secret1");

        let yaml = serde_yml::to_string(&user).unwrap();
        assert!(!yaml.contains("secret1"));
        assert!(yaml.contains("hashed_password"));
        assert!(yaml.contains("salt"));
    }
}
