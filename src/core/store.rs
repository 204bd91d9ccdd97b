//! Record storage over a membership directory
//!
//! Free functions implementing the collaborator seams the CLI consumes:
//! member creation, sign-in, profile updates, the dedicated password-change
//! path, deletion, and interest lookup. All of them read and write flat
//! YAML record files under the directory root.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::auth::Session;
use crate::core::directory::MemberDirectory;
use crate::entities::interest::Interest;
use crate::entities::user::{CreateUserParams, CredentialError, User};
use crate::forms;

/// Errors from store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Name is required")]
    NameRequired,

    #[error("Email is required")]
    EmailRequired,

    #[error("Please fill a valid email address")]
    InvalidEmail,

    #[error("Email already exists")]
    DuplicateEmail,

    #[error("An interest with that name already exists")]
    DuplicateInterest,

    #[error("Name of interest is required")]
    InterestNameRequired,

    #[error(transparent)]
    Credential(#[from] CredentialError),

    /// Deliberately indistinguishable for unknown email vs. wrong password
    #[error("Invalid email or password")]
    Authentication,

    #[error("no member matching '{0}'")]
    NoSuchMember(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse {path}: {message}")]
    Malformed { path: PathBuf, message: String },
}

/// Profile fields a member may update independently of their credential
#[derive(Debug, Clone, Default)]
pub struct UpdateUserParams {
    pub name: Option<String>,
    pub email: Option<String>,
    pub about: Option<String>,
    pub interests: Option<Vec<String>>,
}

impl UpdateUserParams {
    /// Whether any field is actually being changed
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.about.is_none()
            && self.interests.is_none()
    }
}

fn read_record<T: serde::de::DeserializeOwned + 'static>(path: &Path) -> Result<T, StoreError> {
    let contents = fs::read_to_string(path)?;
    serde_yml::from_str(&contents).map_err(|e| StoreError::Malformed {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

fn write_record<T: serde::Serialize>(path: &Path, record: &T) -> Result<(), StoreError> {
    let contents = serde_yml::to_string(record).map_err(|e| StoreError::Malformed {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    fs::write(path, contents)?;
    Ok(())
}

/// Load every record of type T from a flat directory of YAML files.
///
/// Malformed files surface as errors rather than being skipped: a
/// membership directory with an unreadable record is worth knowing about.
fn load_all<T: serde::de::DeserializeOwned + 'static>(dir: &Path) -> Result<Vec<(PathBuf, T)>, StoreError> {
    let mut records = Vec::new();

    if !dir.exists() {
        return Ok(records);
    }

    let mut paths: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().map_or(false, |e| e == "yaml"))
        .collect();
    paths.sort();

    for path in paths {
        let record = read_record(&path)?;
        records.push((path, record));
    }

    Ok(records)
}

/// All member records, sorted by file name (creation order for ULID ids)
pub fn all_users(dir: &MemberDirectory) -> Result<Vec<User>, StoreError> {
    Ok(load_all(&dir.members_dir())?
        .into_iter()
        .map(|(_, user)| user)
        .collect())
}

/// All interest records
pub fn all_interests(dir: &MemberDirectory) -> Result<Vec<Interest>, StoreError> {
    Ok(load_all(&dir.interests_dir())?
        .into_iter()
        .map(|(_, interest)| interest)
        .collect())
}

/// Find a member by ID (full or partial) or exact email
pub fn find_user(
    dir: &MemberDirectory,
    query: &str,
) -> Result<Option<(PathBuf, User)>, StoreError> {
    for (path, user) in load_all::<User>(&dir.members_dir())? {
        let id = user.id.to_string();
        if id == query || id.starts_with(query) || user.email.eq_ignore_ascii_case(query) {
            return Ok(Some((path, user)));
        }
    }
    Ok(None)
}

fn find_user_by_email(
    dir: &MemberDirectory,
    email: &str,
) -> Result<Option<(PathBuf, User)>, StoreError> {
    for (path, user) in load_all::<User>(&dir.members_dir())? {
        if user.email.eq_ignore_ascii_case(email.trim()) {
            return Ok(Some((path, user)));
        }
    }
    Ok(None)
}

fn user_path(dir: &MemberDirectory, user: &User) -> PathBuf {
    dir.members_dir().join(format!("{}.yaml", user.id))
}

fn interest_path(dir: &MemberDirectory, interest: &Interest) -> PathBuf {
    dir.interests_dir().join(format!("{}.yaml", interest.id))
}

/// Create a member record from the registration handoff payload.
///
/// Validates the profile fields and the credential gate before anything is
/// written; on success the record is persisted without its transient
/// plaintext and each named interest gains a back-reference (missing
/// interests are created on the way).
pub fn create_user(dir: &MemberDirectory, params: CreateUserParams) -> Result<User, StoreError> {
    if params.name.trim().is_empty() {
        return Err(StoreError::NameRequired);
    }
    if params.email.trim().is_empty() {
        return Err(StoreError::EmailRequired);
    }
    if !forms::is_valid_email(&params.email) {
        return Err(StoreError::InvalidEmail);
    }
    if find_user_by_email(dir, &params.email)?.is_some() {
        return Err(StoreError::DuplicateEmail);
    }

    let params = CreateUserParams {
        email: params.email.trim().to_string(),
        name: params.name.trim().to_string(),
        ..params
    };
    let user = User::create(params)?;

    write_record(&user_path(dir, &user), &user)?;
    for name in &user.interests {
        join_interest(dir, name, &user)?;
    }

    Ok(user)
}

/// Sign a member in, issuing a fresh session on success.
///
/// Unknown email and wrong password collapse into the same error so the
/// response never reveals which one was wrong.
pub fn sign_in(dir: &MemberDirectory, email: &str, password: &str) -> Result<Session, StoreError> {
    let Some((_, user)) = find_user_by_email(dir, email)? else {
        return Err(StoreError::Authentication);
    };

    if !user.has_credential() || !user.authenticate(password) {
        return Err(StoreError::Authentication);
    }

    Ok(Session::issue(user.id))
}

/// Update a member's profile fields.
///
/// Never touches the credential pair and never re-runs the credential gate;
/// stamps `updated` when anything changed.
pub fn update_user(
    dir: &MemberDirectory,
    query: &str,
    params: UpdateUserParams,
) -> Result<User, StoreError> {
    let (path, mut user) =
        find_user(dir, query)?.ok_or_else(|| StoreError::NoSuchMember(query.to_string()))?;

    if params.is_empty() {
        return Ok(user);
    }

    if let Some(email) = params.email {
        if !forms::is_valid_email(&email) {
            return Err(StoreError::InvalidEmail);
        }
        if let Some((_, existing)) = find_user_by_email(dir, &email)? {
            if existing.id != user.id {
                return Err(StoreError::DuplicateEmail);
            }
        }
        user.email = email.trim().to_string();
    }
    if let Some(name) = params.name {
        if name.trim().is_empty() {
            return Err(StoreError::NameRequired);
        }
        user.name = name.trim().to_string();
    }
    if let Some(about) = params.about {
        user.about = about;
    }
    if let Some(interests) = params.interests {
        let previous = std::mem::replace(&mut user.interests, interests);
        sync_interest_refs(dir, &user, &previous)?;
    }

    user.updated = Some(chrono::Utc::now());
    write_record(&path, &user)?;
    Ok(user)
}

/// The dedicated password-change path: regenerates the salt, re-runs the
/// gate, and persists salt and digest together.
pub fn change_password(
    dir: &MemberDirectory,
    query: &str,
    plaintext: &str,
) -> Result<User, StoreError> {
    let (path, mut user) =
        find_user(dir, query)?.ok_or_else(|| StoreError::NoSuchMember(query.to_string()))?;

    user.change_password(plaintext)?;
    user.updated = Some(chrono::Utc::now());
    write_record(&path, &user)?;
    Ok(user)
}

/// Delete a member record and drop its interest back-references
pub fn delete_user(dir: &MemberDirectory, query: &str) -> Result<User, StoreError> {
    let (path, user) =
        find_user(dir, query)?.ok_or_else(|| StoreError::NoSuchMember(query.to_string()))?;

    for (interest_path, mut interest) in load_all::<Interest>(&dir.interests_dir())? {
        if interest.users.contains(&user.id) {
            interest.remove_user(&user.id);
            write_record(&interest_path, &interest)?;
        }
    }

    fs::remove_file(&path)?;
    Ok(user)
}

/// Add a new interest by name
pub fn add_interest(dir: &MemberDirectory, name: &str) -> Result<Interest, StoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(StoreError::InterestNameRequired);
    }

    for (_, interest) in load_all::<Interest>(&dir.interests_dir())? {
        if interest.name.eq_ignore_ascii_case(trimmed) {
            return Err(StoreError::DuplicateInterest);
        }
    }

    let interest = Interest::new(trimmed);
    write_record(&interest_path(dir, &interest), &interest)?;
    Ok(interest)
}

/// Append a member to a named interest, creating the interest if needed
fn join_interest(dir: &MemberDirectory, name: &str, user: &User) -> Result<(), StoreError> {
    for (path, mut interest) in load_all::<Interest>(&dir.interests_dir())? {
        if interest.name.eq_ignore_ascii_case(name.trim()) {
            interest.append_user(user.id.clone());
            return write_record(&path, &interest);
        }
    }

    let mut interest = Interest::new(name);
    interest.append_user(user.id.clone());
    write_record(&interest_path(dir, &interest), &interest)
}

/// Reconcile interest back-references after a member's list changed
fn sync_interest_refs(
    dir: &MemberDirectory,
    user: &User,
    previous: &[String],
) -> Result<(), StoreError> {
    for name in previous {
        if !user.interests.iter().any(|n| n.eq_ignore_ascii_case(name)) {
            for (path, mut interest) in load_all::<Interest>(&dir.interests_dir())? {
                if interest.name.eq_ignore_ascii_case(name) {
                    interest.remove_user(&user.id);
                    write_record(&path, &interest)?;
                }
            }
        }
    }
    for name in &user.interests {
        if !previous.iter().any(|n| n.eq_ignore_ascii_case(name)) {
            join_interest(dir, name, user)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn directory() -> (tempfile::TempDir, MemberDirectory) {
        let tmp = tempdir().unwrap();
        let dir = MemberDirectory::init(tmp.path()).unwrap();
        (tmp, dir)
    }

    fn ada() -> CreateUserParams {
        CreateUserParams {
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            password: "secret1".to_string(),
            about: "Analyst".to_string(),
            interests: vec!["Mathematics".to_string(), "Engines".to_string()],
        }
    }

    #[test]
    fn test_create_and_reload_user() {
        let (_tmp, dir) = directory();
        let user = create_user(&dir, ada()).unwrap();

        let reloaded = all_users(&dir).unwrap();
        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded[0].id, user.id);
        assert_eq!(reloaded[0].email, "ada@example.com");
        assert!(reloaded[0].authenticate("secret1"));
    }

    #[test]
    fn test_create_rejects_duplicate_email_any_case() {
        let (_tmp, dir) = directory();
        create_user(&dir, ada()).unwrap();

        let mut again = ada();
        again.email = "ADA@Example.COM".to_string();
        let err = create_user(&dir, again).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateEmail));
        assert_eq!(all_users(&dir).unwrap().len(), 1);
    }

    #[test]
    fn test_create_rejects_malformed_email() {
        let (_tmp, dir) = directory();
        let mut params = ada();
        params.email = "not-an-email".to_string();
        assert!(matches!(
            create_user(&dir, params).unwrap_err(),
            StoreError::InvalidEmail
        ));
    }

    #[test]
    fn test_create_rejects_short_password_without_writing() {
        let (_tmp, dir) = directory();
        let mut params = ada();
        params.password = "12345".to_string();
        assert!(matches!(
            create_user(&dir, params).unwrap_err(),
            StoreError::Credential(CredentialError::TooShort)
        ));
        assert!(all_users(&dir).unwrap().is_empty());
    }

    #[test]
    fn test_create_links_interests() {
        let (_tmp, dir) = directory();
        let user = create_user(&dir, ada()).unwrap();

        let interests = all_interests(&dir).unwrap();
        assert_eq!(interests.len(), 2);
        for interest in interests {
            assert_eq!(interest.users, vec![user.id.clone()]);
        }
    }

    #[test]
    fn test_sign_in_success_and_failure_are_symmetric() {
        let (_tmp, dir) = directory();
        create_user(&dir, ada()).unwrap();

        let session = sign_in(&dir, "ada@example.com", "secret1").unwrap();
        assert!(!session.token.is_empty());

        let wrong_password = sign_in(&dir, "ada@example.com", "wrong").unwrap_err();
        let unknown_email = sign_in(&dir, "nobody@example.com", "secret1").unwrap_err();
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    }

    #[test]
    fn test_update_profile_skips_credential_gate() {
        let (_tmp, dir) = directory();
        let user = create_user(&dir, ada()).unwrap();

        let updated = update_user(
            &dir,
            &user.id.to_string(),
            UpdateUserParams {
                about: Some("Updated biography".to_string()),
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(updated.about, "Updated biography");
        assert!(updated.updated.is_some());
        // Credential untouched by a profile update
        assert!(updated.authenticate("secret1"));
    }

    #[test]
    fn test_update_interests_syncs_back_references() {
        let (_tmp, dir) = directory();
        let user = create_user(&dir, ada()).unwrap();

        update_user(
            &dir,
            &user.id.to_string(),
            UpdateUserParams {
                interests: Some(vec!["Engines".to_string(), "Flight".to_string()]),
                ..Default::default()
            },
        )
        .unwrap();

        let interests = all_interests(&dir).unwrap();
        let by_name = |name: &str| {
            interests
                .iter()
                .find(|i| i.name == name)
                .unwrap_or_else(|| panic!("interest {name} missing"))
        };
        assert!(by_name("Mathematics").users.is_empty());
        assert_eq!(by_name("Engines").users, vec![user.id.clone()]);
        assert_eq!(by_name("Flight").users, vec![user.id.clone()]);
    }

    #[test]
    fn test_change_password_rotates_salt() {
        let (_tmp, dir) = directory();
        let user = create_user(&dir, ada()).unwrap();

        change_password(&dir, &user.id.to_string(), "new-secret").unwrap();

        let (_, reloaded) = find_user(&dir, &user.id.to_string()).unwrap().unwrap();
        assert!(reloaded.authenticate("new-secret"));
        assert!(!reloaded.authenticate("secret1"));
    }

    #[test]
    fn test_delete_user_cleans_back_references() {
        let (_tmp, dir) = directory();
        let user = create_user(&dir, ada()).unwrap();

        delete_user(&dir, &user.id.to_string()).unwrap();

        assert!(all_users(&dir).unwrap().is_empty());
        for interest in all_interests(&dir).unwrap() {
            assert!(interest.users.is_empty());
        }
    }

    #[test]
    fn test_add_interest_rejects_duplicates() {
        let (_tmp, dir) = directory();
        add_interest(&dir, "Rust").unwrap();
        assert!(matches!(
            add_interest(&dir, "  rust ").unwrap_err(),
            StoreError::DuplicateInterest
        ));
    }

    #[test]
    fn test_find_user_by_partial_id_and_email() {
        let (_tmp, dir) = directory();
        let user = create_user(&dir, ada()).unwrap();
        let id = user.id.to_string();

        assert!(find_user(&dir, &id).unwrap().is_some());
        assert!(find_user(&dir, &id[..12]).unwrap().is_some());
        assert!(find_user(&dir, "Ada@Example.com").unwrap().is_some());
        assert!(find_user(&dir, "USR-NOPE").unwrap().is_none());
    }
}
