//! Membership directory discovery and structure
//!
//! A membership directory is any folder containing a `.mingle/` marker.
//! Member and interest records live beside it in flat `members/` and
//! `interests/` folders, one YAML file per record.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Interests seeded into a fresh directory
pub const DEFAULT_INTERESTS: &[&str] = &[
    "C++",
    "Games Development",
    "JavaScript",
    "Web Programming",
];

/// Represents a membership directory on disk
#[derive(Debug)]
pub struct MemberDirectory {
    /// Root of the directory tree (parent of .mingle/)
    root: PathBuf,
}

impl MemberDirectory {
    /// Find the directory root by walking up from the current directory
    pub fn discover() -> Result<Self, DirectoryError> {
        let current = std::env::current_dir().map_err(|e| DirectoryError::Io(e.to_string()))?;
        Self::discover_from(&current)
    }

    /// Find the directory root by walking up from the given path
    pub fn discover_from(start: &Path) -> Result<Self, DirectoryError> {
        let mut current = start
            .canonicalize()
            .map_err(|e| DirectoryError::Io(e.to_string()))?;

        loop {
            if current.join(".mingle").is_dir() {
                return Ok(Self { root: current });
            }

            if !current.pop() {
                return Err(DirectoryError::NotFound {
                    searched_from: start.to_path_buf(),
                });
            }
        }
    }

    /// Open a directory rooted at an explicit path (no discovery walk)
    pub fn open(root: &Path) -> Result<Self, DirectoryError> {
        if root.join(".mingle").is_dir() {
            Ok(Self {
                root: root.to_path_buf(),
            })
        } else {
            Err(DirectoryError::NotFound {
                searched_from: root.to_path_buf(),
            })
        }
    }

    /// Create a new membership directory at the given path
    pub fn init(path: &Path) -> Result<Self, DirectoryError> {
        let root = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());

        if root.join(".mingle").exists() {
            return Err(DirectoryError::AlreadyExists(root));
        }

        Self::create_structure(&root)?;
        Ok(Self { root })
    }

    /// Force initialization even if .mingle/ exists
    pub fn init_force(path: &Path) -> Result<Self, DirectoryError> {
        let root = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        Self::create_structure(&root)?;
        Ok(Self { root })
    }

    fn create_structure(root: &Path) -> Result<(), DirectoryError> {
        let mingle_dir = root.join(".mingle");
        std::fs::create_dir_all(&mingle_dir).map_err(|e| DirectoryError::Io(e.to_string()))?;

        let config_path = mingle_dir.join("config.yaml");
        if !config_path.exists() {
            std::fs::write(&config_path, Self::default_config())
                .map_err(|e| DirectoryError::Io(e.to_string()))?;
        }

        std::fs::create_dir_all(root.join("members"))
            .map_err(|e| DirectoryError::Io(e.to_string()))?;
        std::fs::create_dir_all(root.join("interests"))
            .map_err(|e| DirectoryError::Io(e.to_string()))?;

        Ok(())
    }

    fn default_config() -> &'static str {
        r#"# Mingle directory configuration

# Editor to use for `mingle member edit` (default: $EDITOR)
# editor: ""

# Default output format (auto, table, yaml, json, id)
# default_format: auto
"#
    }

    /// Root of the directory tree
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The .mingle/ metadata folder
    pub fn mingle_dir(&self) -> PathBuf {
        self.root.join(".mingle")
    }

    /// Where member records live
    pub fn members_dir(&self) -> PathBuf {
        self.root.join("members")
    }

    /// Where interest records live
    pub fn interests_dir(&self) -> PathBuf {
        self.root.join("interests")
    }

    /// The persisted session file
    pub fn session_path(&self) -> PathBuf {
        self.mingle_dir().join("session.yaml")
    }
}

/// Errors from directory discovery and creation
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("no membership directory found (searched from {searched_from}); run 'mingle init' first")]
    NotFound { searched_from: PathBuf },

    #[error("a membership directory already exists at {0}")]
    AlreadyExists(PathBuf),

    #[error("IO error: {0}")]
    Io(String),
}
