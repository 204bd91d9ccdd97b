//! Interest group record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::identity::{RecordId, RecordPrefix};

/// An interest that members can join
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interest {
    /// Unique identifier
    pub id: RecordId,

    /// Interest name (unique within the directory, trimmed)
    pub name: String,

    /// Members who joined this interest
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub users: Vec<RecordId>,

    /// Creation timestamp
    pub created: DateTime<Utc>,
}

impl Interest {
    /// Create a new interest with the given name
    pub fn new(name: &str) -> Self {
        Self {
            id: RecordId::new(RecordPrefix::Int),
            name: name.trim().to_string(),
            users: Vec::new(),
            created: Utc::now(),
        }
    }

    /// Record that a member joined this interest
    pub fn append_user(&mut self, user: RecordId) {
        if !self.users.contains(&user) {
            self.users.push(user);
        }
    }

    /// Record that a member left this interest
    pub fn remove_user(&mut self, user: &RecordId) {
        self.users.retain(|u| u != user);
    }
}
