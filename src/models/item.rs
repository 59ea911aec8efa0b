use std::fmt;
use std::str::FromStr;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Priority letter of a todo item, `a` (highest) to `z` (lowest)
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(try_from = "char", into = "char")]
pub struct Priority(char);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PriorityError {
    #[error("Invalid priority '{0}': expected a single letter between a and z")]
    InvalidPriority(String),
}

impl Priority {
    pub const LOWEST: Priority = Priority('z');

    pub fn as_char(self) -> char {
        self.0
    }

    pub fn is_lowest(self) -> bool {
        self == Self::LOWEST
    }
}

impl Default for Priority {
    fn default() -> Self {
        Self::LOWEST
    }
}

impl TryFrom<char> for Priority {
    type Error = PriorityError;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        let lower = value.to_ascii_lowercase();
        if lower.is_ascii_lowercase() {
            Ok(Priority(lower))
        } else {
            Err(PriorityError::InvalidPriority(value.to_string()))
        }
    }
}

impl From<Priority> for char {
    fn from(value: Priority) -> Self {
        value.0
    }
}

impl FromStr for Priority {
    type Err = PriorityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Priority::try_from(c),
            _ => Err(PriorityError::InvalidPriority(s.to_string())),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TodoItem {
    /// UUID to identify the item
    pub id: Uuid,
    /// Free text of the item
    pub description: String,
    /// Priority letter, defaults to `z`
    pub priority: Priority,
    /// Project tag, never empty
    pub project: String,
    /// When the item was created
    pub created_at: Timestamp,
    /// When the item was completed
    pub completed_at: Option<Timestamp>,
}

impl TodoItem {
    pub fn new(description: String, priority: Priority, project: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            description,
            priority,
            project,
            created_at: Timestamp::now(),
            completed_at: None,
        }
    }

    /// Canonical ordering key: priority, then project, then description
    pub fn sort_key(&self) -> (Priority, &str, &str) {
        (self.priority, &self.project, &self.description)
    }

    pub fn complete(&mut self) {
        self.completed_at = Some(Timestamp::now());
    }
}
