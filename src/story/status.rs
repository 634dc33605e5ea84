//! Story status vocabulary.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error type for status parsing
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid status '{status}'. Allowed: {allowed:?}")]
pub struct StatusError {
    pub status: String,
    pub allowed: Vec<String>,
}

/// Publication status of a story.
///
/// Only `Active` stories appear on the public site; `Inactive` ones stay in
/// the back office and keep their rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum StoryStatus {
    #[default]
    Active,
    Inactive,
}

impl StoryStatus {
    pub const ALL: [StoryStatus; 2] = [StoryStatus::Active, StoryStatus::Inactive];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            StoryStatus::Active => "Active",
            StoryStatus::Inactive => "Inactive",
        }
    }

    #[must_use]
    pub fn is_public(self) -> bool {
        self == StoryStatus::Active
    }

    fn allowed() -> Vec<String> {
        Self::ALL.iter().map(|s| s.as_str().to_string()).collect()
    }
}

impl fmt::Display for StoryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StoryStatus {
    type Err = StatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| StatusError {
                status: s.to_string(),
                allowed: Self::allowed(),
            })
    }
}

impl TryFrom<String> for StoryStatus {
    type Error = StatusError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<StoryStatus> for String {
    fn from(status: StoryStatus) -> Self {
        status.as_str().to_string()
    }
}
