use std::fmt;

use serde::{Deserialize, Serialize};

/// Status of a long-running task as reported by the control plane.
///
/// The wire value is a free-form string. `Success`, `Failed`, and `Unknown`
/// are terminal; every other value (`Running`, `Queued`, an empty string on
/// a sparsely populated response, ...) means the task has not settled yet
/// and the caller should keep polling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TaskStatus {
    Success,
    Failed,
    Unknown,
    /// Any non-terminal marker, preserved verbatim for logging.
    Other(String),
}

impl TaskStatus {
    /// True once no further state transition can occur.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Other(_))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Success => "Success",
            Self::Failed => "Failed",
            Self::Unknown => "Unknown",
            Self::Other(raw) => raw,
        }
    }
}

impl Default for TaskStatus {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl From<String> for TaskStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "Success" => Self::Success,
            "Failed" => Self::Failed,
            "Unknown" => Self::Unknown,
            _ => Self::Other(raw),
        }
    }
}

impl From<&str> for TaskStatus {
    fn from(raw: &str) -> Self {
        Self::from(raw.to_owned())
    }
}

impl From<TaskStatus> for String {
    fn from(status: TaskStatus) -> Self {
        match status {
            TaskStatus::Other(raw) => raw,
            terminal => terminal.as_str().to_owned(),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
