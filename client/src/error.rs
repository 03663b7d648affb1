use std::time::Duration;

use reqwest::StatusCode;
use taskwatch_types::{AdminApiError, TaskId};
use thiserror::Error;

/// Failure of a single admin request. None of these is ever retried; the
/// caller sees the first failure as-is.
#[derive(Debug, Error)]
pub enum AdminError {
    /// The HTTP call itself failed (connect, TLS, timeout, body read).
    #[error("transport error while contacting control endpoint")]
    Transport(#[from] reqwest::Error),

    /// The control endpoint answered with a non-success HTTP status.
    #[error("control endpoint returned HTTP {status}")]
    Http { status: StatusCode },

    /// The request could not be serialized before sending.
    #[error("failed to encode admin request")]
    Encode(#[source] serde_json::Error),

    /// The response body was not a valid admin response envelope.
    #[error("malformed admin response")]
    Decode(#[from] serde_json::Error),

    /// The envelope decoded cleanly but carried a non-empty error list.
    #[error("admin request rejected: {}", join_messages(.errors))]
    Remote { errors: Vec<AdminApiError> },
}

/// Failure of a submit-and-wait operation.
#[derive(Debug, Error)]
pub enum WaitError {
    #[error(transparent)]
    Admin(#[from] AdminError),

    /// The task reached the terminal `Failed` status.
    #[error("task {id} failed")]
    TaskFailed { id: TaskId },

    /// The task reached the terminal `Unknown` status. The control plane
    /// no longer knows the task; waiting longer cannot help.
    #[error("task {id} finished with status Unknown")]
    TaskUnknown { id: TaskId },

    /// The caller-supplied deadline elapsed before a terminal status.
    #[error("no terminal status within {waited:?}")]
    DeadlineExceeded { waited: Duration },

    /// The operation was accepted at the HTTP level but its embedded
    /// response code was not `Success`.
    #[error("operation rejected with response code {code:?}")]
    Rejected { code: String },

    /// The mutation succeeded but the payload carried no task id to poll.
    #[error("control plane returned no task id")]
    MissingTaskId,
}

fn join_messages(errors: &[AdminApiError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_error_lists_all_messages() {
        let err = AdminError::Remote {
            errors: vec![
                AdminApiError::new("not logged in"),
                AdminApiError::new("backup in progress"),
            ],
        };
        assert_eq!(
            err.to_string(),
            "admin request rejected: not logged in; backup in progress"
        );
    }

    #[test]
    fn encode_and_decode_failures_read_differently() {
        let json_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        assert_eq!(
            AdminError::Encode(json_err).to_string(),
            "failed to encode admin request"
        );

        let json_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        assert_eq!(
            AdminError::Decode(json_err).to_string(),
            "malformed admin response"
        );
    }

    #[test]
    fn wait_error_is_transparent_over_admin_error() {
        let err = WaitError::from(AdminError::Http {
            status: StatusCode::SERVICE_UNAVAILABLE,
        });
        assert_eq!(err.to_string(), "control endpoint returned HTTP 503 Service Unavailable");
    }
}
