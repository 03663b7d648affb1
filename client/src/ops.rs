//! The admin operations the waiter exists for: backup, restore, and
//! restore-completion polling.
//!
//! Each operation is a thin envelope around [`TaskWaiter::submit`]: a
//! GraphQL document, its variables, and a serde struct for the
//! operation-specific payload. Backup hands back a task id and is awaited
//! through the status query; restore acknowledges synchronously and its
//! progress is visible only through node health reports.

use serde::Deserialize;
use taskwatch_types::{AdminRequest, TaskId};
use tokio::time::Instant;

use crate::api::ControlApi;
use crate::error::WaitError;
use crate::waiter::TaskWaiter;

/// Response code the control plane uses for an accepted operation.
const SUCCESS_CODE: &str = "Success";

/// Marker a node's health report carries while a restore is applying.
const RESTORE_IN_PROGRESS_MARKER: &str = "opRestore";

const BACKUP_MUTATION: &str = r"mutation backup($dst: String!, $ff: Boolean!) {
    backup(input: {destination: $dst, forceFull: $ff}) {
        response {
            code
        }
        taskId
    }
}";

const RESTORE_MUTATION: &str = r"mutation restore($location: String!, $backupId: String,
        $incrFrom: Int, $backupNum: Int, $encKey: String) {
    restore(input: {location: $location, backupId: $backupId, incrementalFrom: $incrFrom,
            backupNum: $backupNum, encryptionKeyFile: $encKey}) {
        code
        message
    }
}";

/// Start a backup to `destination` and wait for the task to complete.
///
/// Returns the task id on success so callers can correlate with control
/// plane logs. `force_full` requests a full backup even when an
/// incremental one would do.
pub async fn backup<C: ControlApi>(
    waiter: &TaskWaiter<C>,
    destination: &str,
    force_full: bool,
) -> Result<TaskId, WaitError> {
    let request = AdminRequest::new(BACKUP_MUTATION)
        .variable("dst", destination)
        .variable("ff", force_full);
    let data = waiter.submit(request).await?;

    let decoded: BackupData = serde_json::from_value(data).map_err(crate::AdminError::Decode)?;
    let payload = decoded.backup;
    if payload.response.code != SUCCESS_CODE {
        return Err(WaitError::Rejected {
            code: payload.response.code,
        });
    }
    let id = payload.task_id.ok_or(WaitError::MissingTaskId)?;

    tracing::debug!(task = %id, destination, force_full, "backup accepted");
    waiter.await_completion(&id).await?;
    Ok(id)
}

/// Parameters of a restore mutation. Only `location` is required.
#[derive(Debug, Clone, Default)]
pub struct RestoreRequest {
    pub location: String,
    pub backup_id: Option<String>,
    pub incremental_from: Option<u64>,
    pub backup_num: Option<u64>,
    pub encryption_key_file: Option<String>,
}

impl RestoreRequest {
    #[must_use]
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn backup_id(mut self, id: impl Into<String>) -> Self {
        self.backup_id = Some(id.into());
        self
    }

    #[must_use]
    pub fn incremental_from(mut self, backup_num: u64) -> Self {
        self.incremental_from = Some(backup_num);
        self
    }

    #[must_use]
    pub fn backup_num(mut self, backup_num: u64) -> Self {
        self.backup_num = Some(backup_num);
        self
    }

    #[must_use]
    pub fn encryption_key_file(mut self, path: impl Into<String>) -> Self {
        self.encryption_key_file = Some(path.into());
        self
    }
}

/// Submit a restore mutation and check it was accepted.
///
/// Acceptance is synchronous; the restore itself continues in the
/// background. Follow with [`wait_for_restore`] to block until the nodes
/// finish applying it.
pub async fn restore<C: ControlApi>(
    waiter: &TaskWaiter<C>,
    params: RestoreRequest,
) -> Result<(), WaitError> {
    let request = AdminRequest::new(RESTORE_MUTATION)
        .variable("location", params.location.as_str())
        .variable("backupId", params.backup_id)
        .variable("incrFrom", params.incremental_from)
        .variable("backupNum", params.backup_num)
        .variable("encKey", params.encryption_key_file);
    let data = waiter.submit(request).await?;

    let decoded: RestoreData = serde_json::from_value(data).map_err(crate::AdminError::Decode)?;
    if decoded.restore.code != SUCCESS_CODE {
        tracing::warn!(
            code = %decoded.restore.code,
            message = %decoded.restore.message,
            "restore rejected"
        );
        return Err(WaitError::Rejected {
            code: decoded.restore.code,
        });
    }
    Ok(())
}

/// Poll node health until no report shows a restore in progress.
///
/// Uses the waiter's poll interval and deadline. Health transport failures
/// propagate immediately, matching the task wait loop.
pub async fn wait_for_restore<C: ControlApi>(waiter: &TaskWaiter<C>) -> Result<(), WaitError> {
    let started = Instant::now();

    loop {
        if let Some(limit) = waiter.deadline
            && started.elapsed() + waiter.interval > limit
        {
            tracing::warn!(waited = ?started.elapsed(), "gave up waiting for restore");
            return Err(WaitError::DeadlineExceeded {
                waited: started.elapsed(),
            });
        }

        tokio::time::sleep(waiter.interval).await;

        let reports = waiter.api().health().await?;
        if reports
            .iter()
            .any(|report| report.contains(RESTORE_IN_PROGRESS_MARKER))
        {
            continue;
        }
        return Ok(());
    }
}

#[derive(Debug, Default, Deserialize)]
struct BackupData {
    #[serde(default)]
    backup: BackupPayload,
}

#[derive(Debug, Default, Deserialize)]
struct BackupPayload {
    #[serde(default)]
    response: ResponseStatus,
    #[serde(default, rename = "taskId")]
    task_id: Option<TaskId>,
}

#[derive(Debug, Default, Deserialize)]
struct RestoreData {
    #[serde(default)]
    restore: ResponseStatus,
}

#[derive(Debug, Default, Deserialize)]
struct ResponseStatus {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}
