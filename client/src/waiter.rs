use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;
use taskwatch_types::{AdminRequest, TaskId, TaskStatus};
use tokio::time::Instant;

use crate::api::{ControlApi, run_admin};
use crate::error::{AdminError, WaitError};

/// Default poll interval between status queries.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

const TASK_STATUS_QUERY: &str = r"query task($id: String!) {
    task(input: {id: $id}) {
        status
    }
}";

/// Submits admin mutations and polls the resulting task to completion.
///
/// One waiter drives one task at a time; run several waiters for several
/// tasks, they need no coordination. The wait loop holds no locks and has
/// no cleanup obligation, so dropping the future (or racing it against a
/// caller-side timeout) is always safe. A built-in bound is available via
/// [`deadline`](Self::deadline); without one the loop polls until the task
/// settles, matching the control plane's own contract that every task
/// eventually reaches a terminal status.
#[derive(Debug)]
pub struct TaskWaiter<C> {
    pub(crate) api: C,
    pub(crate) interval: Duration,
    pub(crate) deadline: Option<Duration>,
}

impl<C: ControlApi> TaskWaiter<C> {
    pub fn new(api: C) -> Self {
        Self {
            api,
            interval: DEFAULT_POLL_INTERVAL,
            deadline: None,
        }
    }

    /// Time between status queries. Defaults to one second.
    #[must_use]
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Upper bound on total wait time. Checked before each sleep, so the
    /// loop never oversleeps the bound by more than one interval.
    #[must_use]
    pub fn deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    #[must_use]
    pub fn api(&self) -> &C {
        &self.api
    }

    /// Send an admin mutation and return its decoded data payload.
    ///
    /// Transport failures, malformed envelopes, and non-empty error lists
    /// all fail here, before any polling starts.
    pub async fn submit(&self, request: AdminRequest) -> Result<Value, AdminError> {
        run_admin(&self.api, &request).await
    }

    /// Poll `id` on the configured interval until it settles.
    ///
    /// `Success` resolves to `Ok(())`. `Failed` and `Unknown` resolve to an
    /// error on the poll that observes them, with no further queries. Any
    /// [`AdminError`] from a poll propagates immediately; only the "still
    /// running" condition loops.
    pub async fn await_completion(&self, id: &TaskId) -> Result<(), WaitError> {
        let request = AdminRequest::new(TASK_STATUS_QUERY).variable("id", id.as_str());
        let started = Instant::now();
        let mut polls: u32 = 0;

        loop {
            if let Some(limit) = self.deadline
                && started.elapsed() + self.interval > limit
            {
                tracing::warn!(task = %id, polls, waited = ?started.elapsed(), "gave up waiting for task");
                return Err(WaitError::DeadlineExceeded {
                    waited: started.elapsed(),
                });
            }

            tokio::time::sleep(self.interval).await;

            let data = run_admin(&self.api, &request).await?;
            // A null payload is how the control plane answers before the
            // task record exists; treat it like a missing status.
            let envelope = serde_json::from_value::<Option<TaskEnvelope>>(data)
                .map_err(AdminError::Decode)?
                .unwrap_or_default();
            let status = envelope.task.status;
            polls += 1;
            tracing::debug!(task = %id, polls, status = %status, "polled task status");

            match status {
                TaskStatus::Success => return Ok(()),
                TaskStatus::Failed => return Err(WaitError::TaskFailed { id: id.clone() }),
                TaskStatus::Unknown => return Err(WaitError::TaskUnknown { id: id.clone() }),
                TaskStatus::Other(_) => {}
            }
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct TaskEnvelope {
    #[serde(default)]
    task: TaskState,
}

#[derive(Debug, Default, Deserialize)]
struct TaskState {
    #[serde(default)]
    status: TaskStatus,
}
