pub mod codec;
pub mod handle;
pub mod status;

pub use handle::{submit_all, JobHandle, SubmitMode};
pub use status::JobStatus;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Requested execution resources. Validation of upper bounds is the
/// backend's concern at submit time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRequest {
    pub cores: u32,
    pub memory_mb: u32,
}

impl Default for ResourceRequest {
    fn default() -> Self {
        Self {
            cores: 1,
            memory_mb: 0,
        }
    }
}

/// One unit of submitted work.
///
/// The identifier is set exactly once at creation. Backend-assigned ids
/// stay empty until a successful submit. String fields default to empty,
/// meaning "not set".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: Uuid,
    pub program: String,
    pub args: Vec<String>,
    pub working_dir: String,
    pub queue: String,
    pub resources: ResourceRequest,
    pub output_file: String,
    pub host_name: String,
    pub user_name: String,
    pub email_recipients: Vec<String>,
    pub environment: String,
    pub backend_id: String,
    pub backend_output_id: String,
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
}

impl Job {
    pub fn new(program: String, id: Uuid) -> Self {
        Self {
            id,
            program,
            args: Vec::new(),
            working_dir: String::new(),
            queue: String::new(),
            resources: ResourceRequest::default(),
            output_file: String::new(),
            host_name: String::new(),
            user_name: String::new(),
            email_recipients: Vec::new(),
            environment: String::new(),
            backend_id: String::new(),
            backend_output_id: String::new(),
            status: JobStatus::Unset,
            created_at: Utc::now(),
        }
    }

    /// True once the backend has acknowledged this job.
    pub fn is_submitted(&self) -> bool {
        !self.backend_id.is_empty()
    }

    /// Record an observed status, enforcing the forward-only lifecycle:
    /// a regression (in particular away from a terminal state) is ignored
    /// and the recorded status wins. Returns the status now in effect.
    pub fn record_status(&mut self, observed: JobStatus) -> JobStatus {
        if self.status.can_transition_to(observed) {
            self.status = observed;
        } else {
            tracing::debug!(
                job_id = %self.id,
                current = %self.status,
                observed = %observed,
                "Ignoring backward status observation"
            );
        }
        self.status
    }
}
