//! Execution backend capability.
//!
//! A [`Backend`] is the only doorway to an execution system: grid
//! middleware, a local-process runner, or anything else that can run a
//! job. [`crate::job::JobHandle`] depends on this trait alone, never on a
//! concrete scheduler library.

pub mod local;

pub use local::LocalProcessBackend;

use crate::error::Result;
use crate::job::{Job, JobStatus};

/// A backend's own status code, opaque to everything but the backend that
/// produced it.
pub type NativeStatus = i64;

/// Result of a successful submit: the backend-assigned external id, plus
/// an optional secondary id (for captured output).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub backend_id: String,
    pub output_id: Option<String>,
}

/// Capability interface to an external job-execution system.
pub trait Backend: Send + Sync + std::fmt::Debug {
    fn name(&self) -> &str;

    /// Hand the job to the execution system. Acceptance returns the
    /// backend-assigned ids; rejection must not leave partial state
    /// behind.
    fn submit(&self, job: &Job) -> Result<Submission>;

    /// The backend's native status code for a submitted job.
    fn query(&self, backend_id: &str) -> Result<NativeStatus>;

    /// Map a native status code into the canonical enumeration. `None`
    /// for codes this backend cannot map; the caller treats those as
    /// [`JobStatus::Error`].
    fn map_status(&self, native: NativeStatus) -> Option<JobStatus>;

    /// Block the calling thread until the job reaches a terminal state.
    fn wait(&self, backend_id: &str) -> Result<()>;

    /// Ask the execution system to stop the job. Termination is not
    /// synchronous; a later query reflects the eventual outcome.
    fn cancel(&self, backend_id: &str) -> Result<()>;
}
