use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use crate::backend::Backend;
use crate::error::{GridlinkError, Result};
use crate::job::{codec, Job, JobStatus};
use crate::monitor::CountingMonitor;

/// How `submit` relates to job completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitMode {
    /// Block the calling thread until the backend reports a terminal
    /// status.
    Blocking,
    /// Return as soon as the backend acknowledges acceptance; polling is
    /// the caller's business.
    Background,
}

/// Owns one job's specification and its backend binding.
///
/// A handle is exclusively owned by its current holder; it is `Send` but
/// deliberately not shareable, and concurrent calls against one handle
/// from multiple threads are a caller error.
#[derive(Debug)]
pub struct JobHandle {
    job: Job,
    backend: Option<Arc<dyn Backend>>,
}

impl JobHandle {
    /// Create a handle for a new job. The program name is not validated
    /// beyond being non-empty; everything else is the backend's business
    /// at submit time.
    pub fn new(program: &str, id: Uuid, backend: Arc<dyn Backend>) -> Result<Self> {
        if program.is_empty() {
            return Err(GridlinkError::Validation(
                "program name must not be empty".to_string(),
            ));
        }
        Ok(Self {
            job: Job::new(program.to_string(), id),
            backend: Some(backend),
        })
    }

    pub fn job(&self) -> &Job {
        &self.job
    }

    pub fn id(&self) -> Uuid {
        self.job.id
    }

    /// Re-attach an execution backend, typically after `deserialize`.
    /// The recovered backend id makes the job pollable again.
    pub fn attach_backend(&mut self, backend: Arc<dyn Backend>) {
        self.backend = Some(backend);
    }

    pub fn has_backend(&self) -> bool {
        self.backend.is_some()
    }

    // Spec mutations are accepted only before submission; afterwards the
    // backend already holds the job description and a local edit would
    // silently diverge from it.
    fn spec_mut(&mut self) -> Option<&mut Job> {
        if self.job.is_submitted() {
            tracing::debug!(job_id = %self.job.id, "Ignoring spec mutation after submit");
            None
        } else {
            Some(&mut self.job)
        }
    }

    pub fn set_working_dir(&mut self, dir: &str) {
        if let Some(job) = self.spec_mut() {
            job.working_dir = dir.to_string();
        }
    }

    pub fn set_queue(&mut self, queue: &str) {
        if let Some(job) = self.spec_mut() {
            job.queue = queue.to_string();
        }
    }

    pub fn set_environment(&mut self, environment: &str) {
        if let Some(job) = self.spec_mut() {
            job.environment = environment.to_string();
        }
    }

    pub fn set_host_name(&mut self, host: &str) {
        if let Some(job) = self.spec_mut() {
            job.host_name = host.to_string();
        }
    }

    pub fn set_user_name(&mut self, user: &str) {
        if let Some(job) = self.spec_mut() {
            job.user_name = user.to_string();
        }
    }

    pub fn set_output_file(&mut self, path: &str) {
        if let Some(job) = self.spec_mut() {
            job.output_file = path.to_string();
        }
    }

    pub fn set_email_recipients(&mut self, recipients: &[&str]) {
        if let Some(job) = self.spec_mut() {
            job.email_recipients = recipients.iter().map(|r| r.to_string()).collect();
        }
    }

    pub fn set_cores(&mut self, cores: u32) {
        if let Some(job) = self.spec_mut() {
            job.resources.cores = cores;
        }
    }

    pub fn set_memory_mb(&mut self, memory_mb: u32) {
        if let Some(job) = self.spec_mut() {
            job.resources.memory_mb = memory_mb;
        }
    }

    /// Append to the ordered argument list. Duplicates are allowed.
    pub fn add_argument(&mut self, value: &str) {
        if let Some(job) = self.spec_mut() {
            job.args.push(value.to_string());
        }
    }

    /// Submit the job to the bound backend.
    ///
    /// On acceptance the backend ids are captured into the job and the
    /// status advances to `Pending`; rejection leaves the status at its
    /// prior value. If `log_path` is given, the backend id is written
    /// there as a side effect — a write failure is logged and does not
    /// fail the submission.
    pub fn submit(&mut self, mode: SubmitMode, log_path: Option<&Path>) -> Result<()> {
        let backend = self.backend.clone().ok_or(GridlinkError::NoBackend)?;
        if self.job.is_submitted() {
            return Err(GridlinkError::Validation(format!(
                "job {} already submitted",
                self.job.id
            )));
        }

        let submission = backend.submit(&self.job)?;
        self.job.backend_id = submission.backend_id;
        self.job.backend_output_id = submission.output_id.unwrap_or_default();
        self.job.record_status(JobStatus::Pending);

        tracing::info!(
            job_id = %self.job.id,
            backend = %backend.name(),
            backend_id = %self.job.backend_id,
            mode = ?mode,
            "Submitted job"
        );

        if let Some(path) = log_path {
            if let Err(e) = std::fs::write(path, &self.job.backend_id) {
                tracing::warn!(
                    job_id = %self.job.id,
                    path = %path.display(),
                    error = %e,
                    "Could not record backend id"
                );
            }
        }

        if mode == SubmitMode::Blocking {
            backend.wait(&self.job.backend_id)?;
            self.refresh_status(&backend)?;
        }
        Ok(())
    }

    /// The canonical status of this job.
    ///
    /// An unsubmitted handle reports its local status; otherwise the
    /// backend is queried and its native result mapped, with unmappable
    /// codes becoming [`JobStatus::Error`]. A terminal status, once
    /// recorded, is never regressed.
    pub fn status(&mut self) -> Result<JobStatus> {
        if !self.job.is_submitted() {
            return Ok(self.job.status);
        }
        let backend = self.backend.clone().ok_or(GridlinkError::NoBackend)?;
        self.refresh_status(&backend)
    }

    fn refresh_status(&mut self, backend: &Arc<dyn Backend>) -> Result<JobStatus> {
        let native = backend.query(&self.job.backend_id)?;
        let observed = backend.map_status(native).unwrap_or_else(|| {
            tracing::warn!(
                job_id = %self.job.id,
                backend = %backend.name(),
                native,
                "Unmappable native status"
            );
            JobStatus::Error
        });
        Ok(self.job.record_status(observed))
    }

    /// Ask the backend to stop the job. Termination is not synchronous;
    /// a later `status` reflects the eventual outcome.
    pub fn cancel(&mut self) -> Result<()> {
        let backend = self.backend.clone().ok_or(GridlinkError::NoBackend)?;
        if !self.job.is_submitted() {
            return Err(GridlinkError::Validation(format!(
                "job {} was never submitted",
                self.job.id
            )));
        }
        tracing::info!(job_id = %self.job.id, backend_id = %self.job.backend_id, "Cancelling job");
        backend.cancel(&self.job.backend_id)
    }

    /// Poll `status` until the job is terminal or `max_polls` cycles have
    /// elapsed, sleeping `poll_interval` between cycles. Returns the last
    /// observed status either way; hitting the limit stops the waiter,
    /// not the job.
    pub fn wait_terminal(&mut self, poll_interval: Duration, max_polls: u32) -> Result<JobStatus> {
        let monitor = CountingMonitor::new(self.job.status, max_polls, |s: &JobStatus| {
            !s.is_terminal()
        });
        loop {
            let observed = self.status()?;
            monitor.update(|slot| *slot = observed);
            if !monitor.should_continue() {
                return Ok(observed);
            }
            if monitor.increment() {
                return Ok(observed);
            }
            std::thread::sleep(poll_interval);
        }
    }

    /// The durable blob form of this job (§ external interfaces in the
    /// repository docs). The backend binding itself is not persisted.
    pub fn serialize(&self) -> Vec<u8> {
        codec::encode(&self.job)
    }

    /// Reconstruct a handle from its durable blob. The result has no live
    /// backend binding and cannot be polled until one is re-attached with
    /// [`attach_backend`](JobHandle::attach_backend).
    pub fn deserialize(blob: &[u8]) -> Result<Self> {
        Ok(Self {
            job: codec::decode(blob)?,
            backend: None,
        })
    }

    /// Human-inspectable JSON equivalent of `serialize`, for embedding
    /// job metadata inside an operation envelope.
    pub fn to_envelope_fragment(&self) -> Result<serde_json::Value> {
        serde_json::to_value(&self.job)
            .map_err(|e| GridlinkError::Serialization(format!("job fragment: {}", e)))
    }

    /// Counterpart of `to_envelope_fragment`. Like `deserialize`, the
    /// result carries no backend binding.
    pub fn from_envelope_fragment(document: &serde_json::Value) -> Result<Self> {
        let job: Job = serde_json::from_value(document.clone())
            .map_err(|e| GridlinkError::Decode(format!("job fragment: {}", e)))?;
        Ok(Self { job, backend: None })
    }
}

/// Submit every handle in the batch. Failure of one slot is recorded in
/// its result and does not stop the siblings.
pub fn submit_all(handles: &mut [JobHandle], mode: SubmitMode) -> Vec<Result<()>> {
    handles
        .iter_mut()
        .map(|handle| {
            let outcome = handle.submit(mode, None);
            if let Err(e) = &outcome {
                tracing::warn!(job_id = %handle.id(), error = %e, "Batch slot failed to submit");
            }
            outcome
        })
        .collect()
}
