//! Local-process execution backend.
//!
//! Runs each job as a child process on the local host. Queue names,
//! resource requests, host names, and email lists are grid concerns and
//! are ignored here; the environment block is interpreted as
//! newline-separated `KEY=VALUE` pairs.

use std::collections::HashMap;
use std::fs::File;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::{Arc, Mutex};

use crate::backend::{Backend, NativeStatus, Submission};
use crate::error::{GridlinkError, Result};
use crate::job::{Job, JobStatus};

/// Native status codes reported by this backend.
pub const NATIVE_RUNNING: NativeStatus = 1;
pub const NATIVE_EXITED_OK: NativeStatus = 2;
pub const NATIVE_EXITED_NONZERO: NativeStatus = 3;
pub const NATIVE_SIGNALED: NativeStatus = 4;

#[derive(Debug)]
struct ProcEntry {
    child: Child,
    exit: Option<ExitStatus>,
}

impl ProcEntry {
    fn native_status(&mut self) -> Result<NativeStatus> {
        if self.exit.is_none() {
            if let Some(status) = self
                .child
                .try_wait()
                .map_err(|e| GridlinkError::Backend(format!("poll failed: {}", e)))?
            {
                self.exit = Some(status);
            }
        }
        Ok(match self.exit {
            None => NATIVE_RUNNING,
            Some(status) => match status.code() {
                Some(0) => NATIVE_EXITED_OK,
                Some(_) => NATIVE_EXITED_NONZERO,
                // killed by signal
                None => NATIVE_SIGNALED,
            },
        })
    }
}

/// Executes jobs as child processes of the calling process.
#[derive(Debug, Default)]
pub struct LocalProcessBackend {
    procs: Mutex<HashMap<String, Arc<Mutex<ProcEntry>>>>,
}

impl LocalProcessBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn entry(&self, backend_id: &str) -> Result<Arc<Mutex<ProcEntry>>> {
        let procs = self.procs.lock().expect("process registry lock poisoned");
        procs
            .get(backend_id)
            .cloned()
            .ok_or_else(|| GridlinkError::Backend(format!("unknown backend id {}", backend_id)))
    }
}

impl Backend for LocalProcessBackend {
    fn name(&self) -> &str {
        "local-process"
    }

    fn submit(&self, job: &Job) -> Result<Submission> {
        let mut cmd = Command::new(&job.program);
        cmd.args(&job.args);
        if !job.working_dir.is_empty() {
            cmd.current_dir(&job.working_dir);
        }
        for line in job.environment.lines() {
            if let Some((key, value)) = line.split_once('=') {
                cmd.env(key, value);
            }
        }
        if job.output_file.is_empty() {
            cmd.stdout(Stdio::null());
        } else {
            let out = File::create(&job.output_file)
                .map_err(|e| GridlinkError::Backend(format!("cannot open output file: {}", e)))?;
            cmd.stdout(out);
        }
        cmd.stderr(Stdio::null());
        cmd.stdin(Stdio::null());

        let child = cmd
            .spawn()
            .map_err(|e| GridlinkError::Backend(format!("spawn failed: {}", e)))?;
        let backend_id = child.id().to_string();

        tracing::info!(
            job_id = %job.id,
            program = %job.program,
            backend_id = %backend_id,
            "Spawned local process"
        );

        let output_id = (!job.output_file.is_empty()).then(|| job.output_file.clone());
        self.procs
            .lock()
            .expect("process registry lock poisoned")
            .insert(backend_id.clone(), Arc::new(Mutex::new(ProcEntry { child, exit: None })));

        Ok(Submission {
            backend_id,
            output_id,
        })
    }

    fn query(&self, backend_id: &str) -> Result<NativeStatus> {
        let entry = self.entry(backend_id)?;
        let mut entry = entry.lock().expect("process entry lock poisoned");
        entry.native_status()
    }

    fn map_status(&self, native: NativeStatus) -> Option<JobStatus> {
        match native {
            NATIVE_RUNNING => Some(JobStatus::Started),
            NATIVE_EXITED_OK => Some(JobStatus::Succeeded),
            NATIVE_EXITED_NONZERO => Some(JobStatus::Failed),
            NATIVE_SIGNALED => Some(JobStatus::Error),
            _ => None,
        }
    }

    fn wait(&self, backend_id: &str) -> Result<()> {
        let entry = self.entry(backend_id)?;
        let mut entry = entry.lock().expect("process entry lock poisoned");
        if entry.exit.is_none() {
            let status = entry
                .child
                .wait()
                .map_err(|e| GridlinkError::Backend(format!("wait failed: {}", e)))?;
            entry.exit = Some(status);
        }
        Ok(())
    }

    fn cancel(&self, backend_id: &str) -> Result<()> {
        let entry = self.entry(backend_id)?;
        let mut entry = entry.lock().expect("process entry lock poisoned");
        if entry.exit.is_some() {
            // already finished; nothing to stop
            return Ok(());
        }
        tracing::info!(backend_id = %backend_id, "Killing local process");
        entry
            .child
            .kill()
            .map_err(|e| GridlinkError::Backend(format!("kill failed: {}", e)))?;
        let status = entry
            .child
            .wait()
            .map_err(|e| GridlinkError::Backend(format!("reap failed: {}", e)))?;
        entry.exit = Some(status);
        Ok(())
    }
}
