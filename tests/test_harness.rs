//! Shared test doubles: a scripted execution backend and a canned
//! connection.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use serde_json::Value;

use gridlink::backend::{Backend, NativeStatus, Submission};
use gridlink::error::{GridlinkError, Result};
use gridlink::job::JobStatus;
use gridlink::protocol::Connection;
use gridlink::Job;

/// Backend double whose native codes are the canonical wire codes, driven
/// by a script of codes that each `query` consumes one of.
#[derive(Debug)]
pub struct MockBackend {
    accept: bool,
    script: Mutex<VecDeque<NativeStatus>>,
    current: Mutex<NativeStatus>,
    next_id: AtomicU64,
    pub submitted: Mutex<Vec<Job>>,
    pub cancelled: Mutex<Vec<String>>,
}

impl MockBackend {
    /// A backend that accepts submissions and then reports the scripted
    /// native codes, one per `query`, repeating the last one when the
    /// script runs dry.
    pub fn accepting(script: impl IntoIterator<Item = NativeStatus>) -> Self {
        Self {
            accept: true,
            script: Mutex::new(script.into_iter().collect()),
            current: Mutex::new(JobStatus::Pending.code()),
            next_id: AtomicU64::new(1),
            submitted: Mutex::new(Vec::new()),
            cancelled: Mutex::new(Vec::new()),
        }
    }

    /// A backend that rejects every submission.
    pub fn rejecting() -> Self {
        Self {
            accept: false,
            ..Self::accepting([])
        }
    }
}

impl Backend for MockBackend {
    fn name(&self) -> &str {
        "mock-grid"
    }

    fn submit(&self, job: &Job) -> Result<Submission> {
        if !self.accept {
            return Err(GridlinkError::Backend("submission rejected".to_string()));
        }
        self.submitted.lock().unwrap().push(job.clone());
        let n = self.next_id.fetch_add(1, Ordering::SeqCst);
        Ok(Submission {
            backend_id: format!("grid-{}", n),
            output_id: Some(format!("grid-{}.out", n)),
        })
    }

    fn query(&self, _backend_id: &str) -> Result<NativeStatus> {
        let mut current = self.current.lock().unwrap();
        if let Some(next) = self.script.lock().unwrap().pop_front() {
            *current = next;
        }
        Ok(*current)
    }

    fn map_status(&self, native: NativeStatus) -> Option<JobStatus> {
        JobStatus::from_code(native)
    }

    fn wait(&self, backend_id: &str) -> Result<()> {
        loop {
            let native = self.query(backend_id)?;
            // An unmappable code is terminal for the waiter too: the
            // caller will turn it into an error status.
            let terminal = self
                .map_status(native)
                .map(JobStatus::is_terminal)
                .unwrap_or(true);
            if terminal {
                return Ok(());
            }
            if self.script.lock().unwrap().is_empty() {
                return Err(GridlinkError::Backend(
                    "script exhausted before a terminal status".to_string(),
                ));
            }
        }
    }

    fn cancel(&self, backend_id: &str) -> Result<()> {
        self.cancelled.lock().unwrap().push(backend_id.to_string());
        Ok(())
    }
}

/// Connection double that records every envelope it is asked to send.
pub struct MockConnection {
    pub sent: Mutex<Vec<Value>>,
    reply: Option<String>,
}

impl MockConnection {
    /// Replies to every send with the given raw text.
    pub fn respond(text: &str) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            reply: Some(text.to_string()),
        }
    }

    /// Fails every send at the transport level.
    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            reply: None,
        }
    }
}

impl Connection for MockConnection {
    fn send(&self, envelope: &Value) -> Result<String> {
        self.sent.lock().unwrap().push(envelope.clone());
        match &self.reply {
            Some(text) => Ok(text.clone()),
            None => Err(GridlinkError::Transport("connection refused".to_string())),
        }
    }
}
