//! Durable job blob codec.
//!
//! A fixed-order sequence of length-prefixed fields so a job store can
//! resume work after a process restart. Every length and fixed-width
//! integer is a little-endian u32. Field order and widths are stable
//! across versions; new fields are only ever appended.

use bytes::{Buf, BufMut, BytesMut};
use chrono::{DateTime, Utc};

use crate::error::{GridlinkError, Result};
use crate::ident;
use crate::job::{Job, JobStatus, ResourceRequest};

/// Encode `job` into the durable blob form.
pub fn encode(job: &Job) -> Vec<u8> {
    let mut buf = BytesMut::new();
    put_str(&mut buf, &job.program);
    put_str(&mut buf, &ident::to_canonical_string(&job.id));
    put_str(&mut buf, &job.queue);
    put_str(&mut buf, &job.working_dir);
    buf.put_u32_le(job.args.len() as u32);
    for arg in &job.args {
        put_str(&mut buf, arg);
    }
    put_str(&mut buf, &job.output_file);
    buf.put_u32_le(job.resources.cores);
    buf.put_u32_le(job.resources.memory_mb);
    put_str(&mut buf, &job.host_name);
    put_str(&mut buf, &job.user_name);
    buf.put_u32_le(job.email_recipients.len() as u32);
    for addr in &job.email_recipients {
        put_str(&mut buf, addr);
    }
    put_str(&mut buf, &job.environment);
    put_str(&mut buf, &job.backend_id);
    put_str(&mut buf, &job.backend_output_id);
    buf.put_u32_le(job.status.code() as u32);
    put_str(&mut buf, &job.created_at.to_rfc3339());
    buf.to_vec()
}

/// Decode a durable blob back into a [`Job`].
///
/// A malformed blob fails without partially constructing a job. The
/// reconstructed job carries the recovered backend ids but no live
/// backend binding.
pub fn decode(blob: &[u8]) -> Result<Job> {
    let mut buf = blob;

    let program = get_str(&mut buf)?;
    let id_text = get_str(&mut buf)?;
    let id = ident::from_canonical_string(&id_text)
        .map_err(|e| GridlinkError::Serialization(format!("bad identifier field: {}", e)))?;
    let queue = get_str(&mut buf)?;
    let working_dir = get_str(&mut buf)?;

    let arg_count = get_u32(&mut buf)?;
    let mut args = Vec::with_capacity(arg_count.min(1024) as usize);
    for _ in 0..arg_count {
        args.push(get_str(&mut buf)?);
    }

    let output_file = get_str(&mut buf)?;
    let cores = get_u32(&mut buf)?;
    let memory_mb = get_u32(&mut buf)?;
    let host_name = get_str(&mut buf)?;
    let user_name = get_str(&mut buf)?;

    let email_count = get_u32(&mut buf)?;
    let mut email_recipients = Vec::with_capacity(email_count.min(1024) as usize);
    for _ in 0..email_count {
        email_recipients.push(get_str(&mut buf)?);
    }

    let environment = get_str(&mut buf)?;
    let backend_id = get_str(&mut buf)?;
    let backend_output_id = get_str(&mut buf)?;

    let status_code = get_u32(&mut buf)?;
    let status = if status_code == 0 {
        JobStatus::Unset
    } else {
        JobStatus::from_code(status_code as i64).ok_or_else(|| {
            GridlinkError::Serialization(format!("bad status code {}", status_code))
        })?
    };

    let created_text = get_str(&mut buf)?;
    let created_at = DateTime::parse_from_rfc3339(&created_text)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| GridlinkError::Serialization(format!("bad creation timestamp: {}", e)))?;

    Ok(Job {
        id,
        program,
        args,
        working_dir,
        queue,
        resources: ResourceRequest { cores, memory_mb },
        output_file,
        host_name,
        user_name,
        email_recipients,
        environment,
        backend_id,
        backend_output_id,
        status,
        created_at,
    })
}

fn put_str(buf: &mut BytesMut, s: &str) {
    buf.put_u32_le(s.len() as u32);
    buf.put_slice(s.as_bytes());
}

fn get_u32(buf: &mut &[u8]) -> Result<u32> {
    if buf.remaining() < 4 {
        return Err(GridlinkError::Serialization("truncated blob".to_string()));
    }
    Ok(buf.get_u32_le())
}

fn get_str(buf: &mut &[u8]) -> Result<String> {
    let len = get_u32(buf)? as usize;
    if buf.remaining() < len {
        return Err(GridlinkError::Serialization("truncated blob".to_string()));
    }
    let mut raw = vec![0u8; len];
    buf.copy_to_slice(&mut raw);
    String::from_utf8(raw)
        .map_err(|e| GridlinkError::Serialization(format!("non-UTF-8 field: {}", e)))
}
