//! The live set of tracked service records and its batch status update.

use std::collections::HashMap;

use serde_json::Value;
use uuid::Uuid;

use crate::error::Result;
use crate::ident;
use crate::job::status::JobStatus;
use crate::protocol::connection::{dispatch, Connection};
use crate::protocol::envelope::build_status_query_request;

/// One tracked service: identifier, display name, description, status,
/// optional information URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceStatusRecord {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub status: JobStatus,
    pub info_uri: Option<String>,
}

impl ServiceStatusRecord {
    pub fn new(id: Uuid, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            description: String::new(),
            status: JobStatus::Unset,
            info_uri: None,
        }
    }
}

/// The live set of records a batch status update mutates in place.
#[derive(Debug, Default)]
pub struct StatusDirectory {
    records: HashMap<Uuid, ServiceStatusRecord>,
}

impl StatusDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn track(&mut self, record: ServiceStatusRecord) {
        self.records.insert(record.id, record);
    }

    pub fn get(&self, id: &Uuid) -> Option<&ServiceStatusRecord> {
        self.records.get(id)
    }

    pub fn ids(&self) -> Vec<Uuid> {
        self.records.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ServiceStatusRecord> {
        self.records.values()
    }

    /// Query the remote party for the status of every tracked record and
    /// apply the response.
    ///
    /// Each response entry names an identifier and carries a sibling
    /// job-record array; the array is walked to assemble the record's
    /// name, description, information URI, and status (string field
    /// first, else a bounds-checked integer field). Entries with an
    /// unparsable identifier, an untracked identifier, or no usable
    /// status are skipped without aborting the batch. Returns the number
    /// of records updated.
    pub fn update_statuses(&mut self, connection: &dyn Connection) -> Result<usize> {
        let request = build_status_query_request(&self.ids());
        let response = dispatch(&request, connection)?;

        let Some(services) = response.get("services").and_then(Value::as_array) else {
            tracing::debug!("Status response carries no services payload");
            return Ok(0);
        };

        let mut updated = 0;
        for entry in services {
            let Some(id_text) = entry.get("service").and_then(Value::as_str) else {
                tracing::warn!("Skipping status entry without a service identifier");
                continue;
            };
            let id = match ident::from_canonical_string(id_text) {
                Ok(id) => id,
                Err(e) => {
                    tracing::warn!(token = id_text, error = %e, "Skipping unparsable status entry");
                    continue;
                }
            };
            let Some(record) = self.records.get_mut(&id) else {
                tracing::warn!(id = id_text, "Skipping status entry for untracked identifier");
                continue;
            };

            let fields = walk_job_records(entry.get("jobs"));
            let Some(status) = fields.status else {
                tracing::warn!(id = id_text, "Skipping status entry without a usable status");
                continue;
            };

            if let Some(name) = fields.name {
                record.name = name;
            }
            if let Some(description) = fields.description {
                record.description = description;
            }
            if fields.info_uri.is_some() {
                record.info_uri = fields.info_uri;
            }
            record.status = status;
            updated += 1;
        }
        Ok(updated)
    }
}

#[derive(Default)]
struct RecordFields {
    name: Option<String>,
    description: Option<String>,
    info_uri: Option<String>,
    status: Option<JobStatus>,
}

/// Walk a job-record array, collecting the known fields wherever they
/// appear. Status: string form wins over the integer form, and the
/// integer form is accepted only strictly inside the sentinel bounds.
fn walk_job_records(jobs: Option<&Value>) -> RecordFields {
    let mut fields = RecordFields::default();
    let Some(items) = jobs.and_then(Value::as_array) else {
        return fields;
    };
    for item in items {
        let Some(object) = item.as_object() else {
            continue;
        };
        if let Some(name) = object.get("name").and_then(Value::as_str) {
            fields.name = Some(name.to_string());
        }
        if let Some(description) = object.get("description").and_then(Value::as_str) {
            fields.description = Some(description.to_string());
        }
        if let Some(uri) = object.get("info_uri").and_then(Value::as_str) {
            fields.info_uri = Some(uri.to_string());
        }
        if fields.status.is_none() {
            if let Some(name) = object.get("status").and_then(Value::as_str) {
                fields.status = JobStatus::from_name(name);
            } else if let Some(code) = object.get("status_code").and_then(Value::as_i64) {
                fields.status = JobStatus::from_code(code);
            }
        }
    }
    fields
}
