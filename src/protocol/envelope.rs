//! Envelope construction and field extraction.
//!
//! Every outgoing envelope carries the fixed `@context` block and a
//! `header` with the schema version. Extraction is deliberately
//! permissive: a document whose operation or status cannot be determined
//! yields `None` rather than an error.

use serde_json::{json, Map, Value};
use uuid::Uuid;

use crate::ident;
use crate::job::status::JobStatus;
use crate::protocol::operation::Operation;

/// Current envelope schema version, `major.minor`.
pub const SCHEMA_VERSION: &str = "1.0";

/// The fixed semantic-context table. Immutable; referenced wherever
/// envelopes are built.
pub const CONTEXT_ENTRIES: [(&str, &str); 4] = [
    ("gl", "https://gridlink.dev/ns/core#"),
    ("job", "https://gridlink.dev/ns/job#"),
    ("svc", "https://gridlink.dev/ns/service#"),
    ("cfg", "https://gridlink.dev/ns/config#"),
];

fn context_block() -> Value {
    let mut block = Map::new();
    for (prefix, url) in CONTEXT_ENTRIES {
        block.insert(prefix.to_string(), Value::String(url.to_string()));
    }
    Value::Object(block)
}

/// A fresh envelope for `kind`: context block, header, and an operation
/// section naming the kind.
pub fn new_operation_envelope(kind: Operation, schema_version: &str) -> Value {
    json!({
        "@context": context_block(),
        "header": { "schema_version": schema_version },
        "server_operations": { "operation": kind.name() },
    })
}

/// Attach a caller-supplied client-configuration document under `config`,
/// so a receiver can interpret caller-specific settings without a
/// side-channel schema lookup.
pub fn merge_client_config(envelope: &mut Value, settings: &Value) {
    if let Some(root) = envelope.as_object_mut() {
        root.insert("config".to_string(), settings.clone());
    }
}

/// Request the full service list.
pub fn build_service_list_request() -> Value {
    new_operation_envelope(Operation::ListServices, SCHEMA_VERSION)
}

/// Request specific services by name.
///
/// `names` is a comma-separated list, kept in order without
/// deduplication; each entry becomes a `{name, alias}` pair with the
/// alias defaulting to the name.
pub fn build_named_services_request(names: &str) -> Value {
    let services: Vec<Value> = names
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| json!({ "name": name, "alias": name }))
        .collect();
    let mut envelope = new_operation_envelope(Operation::DescribeServices, SCHEMA_VERSION);
    envelope["services"] = Value::Array(services);
    envelope
}

/// Request a batched status report for the given identifiers.
pub fn build_status_query_request(ids: &[Uuid]) -> Value {
    let services: Vec<Value> = ids
        .iter()
        .map(|id| Value::String(ident::to_canonical_string(id)))
        .collect();
    let mut envelope = new_operation_envelope(Operation::QueryStatus, SCHEMA_VERSION);
    envelope["server_operations"]["server_operation"] = json!(Operation::QueryStatus.code());
    envelope["services"] = Value::Array(services);
    envelope
}

/// Determine the operation kind of an incoming document.
///
/// Tries the string field `server_operations.operation` first, then the
/// integer field `server_operations.server_operation` (accepted only
/// strictly inside the sentinel bounds). Anything else is `None`.
pub fn extract_operation_kind(document: &Value) -> Option<Operation> {
    let ops = document.get("server_operations")?;
    if let Some(name) = ops.get("operation").and_then(Value::as_str) {
        return Operation::from_name(name);
    }
    let code = ops.get("server_operation").and_then(Value::as_i64)?;
    Operation::from_code(code)
}

/// Determine the reported status of an incoming document, with the same
/// dual string/integer strategy as [`extract_operation_kind`].
pub fn extract_status(document: &Value) -> Option<JobStatus> {
    let ops = document.get("server_operations")?;
    if let Some(name) = ops.get("status").and_then(Value::as_str) {
        return JobStatus::from_name(name);
    }
    let code = ops.get("server_operation").and_then(Value::as_i64)?;
    JobStatus::from_code(code)
}
