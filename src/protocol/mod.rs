//! Operation-envelope protocol.
//!
//! Builds and parses the JSON documents exchanged with remote
//! collaborators: operation requests, service listings, and batched
//! status queries addressed by canonical identifier. Transport is an
//! injected [`Connection`]; this layer owns only the document contract.

pub mod connection;
pub mod directory;
pub mod envelope;
pub mod operation;

pub use connection::{dispatch, Connection};
pub use directory::{ServiceStatusRecord, StatusDirectory};
pub use envelope::{
    build_named_services_request, build_service_list_request, build_status_query_request,
    extract_operation_kind, extract_status, merge_client_config, new_operation_envelope,
    CONTEXT_ENTRIES, SCHEMA_VERSION,
};
pub use operation::Operation;
