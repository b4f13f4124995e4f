use serde_json::Value;

use crate::error::{GridlinkError, Result};

/// Transport seam. Implementations send one envelope and return the raw
/// response text; a send that produces no data is a
/// [`Transport`](GridlinkError::Transport) failure.
pub trait Connection: Send + Sync {
    fn send(&self, envelope: &Value) -> Result<String>;
}

/// Send `envelope` over `connection` and decode the response document.
///
/// A transport failure (send returned no data) and a decode failure
/// (data returned but not well-formed JSON) are distinct errors.
pub fn dispatch(envelope: &Value, connection: &dyn Connection) -> Result<Value> {
    let text = connection.send(envelope)?;
    serde_json::from_str(&text).map_err(|e| {
        tracing::debug!(error = %e, "Response text is not a well-formed document");
        GridlinkError::Decode(format!("response is not a well-formed document: {}", e))
    })
}
