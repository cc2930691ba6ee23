//! JSON document codec for flows.
//!
//! The same rendering is used for HTTP request and response bodies and for
//! the "document string" a declaration may carry pre-rendered.

use crate::error::DocumentError;
use crate::model::Flow;

/// Parses a flow document.
pub fn from_document(document: &str) -> Result<Flow, DocumentError> {
    serde_json::from_str(document).map_err(DocumentError::MalformedDocument)
}

/// Parses a flow document from raw bytes, as received from the transport.
pub fn from_slice(bytes: &[u8]) -> Result<Flow, DocumentError> {
    serde_json::from_slice(bytes).map_err(DocumentError::MalformedDocument)
}

/// Renders a flow as a compact JSON document.
pub fn to_document(flow: &Flow) -> Result<String, DocumentError> {
    serde_json::to_string(flow).map_err(DocumentError::Render)
}

/// Renders a flow as an indented JSON document, for display.
pub fn to_document_pretty(flow: &Flow) -> Result<String, DocumentError> {
    serde_json::to_string_pretty(flow).map_err(DocumentError::Render)
}

/// Renders only the user-declared part of a flow. This is what goes on the wire.
pub fn to_request_body(flow: &Flow) -> Result<String, DocumentError> {
    to_document(&flow.declared_fields())
}
