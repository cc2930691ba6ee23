use crate::client::{FlowClient, Transport};
use crate::document;
use crate::error::ReconcileError;
use crate::tree::{TreeValue, decode_flow, encode_flow};

/// A flow document rendered from typed attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    /// The flow name, which is all a document has for identity before it is created.
    pub id: String,
    pub json: String,
}

/// An existing flow projected into attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowLookup {
    /// The `flow_id` reported by the server.
    pub id: String,
    pub attributes: TreeValue,
}

/// Decodes a typed attribute declaration and renders it as a document string.
pub fn render_document(attributes: &TreeValue) -> Result<RenderedDocument, ReconcileError> {
    let flow = decode_flow(attributes)?;
    let json = document::to_document(&flow)?;
    Ok(RenderedDocument {
        id: flow.name,
        json,
    })
}

/// Fetches a flow by id and projects every attribute of it.
pub fn lookup_flow<T: Transport>(
    client: &FlowClient<T>,
    flow_id: &str,
) -> Result<FlowLookup, ReconcileError> {
    let flow = client.get(flow_id)?;
    let attributes = encode_flow(&flow)?;
    Ok(FlowLookup {
        id: flow.flow_id,
        attributes,
    })
}
