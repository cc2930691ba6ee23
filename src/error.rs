use thiserror::Error;

/// Errors raised while mapping between the attribute tree and the document model.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TreeError {
    #[error("Required field '{path}' is missing from the declared configuration")]
    MissingRequiredField { path: String },

    #[error("Field '{path}' has the wrong type: expected {expected}, but found {found}")]
    TypeMismatch {
        path: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Timestamp field '{field}' is null and cannot be projected")]
    NilTimestamp { field: String },
}

/// Errors raised by the JSON document codec.
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Malformed flow document: {0}")]
    MalformedDocument(#[source] serde_json::Error),

    #[error("Failed to render flow document: {0}")]
    Render(#[source] serde_json::Error),
}

/// Structural checks a flow must pass before it is sent to the server.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("A flow needs a non-empty name")]
    EmptyName,

    #[error("A flow needs at least one identity verification")]
    NoVerifications,
}

/// A request that never produced an HTTP response.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct TransportError(pub String);

/// Errors raised by the synchronization client.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("API key not provided")]
    MissingCredential,

    #[error("API server not provided")]
    MissingServerAddress,

    #[error("Transport failure: {0}")]
    TransportFailure(#[from] TransportError),

    #[error("error {action} flow: {status}\n{body}")]
    RemoteRejected {
        action: &'static str,
        status: String,
        body: String,
    },

    #[error(transparent)]
    MalformedDocument(#[from] DocumentError),
}

/// Errors surfaced by the reconciliation driver. Lower-level failures pass through untouched.
#[derive(Error, Debug)]
pub enum ReconcileError {
    #[error(transparent)]
    Tree(#[from] TreeError),

    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("Cannot {operation} a flow resource that has no remote identifier")]
    Untracked { operation: &'static str },

    #[error("Flow resource is already tracking remote flow '{flow_id}'")]
    AlreadyTracked { flow_id: String },

    #[error("Server accepted the flow but returned no flow_id to track it by")]
    MissingRemoteId,
}
