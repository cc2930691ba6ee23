use super::data_source::render_document;
use crate::client::{FlowClient, Transport};
use crate::document;
use crate::error::{DocumentError, ReconcileError};
use crate::model::Flow;
use crate::tree::{TreeMap, TreeValue, encode_flow_fields};

/// Attributes overwritten from server state on every read.
pub const COMPUTED_ATTRIBUTES: [&str; 9] = [
    "flow_id",
    "name",
    "creation_date",
    "update_date",
    "version",
    "status",
    "type",
    "config",
    "identity_verifications",
];

/// State attribute holding the declared document. Reads never touch it.
pub const DOCUMENT_ATTRIBUTE: &str = "document";

/// Where a flow resource stands in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Absent,
    Creating,
    Present,
    Updating,
    Deleting,
}

/// The user's desired state for one flow: a serialized flow document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    document: String,
}

impl Declaration {
    pub fn from_document(document: impl Into<String>) -> Self {
        Self {
            document: document.into(),
        }
    }

    /// Renders a typed attribute declaration into its document form.
    pub fn from_attributes(attributes: &TreeValue) -> Result<Self, ReconcileError> {
        render_document(attributes).map(|rendered| Self::from_document(rendered.json))
    }

    pub fn from_flow(flow: &Flow) -> Result<Self, DocumentError> {
        document::to_document(flow).map(Self::from_document)
    }

    pub fn document(&self) -> &str {
        &self.document
    }

    /// Parses the document into a fresh `Flow`.
    pub fn to_flow(&self) -> Result<Flow, DocumentError> {
        document::from_document(&self.document)
    }
}

/// Keeps one declared flow and its remote counterpart aligned.
///
/// A failed operation leaves the phase where it was before the call. No
/// retries, no rollback: a remote change that succeeded before a later step
/// failed stays in place and shows up on the next read.
#[derive(Debug, Clone)]
pub struct FlowResource {
    id: Option<String>,
    phase: Phase,
    state: TreeMap,
}

impl Default for FlowResource {
    fn default() -> Self {
        Self::new()
    }
}

impl FlowResource {
    pub fn new() -> Self {
        Self {
            id: None,
            phase: Phase::Absent,
            state: TreeMap::new(),
        }
    }

    /// Adopts an existing remote flow and refreshes its state.
    pub fn import<T: Transport>(
        client: &FlowClient<T>,
        flow_id: &str,
    ) -> Result<Self, ReconcileError> {
        let mut resource = Self {
            id: Some(flow_id.to_string()),
            phase: Phase::Present,
            state: TreeMap::new(),
        };
        resource.read(client)?;
        Ok(resource)
    }

    /// The durable identifier, once the server has assigned one.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn state(&self) -> &TreeMap {
        &self.state
    }

    pub fn attribute(&self, key: &str) -> Option<&TreeValue> {
        self.state.get(key)
    }

    /// Creates the remote flow, adopts its identifier, then reads it back.
    ///
    /// The read-back is a second round trip on purpose: the create response
    /// can lack fields the server fills in after some processing.
    pub fn create<T: Transport>(
        &mut self,
        client: &FlowClient<T>,
        declaration: &Declaration,
    ) -> Result<(), ReconcileError> {
        if let Some(flow_id) = &self.id {
            return Err(ReconcileError::AlreadyTracked {
                flow_id: flow_id.clone(),
            });
        }

        let flow = declaration.to_flow()?;
        flow.validate_for_create()?;

        self.phase = Phase::Creating;
        let created = match client.create(&flow) {
            Ok(created) => created,
            Err(e) => {
                self.phase = Phase::Absent;
                return Err(e.into());
            }
        };

        if created.flow_id.is_empty() {
            self.phase = Phase::Absent;
            return Err(ReconcileError::MissingRemoteId);
        }

        tracing::info!(flow_id = %created.flow_id, name = %flow.name, "Flow created");
        self.id = Some(created.flow_id);
        self.phase = Phase::Present;
        self.state.insert(
            DOCUMENT_ATTRIBUTE.to_string(),
            declaration.document().into(),
        );

        self.read(client)
    }

    /// Refreshes the computed attributes from the server's copy of the flow.
    pub fn read<T: Transport>(&mut self, client: &FlowClient<T>) -> Result<(), ReconcileError> {
        let flow_id = self.require_id("read")?;
        let flow = client.get(&flow_id)?;
        let mut projected = encode_flow_fields(&flow)?;

        for key in COMPUTED_ATTRIBUTES {
            match projected.remove(key) {
                Some(value) => {
                    self.state.insert(key.to_string(), value);
                }
                None => {
                    self.state.remove(key);
                }
            }
        }

        Ok(())
    }

    /// Pushes the current declaration to the server, then reads back.
    ///
    /// The update response is discarded; the read that follows is the
    /// authoritative view.
    pub fn update<T: Transport>(
        &mut self,
        client: &FlowClient<T>,
        declaration: &Declaration,
    ) -> Result<(), ReconcileError> {
        let flow_id = self.require_id("update")?;
        let flow = declaration.to_flow()?;
        flow.validate_for_create()?;

        self.phase = Phase::Updating;
        let outcome = client.update(&flow_id, &flow);
        self.phase = Phase::Present;
        outcome?;

        self.state.insert(
            DOCUMENT_ATTRIBUTE.to_string(),
            declaration.document().into(),
        );

        self.read(client)
    }

    /// Deletes the remote flow. On success nothing is left to track.
    pub fn delete<T: Transport>(&mut self, client: &FlowClient<T>) -> Result<(), ReconcileError> {
        let flow_id = self.require_id("delete")?;

        self.phase = Phase::Deleting;
        if let Err(e) = client.delete(&flow_id) {
            self.phase = Phase::Present;
            return Err(e.into());
        }

        tracing::info!(%flow_id, "Flow deleted");
        self.id = None;
        self.phase = Phase::Absent;
        self.state.clear();
        Ok(())
    }

    fn require_id(&self, operation: &'static str) -> Result<String, ReconcileError> {
        self.id
            .clone()
            .ok_or(ReconcileError::Untracked { operation })
    }
}
