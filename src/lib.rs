//! # truora-flow - Identity Verification Flows as Declarative Resources
//!
//! **truora-flow** manages identity verification flow definitions against the
//! Truora HTTP API. A flow is a nested document (verifications, steps,
//! expected inputs, response options and flow-wide configuration); this crate
//! gives it a typed model and keeps a declared copy in sync with the server.
//!
//! ## Core Workflow
//!
//! 1.  **Declare**: Describe the flow either as a JSON document string or as a
//!     generic attribute tree (`TreeValue`) coming from a declarative host.
//! 2.  **Map**: The tree mapper turns attributes into a `Flow` and back,
//!     failing with a path-qualified error on missing or mistyped fields.
//! 3.  **Synchronize**: `FlowClient` performs create/read/update/delete round
//!     trips against `/v1/flows`, classifying non-success statuses.
//! 4.  **Reconcile**: `FlowResource` sequences those calls: create then read
//!     back, update then read back, delete and forget.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use truora_flow::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let config = ClientConfig::from_env();
//!     let client = FlowClient::from_config(config)?;
//!
//!     let declaration = Declaration::from_document(
//!         r#"{
//!             "name": "KYC basic",
//!             "type": "permanent",
//!             "identity_verifications": [{
//!                 "name": "id-check",
//!                 "steps": [{
//!                     "type": "document",
//!                     "expected_inputs": [{ "type": "file", "name": "id_front" }]
//!                 }]
//!             }]
//!         }"#,
//!     );
//!
//!     let mut resource = FlowResource::new();
//!     resource.create(&client, &declaration)?;
//!     println!("Created flow {:?}", resource.id());
//!
//!     resource.delete(&client)?;
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod document;
pub mod error;
pub mod model;
pub mod prelude;
pub mod reconcile;
pub mod tree;
