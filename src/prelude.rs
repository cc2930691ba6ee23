//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and traits from the
//! truora-flow crate.
//!
//! # Example
//!
//! ```rust,no_run
//! use truora_flow::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let client = FlowClient::from_config(ClientConfig::from_env())?;
//! let flow = client.get("IPFxxxxxxxx")?;
//!
//! println!("{}", truora_flow::document::to_document_pretty(&flow)?);
//! # Ok(())
//! # }
//! ```

// Document model
pub use crate::model::{
    CustomMessage, ExpectedInput, Flow, FlowConfig, Messages, ResponseOption, Step, Verification,
};

// Attribute tree mapping
pub use crate::tree::{FieldPath, IntoFlow, TreeMap, TreeValue, decode_flow, encode_flow};

// Synchronization
pub use crate::client::{ClientConfig, FlowClient, HttpRequest, HttpResponse, Transport};
pub use crate::reconcile::{Declaration, FlowResource, Phase};

// Error types
pub use crate::error::{
    ClientError, DocumentError, ReconcileError, TransportError, TreeError, ValidationError,
};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
