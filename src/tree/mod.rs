//! Bidirectional mapping between the flow document model and the generic
//! attribute tree used by the declarative layer.
//!
//! Decoding walks the tree with typed accessors, so a missing required field
//! or a leaf of the wrong kind fails with the dotted path of the offending
//! node (`verification.0.steps.1.type`). Encoding produces the same layout,
//! with the verification list written under `identity_verifications`.

pub mod decode;
pub mod encode;
pub mod path;
pub mod value;

pub use decode::{DECLARED_VERIFICATIONS_KEY, PROJECTED_VERIFICATIONS_KEY, decode_flow};
pub use encode::{
    TIMESTAMP_FORMAT, encode_config, encode_flow, encode_flow_fields, encode_verification,
    format_timestamp,
};
pub use path::FieldPath;
pub use value::{TreeMap, TreeValue};

use crate::error::TreeError;
use crate::model::Flow;

/// A declaration format that can be turned into a `Flow`.
///
/// Implemented for attribute trees. Hosts with their own declaration structs
/// implement it to hand flows to the driver without going through a tree.
pub trait IntoFlow {
    fn into_flow(self) -> Result<Flow, TreeError>;
}

impl IntoFlow for &TreeValue {
    fn into_flow(self) -> Result<Flow, TreeError> {
        decode_flow(self)
    }
}

impl IntoFlow for Flow {
    fn into_flow(self) -> Result<Flow, TreeError> {
        Ok(self)
    }
}
