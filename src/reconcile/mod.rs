//! Create/read/update/delete sequencing that keeps a declared flow and its
//! remote copy aligned, plus the read-only lookups a declarative host needs.
//!
//! One driver instance is assumed per flow identifier; nothing here locks.

pub mod data_source;
pub mod resource;

pub use data_source::{FlowLookup, RenderedDocument, lookup_flow, render_document};
pub use resource::{COMPUTED_ATTRIBUTES, DOCUMENT_ATTRIBUTE, Declaration, FlowResource, Phase};
