//! Core translation engine for Skarn.
//!
//! This crate provides the foundational abstractions the translator library
//! builds on:
//! - Graph-based IR (`IrGraph`, `IrNode`, `Value`)
//! - Source-side operator records and typed attributes (`OperatorRecord`,
//!   `AttributeValue`)
//! - Construction context for emitting IR nodes (`BuildCtx`)
//! - Versioned translator registry and dispatch (`VersionRegistry`)
//!
//! A caller walks a source graph in topological order, wraps each source node
//! in an [`OperatorRecord`], and hands it to
//! [`VersionRegistry::translate`] together with a [`BuildCtx`] borrowing the
//! IR graph under construction. The resolved translator validates the record
//! and emits one or more IR nodes, returning the produced value handles.

pub mod ctx;
pub mod ir;
pub mod record;
pub mod registry;
pub mod types;

// Re-export commonly used types
pub use ctx::BuildCtx;
pub use ir::{
    IrGraph, IrNode, IrNodeId, OpKind, OutputVector, PoolSpec, RandomUniformSpec, Value, ValueInfo,
};
pub use record::{AttributeValue, Attributes, FromAttribute, OperatorRecord};
pub use registry::{Translator, VersionRegistry, DEFAULT_DOMAIN};
pub use types::{DataType, TensorData, TensorShape, TensorValue};

/// Result type using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Validation and dispatch failures raised while translating operator records.
///
/// All variants describe local, deterministic failures at a single record;
/// none are retryable. [`Error::Translation`] is the propagation wrapper the
/// dispatch driver attaches so callers see which record failed.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{op_type}: required input {index} is absent")]
    MissingInput { op_type: String, index: usize },

    #[error("missing required attribute '{name}'")]
    MissingAttribute { name: String },

    #[error("attribute '{name}': expected {expected}, got {actual}")]
    AttributeType {
        name: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("{context}: {actual} does not match {expected}")]
    ShapeMismatch {
        context: String,
        expected: String,
        actual: String,
    },

    #[error("no translator registered for '{domain}:{op_type}'")]
    UnsupportedOpcode { domain: String, op_type: String },

    #[error(
        "'{domain}:{op_type}' is not available before opset {lowest}, \
         but the graph declares opset {declared}"
    )]
    UnsupportedVersion {
        domain: String,
        op_type: String,
        declared: i64,
        lowest: i64,
    },

    #[error("translator for '{domain}:{op_type}' already registered at opset {version}")]
    DuplicateVersion {
        domain: String,
        op_type: String,
        version: i64,
    },

    #[error("unsupported data type: {0}")]
    UnsupportedDataType(String),

    #[error("invalid graph structure: {0}")]
    InvalidGraph(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("while translating '{domain}:{op_type}' (opset {version}): {source}")]
    Translation {
        domain: String,
        op_type: String,
        version: i64,
        #[source]
        source: Box<Error>,
    },
}
