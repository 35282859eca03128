//! Versioned operator translators for the Skarn frontend.
//!
//! Each translator maps one source operator record onto a small IR subgraph.
//! Translators are grouped per opcode under [`operators`]; the pre-populated
//! [`standard_registry`] wires them to the (domain, opcode, version) table
//! used for dispatch.
//!
//! # Opcodes
//!
//! - **Unary elementwise**: Asin, Cosh, Tan, IsNaN
//! - **Matrix products**: MatMul, QLinearMatMul (dequantize → product →
//!   quantize fusion)
//! - **Quantization**: DequantizeLinear, QuantizeLinear
//! - **Image preprocessing**: ImageScaler
//! - **Pooling**: MaxPool (opsets 1 and 8)
//! - **Generation**: RandomUniform
//! - **Shape manipulation**: Reshape (opsets 1 and 5), Slice (opsets 1
//!   and 10)

pub mod helpers;
pub mod operators;
pub mod pooling;

mod registry;

pub use pooling::PoolingFactory;
pub use registry::standard_registry;
