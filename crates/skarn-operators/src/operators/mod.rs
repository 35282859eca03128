//! Per-opcode translator implementations.
//!
//! Every public function here follows the `Translator` signature and is
//! registered in [`crate::standard_registry`]. Opcodes with version-specific
//! behavior carry the introducing opset in their name (e.g.,
//! [`max_pool::max_pool_v8`]).

pub mod image_scaler;
pub mod matmul;
pub mod max_pool;
pub mod quantization;
pub mod qlinear_matmul;
pub mod random_uniform;
pub mod reshape;
pub mod slice;
pub mod unary;

pub use image_scaler::image_scaler;
pub use matmul::matmul;
pub use max_pool::{max_pool_v1, max_pool_v8};
pub use quantization::{dequantize_linear, quantize_linear};
pub use qlinear_matmul::qlinear_matmul;
pub use random_uniform::random_uniform;
pub use reshape::{reshape_v1, reshape_v5};
pub use slice::{slice_v1, slice_v10};
pub use unary::{asin, cosh, is_nan, tan};
