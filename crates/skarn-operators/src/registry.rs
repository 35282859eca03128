//! Pre-populated translator registry.

use crate::operators as op;
use skarn_core::{Result, VersionRegistry, DEFAULT_DOMAIN};

/// Build a registry covering the standard opcode set.
///
/// Opcodes whose semantics changed across opsets carry one entry per
/// variant; resolution picks the newest entry not exceeding the version a
/// record declares. Additional translators can be added to the returned
/// registry via [`VersionRegistry::register`].
pub fn standard_registry() -> Result<VersionRegistry> {
    let mut registry = VersionRegistry::new();
    let domain = DEFAULT_DOMAIN;

    // Unary elementwise operators
    registry.register(domain, "Asin", 1, op::asin)?;
    registry.register(domain, "Cosh", 1, op::cosh)?;
    registry.register(domain, "Tan", 1, op::tan)?;
    registry.register(domain, "IsNaN", 1, op::is_nan)?;

    // Matrix products
    registry.register(domain, "MatMul", 1, op::matmul)?;
    registry.register(domain, "QLinearMatMul", 1, op::qlinear_matmul)?;

    // Quantization
    registry.register(domain, "DequantizeLinear", 1, op::dequantize_linear)?;
    registry.register(domain, "QuantizeLinear", 1, op::quantize_linear)?;

    // Image preprocessing
    registry.register(domain, "ImageScaler", 1, op::image_scaler)?;

    // Generation
    registry.register(domain, "RandomUniform", 1, op::random_uniform)?;

    // Pooling
    registry.register(domain, "MaxPool", 1, op::max_pool_v1)?;
    registry.register(domain, "MaxPool", 8, op::max_pool_v8)?;

    // Shape manipulation
    registry.register(domain, "Reshape", 1, op::reshape_v1)?;
    registry.register(domain, "Reshape", 5, op::reshape_v5)?;
    registry.register(domain, "Slice", 1, op::slice_v1)?;
    registry.register(domain, "Slice", 10, op::slice_v10)?;

    Ok(registry)
}
