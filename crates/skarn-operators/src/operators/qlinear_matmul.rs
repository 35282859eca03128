//! QLinearMatMul translator.
//!
//! Composes three stages into one fused subgraph: dequantize both quantized
//! operands, take their floating matrix product, and re-quantize the result
//! with the output scale and zero point. Only the final quantized value is
//! exposed; the dequantized operands and the raw product stay internal to
//! the emitted subgraph.

use crate::helpers::interpret_as_scalar;
use crate::operators::{matmul, quantization};
use skarn_core::{BuildCtx, OperatorRecord, OutputVector, Result};

/// Quantized matrix product over eight inputs:
/// `(a, a_scale, a_zero_point, b, b_scale, b_zero_point, y_scale,
/// y_zero_point)`.
pub fn qlinear_matmul(record: &OperatorRecord, ctx: &mut BuildCtx) -> Result<OutputVector> {
    let a = record.input(0)?;
    let a_scale = interpret_as_scalar(ctx, record.input(1)?)?;
    let a_zero_point = interpret_as_scalar(ctx, record.input(2)?)?;
    let b = record.input(3)?;
    let b_scale = interpret_as_scalar(ctx, record.input(4)?)?;
    let b_zero_point = interpret_as_scalar(ctx, record.input(5)?)?;
    let y_scale = record.input(6)?;
    let y_zero_point = record.input(7)?;

    let dequantized_a =
        quantization::detail::dequantize_linear(a, a_scale, Some(a_zero_point), ctx)?;
    let dequantized_b =
        quantization::detail::dequantize_linear(b, b_scale, Some(b_zero_point), ctx)?;

    let product = matmul::detail::matmul(dequantized_a, dequantized_b, ctx)?;

    let quantized = quantization::detail::quantize(product, y_scale, y_zero_point, ctx)?;
    Ok(vec![quantized])
}
