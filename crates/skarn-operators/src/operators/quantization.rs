//! Quantization translators: DequantizeLinear and QuantizeLinear.
//!
//! Dequantization is expressed with primitive arithmetic nodes
//! (`(convert(x) - zero_point) * scale`); quantization emits a dedicated
//! node whose target type comes from the zero point. Scales and zero points
//! are handled as scalars; single-element tensors are coerced via
//! [`crate::helpers::interpret_as_scalar`].

use crate::helpers::{convert_to, elementwise_info, interpret_as_scalar};
use skarn_core::{
    BuildCtx, DataType, OpKind, OperatorRecord, OutputVector, Result, TensorData, TensorValue,
    ValueInfo,
};

/// Reusable pieces shared with composite translators.
pub mod detail {
    use super::*;
    use skarn_core::Value;

    /// Emit `(convert(x) - zero_point) * scale`.
    ///
    /// `x` is converted to the scale's floating type; a zero point of a
    /// different type is converted as well before the subtraction. With no
    /// zero point the conversion result is scaled directly.
    pub fn dequantize_linear(
        x: Value,
        scale: Value,
        zero_point: Option<Value>,
        ctx: &mut BuildCtx,
    ) -> Result<Value> {
        let float_type = ctx.element_type(scale)?;
        let converted = convert_to(ctx, x, float_type)?;

        let centered = match zero_point {
            Some(zero_point) => {
                let zero_point = convert_to(ctx, zero_point, float_type)?;
                let info = elementwise_info(ctx, converted, zero_point)?;
                ctx.emit_single(OpKind::Subtract, vec![converted, zero_point], info)?
            }
            None => converted,
        };

        let info = elementwise_info(ctx, centered, scale)?;
        ctx.emit_single(OpKind::Multiply, vec![centered, scale], info)
    }

    /// Emit a quantize node storing `data` in the zero point's integer type.
    pub fn quantize(
        data: Value,
        scale: Value,
        zero_point: Value,
        ctx: &mut BuildCtx,
    ) -> Result<Value> {
        let target = ctx.element_type(zero_point)?;
        let shape = ctx.value_info(data)?.shape;
        ctx.emit_single(
            OpKind::Quantize,
            vec![data, scale, zero_point],
            ValueInfo::new(target, shape),
        )
    }
}

/// Dequantize input 0 using a scale and an optional zero point.
pub fn dequantize_linear(record: &OperatorRecord, ctx: &mut BuildCtx) -> Result<OutputVector> {
    let x = record.input(0)?;
    let scale = interpret_as_scalar(ctx, record.input(1)?)?;
    let zero_point = match record.try_input(2) {
        Some(zero_point) => Some(interpret_as_scalar(ctx, zero_point)?),
        None => None,
    };

    Ok(vec![detail::dequantize_linear(x, scale, zero_point, ctx)?])
}

/// Quantize input 0 using a scale and an optional zero point.
///
/// A missing zero point defaults to an unsigned 8-bit zero.
pub fn quantize_linear(record: &OperatorRecord, ctx: &mut BuildCtx) -> Result<OutputVector> {
    let x = record.input(0)?;
    let scale = interpret_as_scalar(ctx, record.input(1)?)?;
    let zero_point = match record.try_input(2) {
        Some(zero_point) => interpret_as_scalar(ctx, zero_point)?,
        None => ctx.constant(TensorValue::scalar(
            TensorData::U8(vec![0]),
            DataType::U8,
        ))?,
    };

    Ok(vec![detail::quantize(x, scale, zero_point, ctx)?])
}
