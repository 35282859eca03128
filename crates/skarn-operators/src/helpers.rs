//! Shared helpers for translator implementation.

use skarn_core::{
    BuildCtx, DataType, Error, OpKind, Result, TensorShape, Value, ValueInfo,
};

/// Broadcast multiple shapes to a common output shape.
///
/// Implements NumPy-style broadcasting rules:
/// - Shapes are aligned from the rightmost dimension
/// - Dimensions match if they are equal or one of them is 1
/// - Missing dimensions in shorter shapes are treated as 1
pub fn broadcast_shapes(shapes: &[&[usize]]) -> Result<Vec<usize>> {
    if shapes.is_empty() {
        return Ok(vec![]);
    }

    let max_rank = shapes.iter().map(|s| s.len()).max().unwrap_or(0);
    let mut result = vec![1; max_rank];

    for shape in shapes {
        let rank = shape.len();
        for i in 0..max_rank {
            let shape_dim = if i < rank { shape[rank - 1 - i] } else { 1 };
            let result_idx = max_rank - 1 - i;
            let dim = result[result_idx];

            if dim == 1 {
                result[result_idx] = shape_dim;
            } else if shape_dim != 1 && shape_dim != dim {
                return Err(Error::ShapeMismatch {
                    context: format!("broadcast at dimension {result_idx}"),
                    expected: format!("{dim} or 1"),
                    actual: shape_dim.to_string(),
                });
            }
        }
    }

    Ok(result)
}

/// Output type and shape of a broadcasting binary operation.
///
/// The element type follows the left operand; the shape is the broadcast of
/// both operand shapes when both are known, and `Unknown` otherwise.
pub fn elementwise_info(ctx: &BuildCtx, a: Value, b: Value) -> Result<ValueInfo> {
    let a_info = ctx.value_info(a)?;
    let b_info = ctx.value_info(b)?;

    let shape = match (a_info.shape.as_static(), b_info.shape.as_static()) {
        (Some(a_dims), Some(b_dims)) => {
            TensorShape::Static(broadcast_shapes(&[a_dims, b_dims])?)
        }
        _ => TensorShape::Unknown,
    };

    Ok(ValueInfo::new(a_info.dtype, shape))
}

/// Coerce a single-element value to a scalar.
///
/// Constants are reshaped in place; other values get a reshape node. A value
/// of unknown shape passes through untouched, and a static shape with more
/// than one element is rejected.
pub fn interpret_as_scalar(ctx: &mut BuildCtx, value: Value) -> Result<Value> {
    let info = ctx.value_info(value)?;
    let dims = match info.shape.as_static() {
        Some(dims) => dims.to_vec(),
        None => return Ok(value),
    };

    if dims.is_empty() {
        return Ok(value);
    }

    let elements: usize = dims.iter().product();
    if elements != 1 {
        return Err(Error::ShapeMismatch {
            context: "scalar coercion".to_string(),
            expected: "a single element".to_string(),
            actual: format!("{elements} elements (shape {dims:?})"),
        });
    }

    if let Some(tensor) = ctx.constant_value(value) {
        let scalar = tensor.reshape(vec![]);
        return ctx.constant(scalar);
    }

    let target = ctx.const_i64s(vec![])?;
    ctx.emit_single(
        OpKind::Reshape,
        vec![value, target],
        ValueInfo::new(info.dtype, TensorShape::Static(vec![])),
    )
}

/// Emit a Convert node unless the value already has the requested type.
pub fn convert_to(ctx: &mut BuildCtx, value: Value, dtype: DataType) -> Result<Value> {
    let info = ctx.value_info(value)?;
    if info.dtype == dtype {
        return Ok(value);
    }
    ctx.emit_single(
        OpKind::Convert(dtype),
        vec![value],
        ValueInfo::new(dtype, info.shape),
    )
}
