//! Reshape translators.
//!
//! Opset 1 reads the target shape from the `shape` attribute; opset 5 moved
//! it to a second input. Both emit the same node; the attribute variant
//! materializes its target as a constant first.

use skarn_core::{
    BuildCtx, Error, OpKind, OperatorRecord, OutputVector, Result, TensorShape, Value, ValueInfo,
};

/// Reshape with the target shape in the `shape` attribute.
pub fn reshape_v1(record: &OperatorRecord, ctx: &mut BuildCtx) -> Result<OutputVector> {
    let data = record.input(0)?;
    let dims: Vec<i64> = record.attr("shape")?;
    let shape = ctx.const_i64s(dims)?;
    emit_reshape(data, shape, ctx)
}

/// Reshape with the target shape in input 1.
pub fn reshape_v5(record: &OperatorRecord, ctx: &mut BuildCtx) -> Result<OutputVector> {
    let data = record.input(0)?;
    let shape = record.input(1)?;
    emit_reshape(data, shape, ctx)
}

fn emit_reshape(data: Value, shape: Value, ctx: &mut BuildCtx) -> Result<OutputVector> {
    let info = output_info(ctx, data, shape)?;
    let out = ctx.emit_single(OpKind::Reshape, vec![data, shape], info)?;
    Ok(vec![out])
}

/// Resolve the output shape when the target is a known constant.
///
/// Follows the usual reshape conventions: `0` copies the corresponding input
/// dimension and a single `-1` is inferred from the remaining element count.
/// Anything that needs input extents the graph doesn't have stays `Unknown`.
fn output_info(ctx: &BuildCtx, data: Value, shape: Value) -> Result<ValueInfo> {
    let dtype = ctx.element_type(data)?;
    let target = match ctx.constant_value(shape).and_then(|t| t.data.as_i64()) {
        Some(target) => target.to_vec(),
        None => return Ok(ValueInfo::unknown(dtype)),
    };
    let data_dims = ctx
        .value_info(data)?
        .shape
        .as_static()
        .map(<[usize]>::to_vec);

    if target.iter().filter(|&&d| d == -1).count() > 1 {
        return Err(Error::Validation(
            "Reshape target may contain at most one -1".to_string(),
        ));
    }

    let mut dims = Vec::with_capacity(target.len());
    let mut inferred = None;
    for (i, &d) in target.iter().enumerate() {
        match d {
            -1 => {
                inferred = Some(i);
                dims.push(1);
            }
            0 => match &data_dims {
                Some(src) if i < src.len() => dims.push(src[i]),
                _ => return Ok(ValueInfo::unknown(dtype)),
            },
            d if d > 0 => dims.push(d as usize),
            d => {
                return Err(Error::Validation(format!(
                    "Reshape target dimension {d} is invalid"
                )));
            }
        }
    }

    match (inferred, &data_dims) {
        (Some(index), Some(src)) => {
            let total: usize = src.iter().product();
            let known: usize = dims.iter().product();
            if known == 0 || total % known != 0 {
                return Err(Error::ShapeMismatch {
                    context: "Reshape element count".to_string(),
                    expected: total.to_string(),
                    actual: format!("a multiple of {known}"),
                });
            }
            dims[index] = total / known;
        }
        (Some(_), None) => return Ok(ValueInfo::unknown(dtype)),
        (None, Some(src)) => {
            let total: usize = src.iter().product();
            let target_total: usize = dims.iter().product();
            if total != target_total {
                return Err(Error::ShapeMismatch {
                    context: "Reshape element count".to_string(),
                    expected: total.to_string(),
                    actual: target_total.to_string(),
                });
            }
        }
        (None, None) => {}
    }

    Ok(ValueInfo::new(dtype, TensorShape::Static(dims)))
}
