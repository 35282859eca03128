//! Slice translators.
//!
//! Opset 1 reads `starts`/`ends`/`axes` from attributes and materializes
//! them as constants; opset 10 moved them (plus `steps`) to inputs 1..=4.

use skarn_core::{
    BuildCtx, Error, OpKind, OperatorRecord, OutputVector, Result, TensorShape, Value, ValueInfo,
};

/// Slice with extents in attributes.
pub fn slice_v1(record: &OperatorRecord, ctx: &mut BuildCtx) -> Result<OutputVector> {
    let data = record.input(0)?;
    let starts: Vec<i64> = record.attr("starts")?;
    let ends: Vec<i64> = record.attr("ends")?;
    if starts.len() != ends.len() {
        return Err(Error::ShapeMismatch {
            context: "Slice starts/ends length".to_string(),
            expected: starts.len().to_string(),
            actual: ends.len().to_string(),
        });
    }

    let axes = if record.has_attr("axes") {
        let axes: Vec<i64> = record.attr("axes")?;
        if axes.len() != starts.len() {
            return Err(Error::ShapeMismatch {
                context: "Slice axes length".to_string(),
                expected: starts.len().to_string(),
                actual: axes.len().to_string(),
            });
        }
        Some(axes)
    } else {
        None
    };

    let starts = ctx.const_i64s(starts)?;
    let ends = ctx.const_i64s(ends)?;
    let axes = match axes {
        Some(axes) => Some(ctx.const_i64s(axes)?),
        None => None,
    };

    emit_slice(data, starts, ends, axes, None, ctx)
}

/// Slice with extents in inputs 1..=4.
pub fn slice_v10(record: &OperatorRecord, ctx: &mut BuildCtx) -> Result<OutputVector> {
    let data = record.input(0)?;
    let starts = record.input(1)?;
    let ends = record.input(2)?;
    let axes = record.try_input(3);
    let steps = record.try_input(4);

    // Inputs are positional: steps without axes needs a materialized default
    // axes list, which requires a known extent count.
    let axes = match (axes, steps) {
        (None, Some(_)) => {
            let count = ctx
                .constant_value(starts)
                .and_then(|t| t.data.as_i64())
                .map(<[i64]>::len);
            match count {
                Some(count) => Some(ctx.const_i64s((0..count as i64).collect())?),
                None => {
                    return Err(Error::Validation(
                        "Slice with steps but no axes requires constant starts".to_string(),
                    ));
                }
            }
        }
        (axes, _) => axes,
    };

    emit_slice(data, starts, ends, axes, steps, ctx)
}

fn emit_slice(
    data: Value,
    starts: Value,
    ends: Value,
    axes: Option<Value>,
    steps: Option<Value>,
    ctx: &mut BuildCtx,
) -> Result<OutputVector> {
    let info = output_info(ctx, data, starts, ends, axes, steps)?;

    let mut inputs = vec![data, starts, ends];
    if let Some(axes) = axes {
        inputs.push(axes);
        if let Some(steps) = steps {
            inputs.push(steps);
        }
    }

    let out = ctx.emit_single(OpKind::Slice, inputs, info)?;
    Ok(vec![out])
}

/// Resolve the output shape when the data shape and extents are known.
fn output_info(
    ctx: &BuildCtx,
    data: Value,
    starts: Value,
    ends: Value,
    axes: Option<Value>,
    steps: Option<Value>,
) -> Result<ValueInfo> {
    let dtype = ctx.element_type(data)?;

    let const_i64s = |value: Value| -> Option<Vec<i64>> {
        ctx.constant_value(value)
            .and_then(|t| t.data.as_i64())
            .map(<[i64]>::to_vec)
    };

    let data_info = ctx.value_info(data)?;
    let (Some(data_dims), Some(starts), Some(ends)) = (
        data_info.shape.as_static(),
        const_i64s(starts),
        const_i64s(ends),
    ) else {
        return Ok(ValueInfo::unknown(dtype));
    };

    let axes = match axes {
        Some(axes) => match const_i64s(axes) {
            Some(axes) => Some(axes),
            None => return Ok(ValueInfo::unknown(dtype)),
        },
        None => None,
    };
    let steps = match steps {
        Some(steps) => match const_i64s(steps) {
            Some(steps) => Some(steps),
            None => return Ok(ValueInfo::unknown(dtype)),
        },
        None => None,
    };

    match static_output(data_dims, &starts, &ends, axes.as_deref(), steps.as_deref()) {
        Some(dims) => Ok(ValueInfo::new(dtype, TensorShape::Static(dims))),
        None => Ok(ValueInfo::unknown(dtype)),
    }
}

/// Clamp-and-stride arithmetic for one slice; `None` when an entry falls
/// outside what this resolver handles (negative steps, bad axes).
fn static_output(
    data_dims: &[usize],
    starts: &[i64],
    ends: &[i64],
    axes: Option<&[i64]>,
    steps: Option<&[i64]>,
) -> Option<Vec<usize>> {
    let rank = data_dims.len() as i64;
    let mut out = data_dims.to_vec();

    for i in 0..starts.len() {
        let axis = match axes {
            Some(axes) => *axes.get(i)?,
            None => i as i64,
        };
        let axis = if axis < 0 { axis + rank } else { axis };
        if axis < 0 || axis >= rank {
            return None;
        }
        let dim = data_dims[axis as usize] as i64;

        let step = steps.map_or(1, |s| s.get(i).copied().unwrap_or(1));
        if step <= 0 {
            return None;
        }

        let mut start = starts[i];
        if start < 0 {
            start += dim;
        }
        let start = start.clamp(0, dim);

        let mut end = *ends.get(i)?;
        if end < 0 {
            end += dim;
        }
        let end = end.clamp(0, dim);

        let extent = if end > start {
            (end - start + step - 1) / step
        } else {
            0
        };
        out[axis as usize] = extent as usize;
    }

    Some(out)
}
