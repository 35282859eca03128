//! RandomUniform translator.

use skarn_core::{
    BuildCtx, DataType, Error, OpKind, OperatorRecord, OutputVector, RandomUniformSpec, Result,
    TensorShape, ValueInfo,
};

/// Uniform random tensor generation.
///
/// The `shape` attribute is required; `dtype` defaults to the context's
/// floating type, `high` to 1.0, `low` to 0.0, and `seed` to 0.0. The
/// bounds are materialized as scalar constants feeding the generator node.
pub fn random_uniform(record: &OperatorRecord, ctx: &mut BuildCtx) -> Result<OutputVector> {
    if !record.has_attr("shape") {
        return Err(Error::MissingAttribute {
            name: "shape".to_string(),
        });
    }

    let dtype = if record.has_attr("dtype") {
        DataType::from_onnx_code(record.attr("dtype")?)?
    } else {
        ctx.default_float()
    };

    let high = ctx.attr_as_scalar(record, "high", 1.0, DataType::F32)?;
    let low = ctx.attr_as_scalar(record, "low", 0.0, DataType::F32)?;
    let seed: f32 = record.attr_or("seed", 0.0f32)?;
    let dims: Vec<i64> = record.attr("shape")?;

    if dims.iter().any(|&d| d < 0) {
        return Err(Error::Validation(format!(
            "RandomUniform shape must be non-negative, got {dims:?}"
        )));
    }
    let out_shape = TensorShape::Static(dims.iter().map(|&d| d as usize).collect());
    let shape_const = ctx.const_i64s(dims)?;

    // The float seed is scaled by 1000 and truncated toward zero; fractional
    // precision beyond that is dropped.
    let spec = RandomUniformSpec {
        dtype,
        global_seed: 0,
        op_seed: (seed * 1000.0) as u64,
    };

    let out = ctx.emit_single(
        OpKind::RandomUniform(spec),
        vec![shape_const, low, high],
        ValueInfo::new(dtype, out_shape),
    )?;
    Ok(vec![out])
}
