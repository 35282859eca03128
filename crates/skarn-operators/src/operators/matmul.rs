//! Matrix product translator.

use skarn_core::{BuildCtx, OperatorRecord, OutputVector, Result};

/// Reusable pieces shared with composite translators.
pub mod detail {
    use skarn_core::{
        BuildCtx, Error, OpKind, Result, TensorShape, Value, ValueInfo,
    };

    /// Emit a matrix product of two already-resolved values.
    pub fn matmul(a: Value, b: Value, ctx: &mut BuildCtx) -> Result<Value> {
        let info = output_info(ctx, a, b)?;
        ctx.emit_single(OpKind::MatMul, vec![a, b], info)
    }

    /// Output type and shape of `a × b`.
    ///
    /// Batch dimensions follow the left operand; the inner extents must
    /// agree when both shapes are static.
    fn output_info(ctx: &BuildCtx, a: Value, b: Value) -> Result<ValueInfo> {
        let a_info = ctx.value_info(a)?;
        let b_info = ctx.value_info(b)?;

        match (a_info.shape.as_static(), b_info.shape.as_static()) {
            (Some(a_dims), Some(b_dims)) if a_dims.len() >= 2 && b_dims.len() >= 2 => {
                let k_a = a_dims[a_dims.len() - 1];
                let k_b = b_dims[b_dims.len() - 2];
                if k_a != k_b {
                    return Err(Error::ShapeMismatch {
                        context: "matrix product inner extent".to_string(),
                        expected: k_a.to_string(),
                        actual: k_b.to_string(),
                    });
                }

                let mut dims = a_dims[..a_dims.len() - 2].to_vec();
                dims.push(a_dims[a_dims.len() - 2]);
                dims.push(b_dims[b_dims.len() - 1]);
                Ok(ValueInfo::new(a_info.dtype, TensorShape::Static(dims)))
            }
            _ => Ok(ValueInfo::unknown(a_info.dtype)),
        }
    }
}

/// Matrix product of inputs 0 and 1.
pub fn matmul(record: &OperatorRecord, ctx: &mut BuildCtx) -> Result<OutputVector> {
    let a = record.input(0)?;
    let b = record.input(1)?;
    Ok(vec![detail::matmul(a, b, ctx)?])
}
