//! Unary elementwise translators: Asin, Cosh, Tan, IsNaN.
//!
//! All of these take one required input and emit exactly one node whose
//! output mirrors the input, except IsNaN, which produces a boolean mask.

use skarn_core::{
    BuildCtx, DataType, OpKind, OperatorRecord, OutputVector, Result, ValueInfo,
};

fn unary(record: &OperatorRecord, ctx: &mut BuildCtx, op: OpKind) -> Result<OutputVector> {
    let data = record.input(0)?;
    let info = ctx.value_info(data)?;
    let out = ctx.emit_single(op, vec![data], info)?;
    Ok(vec![out])
}

/// Elementwise inverse sine.
pub fn asin(record: &OperatorRecord, ctx: &mut BuildCtx) -> Result<OutputVector> {
    unary(record, ctx, OpKind::Asin)
}

/// Elementwise hyperbolic cosine.
pub fn cosh(record: &OperatorRecord, ctx: &mut BuildCtx) -> Result<OutputVector> {
    unary(record, ctx, OpKind::Cosh)
}

/// Elementwise tangent.
pub fn tan(record: &OperatorRecord, ctx: &mut BuildCtx) -> Result<OutputVector> {
    unary(record, ctx, OpKind::Tan)
}

/// Elementwise not-a-number test.
pub fn is_nan(record: &OperatorRecord, ctx: &mut BuildCtx) -> Result<OutputVector> {
    let data = record.input(0)?;
    let shape = ctx.value_info(data)?.shape;
    let out = ctx.emit_single(
        OpKind::IsNaN,
        vec![data],
        ValueInfo::new(DataType::Bool, shape),
    )?;
    Ok(vec![out])
}
