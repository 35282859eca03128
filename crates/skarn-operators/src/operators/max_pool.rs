//! MaxPool translators.
//!
//! Window geometry is resolved by [`crate::pooling::PoolingFactory`]. The
//! opset 1 implementation cannot produce the optional element-indices
//! output; it keeps the output positions stable by appending the absent
//! marker instead. Opset 8 produces real indices.

use crate::pooling::PoolingFactory;
use skarn_core::{BuildCtx, OperatorRecord, OutputVector, Result};

/// Max pooling without indices support.
pub fn max_pool_v1(record: &OperatorRecord, ctx: &mut BuildCtx) -> Result<OutputVector> {
    if record.output_count() > 1 {
        tracing::warn!("MaxPool: indices output is not supported and was ignored");
    }

    let factory = PoolingFactory::from_record(record, ctx)?;
    let mut outputs = factory.make_max_pool(ctx)?;
    outputs.push(ctx.absent()); // indices (optional)
    Ok(outputs)
}

/// Max pooling with an element-indices output.
pub fn max_pool_v8(record: &OperatorRecord, ctx: &mut BuildCtx) -> Result<OutputVector> {
    PoolingFactory::from_record(record, ctx)?.make_max_pool_with_indices(ctx)
}
