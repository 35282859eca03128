//! ImageScaler translator.
//!
//! Scales a channel-first image tensor and adds a per-channel bias:
//! `output = input * scale + bias`, with the bias broadcast as
//! `[1, C, 1, 1]`.

use skarn_core::{
    BuildCtx, DataType, Error, OpKind, OperatorRecord, OutputVector, Result, TensorData,
    TensorValue,
};

pub fn image_scaler(record: &OperatorRecord, ctx: &mut BuildCtx) -> Result<OutputVector> {
    if record.input_count() != 1 {
        return Err(Error::Validation(format!(
            "ImageScaler expects 1 input tensor, got {}",
            record.input_count()
        )));
    }

    let data = record.input(0)?;
    let info = ctx.value_info(data)?;

    if let Some(rank) = info.shape.ndim() {
        if rank != 4 {
            return Err(Error::ShapeMismatch {
                context: "ImageScaler expects an NCHW input".to_string(),
                expected: "rank 4".to_string(),
                actual: format!("rank {rank}"),
            });
        }
    }

    let bias: Vec<f32> = record.attr("bias")?;
    if let Some(dims) = info.shape.as_static() {
        if dims[1] != bias.len() {
            return Err(Error::ShapeMismatch {
                context: "ImageScaler bias".to_string(),
                expected: format!("channel dimension {}", dims[1]),
                actual: format!("{} bias elements", bias.len()),
            });
        }
    }

    let scale = ctx.attr_as_scalar(record, "scale", 1.0, info.dtype)?;

    let channels = bias.len();
    let bias_tensor = TensorValue::new(
        TensorData::F32(bias),
        vec![1, channels, 1, 1],
        DataType::F32,
    )
    .cast(info.dtype)?;
    let bias_const = ctx.constant(bias_tensor)?;

    let scaled = ctx.emit_single(OpKind::Multiply, vec![data, scale], info.clone())?;
    let out = ctx.emit_single(OpKind::Add, vec![scaled, bias_const], info)?;
    Ok(vec![out])
}
