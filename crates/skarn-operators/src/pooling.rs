//! Pooling window resolution shared by the pooling translators.
//!
//! `PoolingFactory` reads the window geometry attributes from a record
//! (kernel, strides, pads, dilations, rounding mode), validates them against
//! the input shape, and emits the pooling node variants the translators ask
//! for.

use skarn_core::{
    BuildCtx, DataType, Error, OpKind, OperatorRecord, PoolSpec, Result, TensorShape, Value,
    ValueInfo,
};

/// Resolved pooling configuration for one record.
pub struct PoolingFactory {
    data: Value,
    spec: PoolSpec,
    output: ValueInfo,
}

impl PoolingFactory {
    /// Resolve the pooling configuration from a record.
    ///
    /// `kernel_shape` is required; `strides` and `dilations` default to ones,
    /// `pads` to zeros. `pads` holds begin values for every spatial dimension
    /// followed by end values. Only `auto_pad = "NOTSET"` is supported.
    pub fn from_record(record: &OperatorRecord, ctx: &BuildCtx) -> Result<Self> {
        let data = record.input(0)?;
        let info = ctx.value_info(data)?;

        let kernel = positive_dims("kernel_shape", record.attr("kernel_shape")?)?;
        let spatial = kernel.len();

        let strides = positive_dims("strides", record.attr_or("strides", vec![1; spatial])?)?;
        let dilations = positive_dims("dilations", record.attr_or("dilations", vec![1; spatial])?)?;
        let pads = non_negative_dims("pads", record.attr_or("pads", vec![0; 2 * spatial])?)?;
        let ceil_mode = record.attr_or("ceil_mode", 0i64)? != 0;

        let auto_pad: String = record.attr_or("auto_pad", "NOTSET".to_string())?;
        if auto_pad != "NOTSET" {
            return Err(Error::Validation(format!(
                "unsupported auto_pad value '{auto_pad}'"
            )));
        }

        expect_len("strides", strides.len(), spatial)?;
        expect_len("dilations", dilations.len(), spatial)?;
        expect_len("pads", pads.len(), 2 * spatial)?;

        let spec = PoolSpec {
            kernel,
            strides,
            pads_begin: pads[..spatial].to_vec(),
            pads_end: pads[spatial..].to_vec(),
            dilations,
            ceil_mode,
        };

        let shape = output_shape(&info.shape, &spec)?;
        Ok(Self {
            data,
            spec,
            output: ValueInfo::new(info.dtype, shape),
        })
    }

    /// Emit a single-output max pooling node.
    pub fn make_max_pool(&self, ctx: &mut BuildCtx) -> Result<Vec<Value>> {
        let out = ctx.emit_single(
            OpKind::MaxPool(self.spec.clone()),
            vec![self.data],
            self.output.clone(),
        )?;
        Ok(vec![out])
    }

    /// Emit a max pooling node with values and element indices.
    pub fn make_max_pool_with_indices(&self, ctx: &mut BuildCtx) -> Result<Vec<Value>> {
        ctx.emit(
            OpKind::MaxPoolWithIndices(self.spec.clone()),
            vec![self.data],
            vec![
                self.output.clone(),
                ValueInfo::new(DataType::I64, self.output.shape.clone()),
            ],
        )
    }
}

/// Compute the pooled output shape for a static input.
///
/// The input is laid out `[N, C, spatial...]`. Unknown input shapes stay
/// unknown; a static input must have rank `spatial + 2`.
fn output_shape(input: &TensorShape, spec: &PoolSpec) -> Result<TensorShape> {
    let Some(dims) = input.as_static() else {
        return Ok(TensorShape::Unknown);
    };

    let spatial = spec.kernel.len();
    if dims.len() != spatial + 2 {
        return Err(Error::ShapeMismatch {
            context: "pooling input rank".to_string(),
            expected: format!("rank {}", spatial + 2),
            actual: format!("rank {}", dims.len()),
        });
    }

    let mut out = vec![dims[0], dims[1]];
    for i in 0..spatial {
        let window = (spec.kernel[i] - 1) * spec.dilations[i] + 1;
        let padded = dims[2 + i] + spec.pads_begin[i] + spec.pads_end[i];
        if padded < window {
            return Err(Error::Validation(format!(
                "pooling window {window} exceeds padded input extent {padded}"
            )));
        }
        let span = padded - window;
        let extent = if spec.ceil_mode {
            span.div_ceil(spec.strides[i]) + 1
        } else {
            span / spec.strides[i] + 1
        };
        out.push(extent);
    }

    Ok(TensorShape::Static(out))
}

fn positive_dims(name: &str, values: Vec<i64>) -> Result<Vec<usize>> {
    values
        .into_iter()
        .map(|v| {
            if v >= 1 {
                Ok(v as usize)
            } else {
                Err(Error::Validation(format!(
                    "attribute '{name}' must be positive, got {v}"
                )))
            }
        })
        .collect()
}

fn non_negative_dims(name: &str, values: Vec<i64>) -> Result<Vec<usize>> {
    values
        .into_iter()
        .map(|v| {
            if v >= 0 {
                Ok(v as usize)
            } else {
                Err(Error::Validation(format!(
                    "attribute '{name}' must be non-negative, got {v}"
                )))
            }
        })
        .collect()
}

fn expect_len(name: &str, actual: usize, expected: usize) -> Result<()> {
    if actual == expected {
        Ok(())
    } else {
        Err(Error::ShapeMismatch {
            context: format!("attribute '{name}' length"),
            expected: expected.to_string(),
            actual: actual.to_string(),
        })
    }
}
