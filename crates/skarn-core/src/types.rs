//! Core types for element types, tensor shapes, and constant values.

use crate::{Error, Result};

/// Element types carried by IR values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    F32,
    F16,
    F64,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    Bool,
}

impl DataType {
    /// Map an external numeric dtype code to an element type.
    ///
    /// Codes follow the ONNX `TensorProto.DataType` numbering. String and
    /// complex types have no IR counterpart and are rejected.
    pub fn from_onnx_code(code: i64) -> Result<Self> {
        match code {
            1 => Ok(DataType::F32),
            2 => Ok(DataType::U8),
            3 => Ok(DataType::I8),
            4 => Ok(DataType::U16),
            5 => Ok(DataType::I16),
            6 => Ok(DataType::I32),
            7 => Ok(DataType::I64),
            9 => Ok(DataType::Bool),
            10 => Ok(DataType::F16),
            11 => Ok(DataType::F64),
            12 => Ok(DataType::U32),
            13 => Ok(DataType::U64),
            other => Err(Error::UnsupportedDataType(format!(
                "dtype code {other} has no element type mapping"
            ))),
        }
    }

    /// Check if this is a floating-point type.
    pub fn is_float(&self) -> bool {
        matches!(self, DataType::F32 | DataType::F16 | DataType::F64)
    }
}

/// Tensor shape attached to an IR value.
///
/// Shapes are best-effort metadata: translators validate against them when
/// they are known and pass records through otherwise. A shape that cannot be
/// determined at construction time stays `Unknown`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TensorShape {
    /// All dimensions are known.
    Static(Vec<usize>),

    /// Shape is not known at construction time.
    Unknown,
}

impl TensorShape {
    /// Check if the shape is fully static.
    pub fn is_static(&self) -> bool {
        matches!(self, TensorShape::Static(_))
    }

    /// Get static dimensions if available.
    pub fn as_static(&self) -> Option<&[usize]> {
        match self {
            TensorShape::Static(dims) => Some(dims),
            TensorShape::Unknown => None,
        }
    }

    /// Number of dimensions, if known.
    pub fn ndim(&self) -> Option<usize> {
        match self {
            TensorShape::Static(dims) => Some(dims.len()),
            TensorShape::Unknown => None,
        }
    }
}

/// Raw data held by a constant tensor.
#[derive(Debug, Clone, PartialEq)]
pub enum TensorData {
    F32(Vec<f32>),
    F64(Vec<f64>),
    I8(Vec<i8>),
    I32(Vec<i32>),
    I64(Vec<i64>),
    U8(Vec<u8>),
    Bool(Vec<bool>),
}

impl TensorData {
    /// Get the number of elements in this tensor data.
    pub fn len(&self) -> usize {
        match self {
            TensorData::F32(v) => v.len(),
            TensorData::F64(v) => v.len(),
            TensorData::I8(v) => v.len(),
            TensorData::I32(v) => v.len(),
            TensorData::I64(v) => v.len(),
            TensorData::U8(v) => v.len(),
            TensorData::Bool(v) => v.len(),
        }
    }

    /// Check if this tensor data is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get the element type of this tensor data.
    pub fn dtype(&self) -> DataType {
        match self {
            TensorData::F32(_) => DataType::F32,
            TensorData::F64(_) => DataType::F64,
            TensorData::I8(_) => DataType::I8,
            TensorData::I32(_) => DataType::I32,
            TensorData::I64(_) => DataType::I64,
            TensorData::U8(_) => DataType::U8,
            TensorData::Bool(_) => DataType::Bool,
        }
    }

    /// Try to get as f32 slice.
    pub fn as_f32(&self) -> Option<&[f32]> {
        match self {
            TensorData::F32(v) => Some(v),
            _ => None,
        }
    }

    /// Try to get as i64 slice.
    pub fn as_i64(&self) -> Option<&[i64]> {
        match self {
            TensorData::I64(v) => Some(v),
            _ => None,
        }
    }

    /// Try to get as u8 slice.
    pub fn as_u8(&self) -> Option<&[u8]> {
        match self {
            TensorData::U8(v) => Some(v),
            _ => None,
        }
    }

    /// Try to get as bool slice.
    pub fn as_bool(&self) -> Option<&[bool]> {
        match self {
            TensorData::Bool(v) => Some(v),
            _ => None,
        }
    }
}

/// A tensor value known at construction time.
///
/// Bundles data, shape, and dtype together. Used for constants materialized
/// from attributes; large runtime tensors never flow through here.
#[derive(Debug, Clone, PartialEq)]
pub struct TensorValue {
    /// The raw tensor data.
    pub data: TensorData,

    /// The shape of the tensor (dimensions).
    pub shape: Vec<usize>,

    /// The element type of the tensor.
    pub dtype: DataType,
}

impl TensorValue {
    /// Create a new TensorValue with data, shape, and dtype.
    ///
    /// # Panics
    ///
    /// Panics if the data length doesn't match the shape product or the data
    /// variant doesn't match the declared dtype.
    pub fn new(data: TensorData, shape: Vec<usize>, dtype: DataType) -> Self {
        let expected_len: usize = shape.iter().product();
        assert_eq!(
            data.len(),
            expected_len,
            "Data length {} doesn't match shape {:?} (product = {})",
            data.len(),
            shape,
            expected_len
        );
        assert_eq!(
            data.dtype(),
            dtype,
            "Data type {:?} doesn't match declared dtype {:?}",
            data.dtype(),
            dtype
        );
        Self { data, shape, dtype }
    }

    /// Create a scalar TensorValue (shape = []).
    pub fn scalar(data: TensorData, dtype: DataType) -> Self {
        Self::new(data, vec![], dtype)
    }

    /// Create an f32 scalar.
    pub fn scalar_f32(value: f32) -> Self {
        Self::scalar(TensorData::F32(vec![value]), DataType::F32)
    }

    /// Create a 1-D i64 tensor.
    pub fn i64s(values: Vec<i64>) -> Self {
        let len = values.len();
        Self::new(TensorData::I64(values), vec![len], DataType::I64)
    }

    /// Get the number of elements.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if this tensor value is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get the number of dimensions.
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Create a new TensorValue with a different shape (data unchanged).
    ///
    /// # Panics
    ///
    /// Panics if the new shape product doesn't match the data length.
    pub fn reshape(&self, new_shape: Vec<usize>) -> Self {
        Self::new(self.data.clone(), new_shape, self.dtype)
    }

    /// Cast this value to a different element type.
    ///
    /// Covers the numeric conversions needed when materializing attribute
    /// constants; pairs without a conversion rule are an error.
    pub fn cast(&self, target: DataType) -> Result<TensorValue> {
        if self.dtype == target {
            return Ok(self.clone());
        }

        let data = match (&self.data, target) {
            (TensorData::F32(v), DataType::F64) => {
                TensorData::F64(v.iter().map(|&x| x as f64).collect())
            }
            (TensorData::F32(v), DataType::I32) => {
                TensorData::I32(v.iter().map(|&x| x as i32).collect())
            }
            (TensorData::F32(v), DataType::I64) => {
                TensorData::I64(v.iter().map(|&x| x as i64).collect())
            }
            (TensorData::F64(v), DataType::F32) => {
                TensorData::F32(v.iter().map(|&x| x as f32).collect())
            }
            (TensorData::I8(v), DataType::F32) => {
                TensorData::F32(v.iter().map(|&x| x as f32).collect())
            }
            (TensorData::I32(v), DataType::F32) => {
                TensorData::F32(v.iter().map(|&x| x as f32).collect())
            }
            (TensorData::I32(v), DataType::I64) => {
                TensorData::I64(v.iter().map(|&x| x as i64).collect())
            }
            (TensorData::I64(v), DataType::F32) => {
                TensorData::F32(v.iter().map(|&x| x as f32).collect())
            }
            (TensorData::I64(v), DataType::I32) => {
                TensorData::I32(v.iter().map(|&x| x as i32).collect())
            }
            (TensorData::U8(v), DataType::F32) => {
                TensorData::F32(v.iter().map(|&x| x as f32).collect())
            }
            (TensorData::U8(v), DataType::I32) => {
                TensorData::I32(v.iter().map(|&x| x as i32).collect())
            }
            _ => {
                return Err(Error::UnsupportedDataType(format!(
                    "cast from {:?} to {:?} is not supported for constants",
                    self.dtype, target
                )));
            }
        };

        Ok(TensorValue::new(data, self.shape.clone(), target))
    }
}
