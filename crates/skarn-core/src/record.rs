//! Source-side operator records and typed attributes.
//!
//! An [`OperatorRecord`] is the immutable view of one source-graph node that
//! a translator consumes: opcode, declaring domain, effective opset version,
//! ordered input handles, and an attribute bag. Records are produced by an
//! upstream deserializer and live only for the duration of one translation
//! step.

use crate::ir::Value;
use crate::types::TensorValue;
use crate::{Error, Result};
use std::collections::HashMap;

/// Attribute value types.
///
/// A record's attribute bag holds at most one value per name; list variants
/// are homogeneous and preserve declaration order.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    Float(f32),
    Int(i64),
    String(String),
    Tensor(TensorValue),
    Floats(Vec<f32>),
    Ints(Vec<i64>),
    Strings(Vec<String>),
}

impl AttributeValue {
    /// Tag name of this variant, for diagnostics.
    pub fn tag(&self) -> &'static str {
        match self {
            AttributeValue::Float(_) => "float",
            AttributeValue::Int(_) => "int",
            AttributeValue::String(_) => "string",
            AttributeValue::Tensor(_) => "tensor",
            AttributeValue::Floats(_) => "floats",
            AttributeValue::Ints(_) => "ints",
            AttributeValue::Strings(_) => "strings",
        }
    }
}

/// Attribute bag keyed by name. Insertion order is irrelevant.
pub type Attributes = HashMap<String, AttributeValue>;

/// Conversion from a stored attribute variant to a concrete Rust type.
///
/// Implementations are strict: a conversion succeeds only when the variant
/// tag matches the requested type, so `attr` can distinguish a missing
/// attribute from a mistyped one.
pub trait FromAttribute: Sized {
    /// Tag name this conversion expects, for diagnostics.
    const EXPECTED: &'static str;

    /// Convert from the stored variant, or `None` on a tag mismatch.
    fn from_attribute(value: &AttributeValue) -> Option<Self>;
}

impl FromAttribute for f32 {
    const EXPECTED: &'static str = "float";

    fn from_attribute(value: &AttributeValue) -> Option<Self> {
        match value {
            AttributeValue::Float(v) => Some(*v),
            _ => None,
        }
    }
}

impl FromAttribute for i64 {
    const EXPECTED: &'static str = "int";

    fn from_attribute(value: &AttributeValue) -> Option<Self> {
        match value {
            AttributeValue::Int(v) => Some(*v),
            _ => None,
        }
    }
}

impl FromAttribute for String {
    const EXPECTED: &'static str = "string";

    fn from_attribute(value: &AttributeValue) -> Option<Self> {
        match value {
            AttributeValue::String(v) => Some(v.clone()),
            _ => None,
        }
    }
}

impl FromAttribute for TensorValue {
    const EXPECTED: &'static str = "tensor";

    fn from_attribute(value: &AttributeValue) -> Option<Self> {
        match value {
            AttributeValue::Tensor(v) => Some(v.clone()),
            _ => None,
        }
    }
}

impl FromAttribute for Vec<f32> {
    const EXPECTED: &'static str = "floats";

    fn from_attribute(value: &AttributeValue) -> Option<Self> {
        match value {
            AttributeValue::Floats(v) => Some(v.clone()),
            _ => None,
        }
    }
}

impl FromAttribute for Vec<i64> {
    const EXPECTED: &'static str = "ints";

    fn from_attribute(value: &AttributeValue) -> Option<Self> {
        match value {
            AttributeValue::Ints(v) => Some(v.clone()),
            _ => None,
        }
    }
}

impl FromAttribute for Vec<String> {
    const EXPECTED: &'static str = "strings";

    fn from_attribute(value: &AttributeValue) -> Option<Self> {
        match value {
            AttributeValue::Strings(v) => Some(v.clone()),
            _ => None,
        }
    }
}

/// Immutable view of one source-graph node.
///
/// Inputs are value handles already produced by earlier translation steps;
/// an optional trailing input that the producer omitted appears as
/// [`Value::Absent`]. Build records with the `with_*` methods:
///
/// ```
/// use skarn_core::{AttributeValue, OperatorRecord};
///
/// let record = OperatorRecord::new("RandomUniform")
///     .with_version(1)
///     .with_attr("shape", AttributeValue::Ints(vec![2, 3]));
/// assert_eq!(record.op_type(), "RandomUniform");
/// ```
#[derive(Debug, Clone)]
pub struct OperatorRecord {
    domain: String,
    op_type: String,
    version: i64,
    inputs: Vec<Value>,
    attributes: Attributes,
    output_count: usize,
}

impl OperatorRecord {
    /// Create a record in the default domain, opset 1, one declared output.
    pub fn new(op_type: impl Into<String>) -> Self {
        Self {
            domain: String::new(),
            op_type: op_type.into(),
            version: 1,
            inputs: Vec::new(),
            attributes: Attributes::new(),
            output_count: 1,
        }
    }

    /// Set the declaring domain.
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = domain.into();
        self
    }

    /// Set the effective opset version of the record's domain.
    pub fn with_version(mut self, version: i64) -> Self {
        self.version = version;
        self
    }

    /// Append an input value handle.
    pub fn with_input(mut self, input: Value) -> Self {
        self.inputs.push(input);
        self
    }

    /// Replace the input list.
    pub fn with_inputs(mut self, inputs: Vec<Value>) -> Self {
        self.inputs = inputs;
        self
    }

    /// Set an attribute.
    pub fn with_attr(mut self, name: impl Into<String>, value: AttributeValue) -> Self {
        self.attributes.insert(name.into(), value);
        self
    }

    /// Set the declared output count.
    pub fn with_output_count(mut self, count: usize) -> Self {
        self.output_count = count;
        self
    }

    /// The declaring domain ("" is the default domain).
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// The opcode name.
    pub fn op_type(&self) -> &str {
        &self.op_type
    }

    /// Effective opset version of the record's domain.
    pub fn version(&self) -> i64 {
        self.version
    }

    /// Ordered input handles, including any absent markers.
    pub fn inputs(&self) -> &[Value] {
        &self.inputs
    }

    /// Number of input slots (absent markers included).
    pub fn input_count(&self) -> usize {
        self.inputs.len()
    }

    /// Declared output count.
    pub fn output_count(&self) -> usize {
        self.output_count
    }

    /// Get a required input.
    ///
    /// Fails with [`Error::MissingInput`] when the slot is out of range or
    /// holds the absent marker.
    pub fn input(&self, index: usize) -> Result<Value> {
        match self.inputs.get(index) {
            Some(value) if !value.is_absent() => Ok(*value),
            _ => Err(Error::MissingInput {
                op_type: self.op_type.clone(),
                index,
            }),
        }
    }

    /// Get an optional input; `None` when out of range or absent.
    pub fn try_input(&self, index: usize) -> Option<Value> {
        match self.inputs.get(index) {
            Some(value) if !value.is_absent() => Some(*value),
            _ => None,
        }
    }

    /// Get a required attribute.
    ///
    /// Fails with [`Error::MissingAttribute`] when the name is absent and
    /// with [`Error::AttributeType`] when the stored variant does not match
    /// the requested type.
    pub fn attr<T: FromAttribute>(&self, name: &str) -> Result<T> {
        match self.attributes.get(name) {
            Some(value) => T::from_attribute(value).ok_or_else(|| Error::AttributeType {
                name: name.to_string(),
                expected: T::EXPECTED,
                actual: value.tag(),
            }),
            None => Err(Error::MissingAttribute {
                name: name.to_string(),
            }),
        }
    }

    /// Get an attribute, falling back to a default when absent.
    ///
    /// Never fails on absence; a present attribute with the wrong variant
    /// tag is still an [`Error::AttributeType`].
    pub fn attr_or<T: FromAttribute>(&self, name: &str, default: T) -> Result<T> {
        match self.attributes.get(name) {
            Some(value) => T::from_attribute(value).ok_or_else(|| Error::AttributeType {
                name: name.to_string(),
                expected: T::EXPECTED,
                actual: value.tag(),
            }),
            None => Ok(default),
        }
    }

    /// Check if an attribute exists.
    pub fn has_attr(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }
}
