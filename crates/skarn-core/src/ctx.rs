//! Construction context threaded through translators.
//!
//! `BuildCtx` borrows the caller-owned IR graph for one translation pass and
//! provides the services translators need: node emission with fresh naming,
//! attribute-to-constant materialization, element-type lookups, and the
//! absent-output marker. One context per source graph; contexts are never
//! shared between translation passes.

use crate::ir::{IrGraph, IrNode, OpKind, Value, ValueInfo};
use crate::record::OperatorRecord;
use crate::types::{DataType, TensorData, TensorShape, TensorValue};
use crate::Result;

/// Construction context passed to translators.
pub struct BuildCtx<'g> {
    graph: &'g mut IrGraph,
    default_float: DataType,
    fresh_counter: usize,
}

impl<'g> BuildCtx<'g> {
    /// Create a context over the graph under construction.
    pub fn new(graph: &'g mut IrGraph) -> Self {
        Self {
            graph,
            default_float: DataType::F32,
            fresh_counter: 0,
        }
    }

    /// Override the default floating element type (F32 unless set).
    pub fn with_default_float(mut self, dtype: DataType) -> Self {
        self.default_float = dtype;
        self
    }

    /// The floating element type used when a record does not pin one.
    pub fn default_float(&self) -> DataType {
        self.default_float
    }

    /// The absent-output marker.
    ///
    /// A cheap tag; nothing is allocated in the graph.
    pub fn absent(&self) -> Value {
        Value::Absent
    }

    /// Read access to the graph under construction.
    pub fn graph(&self) -> &IrGraph {
        self.graph
    }

    /// Generate a fresh node name from a stem.
    pub fn fresh_name(&mut self, stem: &str) -> String {
        let name = format!("{stem}_{}", self.fresh_counter);
        self.fresh_counter += 1;
        name
    }

    // ── Node emission ──

    /// Emit a node and return its output handles.
    pub fn emit(
        &mut self,
        op: OpKind,
        inputs: Vec<Value>,
        outputs: Vec<ValueInfo>,
    ) -> Result<Vec<Value>> {
        let name = self.fresh_name(op.stem());
        self.graph.add_node(IrNode {
            name,
            op,
            inputs,
            outputs,
        })
    }

    /// Emit a single-output node and return its one output handle.
    pub fn emit_single(
        &mut self,
        op: OpKind,
        inputs: Vec<Value>,
        output: ValueInfo,
    ) -> Result<Value> {
        let outputs = self.emit(op, inputs, vec![output])?;
        Ok(outputs[0])
    }

    // ── Constants ──

    /// Materialize a constant tensor as a node and return its handle.
    pub fn constant(&mut self, value: TensorValue) -> Result<Value> {
        let info = ValueInfo::new(value.dtype, TensorShape::Static(value.shape.clone()));
        self.emit_single(OpKind::Constant(value), vec![], info)
    }

    /// Materialize an f32 scalar constant, cast to the requested type.
    pub fn scalar(&mut self, value: f32, dtype: DataType) -> Result<Value> {
        let tensor = TensorValue::scalar_f32(value).cast(dtype)?;
        self.constant(tensor)
    }

    /// Materialize a 1-D i64 constant.
    pub fn const_i64s(&mut self, values: Vec<i64>) -> Result<Value> {
        self.constant(TensorValue::i64s(values))
    }

    /// Materialize an f32 constant with an explicit shape.
    pub fn const_f32s(&mut self, values: Vec<f32>, shape: Vec<usize>) -> Result<Value> {
        self.constant(TensorValue::new(
            TensorData::F32(values),
            shape,
            DataType::F32,
        ))
    }

    /// Materialize an optional float attribute as a scalar constant.
    ///
    /// Reads `name` from the record (falling back to `default`) and emits a
    /// scalar constant of the requested element type.
    pub fn attr_as_scalar(
        &mut self,
        record: &OperatorRecord,
        name: &str,
        default: f32,
        dtype: DataType,
    ) -> Result<Value> {
        let value = record.attr_or(name, default)?;
        self.scalar(value, dtype)
    }

    // ── Value queries ──

    /// Get the type and shape of a value.
    pub fn value_info(&self, value: Value) -> Result<ValueInfo> {
        Ok(self.graph.value_info(value)?.clone())
    }

    /// Get the element type of a value.
    pub fn element_type(&self, value: Value) -> Result<DataType> {
        Ok(self.graph.value_info(value)?.dtype)
    }

    /// Get the constant behind a value, if its producer is a constant node.
    pub fn constant_value(&self, value: Value) -> Option<&TensorValue> {
        self.graph.constant_value(value)
    }
}
