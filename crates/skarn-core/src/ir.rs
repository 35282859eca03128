//! Intermediate representation emitted by the translators.
//!
//! The IR is a directed graph where:
//! - **Nodes** (`IrNode`) are operations (e.g., MatMul, Multiply, Constant)
//! - **Values** (`Value`) reference one output port of a node
//!
//! Translators append nodes through a [`crate::BuildCtx`] and hand the
//! resulting value handles back to the caller, which wires them into the
//! next records. Execution of the graph belongs to a downstream consumer.

use crate::types::{DataType, TensorShape, TensorValue};
use crate::{Error, Result};
use petgraph::graph::NodeIndex;
use petgraph::stable_graph::StableGraph;
use petgraph::visit::Topo;

/// Type alias for IR node identifiers (backed by petgraph NodeIndex).
pub type IrNodeId = NodeIndex;

// ──────────────────────────────── Value ──────────────────────────────────

/// A handle to one output of an IR node, or the absent-output marker.
///
/// `Absent` stands in for an optional output that an operator deliberately
/// does not produce (e.g., an unsupported pooling index tensor). It keeps
/// positional output contracts intact without allocating anything in the
/// graph, and it can never be used as a node input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Value {
    /// Output `port` of node `node`.
    Node { node: IrNodeId, port: usize },

    /// Intentionally absent optional value.
    Absent,
}

impl Value {
    /// Check if this is the absent-output marker.
    pub fn is_absent(&self) -> bool {
        matches!(self, Value::Absent)
    }

    /// Get the (node, port) pair if this is a real value.
    pub fn as_node(&self) -> Option<(IrNodeId, usize)> {
        match self {
            Value::Node { node, port } => Some((*node, *port)),
            Value::Absent => None,
        }
    }
}

/// Ordered outputs produced by translating one operator record.
///
/// Positional meaning is opcode-specific. A vector shorter than the record's
/// declared output count means the remaining outputs are unused.
pub type OutputVector = Vec<Value>;

// ──────────────────────────────── OpKind ─────────────────────────────────

/// Pooling window geometry resolved from a source record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolSpec {
    /// Window extent per spatial dimension.
    pub kernel: Vec<usize>,

    /// Window stride per spatial dimension.
    pub strides: Vec<usize>,

    /// Padding added before each spatial dimension.
    pub pads_begin: Vec<usize>,

    /// Padding added after each spatial dimension.
    pub pads_end: Vec<usize>,

    /// Element spacing within the window per spatial dimension.
    pub dilations: Vec<usize>,

    /// Round output extents up instead of down.
    pub ceil_mode: bool,
}

/// Parameters of a uniform random generator node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RandomUniformSpec {
    /// Element type of the generated tensor.
    pub dtype: DataType,

    /// Process-wide seed component.
    pub global_seed: u64,

    /// Operator-local seed component.
    pub op_seed: u64,
}

/// The operation performed by an IR node.
#[derive(Debug, Clone, PartialEq)]
pub enum OpKind {
    /// Graph input placeholder; produced by the caller, never by a translator.
    Parameter,

    /// Compile-time constant.
    Constant(TensorValue),

    /// Elementwise inverse sine.
    Asin,

    /// Elementwise hyperbolic cosine.
    Cosh,

    /// Elementwise tangent.
    Tan,

    /// Elementwise not-a-number test; output is Bool.
    IsNaN,

    /// Elementwise addition with multidirectional broadcasting.
    Add,

    /// Elementwise subtraction with multidirectional broadcasting.
    Subtract,

    /// Elementwise multiplication with multidirectional broadcasting.
    Multiply,

    /// Elementwise type conversion.
    Convert(DataType),

    /// Matrix product over the two innermost dimensions.
    MatMul,

    /// Reinterpret data with a new shape. Inputs: (data, target shape).
    Reshape,

    /// Extract a strided sub-tensor.
    /// Inputs: (data, starts, ends[, axes[, steps]]).
    Slice,

    /// Max pooling, single output.
    MaxPool(PoolSpec),

    /// Max pooling producing values and element indices.
    MaxPoolWithIndices(PoolSpec),

    /// Uniform random tensor. Inputs: (shape, low, high).
    RandomUniform(RandomUniformSpec),

    /// Affine quantization to an integer type.
    /// Inputs: (data, scale, zero point); output dtype is the zero point's.
    Quantize,
}

impl OpKind {
    /// Short lowercase name used when generating node names.
    pub fn stem(&self) -> &'static str {
        match self {
            OpKind::Parameter => "param",
            OpKind::Constant(_) => "const",
            OpKind::Asin => "asin",
            OpKind::Cosh => "cosh",
            OpKind::Tan => "tan",
            OpKind::IsNaN => "is_nan",
            OpKind::Add => "add",
            OpKind::Subtract => "sub",
            OpKind::Multiply => "mul",
            OpKind::Convert(_) => "convert",
            OpKind::MatMul => "matmul",
            OpKind::Reshape => "reshape",
            OpKind::Slice => "slice",
            OpKind::MaxPool(_) => "max_pool",
            OpKind::MaxPoolWithIndices(_) => "max_pool",
            OpKind::RandomUniform(_) => "random_uniform",
            OpKind::Quantize => "quantize",
        }
    }
}

// ──────────────────────────────── IrNode ─────────────────────────────────

/// Type and shape of one node output.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueInfo {
    /// Element type.
    pub dtype: DataType,

    /// Shape, when known at construction time.
    pub shape: TensorShape,
}

impl ValueInfo {
    /// Create a new ValueInfo.
    pub fn new(dtype: DataType, shape: TensorShape) -> Self {
        Self { dtype, shape }
    }

    /// ValueInfo with an unknown shape.
    pub fn unknown(dtype: DataType) -> Self {
        Self {
            dtype,
            shape: TensorShape::Unknown,
        }
    }
}

/// A node in the IR graph.
#[derive(Debug, Clone)]
pub struct IrNode {
    /// Generated node name (unique within the graph).
    pub name: String,

    /// The operation this node performs.
    pub op: OpKind,

    /// Input value handles. Never contains `Value::Absent`.
    pub inputs: Vec<Value>,

    /// Type and shape of each output port.
    pub outputs: Vec<ValueInfo>,
}

// ──────────────────────────────── IrGraph ────────────────────────────────

/// The IR graph under construction.
///
/// Backed by `petgraph::StableGraph`; petgraph edges exist solely to keep a
/// topological ordering available for downstream consumers.
pub struct IrGraph {
    graph: StableGraph<IrNode, ()>,
}

impl IrGraph {
    /// Create a new empty IR graph.
    pub fn new() -> Self {
        Self {
            graph: StableGraph::new(),
        }
    }

    /// Add a graph input placeholder and return its value handle.
    pub fn parameter(
        &mut self,
        name: impl Into<String>,
        dtype: DataType,
        shape: TensorShape,
    ) -> Value {
        let node = self.graph.add_node(IrNode {
            name: name.into(),
            op: OpKind::Parameter,
            inputs: Vec::new(),
            outputs: vec![ValueInfo::new(dtype, shape)],
        });
        Value::Node { node, port: 0 }
    }

    /// Add a node to the graph and return the IDs of its output values.
    ///
    /// Every input must reference an existing node output; the absent marker
    /// is rejected here so it can never leak into a computation.
    pub fn add_node(&mut self, node: IrNode) -> Result<Vec<Value>> {
        let mut producers = Vec::with_capacity(node.inputs.len());
        for (index, input) in node.inputs.iter().enumerate() {
            let (producer, port) = input.as_node().ok_or_else(|| {
                Error::InvalidGraph(format!(
                    "node '{}' uses the absent marker as input {index}",
                    node.name
                ))
            })?;
            let producer_node = self.node(producer)?;
            if port >= producer_node.outputs.len() {
                return Err(Error::InvalidGraph(format!(
                    "node '{}' input {index} references port {port} of '{}', \
                     which has {} outputs",
                    node.name,
                    producer_node.name,
                    producer_node.outputs.len()
                )));
            }
            producers.push(producer);
        }

        let output_count = node.outputs.len();
        let id = self.graph.add_node(node);
        for producer in producers {
            self.graph.add_edge(producer, id, ());
        }

        Ok((0..output_count)
            .map(|port| Value::Node { node: id, port })
            .collect())
    }

    /// Get an immutable reference to a node.
    pub fn node(&self, id: IrNodeId) -> Result<&IrNode> {
        self.graph
            .node_weight(id)
            .ok_or_else(|| Error::InvalidGraph(format!("node {:?} not found", id)))
    }

    /// Get the node that produces a value.
    pub fn producer(&self, value: Value) -> Result<&IrNode> {
        let (id, _) = value
            .as_node()
            .ok_or_else(|| Error::InvalidGraph("the absent marker has no producer".to_string()))?;
        self.node(id)
    }

    /// Get the type and shape of a value.
    pub fn value_info(&self, value: Value) -> Result<&ValueInfo> {
        let (id, port) = value
            .as_node()
            .ok_or_else(|| Error::InvalidGraph("the absent marker carries no type".to_string()))?;
        let node = self.node(id)?;
        node.outputs.get(port).ok_or_else(|| {
            Error::InvalidGraph(format!(
                "port {port} out of range for node '{}' ({} outputs)",
                node.name,
                node.outputs.len()
            ))
        })
    }

    /// Get the constant behind a value, if its producer is a constant node.
    pub fn constant_value(&self, value: Value) -> Option<&TensorValue> {
        match self.producer(value) {
            Ok(IrNode {
                op: OpKind::Constant(tensor),
                ..
            }) => Some(tensor),
            _ => None,
        }
    }

    /// Iterate over all nodes in the graph.
    pub fn nodes(&self) -> impl Iterator<Item = (IrNodeId, &IrNode)> {
        self.graph
            .node_indices()
            .filter_map(|id| self.graph.node_weight(id).map(|node| (id, node)))
    }

    /// Get the number of nodes in the graph.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Get the topological order of nodes in the graph.
    ///
    /// Returns nodes in an order such that all inputs to a node are produced
    /// before the node itself.
    pub fn topological_order(&self) -> Vec<IrNodeId> {
        let mut topo = Topo::new(&self.graph);
        let mut order = Vec::new();

        while let Some(id) = topo.next(&self.graph) {
            order.push(id);
        }

        order
    }

    /// Find a node by its name.
    pub fn find_node_by_name(&self, name: &str) -> Option<IrNodeId> {
        self.nodes()
            .find(|(_, node)| node.name == name)
            .map(|(id, _)| id)
    }
}

impl Default for IrGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TensorData;

    fn f32_info(dims: &[usize]) -> ValueInfo {
        ValueInfo::new(DataType::F32, TensorShape::Static(dims.to_vec()))
    }

    #[test]
    fn test_parameter_and_node() {
        let mut graph = IrGraph::new();
        let x = graph.parameter("x", DataType::F32, TensorShape::Static(vec![2, 2]));

        let outputs = graph
            .add_node(IrNode {
                name: "tan_0".to_string(),
                op: OpKind::Tan,
                inputs: vec![x],
                outputs: vec![f32_info(&[2, 2])],
            })
            .unwrap();

        assert_eq!(graph.node_count(), 2);
        assert_eq!(outputs.len(), 1);
        assert_eq!(graph.producer(outputs[0]).unwrap().op, OpKind::Tan);
        assert_eq!(
            graph.value_info(outputs[0]).unwrap().shape,
            TensorShape::Static(vec![2, 2])
        );
    }

    #[test]
    fn test_absent_marker_rejected_as_input() {
        let mut graph = IrGraph::new();
        let result = graph.add_node(IrNode {
            name: "tan_0".to_string(),
            op: OpKind::Tan,
            inputs: vec![Value::Absent],
            outputs: vec![f32_info(&[2])],
        });
        assert!(matches!(result, Err(Error::InvalidGraph(_))));
    }

    #[test]
    fn test_absent_marker_queries() {
        let graph = IrGraph::new();
        assert!(Value::Absent.is_absent());
        assert!(graph.value_info(Value::Absent).is_err());
        assert!(graph.producer(Value::Absent).is_err());
    }

    #[test]
    fn test_constant_value_lookup() {
        let mut graph = IrGraph::new();
        let tensor = TensorValue::scalar(TensorData::F32(vec![1.5]), DataType::F32);
        let outputs = graph
            .add_node(IrNode {
                name: "const_0".to_string(),
                op: OpKind::Constant(tensor.clone()),
                inputs: vec![],
                outputs: vec![ValueInfo::new(DataType::F32, TensorShape::Static(vec![]))],
            })
            .unwrap();

        assert_eq!(graph.constant_value(outputs[0]), Some(&tensor));

        let param = graph.parameter("x", DataType::F32, TensorShape::Unknown);
        assert_eq!(graph.constant_value(param), None);
    }

    #[test]
    fn test_topological_order() {
        let mut graph = IrGraph::new();
        let x = graph.parameter("x", DataType::F32, TensorShape::Static(vec![2]));

        let a = graph
            .add_node(IrNode {
                name: "asin_0".to_string(),
                op: OpKind::Asin,
                inputs: vec![x],
                outputs: vec![f32_info(&[2])],
            })
            .unwrap();
        let b = graph
            .add_node(IrNode {
                name: "cosh_0".to_string(),
                op: OpKind::Cosh,
                inputs: vec![a[0]],
                outputs: vec![f32_info(&[2])],
            })
            .unwrap();

        let order = graph.topological_order();
        assert_eq!(order.len(), 3);
        let pos = |v: Value| {
            let (id, _) = v.as_node().unwrap();
            order.iter().position(|&o| o == id).unwrap()
        };
        assert!(pos(x) < pos(a[0]));
        assert!(pos(a[0]) < pos(b[0]));
    }

    #[test]
    fn test_bad_port_rejected() {
        let mut graph = IrGraph::new();
        let x = graph.parameter("x", DataType::F32, TensorShape::Static(vec![2]));
        let (node, _) = x.as_node().unwrap();

        let result = graph.add_node(IrNode {
            name: "tan_0".to_string(),
            op: OpKind::Tan,
            inputs: vec![Value::Node { node, port: 3 }],
            outputs: vec![f32_info(&[2])],
        });
        assert!(matches!(result, Err(Error::InvalidGraph(_))));
    }
}
