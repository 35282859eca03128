//! Common test utilities for translator tests.
//!
//! Provides tracing setup and a small reference evaluator that walks an
//! emitted subgraph on concrete tensors. The evaluator only covers the
//! operations the tests exercise numerically.

#![allow(dead_code)]

use skarn_core::{
    DataType, IrGraph, IrNode, OpKind, TensorData, TensorValue, Value,
};
use std::collections::HashMap;

/// Install a test subscriber so `tracing` output lands in test logs.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// Tensor bindings for graph parameters, keyed by parameter name.
pub type Bindings = HashMap<String, TensorValue>;

/// Evaluate a value by walking its producing nodes.
///
/// # Panics
///
/// Panics on operations the evaluator does not model and on missing
/// parameter bindings; tests only feed it subgraphs it understands.
pub fn evaluate(graph: &IrGraph, value: Value, bindings: &Bindings) -> TensorValue {
    let node = graph.producer(value).expect("value has a producer");
    match &node.op {
        OpKind::Parameter => bindings
            .get(&node.name)
            .unwrap_or_else(|| panic!("no binding for parameter '{}'", node.name))
            .clone(),
        OpKind::Constant(tensor) => tensor.clone(),
        OpKind::Asin => unary_f32(graph, node, bindings, f32::asin),
        OpKind::Cosh => unary_f32(graph, node, bindings, f32::cosh),
        OpKind::Tan => unary_f32(graph, node, bindings, f32::tan),
        OpKind::IsNaN => {
            let data = evaluate(graph, node.inputs[0], bindings);
            let values = data.data.as_f32().expect("f32 data");
            TensorValue::new(
                TensorData::Bool(values.iter().map(|v| v.is_nan()).collect()),
                data.shape.clone(),
                DataType::Bool,
            )
        }
        OpKind::Add => binary_f32(graph, node, bindings, |a, b| a + b),
        OpKind::Subtract => binary_f32(graph, node, bindings, |a, b| a - b),
        OpKind::Multiply => binary_f32(graph, node, bindings, |a, b| a * b),
        OpKind::Convert(target) => evaluate(graph, node.inputs[0], bindings)
            .cast(*target)
            .expect("convert"),
        OpKind::MatMul => {
            let a = evaluate(graph, node.inputs[0], bindings);
            let b = evaluate(graph, node.inputs[1], bindings);
            matmul_f32(&a, &b)
        }
        OpKind::Reshape => {
            let data = evaluate(graph, node.inputs[0], bindings);
            let target = evaluate(graph, node.inputs[1], bindings);
            let dims: Vec<usize> = target
                .data
                .as_i64()
                .expect("i64 target shape")
                .iter()
                .map(|&d| d as usize)
                .collect();
            data.reshape(dims)
        }
        OpKind::Quantize => {
            let data = evaluate(graph, node.inputs[0], bindings);
            let scale = evaluate(graph, node.inputs[1], bindings);
            let zero_point = evaluate(graph, node.inputs[2], bindings);
            quantize_f32(&data, &scale, &zero_point)
        }
        other => panic!("evaluator does not model {other:?}"),
    }
}

fn unary_f32(
    graph: &IrGraph,
    node: &IrNode,
    bindings: &Bindings,
    op: fn(f32) -> f32,
) -> TensorValue {
    let data = evaluate(graph, node.inputs[0], bindings);
    let values = data.data.as_f32().expect("f32 data");
    TensorValue::new(
        TensorData::F32(values.iter().map(|&v| op(v)).collect()),
        data.shape.clone(),
        DataType::F32,
    )
}

fn binary_f32(
    graph: &IrGraph,
    node: &IrNode,
    bindings: &Bindings,
    op: fn(f32, f32) -> f32,
) -> TensorValue {
    let a = evaluate(graph, node.inputs[0], bindings);
    let b = evaluate(graph, node.inputs[1], bindings);

    let shape = skarn_operators::helpers::broadcast_shapes(&[a.shape.as_slice(), b.shape.as_slice()])
        .expect("broadcastable shapes");
    let len: usize = shape.iter().product();

    let mut out = Vec::with_capacity(len);
    for index in 0..len {
        let coords = unravel(index, &shape);
        out.push(op(read_f32(&a, &coords), read_f32(&b, &coords)));
    }
    TensorValue::new(TensorData::F32(out), shape, DataType::F32)
}

/// Read one element of a broadcast operand at the output coordinates.
fn read_f32(tensor: &TensorValue, coords: &[usize]) -> f32 {
    let values = tensor.data.as_f32().expect("f32 data");
    let rank = tensor.shape.len();
    let offset = coords.len() - rank;

    let mut index = 0;
    for (i, &dim) in tensor.shape.iter().enumerate() {
        let coord = if dim == 1 { 0 } else { coords[offset + i] };
        index = index * dim + coord;
    }
    values[index]
}

fn unravel(mut index: usize, shape: &[usize]) -> Vec<usize> {
    let mut coords = vec![0; shape.len()];
    for i in (0..shape.len()).rev() {
        coords[i] = index % shape[i];
        index /= shape[i];
    }
    coords
}

fn matmul_f32(a: &TensorValue, b: &TensorValue) -> TensorValue {
    assert_eq!(a.ndim(), 2, "evaluator models 2-D matrix products only");
    assert_eq!(b.ndim(), 2, "evaluator models 2-D matrix products only");
    let (m, k) = (a.shape[0], a.shape[1]);
    let (k2, n) = (b.shape[0], b.shape[1]);
    assert_eq!(k, k2, "inner extents must agree");

    let a_values = a.data.as_f32().expect("f32 data");
    let b_values = b.data.as_f32().expect("f32 data");

    let mut out = vec![0.0f32; m * n];
    for row in 0..m {
        for col in 0..n {
            let mut acc = 0.0;
            for inner in 0..k {
                acc += a_values[row * k + inner] * b_values[inner * n + col];
            }
            out[row * n + col] = acc;
        }
    }
    TensorValue::new(TensorData::F32(out), vec![m, n], DataType::F32)
}

/// Affine quantization: `round(x / scale) + zero_point`, saturated to the
/// zero point's integer range.
fn quantize_f32(data: &TensorValue, scale: &TensorValue, zero_point: &TensorValue) -> TensorValue {
    let values = data.data.as_f32().expect("f32 data");
    let scale = scale.data.as_f32().expect("f32 scale")[0];

    match &zero_point.data {
        TensorData::U8(zp) => {
            let zp = zp[0] as f32;
            let out: Vec<u8> = values
                .iter()
                .map(|&v| ((v / scale).round() + zp).clamp(0.0, 255.0) as u8)
                .collect();
            TensorValue::new(TensorData::U8(out), data.shape.clone(), DataType::U8)
        }
        TensorData::I8(zp) => {
            let zp = zp[0] as f32;
            let out: Vec<i8> = values
                .iter()
                .map(|&v| ((v / scale).round() + zp).clamp(-128.0, 127.0) as i8)
                .collect();
            TensorValue::new(TensorData::I8(out), data.shape.clone(), DataType::I8)
        }
        other => panic!("unsupported zero point data {other:?}"),
    }
}
