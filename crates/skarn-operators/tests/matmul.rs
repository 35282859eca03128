//! Tests for the MatMul translator.

mod common;

use common::{evaluate, Bindings};
use skarn_core::{
    BuildCtx, DataType, Error, IrGraph, OperatorRecord, TensorData, TensorShape, TensorValue,
};
use skarn_operators::operators::matmul;

#[test]
fn test_matmul_output_shape() {
    let mut graph = IrGraph::new();
    let a = graph.parameter("a", DataType::F32, TensorShape::Static(vec![2, 3]));
    let b = graph.parameter("b", DataType::F32, TensorShape::Static(vec![3, 4]));
    let mut ctx = BuildCtx::new(&mut graph);

    let record = OperatorRecord::new("MatMul").with_inputs(vec![a, b]);
    let outputs = matmul(&record, &mut ctx).unwrap();
    assert_eq!(outputs.len(), 1);
    assert_eq!(
        ctx.value_info(outputs[0]).unwrap().shape,
        TensorShape::Static(vec![2, 4])
    );
}

#[test]
fn test_matmul_batch_dims_follow_left_operand() {
    let mut graph = IrGraph::new();
    let a = graph.parameter("a", DataType::F32, TensorShape::Static(vec![8, 2, 3]));
    let b = graph.parameter("b", DataType::F32, TensorShape::Static(vec![3, 5]));
    let mut ctx = BuildCtx::new(&mut graph);

    let record = OperatorRecord::new("MatMul").with_inputs(vec![a, b]);
    let outputs = matmul(&record, &mut ctx).unwrap();
    assert_eq!(
        ctx.value_info(outputs[0]).unwrap().shape,
        TensorShape::Static(vec![8, 2, 5])
    );
}

#[test]
fn test_matmul_inner_extent_mismatch() {
    let mut graph = IrGraph::new();
    let a = graph.parameter("a", DataType::F32, TensorShape::Static(vec![2, 3]));
    let b = graph.parameter("b", DataType::F32, TensorShape::Static(vec![4, 2]));
    let mut ctx = BuildCtx::new(&mut graph);

    let record = OperatorRecord::new("MatMul").with_inputs(vec![a, b]);
    assert!(matches!(
        matmul(&record, &mut ctx),
        Err(Error::ShapeMismatch { .. })
    ));
}

#[test]
fn test_matmul_requires_two_inputs() {
    let mut graph = IrGraph::new();
    let a = graph.parameter("a", DataType::F32, TensorShape::Static(vec![2, 3]));
    let mut ctx = BuildCtx::new(&mut graph);

    let record = OperatorRecord::new("MatMul").with_input(a);
    assert!(matches!(
        matmul(&record, &mut ctx),
        Err(Error::MissingInput { index: 1, .. })
    ));
}

#[test]
fn test_matmul_unknown_shape_propagates() {
    let mut graph = IrGraph::new();
    let a = graph.parameter("a", DataType::F32, TensorShape::Unknown);
    let b = graph.parameter("b", DataType::F32, TensorShape::Static(vec![3, 4]));
    let mut ctx = BuildCtx::new(&mut graph);

    let record = OperatorRecord::new("MatMul").with_inputs(vec![a, b]);
    let outputs = matmul(&record, &mut ctx).unwrap();
    assert_eq!(ctx.value_info(outputs[0]).unwrap().shape, TensorShape::Unknown);
}

/// (2, 3) × (3, 2) on fixed values.
#[test]
fn test_matmul_numeric() {
    let mut graph = IrGraph::new();
    let a = graph.parameter("a", DataType::F32, TensorShape::Static(vec![2, 3]));
    let b = graph.parameter("b", DataType::F32, TensorShape::Static(vec![3, 2]));
    let mut ctx = BuildCtx::new(&mut graph);

    let record = OperatorRecord::new("MatMul").with_inputs(vec![a, b]);
    let outputs = matmul(&record, &mut ctx).unwrap();

    let mut bindings = Bindings::new();
    bindings.insert(
        "a".to_string(),
        TensorValue::new(
            TensorData::F32(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]),
            vec![2, 3],
            DataType::F32,
        ),
    );
    bindings.insert(
        "b".to_string(),
        TensorValue::new(
            TensorData::F32(vec![7.0, 8.0, 9.0, 10.0, 11.0, 12.0]),
            vec![3, 2],
            DataType::F32,
        ),
    );

    let result = evaluate(&graph, outputs[0], &bindings);
    // [0,0] = 1*7 + 2*9 + 3*11 = 58
    // [0,1] = 1*8 + 2*10 + 3*12 = 64
    // [1,0] = 4*7 + 5*9 + 6*11 = 139
    // [1,1] = 4*8 + 5*10 + 6*12 = 154
    assert_eq!(
        result.data.as_f32(),
        Some(&[58.0, 64.0, 139.0, 154.0][..])
    );
}
