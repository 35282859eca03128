//! Tests for the QLinearMatMul fusion.

mod common;

use common::{evaluate, Bindings};
use skarn_core::{
    BuildCtx, DataType, Error, IrGraph, OpKind, OperatorRecord, TensorData, TensorShape,
    TensorValue, Value,
};
use skarn_operators::operators::qlinear_matmul;

struct Fixture {
    graph: IrGraph,
    outputs: Vec<Value>,
}

/// Build the 8-input record with u8 operands and scalar quantization
/// parameters, then translate it.
fn translate_fixture(a_scale: f32, a_zp: u8, b_scale: f32, b_zp: u8, y_scale: f32, y_zp: u8) -> Fixture {
    let mut graph = IrGraph::new();
    let a = graph.parameter("a", DataType::U8, TensorShape::Static(vec![2, 2]));
    let b = graph.parameter("b", DataType::U8, TensorShape::Static(vec![2, 2]));

    let mut ctx = BuildCtx::new(&mut graph);
    let scalar_u8 = |ctx: &mut BuildCtx, v: u8| {
        ctx.constant(TensorValue::scalar(TensorData::U8(vec![v]), DataType::U8))
            .unwrap()
    };
    let scalar_f32 = |ctx: &mut BuildCtx, v: f32| ctx.scalar(v, DataType::F32).unwrap();

    let inputs = vec![
        a,
        scalar_f32(&mut ctx, a_scale),
        scalar_u8(&mut ctx, a_zp),
        b,
        scalar_f32(&mut ctx, b_scale),
        scalar_u8(&mut ctx, b_zp),
        scalar_f32(&mut ctx, y_scale),
        scalar_u8(&mut ctx, y_zp),
    ];

    let record = OperatorRecord::new("QLinearMatMul").with_inputs(inputs);
    let outputs = qlinear_matmul(&record, &mut ctx).unwrap();
    Fixture { graph, outputs }
}

#[test]
fn test_only_the_quantized_result_is_exposed() {
    let fixture = translate_fixture(0.05, 120, 0.1, 128, 0.5, 0);
    assert_eq!(fixture.outputs.len(), 1);

    let final_node = fixture.graph.producer(fixture.outputs[0]).unwrap();
    assert_eq!(final_node.op, OpKind::Quantize);

    // The quantize node wraps the floating matrix product of the two
    // dequantized operands.
    let product = fixture.graph.producer(final_node.inputs[0]).unwrap();
    assert_eq!(product.op, OpKind::MatMul);

    let dequantized_a = fixture.graph.producer(product.inputs[0]).unwrap();
    let dequantized_b = fixture.graph.producer(product.inputs[1]).unwrap();
    assert_eq!(dequantized_a.op, OpKind::Multiply);
    assert_eq!(dequantized_b.op, OpKind::Multiply);
}

#[test]
fn test_output_type_follows_zero_point() {
    let fixture = translate_fixture(0.05, 120, 0.1, 128, 0.5, 3);
    let info = fixture.graph.value_info(fixture.outputs[0]).unwrap();
    assert_eq!(info.dtype, DataType::U8);
    assert_eq!(info.shape, TensorShape::Static(vec![2, 2]));
}

#[test]
fn test_all_eight_inputs_required() {
    let mut graph = IrGraph::new();
    let a = graph.parameter("a", DataType::U8, TensorShape::Static(vec![2, 2]));
    let mut ctx = BuildCtx::new(&mut graph);

    let record = OperatorRecord::new("QLinearMatMul").with_input(a);
    assert!(matches!(
        qlinear_matmul(&record, &mut ctx),
        Err(Error::MissingInput { index: 1, .. })
    ));
}

/// The fusion matches the reference composition
/// `quantize(matmul(dequantize(a), dequantize(b)), y_scale, y_zero_point)`
/// on fixed values.
#[test]
fn test_numeric_equivalence_to_reference_composition() {
    let (a_scale, a_zp) = (0.05f32, 10u8);
    let (b_scale, b_zp) = (0.1f32, 4u8);
    let (y_scale, y_zp) = (0.3f32, 2u8);
    let fixture = translate_fixture(a_scale, a_zp, b_scale, b_zp, y_scale, y_zp);

    let a_data = [12u8, 20, 8, 30];
    let b_data = [6u8, 14, 10, 2];

    let mut bindings = Bindings::new();
    bindings.insert(
        "a".to_string(),
        TensorValue::new(TensorData::U8(a_data.to_vec()), vec![2, 2], DataType::U8),
    );
    bindings.insert(
        "b".to_string(),
        TensorValue::new(TensorData::U8(b_data.to_vec()), vec![2, 2], DataType::U8),
    );

    let result = evaluate(&fixture.graph, fixture.outputs[0], &bindings);

    // Reference composition computed directly on the fixed values.
    let dequant_a: Vec<f32> = a_data
        .iter()
        .map(|&v| (v as f32 - a_zp as f32) * a_scale)
        .collect();
    let dequant_b: Vec<f32> = b_data
        .iter()
        .map(|&v| (v as f32 - b_zp as f32) * b_scale)
        .collect();
    let product = [
        dequant_a[0] * dequant_b[0] + dequant_a[1] * dequant_b[2],
        dequant_a[0] * dequant_b[1] + dequant_a[1] * dequant_b[3],
        dequant_a[2] * dequant_b[0] + dequant_a[3] * dequant_b[2],
        dequant_a[2] * dequant_b[1] + dequant_a[3] * dequant_b[3],
    ];
    let expected: Vec<u8> = product
        .iter()
        .map(|&v| ((v / y_scale).round() + y_zp as f32).clamp(0.0, 255.0) as u8)
        .collect();

    assert_eq!(result.data.as_u8(), Some(expected.as_slice()));
}
