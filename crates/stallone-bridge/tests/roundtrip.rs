//! Round trips through the in-memory runtime.

use ndarray::{arr1, arr2, Array1, Array2};
use proptest::prelude::*;

use stallone_bridge::convert::{from_external_with, to_external_with};
use stallone_bridge::memory::MemoryApi;
use stallone_bridge::{native_int_kind, AvailabilityGate, ElementKind, HostArray};

fn ready_gate(api: MemoryApi) -> AvailabilityGate {
    let _ = env_logger::builder().is_test(true).try_init();
    let gate = AvailabilityGate::new();
    assert!(gate.initialize_with(Box::new(api)));
    gate
}

fn round_trip(gate: &AvailabilityGate, host: HostArray) -> HostArray {
    let ext = to_external_with(gate, &host).expect("to_external failed");
    from_external_with(gate, ext.as_ref()).expect("from_external failed")
}

fn f64_values(host: &HostArray) -> Vec<f64> {
    host.as_f64().expect("expected float64 array").iter().copied().collect()
}

fn int_values(host: &HostArray) -> Vec<i64> {
    match host {
        HostArray::Int64(a) => a.iter().copied().collect(),
        HostArray::Int32(a) => a.iter().map(|&v| v as i64).collect(),
        other => panic!("expected native int array, got {}", other.kind()),
    }
}

// ---------------------------------------------------------------------------
// Concrete scenarios
// ---------------------------------------------------------------------------

#[test]
fn float64_vector_comes_back_as_column() {
    let gate = ready_gate(MemoryApi::new());
    let host = HostArray::from(arr1(&[1.0f64, 2.0, 3.0]));

    let ext = to_external_with(&gate, &host).unwrap();
    assert_eq!(ext.type_name(), "DoubleVector");
    assert_eq!(ext.rows(), 3);

    let back = from_external_with(&gate, ext.as_ref()).unwrap();
    // flat arrays are reshaped to (rows, columns) = (3, 1)
    assert_eq!(back.shape(), &[3, 1]);
    assert_eq!(back.kind(), ElementKind::Float64);
    assert_eq!(f64_values(&back), vec![1.0, 2.0, 3.0]);
}

#[test]
fn int32_matrix_is_promoted_to_native_int() {
    let gate = ready_gate(MemoryApi::new());
    let back = round_trip(&gate, HostArray::from(arr2(&[[1i32, 2], [3, 4]])));

    assert_eq!(back.shape(), &[2, 2]);
    assert_eq!(back.kind(), native_int_kind());
    assert_eq!(int_values(&back), vec![1, 2, 3, 4]);
}

#[test]
fn table_fallback_round_trip() {
    let gate = ready_gate(MemoryApi::without_matrix());
    let back = round_trip(&gate, HostArray::from(arr2(&[[0.5f64, -1.0, 2.0]])));
    assert_eq!(back.shape(), &[1, 3]);
    assert_eq!(f64_values(&back), vec![0.5, -1.0, 2.0]);
}

#[test]
fn empty_vector_round_trip() {
    let gate = ready_gate(MemoryApi::new());
    let back = round_trip(&gate, HostArray::from(Array1::<i64>::zeros(0)));
    assert_eq!(back.shape(), &[0, 1]);
    assert!(back.is_empty());
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

fn matrix_f64() -> impl Strategy<Value = Array2<f64>> {
    (1usize..6, 1usize..6).prop_flat_map(|(r, c)| {
        prop::collection::vec(prop::num::f64::NORMAL | prop::num::f64::ZERO, r * c)
            .prop_map(move |v| Array2::from_shape_vec((r, c), v).unwrap())
    })
}

fn matrix_i32() -> impl Strategy<Value = Array2<i32>> {
    (1usize..6, 1usize..6).prop_flat_map(|(r, c)| {
        prop::collection::vec(any::<i32>(), r * c)
            .prop_map(move |v| Array2::from_shape_vec((r, c), v).unwrap())
    })
}

proptest! {
    #[test]
    fn vector_f32_values_survive(values in prop::collection::vec(prop::num::f32::NORMAL, 0..40)) {
        let gate = ready_gate(MemoryApi::new());
        let back = round_trip(&gate, HostArray::from(Array1::from(values.clone())));
        prop_assert_eq!(back.shape(), &[values.len(), 1][..]);
        let expected: Vec<u64> = values.iter().map(|&v| f64::from(v).to_bits()).collect();
        let got: Vec<u64> = f64_values(&back).iter().map(|v| v.to_bits()).collect();
        prop_assert_eq!(got, expected);
    }

    #[test]
    fn vector_i64_values_survive(values in prop::collection::vec(i32::MIN as i64..=i32::MAX as i64, 0..40)) {
        let gate = ready_gate(MemoryApi::new());
        let back = round_trip(&gate, HostArray::from(Array1::from(values.clone())));
        prop_assert_eq!(int_values(&back), values);
    }

    #[test]
    fn matrix_f64_is_bit_exact(a in matrix_f64()) {
        let gate = ready_gate(MemoryApi::new());
        let back = round_trip(&gate, HostArray::from(a.clone()));
        prop_assert_eq!(back.shape(), a.shape());
        let expected: Vec<u64> = a.iter().map(|v| v.to_bits()).collect();
        let got: Vec<u64> = f64_values(&back).iter().map(|v| v.to_bits()).collect();
        prop_assert_eq!(got, expected);
    }

    #[test]
    fn matrix_i32_keeps_row_major_order(a in matrix_i32(), dense in any::<bool>()) {
        let api = if dense { MemoryApi::new() } else { MemoryApi::without_matrix() };
        let gate = ready_gate(api);
        let back = round_trip(&gate, HostArray::from(a.clone()));
        prop_assert_eq!(back.shape(), a.shape());
        let expected: Vec<i64> = a.iter().map(|&v| v as i64).collect();
        prop_assert_eq!(int_values(&back), expected);
    }
}
