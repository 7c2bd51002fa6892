use ndarray::{arr1, arr2, Array3, ArrayD, IxDyn};

use super::*;
use crate::dtype::ExternalKind;
use crate::error::ConvertError;
use crate::gate::AvailabilityGate;
use crate::host::HostArray;
use crate::memory::{DenseArray, ForeignObject, MemoryApi, SparseStub};

fn ready(api: MemoryApi) -> AvailabilityGate {
    let gate = AvailabilityGate::new();
    gate.initialize_with(Box::new(api));
    gate
}

#[test]
fn test_float_vector_to_external() {
    let gate = ready(MemoryApi::new());
    let host = HostArray::from(arr1(&[1.0f64, 2.0, 3.0]));
    let ext = to_external_with(&gate, &host).unwrap();

    assert_eq!(ext.kind(), Some(ExternalKind::Double));
    assert_eq!(ext.order(), 1);
    assert_eq!(ext.rows(), 3);
    assert_eq!(
        ext.array().unwrap(),
        crate::external::ExternalBuffer::Double(vec![1.0, 2.0, 3.0])
    );
}

#[test]
fn test_float32_matrix_uses_dense_constructor() {
    let gate = ready(MemoryApi::new());
    let host = HostArray::from(arr2(&[[1.5f32, 2.5], [3.5, 4.5], [5.5, 6.5]]));
    let ext = to_external_with(&gate, &host).unwrap();

    assert_eq!(ext.type_name(), "DoubleMatrix");
    assert_eq!((ext.rows(), ext.columns(), ext.order()), (3, 2, 2));
    assert_eq!(
        ext.table_row(2).unwrap(),
        crate::external::ExternalBuffer::Double(vec![5.5, 6.5])
    );
}

#[test]
fn test_matrix_falls_back_to_table() {
    let gate = ready(MemoryApi::without_matrix());
    let host = HostArray::from(arr2(&[[1i64, 2], [3, 4]]));
    let ext = to_external_with(&gate, &host).unwrap();

    assert_eq!(ext.type_name(), "IntTable");
    assert_eq!(
        ext.table_row(1).unwrap(),
        crate::external::ExternalBuffer::Integer(vec![3, 4])
    );
}

#[test]
fn test_transposed_view_keeps_logical_order() {
    let gate = ready(MemoryApi::new());
    let a = arr2(&[[1i32, 2, 3], [4, 5, 6]]).reversed_axes();
    let host = HostArray::from(a);
    let ext = to_external_with(&gate, &host).unwrap();

    assert_eq!((ext.rows(), ext.columns()), (3, 2));
    let back = from_external_with(&gate, ext.as_ref()).unwrap();
    assert_eq!(back.shape(), &[3, 2]);
    let expected = [[1, 4], [2, 5], [3, 6]];
    for (i, row) in expected.iter().enumerate() {
        for (j, &v) in row.iter().enumerate() {
            let got = match &back {
                HostArray::Int64(a) => a[[i, j]],
                HostArray::Int32(a) => a[[i, j]] as i64,
                other => panic!("unexpected kind {}", other.kind()),
            };
            assert_eq!(got, v);
        }
    }
}

#[test]
fn test_rejects_unsupported_kind_before_shape() {
    let gate = ready(MemoryApi::new());
    let host = HostArray::from(Array3::<bool>::from_elem((2, 2, 2), true));
    let err = to_external_with(&gate, &host).unwrap_err();
    assert_eq!(
        err,
        ConvertError::UnsupportedElementKind {
            found: "bool".to_string()
        }
    );
}

#[test]
fn test_rejects_rank_zero_and_three() {
    let gate = ready(MemoryApi::new());

    let scalar = HostArray::from(ArrayD::<f64>::zeros(IxDyn(&[])));
    assert_eq!(
        to_external_with(&gate, &scalar).unwrap_err(),
        ConvertError::UnsupportedShape { shape: vec![] }
    );

    let cube = HostArray::from(Array3::<i32>::zeros((1, 2, 3)));
    assert_eq!(
        to_external_with(&gate, &cube).unwrap_err(),
        ConvertError::UnsupportedShape {
            shape: vec![1, 2, 3]
        }
    );
}

#[test]
fn test_int64_overflow_is_an_error() {
    let gate = ready(MemoryApi::new());
    let host = HostArray::from(arr1(&[1i64, i64::MAX]));
    assert_eq!(
        to_external_with(&gate, &host).unwrap_err(),
        ConvertError::ElementOutOfRange { value: i64::MAX }
    );
}

#[test]
fn test_unavailable_checked_first() {
    let gate = AvailabilityGate::new();
    gate.mark_unavailable("stallone could not be found");

    let bad = HostArray::from(arr1(&[true]));
    assert!(matches!(
        to_external_with(&gate, &bad),
        Err(ConvertError::Unavailable { .. })
    ));

    let foreign = ForeignObject {
        name: "java.lang.String".to_string(),
    };
    assert!(matches!(
        from_external_with(&gate, &foreign),
        Err(ConvertError::Unavailable { .. })
    ));
}

#[test]
fn test_from_external_rejects_foreign_object() {
    let gate = ready(MemoryApi::new());
    let foreign = ForeignObject {
        name: "java.lang.String".to_string(),
    };
    assert_eq!(
        from_external_with(&gate, &foreign).unwrap_err(),
        ConvertError::UnsupportedElementKind {
            found: "java.lang.String".to_string()
        }
    );
}

#[test]
fn test_from_external_rejects_sparse() {
    let gate = ready(MemoryApi::new());
    let sparse = SparseStub { rows: 4, cols: 4 };
    assert_eq!(
        from_external_with(&gate, &sparse).unwrap_err(),
        ConvertError::UnsupportedLayout { order: 3 }
    );
}

#[test]
fn test_from_external_table() {
    let gate = ready(MemoryApi::new());
    let table = DenseArray::from_shape_vec((2, 3), vec![1.0f64, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
    let host = from_external_with(&gate, &table).unwrap();
    assert_eq!(
        host,
        HostArray::from(arr2(&[[1.0f64, 2.0, 3.0], [4.0, 5.0, 6.0]]))
    );
}

#[test]
fn test_from_external_vector_is_reshaped_to_column() {
    let gate = ready(MemoryApi::new());
    let vector = DenseArray::vector(vec![7i32, 8, 9]);
    let host = from_external_with(&gate, &vector).unwrap();
    assert_eq!(host.shape(), &[3, 1]);
    assert_eq!(host.kind(), crate::dtype::native_int_kind());
}
