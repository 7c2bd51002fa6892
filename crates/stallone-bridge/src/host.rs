//! Host-side n-dimensional arrays.
//!
//! `HostArray` tags an owned `ndarray::ArrayD` with its element kind, so the
//! converters can branch on kind and rank without knowing the element type
//! at compile time. Arrays of any memory layout are accepted; elements are
//! always read in logical (row-major) order.
use ndarray::{Array, ArrayD, ArrayViewD, Dimension};

use crate::dtype::ElementKind;

#[derive(Debug, Clone, PartialEq)]
pub enum HostArray {
    Float32(ArrayD<f32>),
    Float64(ArrayD<f64>),
    Int32(ArrayD<i32>),
    Int64(ArrayD<i64>),
    UInt8(ArrayD<u8>),
    Bool(ArrayD<bool>),
}

macro_rules! host_variant {
    ($t:ty, $variant:ident, $view:ident) => {
        impl<D: Dimension> From<Array<$t, D>> for HostArray {
            fn from(value: Array<$t, D>) -> Self {
                HostArray::$variant(value.into_dyn())
            }
        }

        impl HostArray {
            pub fn $view(&self) -> Option<ArrayViewD<'_, $t>> {
                match self {
                    HostArray::$variant(a) => Some(a.view()),
                    _ => None,
                }
            }
        }
    };
}

host_variant!(f32, Float32, as_f32);
host_variant!(f64, Float64, as_f64);
host_variant!(i32, Int32, as_i32);
host_variant!(i64, Int64, as_i64);
host_variant!(u8, UInt8, as_u8);
host_variant!(bool, Bool, as_bool);

impl HostArray {
    pub fn kind(&self) -> ElementKind {
        match self {
            HostArray::Float32(_) => ElementKind::Float32,
            HostArray::Float64(_) => ElementKind::Float64,
            HostArray::Int32(_) => ElementKind::Int32,
            HostArray::Int64(_) => ElementKind::Int64,
            HostArray::UInt8(_) => ElementKind::UInt8,
            HostArray::Bool(_) => ElementKind::Bool,
        }
    }

    pub fn shape(&self) -> &[usize] {
        match self {
            HostArray::Float32(a) => a.shape(),
            HostArray::Float64(a) => a.shape(),
            HostArray::Int32(a) => a.shape(),
            HostArray::Int64(a) => a.shape(),
            HostArray::UInt8(a) => a.shape(),
            HostArray::Bool(a) => a.shape(),
        }
    }

    pub fn ndim(&self) -> usize {
        self.shape().len()
    }

    /// Total number of elements
    pub fn len(&self) -> usize {
        self.shape().iter().product()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
