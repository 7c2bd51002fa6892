//! In-process implementation of the library's array API.
//!
//! Mirrors how the VM-hosted library lays out its arrays: a vector built by
//! `arrayFrom` is a single column (`rows = n`, `columns = 1`, order 1) and a
//! matrix or table is row-major with order 2. Useful wherever a JVM is not
//! at hand, tests first among them.
use std::error::Error;
use std::fmt;
use std::marker::PhantomData;
use std::ops::{Index, IndexMut};

use crate::dtype::ExternalKind;
use crate::error::RuntimeError;
use crate::external::{
    ArrayFactory, ExternalArray, ExternalBuffer, ExternalObject, ExternalValue, StalloneApi,
};

/// Element type storable in a [`DenseArray`].
pub trait Stored: Copy + Default + fmt::Debug + Send + Sync + 'static {
    const KIND: ExternalKind;

    fn from_value(value: ExternalValue) -> Option<Self>;

    fn from_buffer(buffer: ExternalBuffer) -> Option<Vec<Self>>;

    fn into_buffer(values: Vec<Self>) -> ExternalBuffer;
}

impl Stored for f64 {
    const KIND: ExternalKind = ExternalKind::Double;

    fn from_value(value: ExternalValue) -> Option<Self> {
        match value {
            ExternalValue::Double(v) => Some(v),
            ExternalValue::Integer(_) => None,
        }
    }

    fn from_buffer(buffer: ExternalBuffer) -> Option<Vec<Self>> {
        match buffer {
            ExternalBuffer::Double(v) => Some(v),
            ExternalBuffer::Integer(_) => None,
        }
    }

    fn into_buffer(values: Vec<Self>) -> ExternalBuffer {
        ExternalBuffer::Double(values)
    }
}

impl Stored for i32 {
    const KIND: ExternalKind = ExternalKind::Integer;

    fn from_value(value: ExternalValue) -> Option<Self> {
        match value {
            ExternalValue::Integer(v) => Some(v),
            ExternalValue::Double(_) => None,
        }
    }

    fn from_buffer(buffer: ExternalBuffer) -> Option<Vec<Self>> {
        match buffer {
            ExternalBuffer::Integer(v) => Some(v),
            ExternalBuffer::Double(_) => None,
        }
    }

    fn into_buffer(values: Vec<Self>) -> ExternalBuffer {
        ExternalBuffer::Integer(values)
    }
}

/// Dense, row-major external array.
#[derive(Clone, Debug, PartialEq)]
pub struct DenseArray<T> {
    data: Vec<T>,
    rows: usize,
    cols: usize,
    order: usize,
    type_name: &'static str,
}

impl<T: Stored> DenseArray<T> {
    /// Column vector holding `data` (order 1).
    pub fn vector(data: Vec<T>) -> Self {
        let rows = data.len();
        Self {
            data,
            rows,
            cols: 1,
            order: 1,
            type_name: type_name(T::KIND, "Vector"),
        }
    }

    /// Zero-filled two-dimensional array (order 2).
    pub fn table(rows: usize, cols: usize) -> Self {
        Self {
            data: vec![T::default(); rows * cols],
            rows,
            cols,
            order: 2,
            type_name: type_name(T::KIND, "Table"),
        }
    }

    fn dense_matrix(rows: usize, cols: usize) -> Self {
        Self {
            type_name: type_name(T::KIND, "Matrix"),
            ..Self::table(rows, cols)
        }
    }

    pub fn from_shape_vec(shape: (usize, usize), data: Vec<T>) -> Result<Self, ShapeError> {
        let (rows, cols) = shape;
        if data.len() != rows * cols {
            return Err(ShapeError {
                rows,
                cols,
                len: data.len(),
            });
        }
        Ok(Self {
            data,
            rows,
            cols,
            order: 2,
            type_name: type_name(T::KIND, "Table"),
        })
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    #[inline]
    fn offset(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    pub fn row_slice(&self, row: usize) -> &[T] {
        let start = self.offset(row, 0);
        &self.data[start..start + self.cols]
    }

    fn check_bounds(&self, row: usize, col: usize) -> Result<(), RuntimeError> {
        if row >= self.rows || col >= self.cols {
            return Err(RuntimeError::new(format!(
                "index ({}, {}) out of bounds for {}x{} array",
                row, col, self.rows, self.cols
            )));
        }
        Ok(())
    }
}

fn type_name(kind: ExternalKind, form: &str) -> &'static str {
    match (kind, form) {
        (ExternalKind::Double, "Vector") => "DoubleVector",
        (ExternalKind::Double, "Matrix") => "DoubleMatrix",
        (ExternalKind::Double, _) => "DoubleTable",
        (ExternalKind::Integer, "Vector") => "IntVector",
        (ExternalKind::Integer, "Matrix") => "IntMatrix",
        (ExternalKind::Integer, _) => "IntTable",
    }
}

impl<T> Index<(usize, usize)> for DenseArray<T> {
    type Output = T;

    fn index(&self, index: (usize, usize)) -> &Self::Output {
        &self.data[index.0 * self.cols + index.1]
    }
}

impl<T> IndexMut<(usize, usize)> for DenseArray<T> {
    fn index_mut(&mut self, index: (usize, usize)) -> &mut Self::Output {
        &mut self.data[index.0 * self.cols + index.1]
    }
}

impl<T: Stored> ExternalObject for DenseArray<T> {
    fn type_name(&self) -> &str {
        self.type_name
    }

    fn kind(&self) -> Option<ExternalKind> {
        Some(T::KIND)
    }

    fn order(&self) -> usize {
        self.order
    }

    fn rows(&self) -> usize {
        self.rows
    }

    fn columns(&self) -> usize {
        self.cols
    }

    fn set(&mut self, row: usize, col: usize, value: ExternalValue) -> Result<(), RuntimeError> {
        self.check_bounds(row, col)?;
        let value = T::from_value(value).ok_or_else(|| {
            RuntimeError::new(format!(
                "cannot store {} element in {}",
                value.kind(),
                self.type_name
            ))
        })?;
        self[(row, col)] = value;
        Ok(())
    }

    fn array(&self) -> Result<ExternalBuffer, RuntimeError> {
        Ok(T::into_buffer(self.data.clone()))
    }

    fn table_row(&self, row: usize) -> Result<ExternalBuffer, RuntimeError> {
        if row >= self.rows {
            return Err(RuntimeError::new(format!(
                "row {} out of bounds for {} rows",
                row, self.rows
            )));
        }
        Ok(T::into_buffer(self.row_slice(row).to_vec()))
    }
}

#[derive(Debug, Clone)]
pub struct ShapeError {
    rows: usize,
    cols: usize,
    len: usize,
}

impl fmt::Display for ShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid shape ({}, {}) for buffer of length {}",
            self.rows, self.cols, self.len
        )
    }
}

impl Error for ShapeError {}

/// Sparse array handle. The library declares this layout (order 3) but
/// offers no dense access to it.
#[derive(Debug, Clone)]
pub struct SparseStub {
    pub rows: usize,
    pub cols: usize,
}

impl ExternalObject for SparseStub {
    fn type_name(&self) -> &str {
        "SparseDoubleArray"
    }

    fn kind(&self) -> Option<ExternalKind> {
        Some(ExternalKind::Double)
    }

    fn order(&self) -> usize {
        3
    }

    fn rows(&self) -> usize {
        self.rows
    }

    fn columns(&self) -> usize {
        self.cols
    }

    fn set(&mut self, _row: usize, _col: usize, _value: ExternalValue) -> Result<(), RuntimeError> {
        Err(RuntimeError::new("sparse arrays are read-only here"))
    }

    fn array(&self) -> Result<ExternalBuffer, RuntimeError> {
        Err(RuntimeError::new("sparse arrays have no dense storage"))
    }

    fn table_row(&self, _row: usize) -> Result<ExternalBuffer, RuntimeError> {
        Err(RuntimeError::new("sparse arrays have no dense storage"))
    }
}

/// Any object of the runtime that is not an integer or double array.
#[derive(Debug, Clone)]
pub struct ForeignObject {
    pub name: String,
}

impl ExternalObject for ForeignObject {
    fn type_name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> Option<ExternalKind> {
        None
    }

    fn order(&self) -> usize {
        0
    }

    fn rows(&self) -> usize {
        0
    }

    fn columns(&self) -> usize {
        0
    }

    fn set(&mut self, _row: usize, _col: usize, _value: ExternalValue) -> Result<(), RuntimeError> {
        Err(RuntimeError::new(format!("{} is not an array", self.name)))
    }

    fn array(&self) -> Result<ExternalBuffer, RuntimeError> {
        Err(RuntimeError::new(format!("{} is not an array", self.name)))
    }

    fn table_row(&self, _row: usize) -> Result<ExternalBuffer, RuntimeError> {
        Err(RuntimeError::new(format!("{} is not an array", self.name)))
    }
}

pub struct MemoryFactory<T> {
    dense_matrix: bool,
    _marker: PhantomData<fn() -> T>,
}

impl<T> MemoryFactory<T> {
    fn new(dense_matrix: bool) -> Self {
        Self {
            dense_matrix,
            _marker: PhantomData,
        }
    }
}

impl<T: Stored> ArrayFactory for MemoryFactory<T> {
    fn kind(&self) -> ExternalKind {
        T::KIND
    }

    fn array_from(&self, values: ExternalBuffer) -> Result<ExternalArray, RuntimeError> {
        let found = values.kind();
        let data = T::from_buffer(values).ok_or_else(|| {
            RuntimeError::new(format!("{} factory given {} elements", T::KIND, found))
        })?;
        Ok(Box::new(DenseArray::vector(data)))
    }

    fn matrix(&self, rows: usize, cols: usize) -> Result<Option<ExternalArray>, RuntimeError> {
        if !self.dense_matrix {
            return Ok(None);
        }
        Ok(Some(Box::new(DenseArray::<T>::dense_matrix(rows, cols))))
    }

    fn table(&self, rows: usize, cols: usize) -> Result<ExternalArray, RuntimeError> {
        Ok(Box::new(DenseArray::<T>::table(rows, cols)))
    }
}

/// `StalloneApi` backed by process memory.
pub struct MemoryApi {
    doubles: MemoryFactory<f64>,
    ints: MemoryFactory<i32>,
}

impl MemoryApi {
    /// Factories exposing both the matrix and the table constructor.
    pub fn new() -> Self {
        Self {
            doubles: MemoryFactory::new(true),
            ints: MemoryFactory::new(true),
        }
    }

    /// Factories exposing only the table constructor.
    pub fn without_matrix() -> Self {
        Self {
            doubles: MemoryFactory::new(false),
            ints: MemoryFactory::new(false),
        }
    }
}

impl Default for MemoryApi {
    fn default() -> Self {
        Self::new()
    }
}

impl StalloneApi for MemoryApi {
    fn doubles(&self) -> &dyn ArrayFactory {
        &self.doubles
    }

    fn ints(&self) -> &dyn ArrayFactory {
        &self.ints
    }
}
