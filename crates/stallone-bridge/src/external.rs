//! The foreign-object boundary.
//!
//! External arrays live inside the VM-hosted library; on this side they are
//! only opaque handles queried through `ExternalObject`. The library's class
//! hierarchy is deliberately not modelled: a handle reports whether it is an
//! integer or a double array, its order and its dimensions, and nothing more.
use std::fmt;

use crate::dtype::ExternalKind;
use crate::error::RuntimeError;

/// A single element in the external representation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExternalValue {
    Double(f64),
    Integer(i32),
}

impl ExternalValue {
    pub fn kind(&self) -> ExternalKind {
        match self {
            ExternalValue::Double(_) => ExternalKind::Double,
            ExternalValue::Integer(_) => ExternalKind::Integer,
        }
    }
}

/// A contiguous run of elements copied across the boundary, e.g. the result
/// of `getArray()` or one row of `getTable()`.
#[derive(Debug, Clone, PartialEq)]
pub enum ExternalBuffer {
    Double(Vec<f64>),
    Integer(Vec<i32>),
}

impl ExternalBuffer {
    pub fn kind(&self) -> ExternalKind {
        match self {
            ExternalBuffer::Double(_) => ExternalKind::Double,
            ExternalBuffer::Integer(_) => ExternalKind::Integer,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ExternalBuffer::Double(v) => v.len(),
            ExternalBuffer::Integer(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Empty buffer of the given kind with room for `capacity` elements.
    pub fn with_capacity(kind: ExternalKind, capacity: usize) -> Self {
        match kind {
            ExternalKind::Double => ExternalBuffer::Double(Vec::with_capacity(capacity)),
            ExternalKind::Integer => ExternalBuffer::Integer(Vec::with_capacity(capacity)),
        }
    }

    /// Append a value, failing if its kind differs from the buffer's.
    pub fn push(&mut self, value: ExternalValue) -> Result<(), RuntimeError> {
        match (self, value) {
            (ExternalBuffer::Double(v), ExternalValue::Double(x)) => v.push(x),
            (ExternalBuffer::Integer(v), ExternalValue::Integer(x)) => v.push(x),
            (buffer, value) => {
                return Err(RuntimeError::new(format!(
                    "cannot store {} element in {} buffer",
                    value.kind(),
                    buffer.kind()
                )))
            }
        }
        Ok(())
    }

    /// Append all elements of `other`, which must be of the same kind.
    pub fn append(&mut self, other: ExternalBuffer) -> Result<(), RuntimeError> {
        match (self, other) {
            (ExternalBuffer::Double(v), ExternalBuffer::Double(w)) => v.extend(w),
            (ExternalBuffer::Integer(v), ExternalBuffer::Integer(w)) => v.extend(w),
            (buffer, other) => {
                return Err(RuntimeError::new(format!(
                    "cannot append {} elements to {} buffer",
                    other.kind(),
                    buffer.kind()
                )))
            }
        }
        Ok(())
    }
}

/// Opaque handle to an array object owned by the external runtime.
pub trait ExternalObject: fmt::Debug + Send {
    /// Class name as reported by the runtime, used in error messages.
    fn type_name(&self) -> &str;

    /// Runtime type predicate: `Some` only for integer and double arrays.
    fn kind(&self) -> Option<ExternalKind>;

    /// The library's layout indicator: 0/1 flat, 2 table, 3 sparse.
    fn order(&self) -> usize;

    fn rows(&self) -> usize;

    fn columns(&self) -> usize;

    /// Store one element of a two-dimensional array.
    fn set(&mut self, row: usize, col: usize, value: ExternalValue) -> Result<(), RuntimeError>;

    /// All elements in storage order (`getArray()`).
    fn array(&self) -> Result<ExternalBuffer, RuntimeError>;

    /// Row `row` of the table form (`getTable()[row]`), cast to the
    /// object's element kind.
    fn table_row(&self, row: usize) -> Result<ExternalBuffer, RuntimeError>;
}

/// Owned external array; ownership passes to the caller of a conversion.
pub type ExternalArray = Box<dyn ExternalObject>;

/// One of the library's array factories (`API.doublesNew`, `API.intsNew`).
pub trait ArrayFactory: Send + Sync {
    fn kind(&self) -> ExternalKind;

    /// Vector constructor from host-ordered elements (`arrayFrom`).
    fn array_from(&self, values: ExternalBuffer) -> Result<ExternalArray, RuntimeError>;

    /// Dense matrix constructor. Not every factory exposes one; those that
    /// don't return `Ok(None)` and callers fall back to [`ArrayFactory::table`].
    fn matrix(&self, _rows: usize, _cols: usize) -> Result<Option<ExternalArray>, RuntimeError> {
        Ok(None)
    }

    /// Table constructor.
    fn table(&self, rows: usize, cols: usize) -> Result<ExternalArray, RuntimeError>;
}

/// Entry points of the VM-hosted library, available once the runtime is up.
pub trait StalloneApi: Send + Sync {
    fn doubles(&self) -> &dyn ArrayFactory;

    fn ints(&self) -> &dyn ArrayFactory;

    fn factory(&self, kind: ExternalKind) -> &dyn ArrayFactory {
        match kind {
            ExternalKind::Double => self.doubles(),
            ExternalKind::Integer => self.ints(),
        }
    }
}
