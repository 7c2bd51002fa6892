//! Element kinds on both sides of the boundary and the numeric casts
//! between them.
use std::fmt;
use std::mem;

use crate::error::ConvertError;
use crate::external::ExternalValue;

/// Element kind of a host array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Float32,
    Float64,
    Int32,
    Int64,
    UInt8,
    Bool,
}

impl ElementKind {
    /// Size in bytes
    #[inline]
    pub const fn size(&self) -> usize {
        match self {
            ElementKind::Float32 => mem::size_of::<f32>(),
            ElementKind::Float64 => mem::size_of::<f64>(),
            ElementKind::Int32 => mem::size_of::<i32>(),
            ElementKind::Int64 => mem::size_of::<i64>(),
            ElementKind::UInt8 => mem::size_of::<u8>(),
            ElementKind::Bool => mem::size_of::<bool>(),
        }
    }

    /// External representation this kind converts to, if any. Floats map to
    /// the double arrays, 32/64-bit signed ints to the integer arrays.
    pub const fn external_kind(&self) -> Option<ExternalKind> {
        match self {
            ElementKind::Float32 | ElementKind::Float64 => Some(ExternalKind::Double),
            ElementKind::Int32 | ElementKind::Int64 => Some(ExternalKind::Integer),
            ElementKind::UInt8 | ElementKind::Bool => None,
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            ElementKind::Float32 => "float32",
            ElementKind::Float64 => "float64",
            ElementKind::Int32 => "int32",
            ElementKind::Int64 => "int64",
            ElementKind::UInt8 => "uint8",
            ElementKind::Bool => "bool",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Element representation of an external array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExternalKind {
    Double,
    Integer,
}

impl ExternalKind {
    /// Host kind produced when reading an external array of this kind back.
    pub const fn host_kind(&self) -> ElementKind {
        match self {
            ExternalKind::Double => ElementKind::Float64,
            ExternalKind::Integer => native_int_kind(),
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            ExternalKind::Double => "IDoubleArray",
            ExternalKind::Integer => "IIntArray",
        }
    }
}

impl fmt::Display for ExternalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Host integer kind matching the platform's native word size. Integer
/// arrays read back from the external side always come out in this kind.
#[cfg(target_pointer_width = "64")]
pub const fn native_int_kind() -> ElementKind {
    ElementKind::Int64
}

#[cfg(not(target_pointer_width = "64"))]
pub const fn native_int_kind() -> ElementKind {
    ElementKind::Int32
}

/// A host element type that has an external counterpart.
pub trait HostElement: Copy + fmt::Debug + 'static {
    const KIND: ElementKind;
    const EXTERNAL: ExternalKind;

    /// Numeric cast into the external representation.
    fn to_external(self) -> Result<ExternalValue, ConvertError>;
}

impl HostElement for f32 {
    const KIND: ElementKind = ElementKind::Float32;
    const EXTERNAL: ExternalKind = ExternalKind::Double;

    #[inline]
    fn to_external(self) -> Result<ExternalValue, ConvertError> {
        Ok(ExternalValue::Double(f64::from(self)))
    }
}

impl HostElement for f64 {
    const KIND: ElementKind = ElementKind::Float64;
    const EXTERNAL: ExternalKind = ExternalKind::Double;

    #[inline]
    fn to_external(self) -> Result<ExternalValue, ConvertError> {
        Ok(ExternalValue::Double(self))
    }
}

impl HostElement for i32 {
    const KIND: ElementKind = ElementKind::Int32;
    const EXTERNAL: ExternalKind = ExternalKind::Integer;

    #[inline]
    fn to_external(self) -> Result<ExternalValue, ConvertError> {
        Ok(ExternalValue::Integer(self))
    }
}

impl HostElement for i64 {
    const KIND: ElementKind = ElementKind::Int64;
    const EXTERNAL: ExternalKind = ExternalKind::Integer;

    #[inline]
    fn to_external(self) -> Result<ExternalValue, ConvertError> {
        i32::try_from(self)
            .map(ExternalValue::Integer)
            .map_err(|_| ConvertError::ElementOutOfRange { value: self })
    }
}
