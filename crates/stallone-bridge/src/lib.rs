//! stallone-bridge: array conversion between ndarray and the Stallone library.
//!
//! Stallone runs inside a JVM and is reached through a binding layer. This
//! crate converts host arrays (`ndarray`, wrapped in [`HostArray`]) into
//! Stallone's double/integer vectors and matrices and back. The binding is
//! abstracted behind the [`StalloneApi`] and [`ExternalObject`] traits; an
//! in-process implementation lives in [`memory`].
//!
//! Bring the runtime up once with [`bootstrap::initialize_global`], then use
//! [`to_external`] and [`from_external`]. Both fail with
//! [`ConvertError::Unavailable`] until the runtime is up.
pub mod bootstrap;
pub mod convert;
pub mod dtype;
pub mod error;
pub mod external;
pub mod gate;
pub mod host;
pub mod memory;

pub use dtype::{native_int_kind, ElementKind, ExternalKind, HostElement};
pub use error::{BootstrapError, ConvertError, RuntimeError};
pub use external::{
    ArrayFactory, ExternalArray, ExternalBuffer, ExternalObject, ExternalValue, StalloneApi,
};
pub use gate::{is_available, AvailabilityGate};
pub use host::HostArray;

/// Convert a host array using the process-wide runtime.
pub fn to_external(host: &HostArray) -> Result<ExternalArray, ConvertError> {
    convert::to_external_with(gate::global(), host)
}

/// Convert an external array using the process-wide runtime.
pub fn from_external(object: &dyn ExternalObject) -> Result<HostArray, ConvertError> {
    convert::from_external_with(gate::global(), object)
}
