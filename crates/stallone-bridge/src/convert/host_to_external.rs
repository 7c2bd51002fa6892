use ndarray::{ArrayViewD, Ix2};

use crate::dtype::HostElement;
use crate::error::ConvertError;
use crate::external::{ArrayFactory, ExternalArray, ExternalBuffer};
use crate::gate::AvailabilityGate;
use crate::host::HostArray;

/// Convert a host array into an external vector (rank 1) or matrix (rank 2).
///
/// Float arrays become double arrays and int arrays become integer arrays.
/// Checks run in a fixed order: availability, element kind, rank.
pub fn to_external_with(
    gate: &AvailabilityGate,
    host: &HostArray,
) -> Result<ExternalArray, ConvertError> {
    let api = gate.api()?;
    log::debug!(
        "called to_external() on {} array of shape {:?}",
        host.kind(),
        host.shape()
    );

    let factory = match host.kind().external_kind() {
        Some(kind) => api.factory(kind),
        None => return Err(ConvertError::element_kind(host.kind())),
    };

    match host {
        HostArray::Float32(a) => build(factory, a.view()),
        HostArray::Float64(a) => build(factory, a.view()),
        HostArray::Int32(a) => build(factory, a.view()),
        HostArray::Int64(a) => build(factory, a.view()),
        other => Err(ConvertError::element_kind(other.kind())),
    }
}

fn build<T: HostElement>(
    factory: &dyn ArrayFactory,
    array: ArrayViewD<'_, T>,
) -> Result<ExternalArray, ConvertError> {
    match array.ndim() {
        1 => vector(factory, array),
        2 => matrix(factory, array),
        _ => Err(ConvertError::UnsupportedShape {
            shape: array.shape().to_vec(),
        }),
    }
}

fn vector<T: HostElement>(
    factory: &dyn ArrayFactory,
    array: ArrayViewD<'_, T>,
) -> Result<ExternalArray, ConvertError> {
    log::debug!("creating java vector of length {}", array.len());
    let mut values = ExternalBuffer::with_capacity(T::EXTERNAL, array.len());
    for &v in array.iter() {
        values.push(v.to_external()?)?;
    }
    Ok(factory.array_from(values)?)
}

fn matrix<T: HostElement>(
    factory: &dyn ArrayFactory,
    array: ArrayViewD<'_, T>,
) -> Result<ExternalArray, ConvertError> {
    let shape = array.shape().to_vec();
    let array = array
        .into_dimensionality::<Ix2>()
        .map_err(|_| ConvertError::UnsupportedShape { shape })?;
    let (n, m) = array.dim();

    log::debug!("creating java matrix of shape ({}, {})", n, m);
    let mut target = match factory.matrix(n, m)? {
        Some(target) => target,
        None => factory.table(n, m)?,
    };
    log::debug!("created java matrix {}", target.type_name());

    // one call across the boundary per element; no bulk setter exists
    for i in 0..n {
        for j in 0..m {
            target.set(i, j, array[(i, j)].to_external()?)?;
        }
    }
    log::debug!("finished setting values");

    Ok(target)
}
