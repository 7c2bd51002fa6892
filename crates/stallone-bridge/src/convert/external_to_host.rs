use ndarray::Array2;

use crate::dtype::ExternalKind;
use crate::error::{ConvertError, RuntimeError};
use crate::external::{ExternalBuffer, ExternalObject};
use crate::gate::AvailabilityGate;
use crate::host::HostArray;

/// Convert an external integer or double array into a host array.
///
/// Double arrays come back as `float64`, integer arrays as the platform's
/// native integer kind (see [`crate::dtype::native_int_kind`]). The result
/// always has shape `(rows, columns)` as reported by the object, so a flat
/// external vector of length `n` comes back as an `(n, 1)` array.
pub fn from_external_with(
    gate: &AvailabilityGate,
    object: &dyn ExternalObject,
) -> Result<HostArray, ConvertError> {
    gate.api()?;

    let kind = object
        .kind()
        .ok_or_else(|| ConvertError::UnsupportedElementKind {
            found: object.type_name().to_string(),
        })?;

    let rows = object.rows();
    let columns = object.columns();
    let order = object.order();
    log::debug!(
        "called from_external() on {} (order {}, {}x{}) -> {}",
        object.type_name(),
        order,
        rows,
        columns,
        kind.host_kind()
    );

    let data = match order {
        0 | 1 => checked(kind, object.array()?)?,
        2 => {
            if rows.checked_mul(columns).is_none() {
                return Err(RuntimeError::new(format!(
                    "reported dimensions {}x{} overflow",
                    rows, columns
                ))
                .into());
            }
            // grows row by row; the reported size is not trusted for allocation
            let mut data = ExternalBuffer::with_capacity(kind, 0);
            for i in 0..rows {
                let row = checked(kind, object.table_row(i)?)?;
                if row.len() != columns {
                    return Err(RuntimeError::new(format!(
                        "row {} has {} elements, expected {}",
                        i,
                        row.len(),
                        columns
                    ))
                    .into());
                }
                data.append(row)?;
            }
            data
        }
        // 3 is the library's sparse layout, which it never implemented
        _ => return Err(ConvertError::UnsupportedLayout { order }),
    };

    reshape(data, rows, columns)
}

fn checked(kind: ExternalKind, buffer: ExternalBuffer) -> Result<ExternalBuffer, RuntimeError> {
    if buffer.kind() != kind {
        return Err(RuntimeError::new(format!(
            "{} returned {} elements",
            kind,
            buffer.kind()
        )));
    }
    Ok(buffer)
}

fn reshape(data: ExternalBuffer, rows: usize, columns: usize) -> Result<HostArray, ConvertError> {
    let len = data.len();
    let mismatch = |_| ConvertError::ReshapeMismatch { len, rows, columns };
    match data {
        ExternalBuffer::Double(v) => Ok(Array2::from_shape_vec((rows, columns), v)
            .map_err(mismatch)?
            .into()),
        ExternalBuffer::Integer(v) => Ok(Array2::from_shape_vec((rows, columns), native_ints(v))
            .map_err(mismatch)?
            .into()),
    }
}

#[cfg(target_pointer_width = "64")]
fn native_ints(values: Vec<i32>) -> Vec<i64> {
    values.into_iter().map(i64::from).collect()
}

#[cfg(not(target_pointer_width = "64"))]
fn native_ints(values: Vec<i32>) -> Vec<i32> {
    values
}
