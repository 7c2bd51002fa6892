//! Conversions between host arrays and external arrays.
//!
//! Both directions consult an [`AvailabilityGate`] before looking at their
//! argument. The free functions in the crate root use the process-wide gate.
mod external_to_host;
mod host_to_external;

pub use external_to_host::from_external_with;
pub use host_to_external::to_external_with;

#[cfg(test)]
mod tests;
