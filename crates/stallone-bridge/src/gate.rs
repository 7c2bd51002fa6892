//! Availability gate for the external runtime.
//!
//! The gate is written exactly once, at start-up, and read by every
//! conversion. An uninitialized gate reads as unavailable.
use std::fmt;
use std::sync::OnceLock;

use crate::error::ConvertError;
use crate::external::StalloneApi;

enum GateState {
    Ready(Box<dyn StalloneApi>),
    Unavailable(String),
}

pub struct AvailabilityGate {
    state: OnceLock<GateState>,
}

static GLOBAL: AvailabilityGate = AvailabilityGate::new();

/// The process-wide gate used by [`crate::to_external`] and
/// [`crate::from_external`].
pub fn global() -> &'static AvailabilityGate {
    &GLOBAL
}

/// Is the external library usable in this process?
pub fn is_available() -> bool {
    GLOBAL.is_available()
}

impl AvailabilityGate {
    pub const fn new() -> Self {
        Self {
            state: OnceLock::new(),
        }
    }

    /// Record a ready runtime. Returns `false` if the gate was already set.
    pub fn initialize_with(&self, api: Box<dyn StalloneApi>) -> bool {
        self.set(GateState::Ready(api))
    }

    /// Record that the runtime could not be brought up.
    pub fn mark_unavailable(&self, reason: impl Into<String>) -> bool {
        self.set(GateState::Unavailable(reason.into()))
    }

    fn set(&self, state: GateState) -> bool {
        let accepted = self.state.set(state).is_ok();
        if !accepted {
            log::warn!("availability gate already initialized, ignoring second write");
        }
        accepted
    }

    pub fn is_initialized(&self) -> bool {
        self.state.get().is_some()
    }

    pub fn is_available(&self) -> bool {
        matches!(self.state.get(), Some(GateState::Ready(_)))
    }

    /// The library entry points, or `Unavailable` naming why not.
    pub fn api(&self) -> Result<&dyn StalloneApi, ConvertError> {
        match self.state.get() {
            Some(GateState::Ready(api)) => Ok(api.as_ref()),
            Some(GateState::Unavailable(reason)) => Err(ConvertError::Unavailable {
                reason: reason.clone(),
            }),
            None => Err(ConvertError::Unavailable {
                reason: "runtime not initialized".to_string(),
            }),
        }
    }
}

impl Default for AvailabilityGate {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for AvailabilityGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self.state.get() {
            None => "uninitialized",
            Some(GateState::Ready(_)) => "ready",
            Some(GateState::Unavailable(_)) => "unavailable",
        };
        f.debug_struct("AvailabilityGate")
            .field("state", &state)
            .finish()
    }
}
