//! Start-up of the VM hosting the external library.
//!
//! The VM itself is reached through a [`VmLauncher`]; this module owns the
//! start-up parameters and records the outcome in an [`AvailabilityGate`].
//! Start-up failures are logged and turned into an unavailable gate, never
//! propagated.
use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::BootstrapError;
use crate::external::StalloneApi;
use crate::gate::{self, AvailabilityGate};

/// JVM heap size such as `32m` or `1G`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeapSize {
    amount: u64,
    unit: Option<char>,
}

impl HeapSize {
    pub fn bytes(&self) -> u64 {
        let scale = match self.unit {
            None => 1,
            Some('k') => 1 << 10,
            Some('m') => 1 << 20,
            _ => 1 << 30,
        };
        self.amount.saturating_mul(scale)
    }
}

impl FromStr for HeapSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (digits, unit) = match s.chars().last() {
            Some(c) if c.is_ascii_alphabetic() => (&s[..s.len() - 1], Some(c.to_ascii_lowercase())),
            _ => (s, None),
        };
        if let Some(u) = unit {
            if !matches!(u, 'k' | 'm' | 'g') {
                return Err(format!("Unknown heap size unit '{}' in '{}'", u, s));
            }
        }
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(format!("Invalid heap size: '{}'", s));
        }
        let amount = digits
            .parse::<u64>()
            .map_err(|_| format!("Invalid heap size: '{}'", s))?;
        if amount == 0 {
            return Err(format!("Heap size must be positive: '{}'", s));
        }
        Ok(HeapSize { amount, unit })
    }
}

impl fmt::Display for HeapSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.unit {
            Some(u) => write!(f, "{}{}", self.amount, u),
            None => write!(f, "{}", self.amount),
        }
    }
}

/// Start-up parameters for the VM.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct VmConfig {
    pub initial_heap: String,
    pub max_heap: String,
    pub classpath: Vec<PathBuf>,
    pub extra_options: Vec<String>,
}

impl Default for VmConfig {
    fn default() -> Self {
        Self {
            initial_heap: "32m".to_string(),
            max_heap: "512m".to_string(),
            classpath: Vec::new(),
            extra_options: Vec::new(),
        }
    }
}

impl VmConfig {
    /// Check heap sizes parse and that the initial heap does not exceed the
    /// maximum.
    pub fn validate(&self) -> Result<(HeapSize, HeapSize), String> {
        let initial: HeapSize = self.initial_heap.parse()?;
        let max: HeapSize = self.max_heap.parse()?;
        if initial.bytes() > max.bytes() {
            return Err(format!(
                "Initial heap {} exceeds maximum heap {}",
                initial, max
            ));
        }
        Ok((initial, max))
    }

    /// Options passed to the JVM on creation.
    pub fn jvm_options(&self) -> Vec<String> {
        let mut options = vec![
            format!("-Xms{}", self.initial_heap.trim()),
            format!("-Xmx{}", self.max_heap.trim()),
        ];
        if !self.classpath.is_empty() {
            match env::join_paths(&self.classpath) {
                Ok(joined) => {
                    options.push(format!("-Djava.class.path={}", joined.to_string_lossy()))
                }
                Err(e) => log::warn!("Ignoring unusable classpath: {}", e),
            }
        }
        options.extend(self.extra_options.iter().cloned());
        options
    }
}

/// Load VM parameters from a JSON file. Missing fields take their defaults.
pub fn load_vm_config<P: AsRef<Path>>(path: P) -> Result<VmConfig> {
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config: {}", path.as_ref().display()))?;
    let config: VmConfig = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config: {}", path.as_ref().display()))?;
    Ok(config)
}

/// Brings up the VM and hands back the library's entry points.
pub trait VmLauncher {
    fn launch(&self, config: &VmConfig) -> Result<Box<dyn StalloneApi>, BootstrapError>;
}

impl<F> VmLauncher for F
where
    F: Fn(&VmConfig) -> Result<Box<dyn StalloneApi>, BootstrapError>,
{
    fn launch(&self, config: &VmConfig) -> Result<Box<dyn StalloneApi>, BootstrapError> {
        self(config)
    }
}

/// Start the VM and record the outcome in `gate`. Returns whether the
/// library is available afterwards.
pub fn initialize<L: VmLauncher + ?Sized>(
    gate: &AvailabilityGate,
    config: &VmConfig,
    launcher: &L,
) -> bool {
    if gate.is_initialized() {
        log::warn!("stallone already initialized, skipping");
        return gate.is_available();
    }

    log::debug!("try to initialize stallone module");
    let launched = config
        .validate()
        .map_err(BootstrapError::InvalidVmOptions)
        .and_then(|_| launcher.launch(config));

    match launched {
        Ok(api) => {
            if gate.initialize_with(api) {
                log::info!("stallone initialized successfully.");
            }
        }
        Err(e) => {
            log::error!("{}", e);
            gate.mark_unavailable(e.to_string());
        }
    }
    gate.is_available()
}

/// [`initialize`] against the process-wide gate.
pub fn initialize_global<L: VmLauncher + ?Sized>(config: &VmConfig, launcher: &L) -> bool {
    initialize(gate::global(), config, launcher)
}
