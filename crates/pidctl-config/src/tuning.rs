//! Tuning profiles – reads/writes a controller's mode, gains and limits as
//! TOML.
//!
//! ```toml
//! mode = "position"   # "delta", or the raw value 0 / 1
//! kp = 1.2
//! ki = 0.05
//! kd = 0.0
//! max_out = 1000.0
//! max_iout = 200.0
//! ```
//!
//! Missing keys fall back to defaults: position mode, zero gains and limits
//! of [`DEFAULT_LIMIT`].

use std::fs;
use std::path::Path;

use pidctl_core::PidController;
use pidctl_types::{PidError, PidGains, PidLimits, PidMode};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, warn};

/// Limit applied to `max_out` and `max_iout` when a profile omits them.
pub const DEFAULT_LIMIT: f32 = 1000.0;

/// A persisted controller tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TuningConfig {
    /// Calculation variant.
    #[serde(default, deserialize_with = "deserialize_mode")]
    pub mode: PidMode,

    #[serde(default)]
    pub kp: f32,

    #[serde(default)]
    pub ki: f32,

    #[serde(default)]
    pub kd: f32,

    /// Clamp on the total output.
    #[serde(default = "default_limit")]
    pub max_out: f32,

    /// Clamp on the integral term (position mode only).
    #[serde(default = "default_limit")]
    pub max_iout: f32,
}

fn default_limit() -> f32 {
    DEFAULT_LIMIT
}

impl Default for TuningConfig {
    fn default() -> Self {
        Self {
            mode: PidMode::default(),
            kp: 0.0,
            ki: 0.0,
            kd: 0.0,
            max_out: default_limit(),
            max_iout: default_limit(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawMode {
    Name(String),
    Raw(u8),
}

/// Accept a mode either by name or by its raw byte value.
fn deserialize_mode<'de, D>(deserializer: D) -> Result<PidMode, D::Error>
where
    D: Deserializer<'de>,
{
    let mode = match RawMode::deserialize(deserializer)? {
        RawMode::Name(name) => name.parse(),
        RawMode::Raw(raw) => PidMode::try_from(raw),
    };
    mode.map_err(serde::de::Error::custom)
}

impl TuningConfig {
    /// Parse a profile from TOML text.
    pub fn parse(raw: &str) -> Result<Self, PidError> {
        toml::from_str(raw).map_err(|e| PidError::Config(format!("Failed to parse tuning: {e}")))
    }

    pub fn gains(&self) -> PidGains {
        PidGains::new(self.kp, self.ki, self.kd)
    }

    pub fn limits(&self) -> PidLimits {
        PidLimits::new(self.max_out, self.max_iout)
    }

    /// Build an initialized controller from this profile.
    ///
    /// Negative limits are applied as given but logged, since they turn the
    /// symmetric clamp into a constant.
    pub fn build(&self) -> PidController {
        if self.max_out < 0.0 {
            warn!(max_out = self.max_out, "negative output limit in tuning");
        }
        if self.max_iout < 0.0 {
            warn!(max_iout = self.max_iout, "negative integral limit in tuning");
        }
        PidController::new(self.mode, self.gains(), self.limits())
    }
}

/// Load a profile from `path` and apply `PIDCTL_*` environment overrides.
///
/// Returns `None` if the file does not exist.
pub fn load(path: &Path) -> Result<Option<TuningConfig>, PidError> {
    let mut cfg = load_from(path)?;
    if let Some(cfg) = cfg.as_mut() {
        apply_env_overrides(cfg);
    }
    Ok(cfg)
}

/// Load a profile from `path` exactly as written.
pub fn load_from(path: &Path) -> Result<Option<TuningConfig>, PidError> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(path).map_err(|e| {
        PidError::Config(format!("Failed to read tuning at {}: {e}", path.display()))
    })?;
    let cfg = TuningConfig::parse(&raw)?;
    debug!(path = %path.display(), mode = %cfg.mode, "tuning loaded");
    Ok(Some(cfg))
}

/// Save a profile to `path`, creating parent directories as needed.
pub fn save_to(cfg: &TuningConfig, path: &Path) -> Result<(), PidError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| PidError::Config(format!("Failed to create tuning directory: {e}")))?;
    }
    let raw = toml::to_string_pretty(cfg)
        .map_err(|e| PidError::Config(format!("Failed to serialize tuning: {e}")))?;
    fs::write(path, raw).map_err(|e| {
        PidError::Config(format!("Failed to write tuning at {}: {e}", path.display()))
    })?;
    debug!(path = %path.display(), "tuning saved");
    Ok(())
}

/// Apply `PIDCTL_*` environment variable overrides to `cfg`.
///
/// | Variable | Field |
/// |---|---|
/// | `PIDCTL_MODE` | `mode` (`position`, `delta`, `0`, `1`) |
/// | `PIDCTL_KP` | `kp` |
/// | `PIDCTL_KI` | `ki` |
/// | `PIDCTL_KD` | `kd` |
/// | `PIDCTL_MAX_OUT` | `max_out` |
/// | `PIDCTL_MAX_IOUT` | `max_iout` |
///
/// Values that do not parse are ignored.
pub fn apply_env_overrides(cfg: &mut TuningConfig) {
    if let Ok(v) = std::env::var("PIDCTL_MODE") {
        match v.parse::<PidMode>() {
            Ok(mode) => cfg.mode = mode,
            Err(e) => warn!(value = %v, error = %e, "ignoring PIDCTL_MODE"),
        }
    }
    override_f32("PIDCTL_KP", &mut cfg.kp);
    override_f32("PIDCTL_KI", &mut cfg.ki);
    override_f32("PIDCTL_KD", &mut cfg.kd);
    override_f32("PIDCTL_MAX_OUT", &mut cfg.max_out);
    override_f32("PIDCTL_MAX_IOUT", &mut cfg.max_iout);
}

fn override_f32(var: &str, field: &mut f32) {
    if let Ok(v) = std::env::var(var) {
        match v.trim().parse::<f32>() {
            Ok(parsed) => *field = parsed,
            Err(_) => warn!(var, value = %v, "ignoring unparsable override"),
        }
    }
}
