use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Calculation variant used by a PID controller.
///
/// The raw values are stable so that a mode stored as a single byte (e.g. in
/// a register map or a calibration blob) can be converted back with
/// [`PidMode::try_from`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum PidMode {
    /// Absolute form: the integral accumulates and the output is recomputed
    /// from scratch on every call.
    #[default]
    Position = 0,
    /// Incremental form: the output itself accumulates a per-call increment.
    Delta = 1,
}

impl PidMode {
    /// Raw byte value of this mode.
    pub fn as_raw(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for PidMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PidMode::Position => write!(f, "position"),
            PidMode::Delta => write!(f, "delta"),
        }
    }
}

impl TryFrom<u8> for PidMode {
    type Error = PidError;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        match raw {
            0 => Ok(PidMode::Position),
            1 => Ok(PidMode::Delta),
            other => Err(PidError::UnknownMode(other)),
        }
    }
}

impl FromStr for PidMode {
    type Err = PidError;

    /// Accepts `"position"` / `"delta"` (any case) or the raw value as a
    /// decimal number.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(raw) = s.parse::<u8>() {
            return PidMode::try_from(raw);
        }
        match s.to_ascii_lowercase().as_str() {
            "position" => Ok(PidMode::Position),
            "delta" => Ok(PidMode::Delta),
            _ => Err(PidError::UnrecognizedMode(s.to_string())),
        }
    }
}

/// Proportional, integral and derivative gains.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PidGains {
    pub kp: f32,
    pub ki: f32,
    pub kd: f32,
}

impl PidGains {
    pub fn new(kp: f32, ki: f32, kd: f32) -> Self {
        Self { kp, ki, kd }
    }

    /// Build gains from a `[Kp, Ki, Kd]` slice.
    ///
    /// # Errors
    ///
    /// Returns [`PidError::GainsLength`] unless the slice holds exactly three
    /// values.
    pub fn from_slice(gains: &[f32]) -> Result<Self, PidError> {
        match gains {
            [kp, ki, kd] => Ok(Self::new(*kp, *ki, *kd)),
            _ => Err(PidError::GainsLength(gains.len())),
        }
    }

    /// Gains in `[Kp, Ki, Kd]` order.
    pub fn to_array(self) -> [f32; 3] {
        [self.kp, self.ki, self.kd]
    }
}

impl From<[f32; 3]> for PidGains {
    fn from([kp, ki, kd]: [f32; 3]) -> Self {
        Self { kp, ki, kd }
    }
}

/// Symmetric saturation limits.
///
/// Both values are expected to be non-negative. Negative values are accepted
/// but make the clamp collapse onto `max` or `-max` in ways that are rarely
/// useful; keeping them sane is the caller's job.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PidLimits {
    /// Clamp applied to the total output.
    pub max_out: f32,
    /// Clamp applied to the integral term (position mode only).
    pub max_iout: f32,
}

impl PidLimits {
    pub fn new(max_out: f32, max_iout: f32) -> Self {
        Self { max_out, max_iout }
    }
}

/// Full state record of a PID controller.
///
/// This is the flat layout callers embed or persist; history arrays are
/// ordered newest first.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PidState {
    pub mode: PidMode,
    pub kp: f32,
    pub ki: f32,
    pub kd: f32,
    pub max_out: f32,
    pub max_iout: f32,
    /// Target value of the last calculation.
    pub set: f32,
    /// Measured value of the last calculation.
    pub fdb: f32,
    pub out: f32,
    pub p_out: f32,
    pub i_out: f32,
    pub d_out: f32,
    /// Derivative-term inputs, newest first.
    pub dbuf: [f32; 3],
    /// Errors (`set - fdb`), newest first.
    pub error: [f32; 3],
}

impl PidState {
    pub fn gains(&self) -> PidGains {
        PidGains::new(self.kp, self.ki, self.kd)
    }

    pub fn limits(&self) -> PidLimits {
        PidLimits::new(self.max_out, self.max_iout)
    }
}

/// Errors raised at the boundary of the controller: raw mode values, gain
/// arrays and tuning configuration.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PidError {
    #[error("Unknown PID mode value: {0}")]
    UnknownMode(u8),

    #[error("Unrecognized PID mode: {0:?}")]
    UnrecognizedMode(String),

    #[error("Expected 3 gains (Kp, Ki, Kd), got {0}")]
    GainsLength(usize),

    #[error("Configuration Error: {0}")]
    Config(String),
}
