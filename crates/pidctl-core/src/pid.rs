//! Position / delta PID controller with symmetric saturation.
//!
//! The controller is hardware-agnostic and runs in constant time without
//! allocating: the caller reads the sensor, calls
//! [`PidController::calculate`] once per control tick at a fixed sample
//! interval, and applies the returned output to its actuator.
//!
//! Two calculation variants are available via [`PidMode`]:
//!
//! - [`PidMode::Position`] recomputes the output from scratch every call.
//!   The integral term accumulates and is clamped to `max_iout`.
//! - [`PidMode::Delta`] computes an increment from error differences and
//!   adds it to the previous output. There is no separate integral clamp.
//!
//! In both modes the total output is clamped to `[-max_out, max_out]`.
//!
//! # Example
//!
//! ```rust
//! use pidctl_core::pid::PidController;
//! use pidctl_types::{PidLimits, PidMode};
//!
//! let mut pid = PidController::new(
//!     PidMode::Position,
//!     [2.0, 0.1, 0.0].into(),
//!     PidLimits::new(100.0, 20.0),
//! );
//!
//! let output = pid.calculate(0.0, 10.0); // measured=0, target=10
//! assert!(output > 0.0);
//! assert!(output <= 100.0);
//! ```

use pidctl_types::{PidError, PidGains, PidLimits, PidMode, PidState};
use tracing::{debug, trace};

use crate::history::History;

/// Clamp `value` to `[-max, max]`.
///
/// Unlike [`f32::clamp`] this never panics. With a negative `max`, inputs
/// above `max` become `max` and every other input becomes `-max`.
#[inline]
fn saturate(value: f32, max: f32) -> f32 {
    if value > max {
        max
    } else if value < -max {
        -max
    } else {
        value
    }
}

/// A single-loop PID controller.
///
/// `Default` gives zeroed storage in position mode; call
/// [`initialize`][Self::initialize] (or build with [`new`][Self::new]) to
/// configure it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PidController {
    mode: PidMode,
    gains: PidGains,
    limits: PidLimits,

    set: f32,
    fdb: f32,

    out: f32,
    p_out: f32,
    i_out: f32,
    d_out: f32,

    dbuf: History,
    error: History,
}

impl PidController {
    /// Create a controller configured with `mode`, `gains` and `limits`, with
    /// all runtime values zeroed.
    pub fn new(mode: PidMode, gains: PidGains, limits: PidLimits) -> Self {
        let mut pid = Self::default();
        pid.initialize(mode, gains, limits.max_out, limits.max_iout);
        pid
    }

    /// Create a controller from a `[Kp, Ki, Kd]` slice.
    ///
    /// # Errors
    ///
    /// Returns [`PidError::GainsLength`] when `gains` does not hold exactly
    /// three values.
    pub fn from_slice(
        mode: PidMode,
        gains: &[f32],
        max_out: f32,
        max_iout: f32,
    ) -> Result<Self, PidError> {
        let gains = PidGains::from_slice(gains)?;
        Ok(Self::new(mode, gains, PidLimits::new(max_out, max_iout)))
    }

    /// Rebuild a controller from a previously captured [`PidState`].
    pub fn from_state(state: PidState) -> Self {
        Self {
            mode: state.mode,
            gains: state.gains(),
            limits: state.limits(),
            set: state.set,
            fdb: state.fdb,
            out: state.out,
            p_out: state.p_out,
            i_out: state.i_out,
            d_out: state.d_out,
            dbuf: History::from(state.dbuf),
            error: History::from(state.error),
        }
    }

    /// Configure mode, gains and limits, and zero every runtime value.
    ///
    /// After this call the next [`calculate`][Self::calculate] behaves as the
    /// first one ever made.
    pub fn initialize(
        &mut self,
        mode: PidMode,
        gains: PidGains,
        max_out: f32,
        max_iout: f32,
    ) {
        self.mode = mode;
        self.gains = gains;
        self.limits = PidLimits::new(max_out, max_iout);
        self.reset_runtime();
        debug!(
            %mode,
            kp = self.gains.kp,
            ki = self.gains.ki,
            kd = self.gains.kd,
            max_out,
            max_iout,
            "pid initialized"
        );
    }

    /// Run one control step and return the new output.
    ///
    /// - `measured` – current feedback value.
    /// - `target` – desired set-point.
    ///
    /// The first position-mode call differentiates against an implicit zero
    /// previous error, so a non-zero initial error produces a derivative kick.
    pub fn calculate(&mut self, measured: f32, target: f32) -> f32 {
        self.set = target;
        self.fdb = measured;
        self.error.push(target - measured);

        let e0 = self.error.newest();
        let e1 = self.error.previous();
        let e2 = self.error.oldest();
        let PidGains { kp, ki, kd } = self.gains;

        match self.mode {
            PidMode::Position => {
                self.p_out = kp * e0;
                self.i_out += ki * e0;
                self.dbuf.push(e0 - e1);
                self.d_out = kd * self.dbuf.newest();
                self.i_out = saturate(self.i_out, self.limits.max_iout);
                self.out = saturate(
                    self.p_out + self.i_out + self.d_out,
                    self.limits.max_out,
                );
            }
            PidMode::Delta => {
                self.p_out = kp * (e0 - e1);
                self.i_out = ki * e0;
                self.dbuf.push(e0 - 2.0 * e1 + e2);
                self.d_out = kd * self.dbuf.newest();
                self.out = saturate(
                    self.out + (self.p_out + self.i_out + self.d_out),
                    self.limits.max_out,
                );
            }
        }

        trace!(
            mode = %self.mode,
            set = self.set,
            fdb = self.fdb,
            p_out = self.p_out,
            i_out = self.i_out,
            d_out = self.d_out,
            out = self.out,
            "pid step"
        );
        self.out
    }

    /// Zero errors, derivative history, outputs, set-point and feedback.
    ///
    /// Mode, gains and limits are kept so the controller can be re-armed
    /// after a discontinuity without re-supplying its tuning.
    pub fn clear(&mut self) {
        self.reset_runtime();
        debug!(mode = %self.mode, "pid cleared");
    }

    /// Replace the gains. Runtime history is kept.
    pub fn set_gains(&mut self, gains: PidGains) {
        self.gains = gains;
        debug!(
            kp = self.gains.kp,
            ki = self.gains.ki,
            kd = self.gains.kd,
            "pid gains updated"
        );
    }

    /// Replace the saturation limits. Takes effect on the next calculation.
    pub fn set_limits(&mut self, limits: PidLimits) {
        self.limits = limits;
        debug!(
            max_out = limits.max_out,
            max_iout = limits.max_iout,
            "pid limits updated"
        );
    }

    /// Switch the calculation variant. Runtime history is kept; follow with
    /// [`clear`][Self::clear] if the old history must not carry over.
    pub fn set_mode(&mut self, mode: PidMode) {
        self.mode = mode;
        debug!(%mode, "pid mode updated");
    }

    pub fn mode(&self) -> PidMode {
        self.mode
    }

    pub fn gains(&self) -> PidGains {
        self.gains
    }

    pub fn limits(&self) -> PidLimits {
        self.limits
    }

    /// Target of the last calculation.
    pub fn set(&self) -> f32 {
        self.set
    }

    /// Feedback of the last calculation.
    pub fn fdb(&self) -> f32 {
        self.fdb
    }

    /// Total output of the last calculation.
    pub fn out(&self) -> f32 {
        self.out
    }

    /// Proportional term of the last calculation.
    pub fn p_out(&self) -> f32 {
        self.p_out
    }

    /// Integral term of the last calculation.
    pub fn i_out(&self) -> f32 {
        self.i_out
    }

    /// Derivative term of the last calculation.
    pub fn d_out(&self) -> f32 {
        self.d_out
    }

    /// Last three errors, newest first.
    pub fn error_history(&self) -> [f32; 3] {
        self.error.as_array()
    }

    /// Last three derivative-term inputs, newest first.
    pub fn derivative_history(&self) -> [f32; 3] {
        self.dbuf.as_array()
    }

    /// Snapshot of the full state record.
    pub fn state(&self) -> PidState {
        PidState {
            mode: self.mode,
            kp: self.gains.kp,
            ki: self.gains.ki,
            kd: self.gains.kd,
            max_out: self.limits.max_out,
            max_iout: self.limits.max_iout,
            set: self.set,
            fdb: self.fdb,
            out: self.out,
            p_out: self.p_out,
            i_out: self.i_out,
            d_out: self.d_out,
            dbuf: self.dbuf.as_array(),
            error: self.error.as_array(),
        }
    }

    fn reset_runtime(&mut self) {
        self.set = 0.0;
        self.fdb = 0.0;
        self.out = 0.0;
        self.p_out = 0.0;
        self.i_out = 0.0;
        self.d_out = 0.0;
        self.dbuf.clear();
        self.error.clear();
    }
}

impl From<&PidController> for PidState {
    fn from(pid: &PidController) -> Self {
        pid.state()
    }
}
