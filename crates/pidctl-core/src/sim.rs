//! In-process plant simulation for exercising controllers without hardware.
//!
//! [`FirstOrderPlant`] models a first-order lag (a motor's speed response,
//! a heater, an RC filter) in discrete time:
//!
//! ```text
//! y[k+1] = y[k] + alpha * (gain * u[k] - y[k])
//! ```
//!
//! [`run_closed_loop`] wires a [`PidController`] to a plant for a number of
//! ticks, the same way firmware would wire it to a sensor and an actuator.
//!
//! # Example
//!
//! ```rust
//! use pidctl_core::sim::{FirstOrderPlant, run_closed_loop};
//! use pidctl_core::PidController;
//! use pidctl_types::{PidLimits, PidMode};
//!
//! let mut pid = PidController::new(
//!     PidMode::Position,
//!     [0.5, 0.1, 0.0].into(),
//!     PidLimits::new(100.0, 100.0),
//! );
//! let mut plant = FirstOrderPlant::new(1.0, 0.2);
//!
//! let trajectory = run_closed_loop(&mut pid, &mut plant, 10.0, 300);
//! assert!((trajectory[299] - 10.0).abs() < 0.05);
//! ```

use tracing::debug;

use crate::pid::PidController;

/// A discrete first-order lag.
#[derive(Debug, Clone, PartialEq)]
pub struct FirstOrderPlant {
    gain: f32,
    alpha: f32,
    output: f32,
}

impl FirstOrderPlant {
    /// Create a plant at rest with steady-state `gain` and per-tick smoothing
    /// factor `alpha` (`0 < alpha <= 1`).
    pub fn new(gain: f32, alpha: f32) -> Self {
        Self {
            gain,
            alpha,
            output: 0.0,
        }
    }

    /// Start the plant from `output` instead of rest.
    pub fn with_initial_output(mut self, output: f32) -> Self {
        self.output = output;
        self
    }

    /// Apply `input` for one tick and return the new output.
    pub fn step(&mut self, input: f32) -> f32 {
        self.output += self.alpha * (self.gain * input - self.output);
        self.output
    }

    /// Current (measured) output.
    pub fn output(&self) -> f32 {
        self.output
    }
}

/// Drive `plant` toward `target` with `pid` for `ticks` steps.
///
/// Each tick measures the plant, runs one controller calculation and applies
/// the result. Returns the plant output after every tick.
pub fn run_closed_loop(
    pid: &mut PidController,
    plant: &mut FirstOrderPlant,
    target: f32,
    ticks: usize,
) -> Vec<f32> {
    let mut trajectory = Vec::with_capacity(ticks);
    for _ in 0..ticks {
        let command = pid.calculate(plant.output(), target);
        trajectory.push(plant.step(command));
    }
    debug!(
        mode = %pid.mode(),
        target,
        ticks,
        final_output = plant.output(),
        "closed-loop run finished"
    );
    trajectory
}

#[cfg(test)]
mod tests {
    use super::*;
    use pidctl_types::{PidLimits, PidMode};

    fn pi(mode: PidMode) -> PidController {
        PidController::new(mode, [0.5, 0.1, 0.0].into(), PidLimits::new(100.0, 100.0))
    }

    #[test]
    fn plant_settles_at_gain_times_input() {
        let mut plant = FirstOrderPlant::new(2.0, 0.5);
        for _ in 0..60 {
            plant.step(3.0);
        }
        assert!((plant.output() - 6.0).abs() < 1e-4);
    }

    #[test]
    fn plant_decays_from_initial_output() {
        let mut plant = FirstOrderPlant::new(1.0, 0.5).with_initial_output(8.0);
        assert_eq!(plant.step(0.0), 4.0);
        assert_eq!(plant.step(0.0), 2.0);
    }

    #[test]
    fn position_pi_reaches_set_point() {
        let mut pid = pi(PidMode::Position);
        let mut plant = FirstOrderPlant::new(1.0, 0.2);
        let trajectory = run_closed_loop(&mut pid, &mut plant, 10.0, 300);
        assert_eq!(trajectory.len(), 300);
        assert!((plant.output() - 10.0).abs() < 0.05);
    }

    #[test]
    fn delta_pi_reaches_set_point() {
        let mut pid = pi(PidMode::Delta);
        let mut plant = FirstOrderPlant::new(1.0, 0.2);
        run_closed_loop(&mut pid, &mut plant, -4.0, 300);
        assert!((plant.output() + 4.0).abs() < 0.05);
    }

    #[test]
    fn proportional_only_leaves_steady_state_offset() {
        let mut pid = PidController::new(
            PidMode::Position,
            [1.0, 0.0, 0.0].into(),
            PidLimits::new(100.0, 0.0),
        );
        let mut plant = FirstOrderPlant::new(1.0, 0.2);
        run_closed_loop(&mut pid, &mut plant, 10.0, 200);
        // Loop gain 1 settles halfway to the target.
        assert!((plant.output() - 5.0).abs() < 0.01);
    }

    #[test]
    fn saturated_output_limits_plant_response() {
        let mut pid = PidController::new(
            PidMode::Position,
            [50.0, 0.0, 0.0].into(),
            PidLimits::new(2.0, 0.0),
        );
        let mut plant = FirstOrderPlant::new(1.0, 0.5);
        let trajectory = run_closed_loop(&mut pid, &mut plant, 100.0, 50);
        assert!(trajectory.iter().all(|y| *y <= 2.0 + 1e-4));
        assert!((pid.out() - 2.0).abs() < 1e-6);
    }
}
