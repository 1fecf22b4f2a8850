//! `pidctl-core` – the PID controller primitive.
//!
//! # Modules
//!
//! - [`pid`] – [`PidController`][pid::PidController]: position and delta
//!   (incremental) PID with symmetric output and integral saturation.
//!   Exposes `initialize`, `calculate` and `clear`.
//! - [`history`] – [`History`][history::History]: the fixed three-slot,
//!   newest-first sample buffer used for error and derivative history.
//! - [`sim`] – [`FirstOrderPlant`][sim::FirstOrderPlant]: an in-process
//!   first-order lag so closed-loop behaviour can be exercised in tests and
//!   CI without any hardware attached.

pub mod history;
pub mod pid;
pub mod sim;

pub use history::History;
pub use pid::PidController;
pub use sim::{FirstOrderPlant, run_closed_loop};

pub use pidctl_types::{PidError, PidGains, PidLimits, PidMode, PidState};
