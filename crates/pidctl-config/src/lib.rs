//! `pidctl-config` – tuning profiles and logging setup.
//!
//! # Modules
//!
//! - [`tuning`] – [`TuningConfig`][tuning::TuningConfig]: a TOML tuning
//!   profile (mode, gains, limits) with `PIDCTL_*` environment overrides that
//!   builds a ready-to-run [`PidController`][pidctl_core::PidController].
//! - [`telemetry`] – [`init_tracing`][telemetry::init_tracing]: installs the
//!   global `tracing` subscriber, filtered by `RUST_LOG` and optionally
//!   emitting JSON.

pub mod telemetry;
pub mod tuning;

pub use telemetry::{LogFormat, init_tracing};
pub use tuning::TuningConfig;
