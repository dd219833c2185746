//! Simulation telemetry.
//!
//! # SAFETY INVARIANT
//! Telemetry is a READ-ONLY side-effect layer.
//! It must **NEVER** be read inside the engine's transition logic.
//!
//! # PRIVACY INVARIANT
//! Telemetry events must **NEVER** contain message content or caller names.
//! Only run ids, phases, failure kinds and counts are allowed.

pub mod event;
pub mod metrics;
pub mod recorder;
