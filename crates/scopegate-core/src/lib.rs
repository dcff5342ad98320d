//! # scopegate-core
//!
//! **The content is behind the trace. Hold both dials to earn it.**
//!
//! `scopegate-core` is the logic behind the scopegate splash: a dual-channel
//! calibration state machine (hover to charge, release to reset, lock at
//! 100%), an oscilloscope trace synthesizer whose shape reacts to
//! calibration progress, and the one-shot unlock signal that lets the
//! hosting application swap the gate out for its real content.
//!
//! ## Quick Start
//!
//! ```
//! use std::time::Duration;
//! use scopegate_core::{ChannelId, GateState};
//!
//! let mut gate = GateState::new();
//! gate.begin_charging(ChannelId::Precision);
//! gate.begin_charging(ChannelId::Logic);
//!
//! // Two seconds of continuous hover locks both channels.
//! gate.advance(Duration::from_secs(2));
//! assert!(gate.both_locked());
//!
//! // The unlock signal fires exactly once.
//! assert!(gate.take_unlock());
//! assert!(!gate.take_unlock());
//! ```
//!
//! ## Architecture
//!
//! Hover signals → [`GateState`] → read-only [`WaveformRenderer`] + unlock
//!
//! Nothing here touches a terminal. Rendering goes through the
//! [`TraceSurface`] trait so the synthesis is testable headlessly, and
//! accrual is an explicit `advance(dt)` transition so any scheduler — frame
//! loop, timer, or a test feeding synthetic durations — can drive it.

pub mod channel;
pub mod gate;
pub mod scramble;
pub mod session;
pub mod waveform;

pub use channel::{CHARGE_RATE, CHARGE_STEP, CHARGE_TICK, Channel, FULL_SCALE, Phase};
pub use gate::{ChannelId, GateState};
pub use scramble::{SCRAMBLE_TICK, ScrambleText};
pub use session::{UnlockRecord, UnlockStore};
pub use waveform::{
    CENTERLINE_THRESHOLD, FADE_ALPHA, GRID_SPACING, SAMPLE_STEP, Stroke, TraceSurface, WaveParams,
    WaveformRenderer,
};

/// Library version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
