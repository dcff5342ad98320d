//! Single calibration channel — the charge-to-lock state machine.
//!
//! A channel is one dial on the gate. It charges only while its hover signal
//! is active, it hard-resets to 0 the moment the hover ends, and once it
//! reaches full scale it locks permanently. Accrual is expressed as an
//! explicit [`Channel::advance`] transition over elapsed time, so any
//! scheduler can drive it — a frame loop, a fixed-rate timer, or a test
//! feeding synthetic durations.

use std::time::Duration;

/// Full-scale channel value. A locked channel always reads exactly this.
pub const FULL_SCALE: f64 = 100.0;

/// Reference accrual cadence: one step per tick of continuous hover.
pub const CHARGE_TICK: Duration = Duration::from_millis(40);

/// Value gained per [`CHARGE_TICK`] — 2% per 40 ms, full charge in 2 s.
pub const CHARGE_STEP: f64 = 2.0;

/// Accrual rate in value per second, derived from the reference cadence.
pub const CHARGE_RATE: f64 = 50.0;

// ---------------------------------------------------------------------------
// Phase
// ---------------------------------------------------------------------------

/// Where a channel is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Phase {
    /// Not charging. Value is 0.
    #[default]
    Idle,
    /// Hover signal active, value accruing.
    Charging,
    /// Reached full scale. Terminal — absorbs all further begin/end calls.
    Locked,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Charging => write!(f, "charging"),
            Self::Locked => write!(f, "locked"),
        }
    }
}

// ---------------------------------------------------------------------------
// Channel
// ---------------------------------------------------------------------------

/// One calibration dial: value in `[0, 100]` plus its phase.
///
/// Invariants:
/// - `Locked` implies `value == 100.0` exactly.
/// - Value only increases while `Charging`; it never survives an unlocked
///   hover-end (instant reset to 0, no decay).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Channel {
    value: f64,
    phase: Phase,
}

impl Channel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value in `[0, 100]`.
    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_locked(&self) -> bool {
        self.phase == Phase::Locked
    }

    pub fn is_charging(&self) -> bool {
        self.phase == Phase::Charging
    }

    /// Start accruing. Idempotent; a no-op once locked.
    pub fn begin_charging(&mut self) {
        if self.phase == Phase::Idle {
            self.phase = Phase::Charging;
        }
    }

    /// Stop accruing. Resets the value to 0 unless the channel is locked —
    /// locked channels ignore hover-end entirely.
    pub fn end_charging(&mut self) {
        if self.phase == Phase::Charging {
            self.phase = Phase::Idle;
            self.value = 0.0;
        }
    }

    /// Advance accrual by `dt` of wall time. Only meaningful while charging;
    /// the lock transition happens inside this call, so a hover-end arriving
    /// right after can never reset a freshly locked channel.
    pub fn advance(&mut self, dt: Duration) {
        if self.phase != Phase::Charging {
            return;
        }
        self.value += CHARGE_RATE * dt.as_secs_f64();
        if self.value >= FULL_SCALE {
            self.lock();
        }
    }

    /// Jump straight to the locked terminal state (bypass path).
    pub fn force_lock(&mut self) {
        if self.phase != Phase::Locked {
            self.lock();
        }
    }

    fn lock(&mut self) {
        self.value = FULL_SCALE;
        self.phase = Phase::Locked;
        log::debug!("channel locked at full scale");
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
