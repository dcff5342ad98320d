//! Headline decode animation.
//!
//! The gate title starts as random glyphs and resolves left to right — one
//! third of a character per 50 ms tick — then holds. Tick-driven like the
//! channel accrual, so any scheduler (or a test loop) can drive it.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Glyph pool the unresolved positions draw from.
pub const SCRAMBLE_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789@#$%&*";

/// Reference tick period.
pub const SCRAMBLE_TICK: Duration = Duration::from_millis(50);

/// Ticks it takes to pin one character.
const TICKS_PER_CHAR: u32 = 3;

/// Left-to-right text decode effect.
#[derive(Debug)]
pub struct ScrambleText {
    target: Vec<char>,
    ticks: u32,
    rng: StdRng,
}

impl ScrambleText {
    pub fn new(target: &str) -> Self {
        Self {
            target: target.chars().collect(),
            ticks: 0,
            rng: StdRng::from_os_rng(),
        }
    }

    /// Deterministic glyph stream, for tests.
    pub fn seeded(target: &str, seed: u64) -> Self {
        Self {
            target: target.chars().collect(),
            ticks: 0,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Advance the reveal cursor by one tick. No-op once fully resolved.
    pub fn tick(&mut self) {
        if !self.is_done() {
            self.ticks += 1;
        }
    }

    pub fn is_done(&self) -> bool {
        self.ticks >= self.target.len() as u32 * TICKS_PER_CHAR
    }

    /// Render the current frame of the effect. Positions left of the reveal
    /// cursor show the real text; the rest churn through random glyphs.
    pub fn current(&mut self) -> String {
        let cutoff = self.ticks as f64 / TICKS_PER_CHAR as f64;
        let rng = &mut self.rng;
        self.target
            .iter()
            .enumerate()
            .map(|(i, &c)| {
                if (i as f64) < cutoff {
                    c
                } else {
                    SCRAMBLE_CHARSET[rng.random_range(0..SCRAMBLE_CHARSET.len())] as char
                }
            })
            .collect()
    }
}
