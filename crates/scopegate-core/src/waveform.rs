//! Oscilloscope trace synthesis.
//!
//! The gate's background is a synthetic scope trace whose shape is a pure
//! function of the two channel values and elapsed time. The dirtier the
//! calibration, the noisier the trace; at full clarity the jitter vanishes
//! and the sweep speeds up.
//!
//! Drawing goes through the minimal [`TraceSurface`] capability — fade-clear,
//! line, path — so the synthesis can be exercised headlessly by asserting on
//! the sequence of drawing calls. The renderer keeps no visual state of its
//! own besides elapsed time and the jitter RNG; the fading trail lives in the
//! surface, which accumulates paint across frames.
//!
//! Per-frame shape, with `clarity = (precision + logic) / 200`:
//!
//! ```text
//! y(x) = center
//!      + sin(x·f + t) · A                      base sweep
//!      - (x / width) · 100 · trend             flattens the right side, clarity > 0.8
//!      + jitter · 60 · (1 - clarity)           uniform, zero at full clarity
//!      + sin(x·2f + 1.5t) · A · 0.3 · (p/100)  harmonic, precision > 30
//!      + sin(x·f/2 + 0.5t) · A · 0.2 · (l/100) slow drift, logic > 30
//! ```

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Horizontal distance between trace samples.
pub const SAMPLE_STEP: f64 = 2.0;

/// Reference grid spacing.
pub const GRID_SPACING: f64 = 50.0;

/// Alpha of the per-frame fade overlay that produces the trail effect.
pub const FADE_ALPHA: f64 = 0.15;

/// Peak-to-peak jitter at zero clarity.
pub const JITTER_SPAN: f64 = 60.0;

/// Clarity above which the dashed centerline ramps in.
pub const CENTERLINE_THRESHOLD: f64 = 0.7;

/// Clarity above which the flattening trend engages.
pub const TREND_THRESHOLD: f64 = 0.8;

/// Channel value a secondary term needs before it contributes.
pub const TERM_THRESHOLD: f64 = 30.0;

// ---------------------------------------------------------------------------
// WaveParams
// ---------------------------------------------------------------------------

/// Per-frame trace parameters. Derived, never stored — recompute each frame
/// from the current channel values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveParams {
    /// Combined progress, `[0, 1]`.
    pub clarity: f64,
    /// `1 - clarity`; scales the jitter.
    pub noise: f64,
    /// Base sweep amplitude. Strictly decreasing in clarity.
    pub amplitude: f64,
    /// Base angular frequency per horizontal unit.
    pub frequency: f64,
    /// Phase advance per frame — the trace animates faster as it stabilizes.
    pub speed: f64,
    /// Harmonic weight, driven by the precision channel alone.
    pub harmonic_gain: f64,
    /// Slow-drift weight, driven by the logic channel alone.
    pub drift_gain: f64,
    /// Flattening bias applied to the right side of the trace.
    pub trend_gain: f64,
}

impl WaveParams {
    /// Derive this frame's parameters from the raw channel values.
    pub fn derive(precision: f64, logic: f64) -> Self {
        let clarity = (precision + logic) / 200.0;
        let amplitude = 80.0 * (1.0 - clarity * 0.5);
        let harmonic_gain = if precision > TERM_THRESHOLD {
            0.3 * precision / 100.0
        } else {
            0.0
        };
        let drift_gain = if logic > TERM_THRESHOLD {
            0.2 * logic / 100.0
        } else {
            0.0
        };
        Self {
            clarity,
            noise: 1.0 - clarity,
            amplitude,
            frequency: 0.01 + clarity * 0.02,
            speed: 0.02 + clarity * 0.03,
            harmonic_gain,
            drift_gain,
            trend_gain: (clarity - TREND_THRESHOLD).max(0.0) * 5.0,
        }
    }

    /// Opacity of the dashed centerline, `[0, 1]`. Zero until clarity passes
    /// [`CENTERLINE_THRESHOLD`], then ramps in.
    pub fn centerline_opacity(&self) -> f64 {
        ((self.clarity - CENTERLINE_THRESHOLD) * 3.0).clamp(0.0, 1.0)
    }
}

/// Deterministic part of one trace sample: every term except the jitter.
pub fn sample_wave(p: &WaveParams, x: f64, width: f64, center_y: f64, time: f64) -> f64 {
    let mut y = center_y + (x * p.frequency + time).sin() * p.amplitude;
    y -= (x / width) * 100.0 * p.trend_gain;
    y += (x * p.frequency * 2.0 + time * 1.5).sin() * p.amplitude * p.harmonic_gain;
    y += (x * p.frequency * 0.5 + time * 0.5).sin() * p.amplitude * p.drift_gain;
    y
}

// ---------------------------------------------------------------------------
// TraceSurface
// ---------------------------------------------------------------------------

/// What a drawing call is painting. The surface owns the actual styling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Stroke {
    /// Faint reference grid line.
    Grid,
    /// The trace itself.
    Trace,
    /// Dashed horizontal centerline with a ramp-in opacity.
    Centerline { opacity: f64 },
}

/// Minimal drawing capability the renderer needs.
///
/// `fade` is a low-alpha overlay of the background color, not a hard clear —
/// the previous frames stay faintly visible underneath. A surface that
/// reports a zero dimension is treated as not ready and the frame is skipped.
pub trait TraceSurface {
    /// Current drawable size `(width, height)` in surface units.
    fn size(&self) -> (f64, f64);

    /// Overlay the whole surface with the background color at `alpha`.
    fn fade(&mut self, alpha: f64);

    /// Straight line between two points.
    fn line(&mut self, from: (f64, f64), to: (f64, f64), stroke: Stroke);

    /// One continuous polyline through `points`.
    fn path(&mut self, points: &[(f64, f64)], stroke: Stroke);
}

// ---------------------------------------------------------------------------
// WaveformRenderer
// ---------------------------------------------------------------------------

/// Continuous trace renderer. Call [`WaveformRenderer::render_frame`] once
/// per display frame; it reads the channel values, never mutates them.
#[derive(Debug)]
pub struct WaveformRenderer {
    time: f64,
    rng: StdRng,
}

impl WaveformRenderer {
    pub fn new() -> Self {
        Self {
            time: 0.0,
            rng: StdRng::from_os_rng(),
        }
    }

    /// Deterministic jitter stream, for tests and reproducible demos.
    pub fn seeded(seed: u64) -> Self {
        Self {
            time: 0.0,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Accumulated phase time.
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Paint one frame onto `surface`.
    ///
    /// Returns `false` without touching the surface when it reports a zero
    /// dimension (not attached yet, collapsed window) — the caller simply
    /// retries next frame. That is the only recoverable condition here.
    pub fn render_frame<S: TraceSurface>(
        &mut self,
        surface: &mut S,
        precision: f64,
        logic: f64,
    ) -> bool {
        let (width, height) = surface.size();
        if width <= 0.0 || height <= 0.0 {
            return false;
        }

        surface.fade(FADE_ALPHA);

        // Reference grid, fixed spacing.
        let mut gx = 0.0;
        while gx < width {
            surface.line((gx, 0.0), (gx, height), Stroke::Grid);
            gx += GRID_SPACING;
        }
        let mut gy = 0.0;
        while gy < height {
            surface.line((0.0, gy), (width, gy), Stroke::Grid);
            gy += GRID_SPACING;
        }

        let params = WaveParams::derive(precision, logic);
        let center_y = height / 2.0;

        let mut points = Vec::with_capacity((width / SAMPLE_STEP) as usize + 1);
        let mut x = 0.0;
        while x < width {
            let mut y = sample_wave(&params, x, width, center_y, self.time);
            if params.noise > 0.0 {
                y += (self.rng.random::<f64>() - 0.5) * JITTER_SPAN * params.noise;
            }
            points.push((x, y));
            x += SAMPLE_STEP;
        }
        surface.path(&points, Stroke::Trace);

        if params.clarity > CENTERLINE_THRESHOLD {
            surface.line(
                (0.0, center_y),
                (width, center_y),
                Stroke::Centerline {
                    opacity: params.centerline_opacity(),
                },
            );
        }

        self.time += params.speed;
        true
    }
}

impl Default for WaveformRenderer {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
