//! Retained-path trace surface for the braille canvas.
//!
//! A browser canvas keeps its pixels between frames, so a low-alpha fade
//! overlay leaves a glowing trail behind the live trace. A ratatui canvas
//! starts every frame blank, so the trail is emulated here instead: the
//! surface retains the last few trace paths and each `fade` call ages them
//! out. The renderer only ever sees the [`TraceSurface`] contract and cannot
//! tell the difference.

use std::collections::VecDeque;

use scopegate_core::{Stroke, TraceSurface};

/// Trace layers kept behind the live one.
const TRAIL_DEPTH: usize = 4;

type Segment = ((f64, f64), (f64, f64));

#[derive(Debug, Default)]
pub struct WaveTrail {
    size: (f64, f64),
    grid: Vec<Segment>,
    layers: VecDeque<Vec<(f64, f64)>>,
    centerline: Option<f64>,
}

impl WaveTrail {
    pub fn new() -> Self {
        Self::default()
    }

    /// Match the surface to the canvas. A size change invalidates history —
    /// stale paths from another geometry would smear across the new one.
    pub fn resize(&mut self, width: f64, height: f64) {
        if self.size != (width, height) {
            self.size = (width, height);
            self.grid.clear();
            self.layers.clear();
            self.centerline = None;
        }
    }

    pub fn dims(&self) -> (f64, f64) {
        self.size
    }

    pub fn grid_lines(&self) -> &[Segment] {
        &self.grid
    }

    /// Retained trace paths, oldest first. The last one is the live frame.
    pub fn layers(&self) -> &VecDeque<Vec<(f64, f64)>> {
        &self.layers
    }

    /// Centerline opacity for this frame, if the renderer asked for one.
    pub fn centerline(&self) -> Option<f64> {
        self.centerline
    }
}

impl TraceSurface for WaveTrail {
    fn size(&self) -> (f64, f64) {
        self.size
    }

    fn fade(&mut self, _alpha: f64) {
        // Frame start: per-frame overlays rebuild, the trail ages one slot.
        self.grid.clear();
        self.centerline = None;
        while self.layers.len() >= TRAIL_DEPTH {
            self.layers.pop_front();
        }
    }

    fn line(&mut self, from: (f64, f64), to: (f64, f64), stroke: Stroke) {
        match stroke {
            Stroke::Grid => self.grid.push((from, to)),
            Stroke::Centerline { opacity } => self.centerline = Some(opacity),
            Stroke::Trace => {}
        }
    }

    fn path(&mut self, points: &[(f64, f64)], stroke: Stroke) {
        if stroke == Stroke::Trace {
            self.layers.push_back(points.to_vec());
        }
    }
}
