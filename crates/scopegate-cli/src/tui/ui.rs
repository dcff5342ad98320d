//! Gate rendering — oscilloscope background with the calibration panel on top.
//!
//! ┌──────────────────────────────────────────────┐
//! │ ┌─╮    ~~~~/\~~/\~~~~ trace ~~~~~~~~~    ╭─┐ │
//! │          ▒▓█ S C O P E G A T E █▓▒           │
//! │        SIGNAL INTEGRITY CHECKPOINT           │
//! │  ┌────────────────────────────────────────┐  │
//! │  │ ● SYSTEM STATUS: PENDING. HOVER TO ... │  │
//! │  └────────────────────────────────────────┘  │
//! │        ╭───╮              ╭───╮              │
//! │        │ ● │  (dials)     │ ● │              │
//! │        ╰───╯              ╰───╯              │
//! │      PRECISION           LOGIC               │
//! │  PRECISION ▮▮▮▮▮▯▯▯ 62%  LOGIC ▮▯▯▯  8%      │
//! │ └─╯   [ s: skip calibration  q: quit ]   ╰─┘ │
//! └──────────────────────────────────────────────┘
//!
//! The trace canvas covers the whole screen; the panel widgets overwrite the
//! cells they occupy, the way a DOM overlay sits on a full-bleed canvas.

use ratatui::layout::Position;
use ratatui::widgets::canvas::{Canvas, Circle, Context, Line as CanvasLine};
use ratatui::{prelude::*, widgets::*};

use scopegate_core::{ChannelId, FULL_SCALE, GateState};

use super::app::App;
use super::trail::WaveTrail;

const SUBTITLE: &str = "SIGNAL INTEGRITY CHECKPOINT";
const PENDING_TEXT: &str = "SYSTEM STATUS: PENDING. HOVER TO CALIBRATE SENSORS TO 100% TO UNLOCK.";
const CALIBRATED_TEXT: &str = "SYSTEM CALIBRATED - UNLOCKING...";

// Palette, straight from the scope: phosphor green trace, cyan second dial.
const OSC_GREEN: (u8, u8, u8) = (0, 255, 65);
const OSC_CYAN: (u8, u8, u8) = (0, 204, 255);
const GRID_GREEN: (u8, u8, u8) = (0, 64, 20);
const FRAME_GREEN: (u8, u8, u8) = (0, 120, 34);
const TEXT_WHITE: (u8, u8, u8) = (222, 235, 226);
const DIM_GRAY: (u8, u8, u8) = (128, 128, 128);
const DARK_GRAY: (u8, u8, u8) = (58, 58, 58);
const AMBER: (u8, u8, u8) = (221, 180, 42);

pub fn draw(f: &mut Frame, app: &App) {
    if app.showing_content() {
        draw_content(f, f.area(), app);
        return;
    }
    let k = app.gate_visibility();
    draw_wave(f, f.area(), app.trail(), k);
    draw_gate(f, f.area(), app, k);
}

// ---------------------------------------------------------------------------
// Layout and hit regions
// ---------------------------------------------------------------------------

/// Placement of every gate element. The knob rects double as the hover
/// hit-regions, so the event loop computes this from the same function the
/// renderer does.
#[derive(Debug, Clone, Copy)]
pub struct GateLayout {
    pub title: Rect,
    pub subtitle: Rect,
    pub status: Rect,
    pub precision_knob: Rect,
    pub logic_knob: Rect,
    pub bars: Rect,
    pub hint: Rect,
}

pub fn gate_layout(area: Rect) -> GateLayout {
    let panel_width = area.width.min(64);
    let panel_height = area.height.min(24);
    let panel = Rect::new(
        area.x + (area.width - panel_width) / 2,
        area.y + (area.height - panel_height) / 2,
        panel_width,
        panel_height,
    );

    let rows = Layout::vertical([
        Constraint::Length(2), // title
        Constraint::Length(1), // subtitle
        Constraint::Length(1),
        Constraint::Length(3), // status
        Constraint::Length(1),
        Constraint::Length(10), // knobs
        Constraint::Length(1),
        Constraint::Length(3), // bars
    ])
    .split(panel);

    let halves =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).split(rows[5]);

    // Pinned to the bottom edge, well away from the dials.
    let hint = Rect::new(area.x, (area.y + area.height).saturating_sub(2), area.width, 1);

    GateLayout {
        title: rows[0],
        subtitle: rows[1],
        status: rows[3],
        precision_knob: halves[0],
        logic_knob: halves[1],
        bars: rows[7],
        hint,
    }
}

/// Which channel a pointer position is hovering, if any.
pub fn hover_target(layout: &GateLayout, pos: Position) -> Option<ChannelId> {
    if layout.precision_knob.contains(pos) {
        Some(ChannelId::Precision)
    } else if layout.logic_knob.contains(pos) {
        Some(ChannelId::Logic)
    } else {
        None
    }
}

/// Needle angle in degrees from 12 o'clock, clockwise: -135° empty, +135° full.
pub fn indicator_angle(value: f64) -> f64 {
    -135.0 + value / FULL_SCALE * 270.0
}

// ---------------------------------------------------------------------------
// Waveform background
// ---------------------------------------------------------------------------

fn draw_wave(f: &mut Frame, area: Rect, trail: &WaveTrail, k: f64) {
    let (w, h) = trail.dims();
    if w <= 0.0 || h <= 0.0 {
        return;
    }

    let canvas = Canvas::default()
        .x_bounds([0.0, w])
        .y_bounds([0.0, h])
        .marker(symbols::Marker::Braille)
        .paint(move |ctx| {
            for &((x1, y1), (x2, y2)) in trail.grid_lines() {
                ctx.draw(&CanvasLine {
                    x1,
                    y1: h - y1,
                    x2,
                    y2: h - y2,
                    color: scaled(GRID_GREEN, k),
                });
            }

            // Oldest layers dimmest: the emulated phosphor trail.
            let layers = trail.layers();
            let n = layers.len();
            for (i, layer) in layers.iter().enumerate() {
                let age = (i + 1) as f64 / n as f64;
                let color = scaled(OSC_GREEN, k * (0.2 + 0.8 * age));
                for pair in layer.windows(2) {
                    ctx.draw(&CanvasLine {
                        x1: pair[0].0,
                        y1: h - pair[0].1,
                        x2: pair[1].0,
                        y2: h - pair[1].1,
                        color,
                    });
                }
            }

            if let Some(opacity) = trail.centerline() {
                // Dashed 5 on / 5 off.
                let color = scaled(OSC_GREEN, k * opacity);
                let mid = h / 2.0;
                let mut x = 0.0;
                while x < w {
                    ctx.draw(&CanvasLine {
                        x1: x,
                        y1: mid,
                        x2: (x + 5.0).min(w),
                        y2: mid,
                        color,
                    });
                    x += 10.0;
                }
            }

            draw_corners(ctx, w, h, k);
        });

    f.render_widget(canvas, area);
}

fn draw_corners(ctx: &mut Context<'_>, w: f64, h: f64, k: f64) {
    let len = (w / 6.0).min(16.0);
    let inset = 4.0;
    let color = scaled(FRAME_GREEN, k);
    let corners = [
        (inset, inset, 1.0, 1.0),
        (w - inset, inset, -1.0, 1.0),
        (inset, h - inset, 1.0, -1.0),
        (w - inset, h - inset, -1.0, -1.0),
    ];
    for (x, y, sx, sy) in corners {
        ctx.draw(&CanvasLine {
            x1: x,
            y1: y,
            x2: x + sx * len,
            y2: y,
            color,
        });
        ctx.draw(&CanvasLine {
            x1: x,
            y1: y,
            x2: x,
            y2: y + sy * len * 0.6,
            color,
        });
    }
}

// ---------------------------------------------------------------------------
// Gate panel
// ---------------------------------------------------------------------------

fn draw_gate(f: &mut Frame, area: Rect, app: &App, k: f64) {
    let layout = gate_layout(area);
    let gate = app.gate();

    let title = Paragraph::new(app.title_text())
        .style(Style::default().fg(scaled(TEXT_WHITE, k)).bold())
        .alignment(Alignment::Center);
    f.render_widget(title, layout.title);

    let subtitle = Paragraph::new(SUBTITLE)
        .style(Style::default().fg(scaled(OSC_GREEN, k)))
        .alignment(Alignment::Center);
    f.render_widget(subtitle, layout.subtitle);

    draw_status(f, layout.status, gate, k);
    draw_knob(f, layout.precision_knob, gate, ChannelId::Precision, app.hover(), k);
    draw_knob(f, layout.logic_knob, gate, ChannelId::Logic, app.hover(), k);
    draw_bars(f, layout.bars, gate, k);

    let hint = Paragraph::new("[ s: skip calibration   q: quit ]")
        .style(Style::default().fg(scaled(DIM_GRAY, k)))
        .alignment(Alignment::Center);
    f.render_widget(hint, layout.hint);
}

fn draw_status(f: &mut Frame, area: Rect, gate: &GateState, k: f64) {
    let ready = gate.both_locked();
    let (dot, text, text_color, border) = if ready {
        (
            scaled(OSC_GREEN, k),
            CALIBRATED_TEXT,
            scaled(OSC_GREEN, k),
            scaled(OSC_GREEN, k),
        )
    } else {
        (
            scaled(AMBER, k),
            PENDING_TEXT,
            scaled(DIM_GRAY, k),
            scaled(DARK_GRAY, k),
        )
    };

    let line = Line::from(vec![
        Span::styled("● ", Style::default().fg(dot)),
        Span::styled(text, Style::default().fg(text_color)),
    ]);
    let p = Paragraph::new(line)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border)),
        );
    f.render_widget(p, area);
}

fn draw_knob(
    f: &mut Frame,
    area: Rect,
    gate: &GateState,
    id: ChannelId,
    hover: Option<ChannelId>,
    k: f64,
) {
    let ch = gate.channel(id);
    let value = ch.value();
    let locked = ch.is_locked();
    let accent = accent_rgb(id);

    let rows = Layout::vertical([
        Constraint::Min(4),    // dial
        Constraint::Length(1), // label
        Constraint::Length(1), // percent
        Constraint::Length(1), // lock badge
    ])
    .split(area);

    let ring = if hover == Some(id) && !locked {
        scaled(accent, k * 0.6)
    } else {
        scaled(DARK_GRAY, k)
    };
    let needle = if locked || value > 0.0 {
        scaled(accent, k)
    } else {
        scaled(DARK_GRAY, k)
    };

    let dial = Canvas::default()
        .x_bounds([-1.3, 1.3])
        .y_bounds([-1.3, 1.3])
        .marker(symbols::Marker::Braille)
        .paint(move |ctx| {
            ctx.draw(&Circle {
                x: 0.0,
                y: 0.0,
                radius: 1.0,
                color: ring,
            });
            let rad = indicator_angle(value).to_radians();
            // 0° points to 12 o'clock; positive angles run clockwise.
            let (dx, dy) = (rad.sin(), rad.cos());
            ctx.draw(&CanvasLine {
                x1: dx * 0.35,
                y1: dy * 0.35,
                x2: dx * 0.95,
                y2: dy * 0.95,
                color: needle,
            });
        });
    f.render_widget(dial, rows[0]);

    let label_color = if locked { scaled(accent, k) } else { scaled(DIM_GRAY, k) };
    let label = Paragraph::new(id.label())
        .style(Style::default().fg(label_color))
        .alignment(Alignment::Center);
    f.render_widget(label, rows[1]);

    let percent = Paragraph::new(format!("{:.0}%", value))
        .style(Style::default().fg(label_color).bold())
        .alignment(Alignment::Center);
    f.render_widget(percent, rows[2]);

    if locked {
        let badge = Paragraph::new("LOCKED")
            .style(Style::default().fg(scaled(accent, k)).bold())
            .alignment(Alignment::Center);
        f.render_widget(badge, rows[3]);
    }
}

fn draw_bars(f: &mut Frame, area: Rect, gate: &GateState, k: f64) {
    let rows = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .split(area);
    draw_bar(f, rows[0], gate, ChannelId::Precision, k);
    draw_bar(f, rows[2], gate, ChannelId::Logic, k);
}

fn draw_bar(f: &mut Frame, area: Rect, gate: &GateState, id: ChannelId, k: f64) {
    let cols = Layout::horizontal([
        Constraint::Length(10),
        Constraint::Min(10),
        Constraint::Length(5),
    ])
    .split(area);

    let value = gate.value(id);
    let accent = accent_rgb(id);

    let label = Paragraph::new(id.label()).style(Style::default().fg(scaled(DIM_GRAY, k)));
    f.render_widget(label, cols[0]);

    let gauge = Gauge::default()
        .ratio((value / FULL_SCALE).clamp(0.0, 1.0))
        .gauge_style(Style::default().fg(scaled(accent, k)).bg(scaled(DARK_GRAY, k * 0.5)))
        .label("");
    f.render_widget(gauge, cols[1]);

    let percent = Paragraph::new(format!("{:>4.0}%", value))
        .style(Style::default().fg(scaled(accent, k)))
        .alignment(Alignment::Right);
    f.render_widget(percent, cols[2]);
}

// ---------------------------------------------------------------------------
// Content view
// ---------------------------------------------------------------------------

fn draw_content(f: &mut Frame, area: Rect, app: &App) {
    let width = area.width.min(60);
    let height = area.height.min(11);
    let panel = Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    );

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            app.title_plain().to_string(),
            Style::default().fg(scaled(TEXT_WHITE, 1.0)).bold(),
        )),
        Line::from(Span::styled(
            "CALIBRATION COMPLETE",
            Style::default().fg(scaled(OSC_GREEN, 1.0)),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "This is the host's content view. Swap it for the real thing.",
            Style::default().fg(scaled(DIM_GRAY, 1.0)),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "q: quit",
            Style::default().fg(scaled(DIM_GRAY, 1.0)),
        )),
    ];

    let p = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(scaled(OSC_GREEN, 1.0)))
            .title(" SIGNAL CLEAR "),
    );
    f.render_widget(p, panel);
}

// ---------------------------------------------------------------------------
// Palette helpers
// ---------------------------------------------------------------------------

fn accent_rgb(id: ChannelId) -> (u8, u8, u8) {
    match id {
        ChannelId::Precision => OSC_GREEN,
        ChannelId::Logic => OSC_CYAN,
    }
}

/// Scale a palette entry toward black; carries the exit fade.
fn scaled(rgb: (u8, u8, u8), k: f64) -> Color {
    let k = k.clamp(0.0, 1.0);
    Color::Rgb(
        (f64::from(rgb.0) * k).round() as u8,
        (f64::from(rgb.1) * k).round() as u8,
        (f64::from(rgb.2) * k).round() as u8,
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn knob_hit_regions_are_disjoint() {
        let layout = gate_layout(Rect::new(0, 0, 80, 24));
        let overlap = layout.precision_knob.intersection(layout.logic_knob);
        assert_eq!(overlap.area(), 0);
        assert!(layout.precision_knob.area() > 0);
        assert!(layout.logic_knob.area() > 0);
    }

    #[test]
    fn layout_stays_inside_the_screen() {
        let area = Rect::new(0, 0, 80, 24);
        let layout = gate_layout(area);
        for rect in [
            layout.title,
            layout.subtitle,
            layout.status,
            layout.precision_knob,
            layout.logic_knob,
            layout.bars,
            layout.hint,
        ] {
            assert_eq!(rect.intersection(area), rect, "{rect:?} leaks off-screen");
        }
    }

    #[test]
    fn layout_survives_tiny_terminals() {
        // No panics, no leaked rects, even at silly sizes.
        for (w, h) in [(1, 1), (10, 3), (20, 5), (200, 60)] {
            let _ = gate_layout(Rect::new(0, 0, w, h));
        }
    }

    #[test]
    fn hover_target_maps_each_knob() {
        let layout = gate_layout(Rect::new(0, 0, 80, 24));

        let p = layout.precision_knob;
        let inside_p = Position::new(p.x + p.width / 2, p.y + p.height / 2);
        assert_eq!(hover_target(&layout, inside_p), Some(ChannelId::Precision));

        let l = layout.logic_knob;
        let inside_l = Position::new(l.x + l.width / 2, l.y + l.height / 2);
        assert_eq!(hover_target(&layout, inside_l), Some(ChannelId::Logic));

        assert_eq!(hover_target(&layout, Position::new(0, 0)), None);
    }

    #[test]
    fn indicator_angle_sweep() {
        assert_eq!(indicator_angle(0.0), -135.0);
        assert_eq!(indicator_angle(50.0), 0.0);
        assert_eq!(indicator_angle(100.0), 135.0);
    }

    #[test]
    fn scaled_color_fades_to_black() {
        assert_eq!(scaled(OSC_GREEN, 0.0), Color::Rgb(0, 0, 0));
        assert_eq!(scaled(OSC_GREEN, 1.0), Color::Rgb(0, 255, 65));
        // Out-of-range factors clamp instead of wrapping.
        assert_eq!(scaled(OSC_GREEN, 2.0), Color::Rgb(0, 255, 65));
    }
}
