//! Gate TUI application — event loop, hover wiring, exit transition.
//!
//! Design: the loop owns all timing. Channel accrual, the headline decode
//! tick and the trace frame are driven from one frame cadence with measured
//! elapsed time, so nothing can fire against a torn-down gate — dropping the
//! loop cancels everything. Mouse capture is on for the gate's hover
//! hit-regions; keys cover bypass and quit.

use std::io;
use std::time::{Duration, Instant};

use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseEvent,
        MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::layout::Position;
use ratatui::prelude::*;

use scopegate_core::{ChannelId, GateState, SCRAMBLE_TICK, ScrambleText, WaveformRenderer};

use super::trail::WaveTrail;
use super::ui;

/// Fixed duration of the unlock fade before the content swap.
pub const EXIT_TRANSITION: Duration = Duration::from_millis(1200);

/// One-shot notification to the host.
pub type Hook = Box<dyn FnOnce()>;

/// Which screen the app is on.
enum Screen {
    Gate,
    Leaving { since: Instant },
    Content,
}

pub struct App {
    gate: GateState,
    renderer: WaveformRenderer,
    trail: WaveTrail,
    title: ScrambleText,
    title_text: String,
    title_plain: String,
    screen: Screen,
    hover: Option<ChannelId>,
    frame_period: Duration,
    last_frame: Instant,
    scramble_budget: Duration,
    running: bool,
    start_unlocked: bool,
    on_unlocked: Option<Hook>,
    on_complete: Option<Hook>,
}

impl App {
    pub fn new(title: &str, fps: u32, start_unlocked: bool) -> Self {
        let mut scramble = ScrambleText::new(title);
        let title_text = scramble.current();
        Self {
            gate: GateState::new(),
            renderer: WaveformRenderer::new(),
            trail: WaveTrail::new(),
            title: scramble,
            title_text,
            title_plain: title.to_string(),
            screen: Screen::Gate,
            hover: None,
            frame_period: Duration::from_secs_f64(1.0 / f64::from(fps.max(1))),
            last_frame: Instant::now(),
            scramble_budget: Duration::ZERO,
            running: true,
            start_unlocked,
            on_unlocked: None,
            on_complete: None,
        }
    }

    /// Host hook fired once when the gate is satisfied (organic or bypass);
    /// this is where the host persists its "stay unlocked" flag.
    pub fn on_unlocked(mut self, hook: impl FnOnce() + 'static) -> Self {
        self.on_unlocked = Some(Box::new(hook));
        self
    }

    /// Host hook fired once when the exit transition finishes — the moment
    /// the content may replace the gate. Under a mount-time bypass it fires
    /// synchronously before the first frame.
    pub fn on_complete(mut self, hook: impl FnOnce() + 'static) -> Self {
        self.on_complete = Some(Box::new(hook));
        self
    }

    pub fn run(&mut self) -> io::Result<()> {
        if self.start_unlocked {
            // Arrived already satisfied: no gate frame is ever drawn.
            self.fire_complete();
            self.screen = Screen::Content;
        }

        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        // Install panic hook that restores terminal before printing the panic.
        let original_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            let _ = disable_raw_mode();
            let _ = execute!(
                io::stdout(),
                LeaveAlternateScreen,
                DisableMouseCapture,
                crossterm::cursor::Show
            );
            original_hook(info);
        }));

        let result = self.run_loop(&mut terminal);

        // Always restore terminal, even if the loop returned an error.
        let _ = std::panic::take_hook();
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture,
            crossterm::cursor::Show
        )?;

        result
    }

    fn run_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> io::Result<()> {
        self.last_frame = Instant::now();

        while self.running {
            let size = terminal.size()?;
            let area = Rect::new(0, 0, size.width, size.height);

            self.tick(area);
            terminal.draw(|f| ui::draw(f, self))?;

            let budget = self.frame_period.saturating_sub(self.last_frame.elapsed());
            if event::poll(budget)? {
                self.handle_event(event::read()?, area);
                // Pointer motion arrives in bursts; drain the queue so hover
                // state reflects the latest position before the next frame.
                while event::poll(Duration::ZERO)? {
                    self.handle_event(event::read()?, area);
                }
            }
        }

        Ok(())
    }

    /// One frame of gate time: accrual, headline decode, trace, transitions.
    fn tick(&mut self, area: Rect) {
        let now = Instant::now();
        let dt = now.duration_since(self.last_frame);
        self.last_frame = now;

        match self.screen {
            Screen::Gate => {
                self.gate.advance(dt);
                self.advance_title(dt);
                if self.gate.take_unlock() {
                    self.fire_unlocked();
                    self.screen = Screen::Leaving { since: now };
                }
                self.render_wave(area);
            }
            Screen::Leaving { since } => {
                self.advance_title(dt);
                self.render_wave(area);
                if now.duration_since(since) >= EXIT_TRANSITION {
                    self.fire_complete();
                    self.screen = Screen::Content;
                }
            }
            Screen::Content => {}
        }
    }

    fn advance_title(&mut self, dt: Duration) {
        self.scramble_budget += dt;
        let mut ticked = false;
        while self.scramble_budget >= SCRAMBLE_TICK {
            self.scramble_budget -= SCRAMBLE_TICK;
            self.title.tick();
            ticked = true;
        }
        if ticked {
            self.title_text = self.title.current();
        }
    }

    fn render_wave(&mut self, area: Rect) {
        // Braille cells are 2×4 dots; give the renderer the dot grid.
        let width = f64::from(area.width) * 2.0;
        let height = f64::from(area.height) * 4.0;
        self.trail.resize(width, height);

        let p = self.gate.value(ChannelId::Precision);
        let l = self.gate.value(ChannelId::Logic);
        // A zero-size terminal skips the frame; it retries next loop.
        self.renderer.render_frame(&mut self.trail, p, l);
    }

    fn handle_event(&mut self, ev: Event, area: Rect) {
        match ev {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key.code),
            Event::Mouse(m) => self.handle_mouse(m, area),
            // Without focus there are no leave events; drop the hover so a
            // channel cannot keep charging behind the user's back.
            Event::FocusLost => self.drop_hover(),
            _ => {}
        }
    }

    fn handle_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.running = false,
            KeyCode::Char('s') | KeyCode::Char('S') => {
                if matches!(self.screen, Screen::Gate) {
                    // Bypass force-locks both channels; the next tick picks
                    // the unlock signal up and runs the same exit transition
                    // as an organic unlock.
                    self.gate.bypass();
                }
            }
            _ => {}
        }
    }

    fn handle_mouse(&mut self, ev: MouseEvent, area: Rect) {
        if !matches!(self.screen, Screen::Gate) {
            return;
        }
        if ev.kind != MouseEventKind::Moved {
            return;
        }

        let layout = ui::gate_layout(area);
        let target = ui::hover_target(&layout, Position::new(ev.column, ev.row));
        if target != self.hover {
            if let Some(prev) = self.hover {
                self.gate.end_charging(prev);
            }
            if let Some(next) = target {
                self.gate.begin_charging(next);
            }
            self.hover = target;
        }
    }

    fn drop_hover(&mut self) {
        if let Some(prev) = self.hover.take() {
            self.gate.end_charging(prev);
        }
    }

    fn fire_unlocked(&mut self) {
        if let Some(hook) = self.on_unlocked.take() {
            hook();
        }
    }

    fn fire_complete(&mut self) {
        if let Some(hook) = self.on_complete.take() {
            hook();
        }
    }

    // --- Accessors for rendering ---

    pub fn gate(&self) -> &GateState {
        &self.gate
    }

    pub fn trail(&self) -> &WaveTrail {
        &self.trail
    }

    pub fn title_text(&self) -> &str {
        &self.title_text
    }

    pub fn title_plain(&self) -> &str {
        &self.title_plain
    }

    pub fn hover(&self) -> Option<ChannelId> {
        self.hover
    }

    pub fn showing_content(&self) -> bool {
        matches!(self.screen, Screen::Content)
    }

    /// Visibility of the gate surface: 1 fully visible, 0 fully faded.
    pub fn gate_visibility(&self) -> f64 {
        match self.screen {
            Screen::Gate => 1.0,
            Screen::Leaving { since } => 1.0 - exit_progress(since.elapsed(), EXIT_TRANSITION),
            Screen::Content => 0.0,
        }
    }
}

/// Fraction of the exit fade elapsed, clamped to `[0, 1]`.
fn exit_progress(elapsed: Duration, total: Duration) -> f64 {
    (elapsed.as_secs_f64() / total.as_secs_f64()).clamp(0.0, 1.0)
}
