//! The terminal host: polls crossterm events, ticks the stage at the target
//! rate and paints its canvas.

use std::io::stdout;
use std::time::{Duration, Instant};

use color_eyre::eyre::WrapErr;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers, MouseEvent, MouseEventKind,
};
use murk_core::Point;
use murk_scene::{Canvas, InputEvent, SceneKey, Stage, Stats, StatsSink};
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Layout},
    style::Stylize,
    text::Line,
};

use crate::view::CanvasView;

/// Hypno intensity step for `+` and `-`.
const INTENSITY_STEP: f32 = 0.1;
/// Hypno speed step for `]` and `[`.
const SPEED_STEP: f32 = 0.005;

/// Canvas pixels for a terminal of `cols` x `rows` cells.
///
/// The bottom row holds the status line; every other cell shows two pixels.
pub fn canvas_size(cols: u16, rows: u16) -> (u32, u32) {
    let w = u32::from(cols).max(1);
    let h = u32::from(rows.saturating_sub(1)).max(1) * 2;
    (w, h)
}

/// Latest stats, formatted for the bottom row.
#[derive(Debug, Default)]
struct StatusLine(String);

impl StatsSink for StatusLine {
    fn report(&mut self, stats: &Stats) {
        self.0 = stats.to_string();
    }
}

/// The main application which holds the stage and its canvas.
#[derive(Debug)]
pub struct App {
    /// Is the application running?
    running: bool,
    stage: Stage,
    canvas: Canvas,
    status: StatusLine,
    frame_budget: Duration,
    last_tick: Instant,
}

impl App {
    pub fn new(stage: Stage, fps: u32) -> Self {
        let (lw, lh) = stage.logical_size();
        let (pw, ph) = stage.pixel_size();
        let mut canvas = Canvas::new(pw, ph, lw, lh);
        stage.render(&mut canvas);
        let mut status = StatusLine::default();
        status.report(&stage.stats());
        Self {
            running: false,
            stage,
            canvas,
            status,
            frame_budget: Duration::from_secs_f64(1.0 / f64::from(fps.max(1))),
            last_tick: Instant::now(),
        }
    }

    /// Run the application's main loop.
    pub fn run(mut self, mut terminal: DefaultTerminal) -> color_eyre::Result<()> {
        crossterm::execute!(stdout(), EnableMouseCapture).wrap_err("enabling mouse capture")?;
        self.running = true;
        let result = self.main_loop(&mut terminal);
        crossterm::execute!(stdout(), DisableMouseCapture).wrap_err("disabling mouse capture")?;
        result
    }

    fn main_loop(&mut self, terminal: &mut DefaultTerminal) -> color_eyre::Result<()> {
        self.last_tick = Instant::now();
        while self.running {
            terminal.draw(|frame| self.render(frame))?;
            self.handle_crossterm_events()?;

            let elapsed = self.last_tick.elapsed();
            if elapsed >= self.frame_budget {
                self.last_tick = Instant::now();
                self.on_tick(elapsed.as_secs_f32());
            }
        }
        Ok(())
    }

    fn on_tick(&mut self, dt: f32) {
        self.stage.step(dt);
        self.stage.render(&mut self.canvas);
        self.status.report(&self.stage.stats());
    }

    /// Renders the canvas and the status line.
    fn render(&mut self, frame: &mut Frame) {
        let [scene, status] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(frame.area());

        frame.render_widget(CanvasView::new(&self.canvas), scene);

        let help = Line::from(vec![
            self.status.0.as_str().into(),
            "   q".bold(),
            " quit".dark_gray(),
        ]);
        frame.render_widget(help, status);
    }

    /// Reads the crossterm events until the current frame budget runs out.
    fn handle_crossterm_events(&mut self) -> color_eyre::Result<()> {
        let timeout = self.frame_budget.saturating_sub(self.last_tick.elapsed());
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => self.on_key_event(key),
                Event::Mouse(mouse) => self.on_mouse_event(mouse),
                Event::Resize(cols, rows) => self.on_resize(cols, rows),
                _ => {}
            }
        }
        Ok(())
    }

    /// Handles the key events and updates the state of [`App`].
    fn on_key_event(&mut self, key: KeyEvent) {
        match (key.modifiers, key.code) {
            (_, KeyCode::Esc | KeyCode::Char('q'))
            | (KeyModifiers::CONTROL, KeyCode::Char('c') | KeyCode::Char('C')) => self.quit(),
            (_, KeyCode::Char(c @ ('+' | '-' | '[' | ']'))) => self.tune_hypno(c),
            (_, KeyCode::Char(c)) => {
                if let Some(key) = SceneKey::from_char(c) {
                    self.stage.handle(InputEvent::Key(key));
                }
            }
            _ => {}
        }
    }

    fn on_mouse_event(&mut self, mouse: MouseEvent) {
        let Some(p) = self.to_logical(mouse.column, mouse.row) else {
            return;
        };
        let event = match mouse.kind {
            MouseEventKind::Down(_) => InputEvent::PointerDown(p),
            MouseEventKind::Drag(_) => InputEvent::PointerDrag(p),
            MouseEventKind::Moved => InputEvent::PointerMove(p),
            _ => return,
        };
        self.stage.handle(event);
    }

    fn on_resize(&mut self, cols: u16, rows: u16) {
        let (pw, ph) = canvas_size(cols, rows);
        self.stage.handle(InputEvent::Resize {
            width: pw,
            height: ph,
        });
        let (lw, lh) = self.stage.logical_size();
        self.canvas.resize(pw, ph);
        self.canvas.set_logical_size(lw, lh);
        self.stage.render(&mut self.canvas);
        log::debug!("terminal resized to {cols}x{rows}");
    }

    /// Map a terminal cell to the logical point at its centre.
    fn to_logical(&self, column: u16, row: u16) -> Option<Point> {
        cell_to_logical(
            column,
            row,
            self.canvas.pixel_size(),
            self.stage.logical_size(),
        )
    }

    fn tune_hypno(&mut self, c: char) {
        let Some(effect) = self.stage.hypno_mut() else {
            return;
        };
        let s = effect.settings().clone();
        match c {
            '+' => effect.set_intensity(s.intensity + INTENSITY_STEP),
            '-' => effect.set_intensity(s.intensity - INTENSITY_STEP),
            ']' => effect.set_speed(s.speed + SPEED_STEP),
            '[' => effect.set_speed(s.speed - SPEED_STEP),
            _ => {}
        }
    }

    /// Set running to false to quit the application.
    fn quit(&mut self) {
        self.running = false;
    }
}

fn cell_to_logical(
    column: u16,
    row: u16,
    pixel_size: (u32, u32),
    logical_size: (f32, f32),
) -> Option<Point> {
    let (pw, ph) = pixel_size;
    let (x, y) = (u32::from(column), u32::from(row) * 2);
    if x >= pw || y >= ph {
        return None;
    }
    let (lw, lh) = logical_size;
    Some(Point::new(
        (x as f32 + 0.5) * lw / pw as f32,
        (y as f32 + 1.0) * lh / ph as f32,
    ))
}
