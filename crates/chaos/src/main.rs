mod logging;
mod view;

use std::time::{Duration, Instant};

use chaos_config::AppConfig;
use chaos_field::{Field, PixelCanvas, StdRandom};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Layout},
    style::Stylize,
    text::Line,
};

use view::{CanvasView, viewport};

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let config = chaos_config::load()?;
    logging::init(config.log_level.as_deref())?;

    let terminal = ratatui::init();
    let result = App::new(config).run(terminal);
    ratatui::restore();
    result
}

type CanvasField = Field<PixelCanvas, StdRandom>;

fn build_field(config: &AppConfig) -> CanvasField {
    Field::new(
        config.field.clone(),
        PixelCanvas::new(),
        StdRandom::new(config.seed),
    )
}

/// The main application which holds the state and logic of the application.
#[derive(Debug)]
pub struct App {
    /// Is the application running?
    running: bool,
    /// Frozen on the current frame?
    paused: bool,
    /// Show the key help line.
    show_help: bool,
    config: AppConfig,
    field: CanvasField,
    /// Terminal size the field was last laid out for.
    last_size: Option<(u16, u16)>,
}

impl App {
    /// Construct a new instance of [`App`].
    pub fn new(config: AppConfig) -> Self {
        Self {
            running: false,
            paused: false,
            show_help: true,
            field: build_field(&config),
            config,
            last_size: None,
        }
    }

    /// Run the application's main loop.
    pub fn run(mut self, mut terminal: DefaultTerminal) -> color_eyre::Result<()> {
        self.running = true;
        while self.running {
            let deadline = Instant::now() + self.config.frame_interval();
            terminal.draw(|frame| self.render(frame))?;
            self.handle_crossterm_events(deadline)?;
        }
        Ok(())
    }

    /// Renders the user interface.
    fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();

        // Reinitialize if dimensions changed or the field was never laid out
        let size = (area.width, area.height);
        if self.last_size != Some(size) {
            let (width, height) = viewport(area, self.config.pixel_size);
            let ratio = self.config.pixel_ratio();
            if self.last_size.is_none() {
                self.field.start(width, height, ratio);
            } else {
                self.field.resize(width, height, ratio);
            }
            self.last_size = Some(size);
        }

        if !self.paused {
            self.field.step();
        }
        frame.render_widget(CanvasView::new(self.field.surface()), area);

        if self.show_help {
            let [_, bottom] =
                Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(area);
            frame.render_widget(self.help_line(), bottom);
        }
    }

    fn help_line(&self) -> Line<'static> {
        Line::from(vec![
            "q".bold().white(),
            " quit  ".gray(),
            "space".bold().white(),
            (if self.paused { " resume  " } else { " pause  " }).gray(),
            "r".bold().white(),
            " reset  ".gray(),
            "n".bold().white(),
            " noise  ".gray(),
            "p".bold().white(),
            format!(" preset: {}  ", self.config.preset).gray(),
            "?".bold().white(),
            " hide help".gray(),
        ])
        .centered()
    }

    /// Reads the crossterm events and updates the state of [`App`].
    fn handle_crossterm_events(&mut self, deadline: Instant) -> color_eyre::Result<()> {
        self.pump_events(deadline, |timeout| {
            Ok(if event::poll(timeout)? {
                Some(event::read()?)
            } else {
                None
            })
        })
    }

    /// Handle events until the frame deadline so the animation runs at a steady rate.
    ///
    /// `next` waits up to the given timeout for an event. It is asked at least
    /// once per frame, with a zero timeout when drawing overran the deadline,
    /// so pending keys are never starved.
    fn pump_events(
        &mut self,
        deadline: Instant,
        mut next: impl FnMut(Duration) -> color_eyre::Result<Option<Event>>,
    ) -> color_eyre::Result<()> {
        while self.running {
            let timeout = deadline.saturating_duration_since(Instant::now());
            let Some(event) = next(timeout)? else {
                break;
            };
            match event {
                Event::Key(key) if key.kind == KeyEventKind::Press => self.on_key_event(key),
                // The next render picks up the new size.
                Event::Resize(_, _) => {}
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
            (_, KeyCode::Char(' ')) => self.paused = !self.paused,
            (_, KeyCode::Char('r')) => self.reset(),
            (_, KeyCode::Char('n')) => self.field.apply_noise(),
            (_, KeyCode::Char('p')) => self.cycle_preset(),
            (_, KeyCode::Char('?')) => self.show_help = !self.show_help,
            _ => {}
        }
    }

    /// Respawn every node at the current size.
    fn reset(&mut self) {
        if self.last_size.is_some() {
            self.field.restart();
        }
    }

    /// Switch to the next preset, rebuilding the field on the next frame.
    fn cycle_preset(&mut self) {
        let preset = self.config.preset.next();
        match self.config.with_preset(preset) {
            Ok(config) => {
                tracing::debug!(%preset, "switching preset");
                self.field = build_field(&config);
                self.config = config;
                self.last_size = None;
            }
            Err(e) => tracing::warn!(%preset, error = %e, "cannot switch preset"),
        }
    }

    /// Set running to false to quit the application.
    fn quit(&mut self) {
        self.running = false;
    }
}
