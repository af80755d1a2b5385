use std::io::Write;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::app::{App, Message, Model, input, update};

/// Poll interval while a status message is waiting to expire.
const STATUS_POLL: Duration = Duration::from_millis(100);
const IDLE_POLL: Duration = Duration::from_millis(250);

impl App {
    /// Run the pager on `sink` until the user quits.
    ///
    /// # Errors
    ///
    /// Returns an error if raw mode, the alternate screen or the terminal
    /// cannot be set up on the sink, or if terminal I/O fails mid-session.
    pub fn run<W: Write>(self, sink: W) -> Result<()> {
        let _run_scope = crate::perf::scope("app.run.total");

        enable_raw_mode().context("Failed to enable raw mode - mdpage needs an interactive terminal")?;
        let mut backend = CrosstermBackend::new(sink);
        if let Err(err) = execute!(backend, EnterAlternateScreen, EnableMouseCapture) {
            let _ = disable_raw_mode();
            return Err(err).context("Failed to enter the alternate screen");
        }
        let mut terminal = match Terminal::new(backend) {
            Ok(terminal) => terminal,
            Err(err) => {
                let _ = disable_raw_mode();
                return Err(err).context("Failed to initialize terminal");
            }
        };

        let result = terminal
            .size()
            .context("Failed to read terminal size")
            .and_then(|size| {
                let init_scope = crate::perf::scope("app.initial_render");
                let mut model = Model::new(
                    self.title,
                    self.source,
                    self.options,
                    self.renderer,
                    (size.width, size.height),
                );
                drop(init_scope);
                crate::perf::log_event(
                    "init.layout",
                    format!(
                        "terminal={}x{} render_width={} lines={} headings={}",
                        size.width,
                        size.height,
                        model.render_width(),
                        model.rendered.len(),
                        model.locations.len()
                    ),
                );
                Self::event_loop(&mut terminal, &mut model)
            });

        // Restore terminal
        let _ = disable_raw_mode();
        let _ = execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture);
        let _ = terminal.show_cursor();

        result
    }

    fn event_loop<W: Write>(
        terminal: &mut Terminal<CrosstermBackend<W>>,
        model: &mut Model,
    ) -> Result<()> {
        let mut frame_idx: u64 = 0;
        let mut needs_render = true;

        loop {
            if model.status_expired(Instant::now()) {
                *model = update(std::mem::take(model), Message::ClearStatus);
                needs_render = true;
            }

            if needs_render {
                frame_idx += 1;
                let draw_start = Instant::now();
                terminal.draw(|frame| crate::ui::render(model, frame))?;
                crate::perf::log_event(
                    "frame.draw",
                    format!(
                        "frame={} draw_ms={:.3} offset={} rows={}",
                        frame_idx,
                        draw_start.elapsed().as_secs_f64() * 1000.0,
                        model.viewport.offset(),
                        model.display.len()
                    ),
                );
                needs_render = false;
            }

            if model.should_quit {
                break;
            }

            let poll = if model.status_text().is_some() {
                STATUS_POLL
            } else {
                IDLE_POLL
            };
            if !event::poll(poll)? {
                continue;
            }

            // Handle the event, then coalesce any burst that queued up behind
            // it into a single redraw.
            let mut handled = 0_u32;
            loop {
                if let Some(msg) = input::handle_event(&event::read()?, model) {
                    crate::perf::log_event(
                        "event.message",
                        format!("frame={frame_idx} msg={msg:?}"),
                    );
                    *model = update(std::mem::take(model), msg);
                    handled += 1;
                    needs_render = true;
                }
                if model.should_quit || !event::poll(Duration::ZERO)? {
                    break;
                }
            }
            if handled > 1 {
                crate::perf::log_event(
                    "event.drain",
                    format!("frame={frame_idx} handled={handled}"),
                );
            }
        }
        Ok(())
    }
}
