mod prompt;
mod renderer;
mod terminal;

pub use renderer::{Frame, Pixel, Renderer};
pub use terminal::TerminalSession;

use std::{
    io::Stdout,
    time::{Duration, Instant},
};

use crossterm::{
    ExecutableCommand, cursor,
    event::{self, KeyCode},
    queue,
    style::{self, Attribute, Color, Stylize},
    terminal::{self as term, ClearType},
};

use crate::{
    config::{MAX_FRAME_DELAY_MS, MAX_PATH_WIDTH, Settings},
    error::AppError,
    generators::{GenerationState, RecursiveBacktracker, Step},
    maze::Grid,
};
use prompt::MenuChoice;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UserAction {
    /// Pause or resume the animation
    TogglePause,
    /// Advance one step while paused
    Step,
    /// Shorten the frame delay
    SpeedUp,
    /// Lengthen the frame delay
    SlowDown,
    /// Throw the maze away and generate a new one
    Restart,
    /// Terminal resize
    Resize,
    /// Leave the animation
    Cancel,
}

/// Frame delay that can be halved or doubled within `0..=MAX_FRAME_DELAY_MS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FrameDelay {
    current: Duration,
}

impl FrameDelay {
    const SLOWEST: Duration = Duration::from_millis(MAX_FRAME_DELAY_MS);
    const SMALLEST_NONZERO: Duration = Duration::from_millis(1);

    fn new(delay: Duration) -> Self {
        Self {
            current: delay.min(Self::SLOWEST),
        }
    }

    fn current(&self) -> Duration {
        self.current
    }

    fn faster(&mut self) {
        self.current = if self.current <= Self::SMALLEST_NONZERO {
            Duration::ZERO
        } else {
            self.current / 2
        };
    }

    fn slower(&mut self) {
        self.current = if self.current.is_zero() {
            Self::SMALLEST_NONZERO
        } else {
            (self.current * 2).min(Self::SLOWEST)
        };
    }
}

pub struct App {
    /// Settings used by the "standard settings" menu entry
    settings: Settings,
    /// How long to wait for input when there is nothing to step
    idle_poll_timeout: Duration,
}

impl App {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            idle_poll_timeout: Duration::from_millis(100),
        }
    }

    /// Main application loop: show the menu until the user exits
    pub fn run(&self, stdout: &mut Stdout) -> Result<(), AppError> {
        tracing::info!("Started main app loop");
        loop {
            queue!(
                stdout,
                term::Clear(ClearType::All),
                cursor::MoveTo(0, 0),
                style::PrintStyledContent(
                    "Labyrinth simulation\r\n\r\n"
                        .with(Color::Green)
                        .attribute(Attribute::Bold)
                )
            )?;
            let settings = match MenuChoice::choose(stdout)? {
                MenuChoice::RunStandard => App::fit_to_terminal(self.settings)?,
                MenuChoice::SetUp => match App::ask_maze_settings(stdout, self.settings)? {
                    Some(settings) => settings,
                    None => continue,
                },
                MenuChoice::Exit => break,
            };
            self.animate(settings)?;
        }
        tracing::info!("Exiting main app loop");
        Ok(())
    }

    /// Generate a maze to completion without touching the terminal.
    pub fn headless(settings: Settings) -> Result<Grid, AppError> {
        let started = Instant::now();
        let mut generator =
            RecursiveBacktracker::new(settings.width, settings.height, settings.seed)?;
        let steps = generator.run_to_completion()?;
        tracing::info!(
            "Generated a {}x{} maze from {:?} in {} steps ({:?})",
            settings.width,
            settings.height,
            generator.start(),
            steps,
            started.elapsed()
        );
        Ok(generator.grid().clone())
    }

    /// Pixel columns and rows left for the maze in a `columns` x `rows` terminal.
    fn drawable_area(columns: u16, rows: u16) -> (u32, u32) {
        (
            (columns / Pixel::WIDTH) as u32,
            rows.saturating_sub(Renderer::NUM_STATUS_ROWS) as u32,
        )
    }

    /// Shrink the maze so it fits in the current terminal.
    fn fit_to_terminal(settings: Settings) -> Result<Settings, AppError> {
        let (columns, rows) = term::size()?;
        let (pixel_columns, pixel_rows) = App::drawable_area(columns, rows);
        let (fitted, changed) = settings.fit_to(pixel_columns, pixel_rows);
        if changed {
            tracing::warn!(
                "Maze {}x{} does not fit a {}x{} terminal, shrinking to {}x{}",
                settings.width,
                settings.height,
                columns,
                rows,
                fitted.width,
                fitted.height
            );
        }
        Ok(fitted)
    }

    /// Animate one generation run until the user leaves it.
    /// One generation step is taken per frame; once complete the final maze stays on screen.
    fn animate(&self, settings: Settings) -> Result<(), AppError> {
        let mut generator =
            RecursiveBacktracker::new(settings.width, settings.height, settings.seed)?;
        let mut renderer = Renderer::new(settings.path_width);
        let mut frame_delay = FrameDelay::new(settings.frame_delay);
        let mut is_paused = false;
        tracing::info!(
            "Animating a {}x{} maze with path width {} and seed {:?}",
            settings.width,
            settings.height,
            settings.path_width,
            settings.seed
        );
        renderer.invalidate()?;

        loop {
            let stepping = !is_paused && !generator.is_complete();
            let wait = if stepping {
                frame_delay.current()
            } else {
                self.idle_poll_timeout
            };

            let mut single_step = false;
            for action in App::poll_user_actions(wait)? {
                tracing::debug!("[animate] user action {:?}", action);
                match action {
                    UserAction::Cancel => {
                        tracing::info!("Animation cancelled by user");
                        return Ok(());
                    }
                    UserAction::TogglePause => is_paused = !is_paused,
                    UserAction::Step if is_paused => single_step = true,
                    UserAction::Step => {}
                    UserAction::SpeedUp => frame_delay.faster(),
                    UserAction::SlowDown => frame_delay.slower(),
                    UserAction::Restart => {
                        generator.reset()?;
                        tracing::info!("Restarted generation from {:?}", generator.start());
                    }
                    UserAction::Resize => renderer.invalidate()?,
                }
            }

            if !generator.is_complete() && (!is_paused || single_step) {
                match generator.step()? {
                    Step::Carved {
                        from,
                        to,
                        direction,
                    } => tracing::debug!("Carved {} from {:?} to {:?}", direction, from, to),
                    Step::Backtracked { from } => tracing::debug!("Backtracked from {:?}", from),
                    Step::Idle => {}
                }
            }

            let active = match generator.state() {
                GenerationState::Running => generator.current(),
                GenerationState::Complete => None,
            };
            let status = App::status_lines(&generator, is_paused, frame_delay.current());
            renderer.draw(generator.grid(), active, &status)?;
        }
    }

    fn status_lines(
        generator: &RecursiveBacktracker,
        is_paused: bool,
        frame_delay: Duration,
    ) -> [String; 2] {
        let state = match (generator.state(), is_paused) {
            (GenerationState::Running, true) => "Paused".to_string(),
            (state, _) => state.to_string(),
        };
        [
            format!(
                "{}: {}/{} cells visited, {} steps, {} ms per step",
                state,
                generator.progress(),
                generator.total_cells(),
                generator.steps_taken(),
                frame_delay.as_millis()
            ),
            "Enter: pause/resume  →: step when paused  ↑/↓: faster/slower  r: restart  Esc: menu"
                .to_string(),
        ]
    }

    /// Wait up to `timeout` for input and translate it into user actions.
    /// Returns early once a Cancel action is seen.
    fn poll_user_actions(timeout: Duration) -> std::io::Result<Vec<UserAction>> {
        let deadline = Instant::now() + timeout;
        let mut actions = Vec::new();
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if !event::poll(remaining)? {
                break;
            }
            if let Some(action) = App::user_action_for(&event::read()?) {
                actions.push(action);
                if action == UserAction::Cancel {
                    break;
                }
            }
        }
        Ok(actions)
    }

    fn user_action_for(event: &event::Event) -> Option<UserAction> {
        match event {
            event::Event::Key(key_event) if key_event.kind == event::KeyEventKind::Press => {
                match key_event.code {
                    KeyCode::Esc | KeyCode::Char('q') => Some(UserAction::Cancel),
                    KeyCode::Enter | KeyCode::Char(' ') => Some(UserAction::TogglePause),
                    KeyCode::Right => Some(UserAction::Step),
                    KeyCode::Up => Some(UserAction::SpeedUp),
                    KeyCode::Down => Some(UserAction::SlowDown),
                    KeyCode::Char('r') => Some(UserAction::Restart),
                    _ => None,
                }
            }
            event::Event::Resize(_, _) => Some(UserAction::Resize),
            _ => None,
        }
    }

    /// Ask the user for path width, maze width and height.
    /// Maximum dimensions follow from the terminal size and the chosen path width.
    /// Returns None if user cancels input with Esc
    fn ask_maze_settings(
        stdout: &mut Stdout,
        defaults: Settings,
    ) -> Result<Option<Settings>, AppError> {
        stdout.execute(style::PrintStyledContent(
            "Set up the maze. Press Enter on an empty field to take the largest size that fits \
the terminal, or Esc to go back.\r\n"
                .with(Color::Blue),
        ))?;

        let Some(path_width) =
            prompt::read_number(stdout, "Path width: ", MAX_PATH_WIDTH, defaults.path_width)?
        else {
            return Ok(None);
        };
        let settings = Settings {
            path_width,
            ..defaults
        };

        let (pixel_columns, pixel_rows) = {
            let (columns, rows) = term::size()?;
            App::drawable_area(columns, rows)
        };
        let max_width = settings.cells_for(pixel_columns);
        let max_height = settings.cells_for(pixel_rows);

        let Some(width) = prompt::read_number(stdout, "Width: ", max_width, max_width)? else {
            return Ok(None);
        };
        let Some(height) = prompt::read_number(stdout, "Height: ", max_height, max_height)? else {
            return Ok(None);
        };

        let settings = Settings {
            width,
            height,
            ..settings
        };
        settings.validate()?;
        stdout.execute(style::PrintStyledContent(
            format!(
                "Maze set to {}x{} with path width {}\r\n",
                width, height, path_width
            )
            .with(Color::Green)
            .attribute(Attribute::Bold),
        ))?;
        Ok(Some(settings))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{Event, KeyEvent, KeyEventKind, KeyModifiers};

    fn press(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn test_frame_delay_bounds() {
        let mut delay = FrameDelay::new(Duration::from_millis(4));
        delay.faster();
        assert_eq!(delay.current(), Duration::from_millis(2));
        delay.faster();
        delay.faster();
        assert_eq!(delay.current(), Duration::ZERO);
        delay.faster();
        assert_eq!(delay.current(), Duration::ZERO);
        delay.slower();
        assert_eq!(delay.current(), Duration::from_millis(1));

        let mut delay = FrameDelay::new(Duration::from_secs(5));
        assert_eq!(delay.current(), FrameDelay::SLOWEST);
        delay.slower();
        assert_eq!(delay.current(), FrameDelay::SLOWEST);
    }

    #[test]
    fn test_key_mapping() {
        assert_eq!(
            App::user_action_for(&press(KeyCode::Esc)),
            Some(UserAction::Cancel)
        );
        assert_eq!(
            App::user_action_for(&press(KeyCode::Enter)),
            Some(UserAction::TogglePause)
        );
        assert_eq!(
            App::user_action_for(&press(KeyCode::Right)),
            Some(UserAction::Step)
        );
        assert_eq!(
            App::user_action_for(&press(KeyCode::Char('r'))),
            Some(UserAction::Restart)
        );
        assert_eq!(
            App::user_action_for(&Event::Resize(80, 24)),
            Some(UserAction::Resize)
        );
        assert_eq!(App::user_action_for(&press(KeyCode::Char('x'))), None);

        let release = Event::Key(KeyEvent::new_with_kind(
            KeyCode::Esc,
            KeyModifiers::NONE,
            KeyEventKind::Release,
        ));
        assert_eq!(App::user_action_for(&release), None);
    }

    #[test]
    fn test_drawable_area_limits_setup() {
        assert_eq!(App::drawable_area(81, 26), (40, 24));
        assert_eq!(App::drawable_area(1, 1), (0, 0));

        let settings = Settings {
            path_width: 1,
            ..Settings::default()
        };
        let (columns, rows) = App::drawable_area(81, 26);
        assert_eq!(settings.cells_for(columns), 20);
        assert_eq!(settings.cells_for(rows), 12);
        let (fitted, changed) = settings.fit_to(columns, rows);
        assert!(changed);
        assert_eq!((fitted.width, fitted.height), (20, 12));
    }

    #[test]
    fn test_headless_is_reproducible() {
        let settings = Settings {
            width: 12,
            height: 9,
            seed: Some(2024),
            ..Settings::default()
        };
        let first = App::headless(settings).unwrap();
        let second = App::headless(settings).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.visited_count(), 12 * 9);
        assert_eq!(first.passage_count(), 12 * 9 - 1);
    }

    #[test]
    fn test_status_lines() {
        let generator = RecursiveBacktracker::new(3, 3, Some(1)).unwrap();
        let [status, help] = App::status_lines(&generator, true, Duration::from_millis(10));
        assert_eq!(status, "Paused: 1/9 cells visited, 0 steps, 10 ms per step");
        assert!(help.contains("Esc"));
    }
}
