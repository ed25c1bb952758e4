//! Command-line options, run settings and their defaults

use std::{path::PathBuf, time::Duration};

use clap::Parser;

use crate::error::AppError;

/// Maze width used by the standard settings
pub const DEFAULT_WIDTH: u16 = 40;
/// Maze height used by the standard settings
pub const DEFAULT_HEIGHT: u16 = 25;
/// Side length of a cell in pixels
pub const DEFAULT_PATH_WIDTH: u16 = 1;
/// Largest accepted path width
pub const MAX_PATH_WIDTH: u16 = 8;
/// Pause between two generation steps
pub const DEFAULT_FRAME_DELAY_MS: u64 = 10;
/// Slowest accepted frame delay
pub const MAX_FRAME_DELAY_MS: u64 = 1000;
/// File name used when no log file is given
pub const DEFAULT_LOG_FILE_NAME: &str = "labyrinth.log";

#[derive(Parser, Debug)]
#[command(name = "labyrinth")]
#[command(
    author,
    version,
    about = "Watch a perfect maze being carved by randomized depth-first search"
)]
pub struct Cli {
    /// Maze width in cells
    #[arg(long, default_value_t = DEFAULT_WIDTH)]
    pub width: u16,

    /// Maze height in cells
    #[arg(long, default_value_t = DEFAULT_HEIGHT)]
    pub height: u16,

    /// Side length of each cell in pixels (one pixel is two terminal columns)
    #[arg(short, long, default_value_t = DEFAULT_PATH_WIDTH)]
    pub path_width: u16,

    /// Random seed for a reproducible maze, drawn from the OS when omitted
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Milliseconds to wait between generation steps
    #[arg(short, long, default_value_t = DEFAULT_FRAME_DELAY_MS)]
    pub frame_delay_ms: u64,

    /// Generate without the terminal UI and print the finished maze as text
    #[arg(long)]
    pub headless: bool,

    /// Where to write logs, defaults to a file in the system temp directory
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// The log file to write, falling back to the temp directory.
    pub fn log_path(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_LOG_FILE_NAME))
    }
}

/// Validated settings for one generation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub width: u16,
    pub height: u16,
    pub path_width: u16,
    pub seed: Option<u64>,
    pub frame_delay: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            path_width: DEFAULT_PATH_WIDTH,
            seed: None,
            frame_delay: Duration::from_millis(DEFAULT_FRAME_DELAY_MS),
        }
    }
}

impl Settings {
    /// Builds settings from command-line arguments.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidSetting` for a zero dimension, a path width outside
    /// `1..=MAX_PATH_WIDTH` or a frame delay above `MAX_FRAME_DELAY_MS`.
    pub fn from_cli(cli: &Cli) -> Result<Self, AppError> {
        let settings = Self {
            width: cli.width,
            height: cli.height,
            path_width: cli.path_width,
            seed: cli.seed,
            frame_delay: Duration::from_millis(cli.frame_delay_ms),
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Checks every field against its accepted range.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidSetting` naming the first field that is out of range.
    pub fn validate(&self) -> Result<(), AppError> {
        let invalid = |name, value: String, reason: &str| AppError::InvalidSetting {
            name,
            value,
            reason: reason.to_string(),
        };
        if self.width == 0 {
            return Err(invalid("width", "0".into(), "must be at least 1"));
        }
        if self.height == 0 {
            return Err(invalid("height", "0".into(), "must be at least 1"));
        }
        if !(1..=MAX_PATH_WIDTH).contains(&self.path_width) {
            return Err(invalid(
                "path-width",
                self.path_width.to_string(),
                &format!("must be between 1 and {MAX_PATH_WIDTH}"),
            ));
        }
        if self.frame_delay > Duration::from_millis(MAX_FRAME_DELAY_MS) {
            return Err(invalid(
                "frame-delay-ms",
                self.frame_delay.as_millis().to_string(),
                &format!("must be at most {MAX_FRAME_DELAY_MS}"),
            ));
        }
        Ok(())
    }

    /// Number of pixels along one axis for `cells` cells.
    /// Every cell takes `path_width` pixels plus one pixel of wall.
    pub fn pixels_for(&self, cells: u16) -> u32 {
        cells as u32 * (self.path_width as u32 + 1)
    }

    /// Largest number of cells that fit in `pixels` pixels, at least 1.
    pub fn cells_for(&self, pixels: u32) -> u16 {
        let cells = pixels / (self.path_width as u32 + 1);
        cells.clamp(1, u16::MAX as u32) as u16
    }

    /// Shrinks width and height so the maze fits in a `columns` x `rows` pixel area.
    /// Returns the adjusted settings and whether anything changed.
    pub fn fit_to(self, columns: u32, rows: u32) -> (Self, bool) {
        let width = self.width.min(self.cells_for(columns));
        let height = self.height.min(self.cells_for(rows));
        let fitted = Self {
            width,
            height,
            ..self
        };
        (fitted, fitted != self)
    }
}
