use std::{
    fmt,
    io::{Stdout, Write},
};

use crossterm::{
    QueueableCommand, cursor, queue,
    style::{self, Attribute, Color, Stylize},
    terminal::{self, ClearType},
};

use crate::maze::{Coord, Direction, Grid};

/// One square of the rendered maze.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pixel {
    /// Space between cells with no passage carved through it
    #[default]
    Wall,
    /// Cell interior not reached yet
    Unvisited,
    /// Cell interior or passage that has been carved
    Visited,
    /// The cell on top of the frontier
    Active,
}

impl Pixel {
    /// The width of each pixel when rendered, in character widths.
    pub const WIDTH: u16 = 2;
}

impl fmt::Display for Pixel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let styled_symbol = match self {
            Pixel::Wall => "  ".with(Color::Reset),
            Pixel::Unvisited => "██".with(Color::Blue),
            Pixel::Visited => "██".with(Color::White),
            Pixel::Active => "██".with(Color::Green),
        };

        #[cfg(debug_assertions)]
        {
            use unicode_width::UnicodeWidthStr;
            assert_eq!(
                styled_symbol.content().width(),
                Pixel::WIDTH as usize,
                "Each pixel must occupy exactly two character widths."
            );
        }

        write!(f, "{}", styled_symbol)
    }
}

/// A rasterized snapshot of the grid.
///
/// Each cell is a `path_width` x `path_width` block of pixels placed every
/// `path_width + 1` pixels; the extra column and row hold the east and south passages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pixels: Box<[Pixel]>,
    width: u16,
    height: u16,
}

impl Frame {
    pub fn rasterize(grid: &Grid, active: Option<Coord>, path_width: u16) -> Self {
        let pitch = path_width as u32 + 1;
        let width = (grid.width() as u32 * pitch).min(u16::MAX as u32) as u16;
        let height = (grid.height() as u32 * pitch).min(u16::MAX as u32) as u16;
        let mut frame = Frame {
            pixels: vec![Pixel::Wall; width as usize * height as usize].into_boxed_slice(),
            width,
            height,
        };

        let path_width = path_width as u32;
        for (x, y) in grid.coords() {
            let cell = grid[(x, y)];
            let (left, top) = (x as u32 * pitch, y as u32 * pitch);
            let body = if cell.is_visited() {
                Pixel::Visited
            } else {
                Pixel::Unvisited
            };
            frame.fill(left, top, path_width, body);

            for p in 0..path_width {
                if cell.has_passage(Direction::South) {
                    frame.set(left + p, top + path_width, Pixel::Visited);
                }
                if cell.has_passage(Direction::East) {
                    frame.set(left + path_width, top + p, Pixel::Visited);
                }
            }
        }

        if let Some((x, y)) = active {
            frame.fill(x as u32 * pitch, y as u32 * pitch, path_width, Pixel::Active);
        }
        frame
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Pixels outside the frame are ignored.
    fn set(&mut self, x: u32, y: u32, pixel: Pixel) {
        if x < self.width as u32 && y < self.height as u32 {
            self.pixels[y as usize * self.width as usize + x as usize] = pixel;
        }
    }

    fn fill(&mut self, left: u32, top: u32, size: u32, pixel: Pixel) {
        for y in top..top + size {
            for x in left..left + size {
                self.set(x, y, pixel);
            }
        }
    }

    /// Pixels that differ from `previous`, or every pixel when there is nothing to
    /// compare against.
    pub fn changed_since<'a>(
        &'a self,
        previous: Option<&'a Frame>,
    ) -> impl Iterator<Item = ((u16, u16), Pixel)> + 'a {
        let comparable = previous.filter(|p| p.width == self.width && p.height == self.height);
        let width = self.width as usize;
        self.pixels
            .iter()
            .enumerate()
            .filter(move |&(idx, pixel)| comparable.is_none_or(|p| p.pixels[idx] != *pixel))
            .map(move |(idx, &pixel)| (((idx % width) as u16, (idx / width) as u16), pixel))
    }
}

impl std::ops::Index<(u16, u16)> for Frame {
    type Output = Pixel;

    fn index(&self, index: (u16, u16)) -> &Self::Output {
        &self.pixels[index.1 as usize * self.width as usize + index.0 as usize]
    }
}

pub struct Renderer {
    /// Standard output handle to write to the terminal
    stdout: Stdout,
    /// Side length of a cell in pixels
    path_width: u16,
    /// Last frame written to the terminal, used to redraw only what changed
    previous: Option<Frame>,
    /// Whether the resize message is currently on screen
    showing_resize_message: bool,
}

impl Renderer {
    /// Rows reserved below the maze for status messages
    pub const NUM_STATUS_ROWS: u16 = 2;

    pub fn new(path_width: u16) -> Self {
        Self {
            stdout: std::io::stdout(),
            path_width,
            previous: None,
            showing_resize_message: false,
        }
    }

    /// Terminal columns and rows needed to show `grid` with its status lines.
    pub fn required_size(&self, grid: &Grid) -> (u32, u32) {
        let pitch = self.path_width as u32 + 1;
        (
            grid.width() as u32 * pitch * Pixel::WIDTH as u32,
            grid.height() as u32 * pitch + Renderer::NUM_STATUS_ROWS as u32,
        )
    }

    /// Forget what is on screen so the next draw repaints everything.
    pub fn invalidate(&mut self) -> std::io::Result<()> {
        self.previous = None;
        self.showing_resize_message = false;
        queue!(self.stdout, terminal::Clear(ClearType::All))?;
        self.stdout.flush()
    }

    /// Check if terminal size is sufficient for the grid.
    /// If not, display a message asking for a resize and return Ok(false).
    fn check_size(&mut self, grid: &Grid) -> std::io::Result<bool> {
        let (term_width, term_height) = terminal::size()?;
        let (needed_width, needed_height) = self.required_size(grid);
        if (term_width as u32) < needed_width || (term_height as u32) < needed_height {
            self.previous = None;
            if self.showing_resize_message {
                return Ok(false);
            }
            let msg = format!(
                "Terminal size is too small ({}x{}) for the maze ({}x{} cells needs {}x{}). Please resize the terminal.\r\n",
                term_width,
                term_height,
                grid.width(),
                grid.height(),
                needed_width,
                needed_height
            );
            queue!(
                self.stdout,
                terminal::Clear(ClearType::All),
                cursor::MoveTo(0, 0),
                style::PrintStyledContent(msg.with(Color::Yellow).attribute(Attribute::Bold)),
                style::PrintStyledContent(
                    "Press Esc to exit...\r\n"
                        .with(Color::Blue)
                        .attribute(Attribute::Bold)
                )
            )?;
            self.stdout.flush()?;
            self.showing_resize_message = true;
            return Ok(false);
        }
        if self.showing_resize_message {
            self.showing_resize_message = false;
            self.previous = None;
        }
        Ok(true)
    }

    /// Draw the grid, highlighting `active`, followed by the status lines.
    /// Returns Ok(false) if the terminal is too small to show it.
    pub fn draw(
        &mut self,
        grid: &Grid,
        active: Option<Coord>,
        status: &[String],
    ) -> std::io::Result<bool> {
        if !self.check_size(grid)? {
            return Ok(false);
        }
        if self.previous.is_none() {
            self.stdout.queue(terminal::Clear(ClearType::All))?;
        }

        let frame = Frame::rasterize(grid, active, self.path_width);
        for ((x, y), pixel) in frame.changed_since(self.previous.as_ref()) {
            queue!(
                self.stdout,
                cursor::MoveTo(x * Pixel::WIDTH, y),
                style::Print(pixel)
            )?;
        }

        for (row, line) in status.iter().take(Renderer::NUM_STATUS_ROWS as usize).enumerate() {
            queue!(
                self.stdout,
                cursor::MoveTo(0, frame.height() + row as u16),
                terminal::Clear(ClearType::UntilNewLine),
                style::PrintStyledContent(line.as_str().with(Color::Cyan))
            )?;
        }
        self.stdout.flush()?;
        self.previous = Some(frame);
        Ok(true)
    }
}
