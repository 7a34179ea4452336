use super::canvas::{Canvas, Surface};
use super::color::Color;
use crossterm::{
    cursor, execute, queue,
    style::{self, Print, SetBackgroundColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::OpenOptions;
use std::io::{self, BufWriter, Write};
use std::str::FromStr;

/// How canvas pixels are packed into terminal cells.
#[derive(Serialize, Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VideoDriver {
    /// Two vertically stacked pixels per cell drawn with an upper half block.
    #[default]
    Halfblock,
    /// One pixel per cell.
    Block,
}

impl VideoDriver {
    pub fn pixels_per_row(self) -> u32 {
        match self {
            VideoDriver::Halfblock => 2,
            VideoDriver::Block => 1,
        }
    }
}

impl FromStr for VideoDriver {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "halfblock" | "half" => Ok(VideoDriver::Halfblock),
            "block" => Ok(VideoDriver::Block),
            other => Err(format!(
                "Unknown video driver '{other}' (expected 'halfblock' or 'block')"
            )),
        }
    }
}

impl fmt::Display for VideoDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VideoDriver::Halfblock => write!(f, "halfblock"),
            VideoDriver::Block => write!(f, "block"),
        }
    }
}

/// Where frames are written: the controlling terminal or a device path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayTarget {
    Stdout,
    Device(String),
}

impl DisplayTarget {
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "" | "auto" | "-" | "stdout" => DisplayTarget::Stdout,
            path => DisplayTarget::Device(path.to_string()),
        }
    }

    pub fn is_stdout(&self) -> bool {
        matches!(self, DisplayTarget::Stdout)
    }
}

pub struct TerminalRenderer {
    out: BufWriter<Box<dyn Write + Send>>,
    target: DisplayTarget,
    driver: VideoDriver,
    cols: u16,
    rows: u16,
}

impl TerminalRenderer {
    pub fn new(target: DisplayTarget, driver: VideoDriver) -> io::Result<Self> {
        let writer: Box<dyn Write + Send> = match &target {
            DisplayTarget::Stdout => Box::new(io::stdout()),
            DisplayTarget::Device(path) => Box::new(OpenOptions::new().write(true).open(path)?),
        };
        let (cols, rows) = terminal::size().unwrap_or((80, 24));

        Ok(Self {
            out: BufWriter::with_capacity(1 << 16, writer),
            target,
            driver,
            cols,
            rows,
        })
    }

    pub fn init(&mut self) -> io::Result<()> {
        if self.target.is_stdout() {
            terminal::enable_raw_mode()?;
        }
        execute!(
            self.out,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::Clear(ClearType::All)
        )?;
        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.out,
            style::ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        if self.target.is_stdout() {
            terminal::disable_raw_mode()?;
        }
        Ok(())
    }

    /// Whether keyboard input and resize events come from the display.
    pub fn is_interactive(&self) -> bool {
        self.target.is_stdout()
    }

    /// Canvas size that maps one-to-one onto the current terminal.
    pub fn pixel_size(&self) -> (u32, u32) {
        (
            self.cols as u32,
            self.rows as u32 * self.driver.pixels_per_row(),
        )
    }

    pub fn manual_resize(&mut self, cols: u16, rows: u16) -> io::Result<()> {
        self.cols = cols;
        self.rows = rows;
        queue!(self.out, terminal::Clear(ClearType::All))?;
        Ok(())
    }

    /// Writes one full frame. Canvases that do not match the terminal's
    /// pixel size are nearest-neighbour sampled.
    pub fn present(&mut self, canvas: &Canvas) -> io::Result<()> {
        let (px_w, px_h) = self.pixel_size();
        if px_w == 0 || px_h == 0 || canvas.width() == 0 || canvas.height() == 0 {
            return Ok(());
        }
        let sample = |x: u32, y: u32| -> Color {
            let sx = (x as u64 * canvas.width() as u64 / px_w as u64) as u32;
            let sy = (y as u64 * canvas.height() as u64 / px_h as u64) as u32;
            canvas.pixel(sx, sy).unwrap_or_default()
        };

        let mut fg: Option<Color> = None;
        let mut bg: Option<Color> = None;

        for row in 0..self.rows {
            queue!(self.out, cursor::MoveTo(0, row))?;
            for col in 0..self.cols {
                let x = col as u32;
                match self.driver {
                    VideoDriver::Halfblock => {
                        let top = sample(x, row as u32 * 2);
                        let bottom = sample(x, row as u32 * 2 + 1);
                        if fg != Some(top) {
                            queue!(self.out, SetForegroundColor(top.into()))?;
                            fg = Some(top);
                        }
                        if bg != Some(bottom) {
                            queue!(self.out, SetBackgroundColor(bottom.into()))?;
                            bg = Some(bottom);
                        }
                        queue!(self.out, Print('▀'))?;
                    }
                    VideoDriver::Block => {
                        let pixel = sample(x, row as u32);
                        if bg != Some(pixel) {
                            queue!(self.out, SetBackgroundColor(pixel.into()))?;
                            bg = Some(pixel);
                        }
                        queue!(self.out, Print(' '))?;
                    }
                }
            }
        }
        Ok(())
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_video_driver_parse() {
        assert_eq!("halfblock".parse::<VideoDriver>(), Ok(VideoDriver::Halfblock));
        assert_eq!("BLOCK".parse::<VideoDriver>(), Ok(VideoDriver::Block));
        assert!("x11".parse::<VideoDriver>().is_err());
    }

    #[test]
    fn test_video_driver_pixels_per_row() {
        assert_eq!(VideoDriver::Halfblock.pixels_per_row(), 2);
        assert_eq!(VideoDriver::Block.pixels_per_row(), 1);
    }

    #[test]
    fn test_display_target_parse() {
        assert_eq!(DisplayTarget::parse("auto"), DisplayTarget::Stdout);
        assert_eq!(DisplayTarget::parse(""), DisplayTarget::Stdout);
        assert_eq!(
            DisplayTarget::parse("/dev/tty1"),
            DisplayTarget::Device("/dev/tty1".to_string())
        );
    }
}
