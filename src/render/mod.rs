pub mod canvas;
pub mod color;
pub mod font;
pub mod terminal;

pub use canvas::{Canvas, Surface};
pub use color::{Color, interpolate};
pub use font::BitmapFont;
pub use terminal::{DisplayTarget, TerminalRenderer, VideoDriver};
