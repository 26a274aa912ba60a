// Striply: a webcam photo booth.
//
// Counts down, captures one frame per cell, lays the frames out as a strip
// with rounded corners, a background, an optional filter and a timestamp
// footer, and saves the result as a PNG. Stickers can be dropped onto the
// live preview and dragged around.

pub mod background;
pub mod blur;
pub mod booth;
pub mod camera;
pub mod canvas;
pub mod config;
pub mod countdown;
pub mod drawer;
pub mod error;
pub mod export;
pub mod filter;
pub mod flash;
pub mod font;
pub mod gamma;
pub mod layout;
pub mod pointer;
pub mod sequencer;
pub mod shutter;
pub mod sticker;
pub mod types;
pub mod window;

pub use error::{Error, Result};
