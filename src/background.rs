// Strip backgrounds. Painting always finishes (picture decoded and drawn)
// before the first cell is captured.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::canvas::{Canvas, Paint};
use crate::error::{Error, Result};
use crate::types::{FrameBuffer, Rgb};

pub const WHITE: Rgb = Rgb::hex(0xffffff);
pub const PINK: Rgb = Rgb::hex(0xffe1f0);
pub const BLUE: Rgb = Rgb::hex(0xd1f1ff);
pub const GRADIENT_TOP: Rgb = Rgb::hex(0xfbe1f1);
pub const GRADIENT_BOTTOM: Rgb = Rgb::hex(0xdbe9ff);

/// Picture used by the plain `image` selector.
pub const DEFAULT_PATTERN: &str = "pattern.png";

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Background {
    #[default]
    White,
    Pink,
    Blue,
    Gradient,
    /// A picture stretched over the whole canvas.
    Image(PathBuf),
}

impl Background {
    /// Next mode for the `B` key; the picture mode keeps its path.
    pub fn next(&self, image: &Path) -> Background {
        match self {
            Background::White => Background::Pink,
            Background::Pink => Background::Blue,
            Background::Blue => Background::Gradient,
            Background::Gradient => Background::Image(image.to_path_buf()),
            Background::Image(_) => Background::White,
        }
    }

    /// Paint the whole canvas. For `Image` the picture is loaded first; a
    /// picture that cannot be read fails the paint instead of waiting.
    pub fn paint(&self, canvas: &mut Canvas) -> Result<()> {
        match self {
            Background::White => canvas.fill(&Paint::Solid(WHITE)),
            Background::Pink => canvas.fill(&Paint::Solid(PINK)),
            Background::Blue => canvas.fill(&Paint::Solid(BLUE)),
            Background::Gradient => canvas.fill(&Paint::VerticalGradient {
                top: GRADIENT_TOP,
                bottom: GRADIENT_BOTTOM,
            }),
            Background::Image(path) => {
                let picture = load_picture(path)?;
                canvas.fill(&Paint::Solid(WHITE));
                let (w, h) = (canvas.width() as u32, canvas.height() as u32);
                canvas.draw_image(&picture, 0, 0, w, h)?;
            }
        }
        Ok(())
    }
}

fn load_picture(path: &Path) -> Result<FrameBuffer> {
    let img = image::open(path)
        .map_err(|e| Error::asset(format!("background {}: {e}", path.display())))?;
    debug!(path = %path.display(), width = img.width(), height = img.height(), "background picture loaded");
    Ok(FrameBuffer::from_rgb_image(&img.to_rgb8()))
}

impl FromStr for Background {
    type Err = Error;

    /// `default`/`white`, `pink`, `blue`, `gradient`, `image` or `image:<path>`.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Some(path) = s.strip_prefix("image:") {
            return Ok(Background::Image(PathBuf::from(path)));
        }
        match s.to_ascii_lowercase().as_str() {
            "" | "default" | "white" => Ok(Background::White),
            "pink" => Ok(Background::Pink),
            "blue" => Ok(Background::Blue),
            "gradient" => Ok(Background::Gradient),
            "image" => Ok(Background::Image(PathBuf::from(DEFAULT_PATTERN))),
            other => Err(Error::Background(format!("unknown background {other:?}"))),
        }
    }
}

impl fmt::Display for Background {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Background::White => f.write_str("default"),
            Background::Pink => f.write_str("pink"),
            Background::Blue => f.write_str("blue"),
            Background::Gradient => f.write_str("gradient"),
            Background::Image(p) => write!(f, "image:{}", p.display()),
        }
    }
}

impl TryFrom<String> for Background {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<Background> for String {
    fn from(b: Background) -> Self {
        b.to_string()
    }
}
