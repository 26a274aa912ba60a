// Crate error type. Every variant states *where* things went wrong.
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    /// Creating the window failed
    #[error("window init error: {0}")]
    WindowInit(String),

    /// Updating the window buffer failed
    #[error("window update error: {0}")]
    WindowUpdate(String),

    /// Opening/starting the camera failed
    #[error("camera init error: {0}")]
    CameraInit(String),

    /// Grabbing/decoding a frame failed
    #[error("camera frame error: {0}")]
    CameraFrame(String),

    /// Layout string is not "<cols>x<rows>" with both sides >= 1
    #[error("layout error: {0}")]
    Layout(String),

    /// Filter expression could not be parsed
    #[error("filter error: {0}")]
    Filter(String),

    /// Unknown background mode
    #[error("background error: {0}")]
    Background(String),

    /// A picture (background, sticker) could not be loaded
    #[error("asset error: {0}")]
    Asset(String),

    /// PNG encoding or writing the strip failed
    #[error("export error: {0}")]
    Export(String),

    /// Config file could not be read or parsed
    #[error("config error: {0}")]
    Config(String),
}

impl Error {
    pub fn layout(msg: impl Into<String>) -> Self {
        Self::Layout(msg.into())
    }

    pub fn filter(msg: impl Into<String>) -> Self {
        Self::Filter(msg.into())
    }

    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }

    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(Error::layout("x").to_string().starts_with("layout error:"));
        assert!(Error::filter("x").to_string().starts_with("filter error:"));
        assert!(Error::asset("x").to_string().starts_with("asset error:"));
        assert!(Error::export("x").to_string().starts_with("export error:"));
        assert!(
            Error::CameraInit("no device".into())
                .to_string()
                .contains("no device")
        );
    }
}
