// Live video sources.
// `CameraCapture` opens the default webcam and converts frames into a
// FrameBuffer. `NoFeed` stands in when the camera could not be opened: the UI
// keeps running, captures just leave the cell as background.

use tracing::{error, info};

use crate::error::{Error, Result};
use crate::types::FrameBuffer;

// Bring in nokhwa types for camera control.
use nokhwa::{
    Camera,
    pixel_format::RgbFormat,
    utils::{
        CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType, Resolution,
    },
};

pub const CAMERA_ALERT: &str = "Please allow camera access.";

/// Anything that can hand out "the frame on screen right now".
pub trait FrameSource {
    /// Next live frame, or `None` when there is no feed.
    fn current_frame(&mut self) -> Result<Option<FrameBuffer>>;

    /// Size of the frames this source produces.
    fn resolution(&self) -> (u32, u32);
}

// A small wrapper around nokhwa::Camera so the main loop stays clean.
pub struct CameraCapture {
    cam: Camera,
    width: u32,
    height: u32,
}

impl CameraCapture {
    /// Open camera `index` near the requested resolution and start streaming.
    pub fn open(index: u32, width: u32, height: u32) -> Result<Self> {
        let idx = CameraIndex::Index(index);

        let fmt = CameraFormat::new(
            Resolution::new(width, height),
            FrameFormat::YUYV, // uncompressed; cheap to convert to RGB
            30,
        );

        // Ask for RGB frames, closest to our request.
        let req = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(fmt));

        let mut cam = Camera::new(idx, req)
            .map_err(|e| Error::CameraInit(format!("create camera {index}: {e}")))?;

        cam.open_stream()
            .map_err(|e| Error::CameraInit(format!("open stream: {e}")))?;

        // The actual stream might choose a slightly different resolution.
        let actual = cam.resolution();
        info!(index, width = actual.width(), height = actual.height(), "camera stream open");

        Ok(Self { cam, width: actual.width(), height: actual.height() })
    }
}

impl FrameSource for CameraCapture {
    /// Blocks until the camera delivers the next frame.
    fn current_frame(&mut self) -> Result<Option<FrameBuffer>> {
        let frame = self
            .cam
            .frame()
            .map_err(|e| Error::CameraFrame(format!("fetch frame: {e}")))?;

        let rgb_img = frame
            .decode_image::<RgbFormat>()
            .map_err(|e| Error::CameraFrame(format!("decode RGB: {e}")))?;

        let (w, h) = rgb_img.dimensions();
        Ok(Some(FrameBuffer::from_rgb_bytes(w as usize, h as usize, rgb_img.as_raw())))
    }

    fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Source with no feed at all.
pub struct NoFeed {
    width: u32,
    height: u32,
}

impl NoFeed {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl FrameSource for NoFeed {
    fn current_frame(&mut self) -> Result<Option<FrameBuffer>> {
        Ok(None)
    }

    fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// User-facing, blocking notification.
pub trait Alert {
    fn alert(&mut self, message: &str);
}

/// Native message box.
pub struct DialogAlert;

impl Alert for DialogAlert {
    fn alert(&mut self, message: &str) {
        rfd::MessageDialog::new()
            .set_level(rfd::MessageLevel::Warning)
            .set_title("Striply")
            .set_description(message)
            .set_buttons(rfd::MessageButtons::Ok)
            .show();
    }
}

/// Try to open a live source. On failure: log the cause, alert the user once,
/// and fall back to `NoFeed` of `fallback` size so the rest of the UI works.
pub fn acquire<S, F>(open: F, alert: &mut dyn Alert, fallback: (u32, u32)) -> Box<dyn FrameSource>
where
    S: FrameSource + 'static,
    F: FnOnce() -> Result<S>,
{
    match open() {
        Ok(source) => Box::new(source),
        Err(e) => {
            error!(error = %e, "camera access error");
            alert.alert(CAMERA_ALERT);
            Box::new(NoFeed::new(fallback.0, fallback.1))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct CountingAlert {
        messages: Vec<String>,
    }

    impl Alert for CountingAlert {
        fn alert(&mut self, message: &str) {
            self.messages.push(message.to_string());
        }
    }

    struct Still;

    impl FrameSource for Still {
        fn current_frame(&mut self) -> Result<Option<FrameBuffer>> {
            Ok(Some(FrameBuffer::new(2, 2, crate::types::Rgb::WHITE)))
        }
        fn resolution(&self) -> (u32, u32) {
            (2, 2)
        }
    }

    #[test]
    fn denied_camera_alerts_once_and_falls_back() {
        let mut alert = CountingAlert::default();
        let mut src = acquire(
            || -> Result<Still> { Err(Error::CameraInit("permission denied".into())) },
            &mut alert,
            (640, 480),
        );
        assert_eq!(alert.messages, vec![CAMERA_ALERT.to_string()]);
        assert_eq!(src.resolution(), (640, 480));
        assert!(src.current_frame().unwrap().is_none());
    }

    #[test]
    fn granted_camera_never_alerts() {
        let mut alert = CountingAlert::default();
        let mut src = acquire(|| Ok(Still), &mut alert, (640, 480));
        assert!(alert.messages.is_empty());
        assert!(src.current_frame().unwrap().is_some());
    }
}
