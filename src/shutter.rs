// Optional shutter sound, played once per captured cell.
// Playback runs on its own thread (rodio's OutputStream is not Send) and any
// failure is only logged.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::thread;

use rodio::{Decoder, OutputStreamBuilder, Sink};
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Something that can make the shutter noise.
pub trait Shutter {
    fn click(&mut self);
}

/// Silent shutter (no sound configured, or tests).
pub struct Mute;

impl Shutter for Mute {
    fn click(&mut self) {}
}

pub struct SoundShutter {
    path: PathBuf,
}

impl SoundShutter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Shutter for SoundShutter {
    fn click(&mut self) {
        let path = self.path.clone();
        thread::spawn(move || {
            if let Err(e) = play_blocking(&path) {
                warn!(path = %path.display(), error = %e, "failed to play shutter sound");
            }
        });
    }
}

fn play_blocking(path: &Path) -> Result<()> {
    let file = File::open(path).map_err(|e| Error::asset(format!("open {}: {e}", path.display())))?;
    let source = Decoder::new(BufReader::new(file))
        .map_err(|e| Error::asset(format!("decode {}: {e}", path.display())))?;

    let stream = OutputStreamBuilder::open_default_stream()
        .map_err(|e| Error::asset(format!("open audio output: {e}")))?;
    let sink = Sink::connect_new(stream.mixer());

    sink.append(source);
    sink.sleep_until_end();
    debug!("shutter sound done");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::config::SessionConfig;
    use crate::sequencer::CaptureRun;

    #[test]
    fn missing_sound_file_is_an_asset_error() {
        let err = play_blocking(Path::new("/missing.mp3")).unwrap_err();
        assert!(matches!(err, Error::Asset(_)));
    }

    #[test]
    fn unplayable_sound_does_not_stop_a_run() {
        let config = SessionConfig { layout: "1x2".parse().unwrap(), ..Default::default() };
        let mut run = CaptureRun::start(&config).unwrap();
        let mut shutter = SoundShutter::new("/missing.mp3");
        for _ in 0..100 {
            run.advance(Duration::from_millis(200), None, &mut shutter).unwrap();
        }
        assert!(run.is_finished());
        assert_eq!(run.captured_cells().len(), 2);
    }
}
