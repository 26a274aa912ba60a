// Session configuration.
//
// `SessionConfig` is built once at startup and then handed to every part that
// needs a selection (layout, background, filter, countdown length). Values come
// from built-in defaults, then an optional JSON file, then command-line flags.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::background::{Background, DEFAULT_PATTERN};
use crate::error::{Error, Result};
use crate::filter::FilterChain;
use crate::layout::{Layout, StripGeometry};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    /// Camera index (0 = default webcam)
    pub camera_index: u32,
    /// Requested camera resolution; the device may pick something close
    pub camera_width: u32,
    pub camera_height: u32,
    pub layout: Layout,
    pub geometry: StripGeometry,
    pub background: Background,
    /// Picture used when cycling to the picture background
    pub background_image: PathBuf,
    pub filter: FilterChain,
    /// Seconds counted down before each photo
    pub countdown_secs: u32,
    /// Sound played once per photo; `None` keeps the booth silent
    pub shutter_sound: Option<PathBuf>,
    /// Sticker pictures; empty means the built-in set
    pub stickers: Vec<PathBuf>,
    /// Where downloaded strips are written
    pub output_dir: PathBuf,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            camera_index: 0,
            camera_width: 640,
            camera_height: 480,
            layout: Layout::STRIP,
            geometry: StripGeometry::default(),
            background: Background::White,
            background_image: PathBuf::from(DEFAULT_PATTERN),
            filter: FilterChain::none(),
            countdown_secs: 3,
            shutter_sound: Some(PathBuf::from("shutter.mp3")),
            stickers: Vec::new(),
            output_dir: PathBuf::from("."),
        }
    }
}

impl SessionConfig {
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("read {}: {e}", path.display())))?;
        serde_json::from_str(&text)
            .map_err(|e| Error::Config(format!("parse {}: {e}", path.display())))
    }

    /// Defaults, then `--config` file, then individual flags.
    pub fn load(args: &ConfigArgs) -> Result<Self> {
        let mut cfg = match &args.config {
            Some(path) => Self::from_json_file(path)?,
            None => Self::default(),
        };
        args.apply(&mut cfg)?;
        debug!(?cfg, "session config");
        Ok(cfg)
    }
}

/// Command-line overrides, flattened into the binary's CLI.
#[derive(Args, Debug, Default, Clone)]
pub struct ConfigArgs {
    /// JSON config file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Camera index to use
    #[arg(short, long)]
    pub camera: Option<u32>,

    /// Grid as <cols>x<rows>, e.g. 2x3 (or "strip" for 1x4)
    #[arg(short, long)]
    pub layout: Option<String>,

    /// default | pink | blue | gradient | image | image:<path>
    #[arg(short, long)]
    pub background: Option<String>,

    /// CSS-style filter, e.g. "grayscale(100%)" or "sepia(60%) contrast(120%)"
    #[arg(short, long)]
    pub filter: Option<String>,

    /// Seconds before each photo
    #[arg(long)]
    pub countdown: Option<u32>,

    /// Shutter sound file
    #[arg(long, conflicts_with = "mute")]
    pub shutter: Option<PathBuf>,

    /// No shutter sound
    #[arg(long)]
    pub mute: bool,

    /// Sticker picture (repeatable)
    #[arg(long = "sticker")]
    pub stickers: Vec<PathBuf>,

    /// Directory for downloaded strips
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl ConfigArgs {
    fn apply(&self, cfg: &mut SessionConfig) -> Result<()> {
        if let Some(c) = self.camera {
            cfg.camera_index = c;
        }
        if let Some(l) = &self.layout {
            cfg.layout = l.parse()?;
        }
        if let Some(b) = &self.background {
            cfg.background = b.parse()?;
            if let Background::Image(path) = &cfg.background {
                cfg.background_image = path.clone();
            }
        }
        if let Some(f) = &self.filter {
            cfg.filter = f.parse()?;
        }
        if let Some(n) = self.countdown {
            cfg.countdown_secs = n;
        }
        if let Some(s) = &self.shutter {
            cfg.shutter_sound = Some(s.clone());
        }
        if self.mute {
            cfg.shutter_sound = None;
        }
        if !self.stickers.is_empty() {
            cfg.stickers = self.stickers.clone();
        }
        if let Some(o) = &self.output {
            cfg.output_dir = o.clone();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        args: ConfigArgs,
    }

    fn args(argv: &[&str]) -> ConfigArgs {
        let mut full = vec!["striply"];
        full.extend_from_slice(argv);
        TestCli::parse_from(full).args
    }

    #[test]
    fn defaults_match_the_classic_booth() {
        let cfg = SessionConfig::default();
        assert_eq!(cfg.layout, Layout::STRIP);
        assert_eq!(cfg.countdown_secs, 3);
        assert_eq!(cfg.geometry, StripGeometry { photo_size: 200, margin: 15, radius: 40, footer_height: 80 });
        assert!(cfg.filter.is_identity());
    }

    #[test]
    fn flags_override_defaults() {
        let cfg = SessionConfig::load(&args(&[
            "--layout", "2x3", "--background", "pink", "--filter", "sepia(100%)", "--mute",
        ]))
        .unwrap();
        assert_eq!(cfg.layout.to_string(), "2x3");
        assert_eq!(cfg.background, Background::Pink);
        assert_eq!(cfg.filter.to_string(), "sepia(100%)");
        assert_eq!(cfg.shutter_sound, None);
    }

    #[test]
    fn bad_flag_values_are_errors() {
        assert!(SessionConfig::load(&args(&["--layout", "0x2"])).is_err());
        assert!(SessionConfig::load(&args(&["--filter", "wobble(1)"])).is_err());
        assert!(SessionConfig::load(&args(&["--background", "plaid"])).is_err());
    }

    #[test]
    fn json_file_then_flags() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("booth.json");
        fs::write(
            &path,
            r#"{ "layout": "2x2", "background": "gradient", "countdown_secs": 5 }"#,
        )
        .unwrap();

        let cfg = SessionConfig::load(&args(&["--config", path.to_str().unwrap(), "--countdown", "1"]))
            .unwrap();
        assert_eq!(cfg.layout.to_string(), "2x2");
        assert_eq!(cfg.background, Background::Gradient);
        assert_eq!(cfg.countdown_secs, 1);
        assert_eq!(cfg.camera_width, 640);
    }

    #[test]
    fn unknown_json_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("booth.json");
        fs::write(&path, r#"{ "layuot": "2x2" }"#).unwrap();
        assert!(matches!(SessionConfig::from_json_file(&path), Err(Error::Config(_))));
    }
}
