// The finished strip: PNG bytes, a data URL, and saving to disk.

use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::NaiveDateTime;
use image::ImageFormat;
use tracing::info;

use crate::error::{Error, Result};
use crate::types::FrameBuffer;

#[derive(Clone, Debug)]
pub struct StripExport {
    png: Vec<u8>,
    width: u32,
    height: u32,
    created_at: NaiveDateTime,
}

impl StripExport {
    /// PNG-encode the surface.
    pub fn encode(surface: &FrameBuffer, created_at: NaiveDateTime) -> Result<Self> {
        let img = surface.to_rgb_image();
        let mut png = Vec::new();
        img.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .map_err(|e| Error::export(format!("png encode: {e}")))?;
        Ok(Self {
            png,
            width: surface.width as u32,
            height: surface.height as u32,
            created_at,
        })
    }

    pub fn png_bytes(&self) -> &[u8] {
        &self.png
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn created_at(&self) -> NaiveDateTime {
        self.created_at
    }

    /// `data:image/png;base64,...`, the same thing a canvas `toDataURL` gives.
    pub fn data_url(&self) -> String {
        format!("data:image/png;base64,{}", STANDARD.encode(&self.png))
    }

    pub fn file_name(&self) -> String {
        format!("striply-{}.png", self.created_at.format("%Y%m%d-%H%M%S"))
    }

    /// Write the PNG into `dir` (created if missing) and return its path.
    pub fn save(&self, dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(dir)
            .map_err(|e| Error::export(format!("create {}: {e}", dir.display())))?;
        let path = dir.join(self.file_name());
        fs::write(&path, &self.png)
            .map_err(|e| Error::export(format!("write {}: {e}", path.display())))?;
        info!(path = %path.display(), bytes = self.png.len(), "strip saved");
        Ok(path)
    }
}
