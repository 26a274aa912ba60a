// Camera flash over the live preview.
// Visual: when a countdown hits its flash state the preview brightens to near
// white, then fades back over the flash dwell.

use std::time::Duration;

use crate::types::FrameBuffer;

/// Additive blend one gray level into every channel, saturating at 255.
/// Visual: the pixel gets brighter; at 255 it is pure white.
#[inline]
fn add_gray_saturating(px: u32, v: u16) -> u32 {
    let r = (((px >> 16) & 0xFF) as u16 + v).min(255) as u32;
    let g = (((px >> 8) & 0xFF) as u16 + v).min(255) as u32;
    let b = ((px & 0xFF) as u16 + v).min(255) as u32;
    (r << 16) | (g << 8) | b
}

#[derive(Debug, Default)]
pub struct FlashFx {
    ttl: f32, // seconds left
    max: f32, // initial length, for the fade
}

impl FlashFx {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire a flash that fades out over `length`.
    pub fn trigger(&mut self, length: Duration) {
        self.max = length.as_secs_f32().max(f32::EPSILON);
        self.ttl = self.max;
    }

    pub fn is_active(&self) -> bool {
        self.ttl > 0.0
    }

    /// Step the fade by `dt` and brighten `fb` by what is left.
    pub fn update_and_render(&mut self, fb: &mut FrameBuffer, dt: f32) {
        if !self.is_active() {
            return;
        }
        // strength decays quadratically so the burst reads as a pop
        let s = (self.ttl / self.max).clamp(0.0, 1.0);
        let v = (230.0 * s * s).round() as u16;
        if v > 0 {
            for px in fb.pixels.iter_mut() {
                *px = add_gray_saturating(*px, v);
            }
        }
        self.ttl -= dt;
    }
}
