// Sticker overlay.
//
// A bar under the preview shows the sticker options. Clicking an option drops
// a new sticker on the overlay at (100, 100); stickers can then be dragged
// around. The overlay decorates the live preview only: it is never drawn into
// the exported strip.

use std::path::PathBuf;

use image::{Rgba, RgbaImage};
use tracing::{info, warn};

use crate::gamma::GammaLut;
use crate::pointer::{DragGesture, PointerEvent};
use crate::types::{FrameBuffer, Rgb};

/// Where a freshly added sticker lands, relative to the overlay.
pub const DEFAULT_POSITION: (i32, i32) = (100, 100);
/// Edge length of the built-in stickers and of a bar slot.
pub const STICKER_SIZE: u32 = 48;

pub struct StickerOption {
    pub name: String,
    pub image: RgbaImage,
}

/// The predefined sticker sources.
pub struct StickerPalette {
    options: Vec<StickerOption>,
}

impl StickerPalette {
    pub fn builtin() -> Self {
        let shapes: [(&str, Rgb, fn(f32, f32) -> bool); 4] = [
            ("heart", Rgb::hex(0xff4f8b), heart),
            ("star", Rgb::hex(0xffc928), star),
            ("sparkle", Rgb::hex(0x8fd8ff), sparkle),
            ("flower", Rgb::hex(0xc58cff), flower),
        ];
        let options = shapes
            .into_iter()
            .map(|(name, color, shape)| StickerOption {
                name: name.to_string(),
                image: rasterize(STICKER_SIZE, color, shape),
            })
            .collect();
        Self { options }
    }

    /// Load sticker pictures; unreadable files are skipped with a warning.
    /// Falls back to the built-in set when nothing loads.
    pub fn from_paths(paths: &[PathBuf]) -> Self {
        let mut options = Vec::new();
        for path in paths {
            match image::open(path) {
                Ok(img) => options.push(StickerOption {
                    name: path
                        .file_stem()
                        .map(|s| s.to_string_lossy().into_owned())
                        .unwrap_or_default(),
                    image: img.to_rgba8(),
                }),
                Err(e) => warn!(path = %path.display(), "sticker not loaded: {e}"),
            }
        }
        if options.is_empty() {
            return Self::builtin();
        }
        Self { options }
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&StickerOption> {
        self.options.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &StickerOption> {
        self.options.iter()
    }
}

/* ---------- built-in shapes, in unit coordinates (-1..1, y down) ---------- */

fn heart(x: f32, y: f32) -> bool {
    let (x, y) = (x * 1.2, -y * 1.2 + 0.2);
    let a = x * x + y * y - 1.0;
    a * a * a - x * x * y * y * y <= 0.0
}

fn star(x: f32, y: f32) -> bool {
    // five-pointed star: radius oscillates between outer and inner with angle
    let r = (x * x + y * y).sqrt();
    let theta = y.atan2(x) + std::f32::consts::FRAC_PI_2;
    let sector = std::f32::consts::TAU / 5.0;
    let t = (theta.rem_euclid(sector) / sector - 0.5).abs() * 2.0; // 1 at points, 0 between
    r <= 0.42 + 0.53 * t
}

fn sparkle(x: f32, y: f32) -> bool {
    x.abs().sqrt() + y.abs().sqrt() <= 0.95
}

fn flower(x: f32, y: f32) -> bool {
    let r = (x * x + y * y).sqrt();
    let petals = 0.65 + 0.3 * (5.0 * y.atan2(x)).cos();
    (r <= petals && r >= 0.18) || r <= 0.12
}

fn rasterize(size: u32, color: Rgb, inside: fn(f32, f32) -> bool) -> RgbaImage {
    RgbaImage::from_fn(size, size, |px, py| {
        let x = (px as f32 + 0.5) / size as f32 * 2.0 - 1.0;
        let y = (py as f32 + 0.5) / size as f32 * 2.0 - 1.0;
        if inside(x, y) {
            Rgba([color.r, color.g, color.b, 255])
        } else {
            Rgba([0, 0, 0, 0])
        }
    })
}

/* ---------- the bar of options ---------- */

/// Row of option slots drawn under the preview.
#[derive(Clone, Copy, Debug)]
pub struct StickerBar {
    /// Top edge of the bar in window coordinates.
    pub top: i32,
    pub height: i32,
    pub slot: i32,
    pub gap: i32,
}

impl StickerBar {
    pub const HEIGHT: i32 = STICKER_SIZE as i32 + 16;

    pub fn below(preview_height: usize) -> Self {
        Self { top: preview_height as i32, height: Self::HEIGHT, slot: STICKER_SIZE as i32, gap: 8 }
    }

    fn slot_origin(&self, index: usize) -> (i32, i32) {
        (self.gap + index as i32 * (self.slot + self.gap), self.top + (self.height - self.slot) / 2)
    }

    /// Which option (if any) sits under window point (x, y).
    pub fn option_at(&self, x: i32, y: i32, options: usize) -> Option<usize> {
        (0..options).find(|&i| {
            let (sx, sy) = self.slot_origin(i);
            x >= sx && x < sx + self.slot && y >= sy && y < sy + self.slot
        })
    }

    pub fn render(&self, fb: &mut FrameBuffer, palette: &StickerPalette, lut: &GammaLut) {
        let bar_bg = Rgb::hex(0x2b2b33);
        for y in self.top..self.top + self.height {
            for x in 0..fb.width as i32 {
                fb.put(x, y, bar_bg);
            }
        }
        for (i, option) in palette.iter().enumerate() {
            let (sx, sy) = self.slot_origin(i);
            blit_rgba(fb, &option.image, sx, sy, self.slot as u32, lut);
        }
    }
}

/* ---------- placed stickers ---------- */

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Sticker {
    /// Index into the palette.
    pub option: usize,
    pub left: i32,
    pub top: i32,
}

/// The overlay container: placed stickers in stacking order plus the active drag.
#[derive(Debug, Default)]
pub struct StickerLayer {
    placed: Vec<Sticker>,
    drag: DragGesture,
}

impl StickerLayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stickers(&self) -> &[Sticker] {
        &self.placed
    }

    /// Drop a new sticker at the default position; it goes on top.
    pub fn add(&mut self, option: usize) -> usize {
        let (left, top) = DEFAULT_POSITION;
        self.placed.push(Sticker { option, left, top });
        info!(option, count = self.placed.len(), "sticker added");
        self.placed.len() - 1
    }

    /// Topmost sticker whose box contains (x, y).
    pub fn hit_test(&self, x: i32, y: i32, palette: &StickerPalette) -> Option<usize> {
        self.placed.iter().enumerate().rev().find_map(|(i, s)| {
            let img = &palette.get(s.option)?.image;
            let inside = x >= s.left
                && y >= s.top
                && x < s.left + img.width() as i32
                && y < s.top + img.height() as i32;
            inside.then_some(i)
        })
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.target().is_some()
    }

    /// Route one pointer event (overlay coordinates). Returns true when the
    /// event was used to drag a sticker.
    pub fn handle(&mut self, event: PointerEvent, palette: &StickerPalette) -> bool {
        match event {
            PointerEvent::Press { x, y } => match self.hit_test(x, y, palette) {
                Some(i) => {
                    let s = self.placed[i];
                    self.drag.start(i, (x, y), (s.left, s.top));
                    true
                }
                None => false,
            },
            PointerEvent::Move { x, y } => match self.drag.move_to((x, y)) {
                Some((i, left, top)) => {
                    let s = &mut self.placed[i];
                    s.left = left;
                    s.top = top;
                    true
                }
                None => false,
            },
            PointerEvent::Release { .. } => self.drag.end().is_some(),
        }
    }

    /// Draw all stickers over the preview, bottom to top.
    pub fn render(&self, fb: &mut FrameBuffer, palette: &StickerPalette, lut: &GammaLut) {
        for s in &self.placed {
            if let Some(option) = palette.get(s.option) {
                blit_rgba(fb, &option.image, s.left, s.top, option.image.width(), lut);
            }
        }
    }
}

/// Alpha-blend `img` (scaled to `size` wide, nearest) at (x, y).
fn blit_rgba(fb: &mut FrameBuffer, img: &RgbaImage, x: i32, y: i32, size: u32, lut: &GammaLut) {
    if img.width() == 0 || img.height() == 0 || size == 0 {
        return;
    }
    let scale = img.width() as f32 / size as f32;
    let out_h = (img.height() as f32 / scale).round() as u32;
    for oy in 0..out_h {
        for ox in 0..size {
            let (dx, dy) = (x + ox as i32, y + oy as i32);
            if dx < 0 || dy < 0 || dx >= fb.width as i32 || dy >= fb.height as i32 {
                continue;
            }
            let sx = ((ox as f32 * scale) as u32).min(img.width() - 1);
            let sy = ((oy as f32 * scale) as u32).min(img.height() - 1);
            let Rgba([r, g, b, a]) = *img.get_pixel(sx, sy);
            if a == 0 {
                continue;
            }
            let under = fb.get(dx as usize, dy as usize);
            fb.put(dx, dy, lut.mix(under, Rgb::new(r, g, b), a as f32 / 255.0));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn palette() -> StickerPalette {
        StickerPalette::builtin()
    }

    #[test]
    fn builtin_stickers_have_ink() {
        let p = palette();
        assert_eq!(p.len(), 4);
        for opt in p.iter() {
            assert!(opt.image.pixels().any(|px| px[3] == 255), "{} is empty", opt.name);
            assert!(opt.image.pixels().any(|px| px[3] == 0), "{} is full", opt.name);
        }
    }

    #[test]
    fn bar_click_maps_to_option() {
        let bar = StickerBar::below(480);
        let (sx, sy) = bar.slot_origin(2);
        assert_eq!(bar.option_at(sx + 1, sy + 1, 4), Some(2));
        assert_eq!(bar.option_at(1, sy + 1, 4), None); // in the gap
        assert_eq!(bar.option_at(sx + 1, 10, 4), None); // over the preview
    }

    #[test]
    fn new_sticker_lands_at_default_position() {
        let mut layer = StickerLayer::new();
        layer.add(1);
        assert_eq!(layer.stickers(), &[Sticker { option: 1, left: 100, top: 100 }]);
    }

    #[test]
    fn hit_test_prefers_topmost() {
        let p = palette();
        let mut layer = StickerLayer::new();
        layer.add(0);
        layer.add(1);
        assert_eq!(layer.hit_test(120, 120, &p), Some(1));
        assert_eq!(layer.hit_test(99, 120, &p), None);
    }

    #[test]
    fn drag_by_delta_regardless_of_move_count() {
        let p = palette();
        for moves in [1usize, 2, 7, 40] {
            let mut layer = StickerLayer::new();
            layer.add(0);
            let (dx, dy) = (37, -22);
            let (px, py) = (110, 125);
            assert!(layer.handle(PointerEvent::Press { x: px, y: py }, &p));
            for k in 1..=moves as i32 {
                let n = moves as i32;
                // wander, then end exactly at the target point
                let (wx, wy) = if k == n { (dx, dy) } else { (dx * k / n + (k % 3) * 5, dy * k / n - (k % 2) * 9) };
                layer.handle(PointerEvent::Move { x: px + wx, y: py + wy }, &p);
            }
            assert!(layer.handle(PointerEvent::Release { x: px + dx, y: py + dy }, &p));
            let s = layer.stickers()[0];
            assert_eq!((s.left, s.top), (100 + dx, 100 + dy), "{moves} moves");

            // after release, moves no longer drag
            assert!(!layer.handle(PointerEvent::Move { x: 0, y: 0 }, &p));
            assert_eq!(layer.stickers()[0], s);
        }
    }

    #[test]
    fn press_on_empty_overlay_does_not_drag() {
        let p = palette();
        let mut layer = StickerLayer::new();
        assert!(!layer.handle(PointerEvent::Press { x: 5, y: 5 }, &p));
        assert!(!layer.is_dragging());
    }

    #[test]
    fn render_only_touches_opaque_pixels() {
        let p = palette();
        let lut = GammaLut::new();
        let mut fb = FrameBuffer::new(300, 300, Rgb::BLACK);
        let mut layer = StickerLayer::new();
        layer.add(0);
        layer.render(&mut fb, &p, &lut);
        assert_eq!(fb.get(0, 0), Rgb::BLACK);
        assert_eq!(fb.get(100, 100), Rgb::BLACK); // heart corner is transparent
        assert_ne!(fb.get(124, 126), Rgb::BLACK); // heart middle
    }
}
