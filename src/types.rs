// Core types shared by the canvas, the preview and the capture run.

use image::{ImageBuffer, Rgb as ImageRgb, RgbImage};

#[derive(Clone, Debug, PartialEq)]
pub struct FrameBuffer {
    pub width: usize,      // how wide the frame is on screen (pixels)
    pub height: usize,     // how tall the frame is on screen (pixels)
    pub pixels: Vec<u32>,  // each entry is 0x00RRGGBB for minifb
}

impl FrameBuffer {
    /// A buffer of `width * height` pixels, all set to `fill`.
    pub fn new(width: usize, height: usize, fill: Rgb) -> Self {
        Self { width, height, pixels: vec![fill.pack(); width * height] }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Rgb {
        Rgb::unpack(self.pixels[y * self.width + x])
    }

    /// Write one pixel; out-of-bounds coordinates are ignored.
    #[inline]
    pub fn put(&mut self, x: i32, y: i32, color: Rgb) {
        if x < 0 || y < 0 {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height {
            return;
        }
        self.pixels[y * self.width + x] = color.pack();
    }

    pub fn from_rgb_image(img: &RgbImage) -> Self {
        let (w, h) = img.dimensions();
        Self::from_rgb_bytes(w as usize, h as usize, img.as_raw())
    }

    /// Pack tightly laid out RGB8 bytes; a short buffer leaves the tail black.
    pub fn from_rgb_bytes(width: usize, height: usize, rgb: &[u8]) -> Self {
        let mut pixels: Vec<u32> = rgb
            .chunks_exact(3)
            .take(width * height)
            .map(|p| Rgb::new(p[0], p[1], p[2]).pack())
            .collect();
        pixels.resize(width * height, 0);
        Self { width, height, pixels }
    }

    pub fn to_rgb_image(&self) -> RgbImage {
        ImageBuffer::from_fn(self.width as u32, self.height as u32, |x, y| {
            let c = self.get(x as usize, y as usize);
            ImageRgb([c.r, c.g, c.b])
        })
    }
}

/// One sRGB color. Packs to the 0x00RRGGBB layout minifb expects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(0xff, 0xff, 0xff);
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// `0xRRGGBB` literal, e.g. `Rgb::hex(0xffe1f0)`.
    pub const fn hex(v: u32) -> Self {
        Self::new((v >> 16) as u8, (v >> 8) as u8, v as u8)
    }

    #[inline]
    pub const fn pack(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    #[inline]
    pub const fn unpack(px: u32) -> Self {
        Self::new((px >> 16) as u8, (px >> 8) as u8, px as u8)
    }

    /// Straight sRGB interpolation, `t` in [0,1] (how canvas gradients mix stops).
    pub fn lerp(self, other: Rgb, t: f32) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Rgb::new(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b))
    }
}

/// Placement of one photo inside the strip.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    pub radius: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_bytes_pack_row_major() {
        let fb = FrameBuffer::from_rgb_bytes(2, 1, &[0x11, 0x22, 0x33, 0xaa, 0xbb, 0xcc]);
        assert_eq!(fb.pixels, vec![0x0011_2233, 0x00aa_bbcc]);
        let short = FrameBuffer::from_rgb_bytes(2, 1, &[1, 2, 3]);
        assert_eq!(short.pixels, vec![0x0001_0203, 0]);
    }

    #[test]
    fn hex_and_pack_agree() {
        let pink = Rgb::hex(0xffe1f0);
        assert_eq!(pink, Rgb::new(0xff, 0xe1, 0xf0));
        assert_eq!(pink.pack(), 0x00ff_e1f0);
        assert_eq!(Rgb::unpack(pink.pack()), pink);
    }

    #[test]
    fn lerp_hits_both_ends() {
        let a = Rgb::hex(0xfbe1f1);
        let b = Rgb::hex(0xdbe9ff);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
    }

    #[test]
    fn put_ignores_out_of_bounds() {
        let mut fb = FrameBuffer::new(2, 2, Rgb::BLACK);
        fb.put(-1, 0, Rgb::WHITE);
        fb.put(2, 1, Rgb::WHITE);
        fb.put(1, 1, Rgb::WHITE);
        assert_eq!(fb.pixels.iter().filter(|p| **p != 0).count(), 1);
        assert_eq!(fb.get(1, 1), Rgb::WHITE);
    }
}
