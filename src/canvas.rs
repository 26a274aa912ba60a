// A small 2D drawing surface over a FrameBuffer.
// It mirrors the parts of a canvas context the strip needs: a state stack
// (clip + filter) with save/restore, solid and gradient fills, scaled image
// draws, and centered text.

use image::imageops::{self, FilterType};

use crate::error::Result;
use crate::filter::FilterChain;
use crate::font::{self, TextStyle};
use crate::gamma::GammaLut;
use crate::types::{CellRect, FrameBuffer, Rgb};

/// Supersampling grid per axis for anti-aliased clip edges.
const AA: i32 = 4;

#[derive(Clone, Debug, PartialEq)]
pub enum Paint {
    Solid(Rgb),
    /// Top-to-bottom gradient over the full surface height.
    /// Row 0 is exactly `top`, the last row exactly `bottom`.
    VerticalGradient { top: Rgb, bottom: Rgb },
}

/// Rounded-rectangle clip whose corners are quadratic curves with the
/// rectangle corner as control point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RoundedClip {
    x0: f32,
    y0: f32,
    x1: f32,
    y1: f32,
    r: f32,
}

impl RoundedClip {
    pub fn new(rect: CellRect) -> Self {
        Self {
            x0: rect.x as f32,
            y0: rect.y as f32,
            x1: rect.x as f32 + rect.width as f32,
            y1: rect.y as f32 + rect.height as f32,
            r: rect.radius as f32,
        }
    }

    /// Is the sample point (sx, sy) inside the shape?
    fn contains(&self, sx: f32, sy: f32) -> bool {
        if sx < self.x0 || sx >= self.x1 || sy < self.y0 || sy >= self.y1 {
            return false;
        }
        if self.r <= 0.0 {
            return true;
        }
        // Distance into the corner square, measured from the corner point.
        let dx = if sx < self.x0 + self.r {
            Some(sx - self.x0)
        } else if sx > self.x1 - self.r {
            Some(self.x1 - sx)
        } else {
            None
        };
        let dy = if sy < self.y0 + self.r {
            Some(sy - self.y0)
        } else if sy > self.y1 - self.r {
            Some(self.y1 - sy)
        } else {
            None
        };
        match (dx, dy) {
            // The quadratic corner curve is sqrt(u) + sqrt(v) = 1.
            (Some(dx), Some(dy)) => (dx / self.r).sqrt() + (dy / self.r).sqrt() >= 1.0,
            _ => true,
        }
    }

    /// Fraction of pixel (px, py) covered by the shape, in [0,1].
    pub fn coverage(&self, px: i32, py: i32) -> f32 {
        let (fx, fy) = (px as f32, py as f32);
        let in_corner_band = |v: f32, lo: f32, hi: f32| v < lo + self.r || v + 1.0 > hi - self.r;
        let edge_x = fx < self.x0 || fx + 1.0 > self.x1;
        let edge_y = fy < self.y0 || fy + 1.0 > self.y1;
        if !edge_x
            && !edge_y
            && !(in_corner_band(fx, self.x0, self.x1) && in_corner_band(fy, self.y0, self.y1))
        {
            return 1.0;
        }

        let mut hits = 0;
        for j in 0..AA {
            for i in 0..AA {
                let sx = fx + (i as f32 + 0.5) / AA as f32;
                let sy = fy + (j as f32 + 0.5) / AA as f32;
                if self.contains(sx, sy) {
                    hits += 1;
                }
            }
        }
        hits as f32 / (AA * AA) as f32
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DrawState {
    pub clips: Vec<RoundedClip>,
    pub filter: FilterChain,
}

pub struct Canvas {
    surface: FrameBuffer,
    state: DrawState,
    saved: Vec<DrawState>,
    lut: GammaLut,
}

impl Canvas {
    /// A fresh surface, black until something paints it.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            surface: FrameBuffer::new(width, height, Rgb::BLACK),
            state: DrawState { clips: Vec::new(), filter: FilterChain::none() },
            saved: Vec::new(),
            lut: GammaLut::new(),
        }
    }

    pub fn width(&self) -> usize {
        self.surface.width
    }

    pub fn height(&self) -> usize {
        self.surface.height
    }

    pub fn surface(&self) -> &FrameBuffer {
        &self.surface
    }

    pub fn into_surface(self) -> FrameBuffer {
        self.surface
    }

    pub fn state(&self) -> &DrawState {
        &self.state
    }

    pub fn save(&mut self) {
        self.saved.push(self.state.clone());
    }

    /// Pop the last saved state. Without a matching save this does nothing.
    pub fn restore(&mut self) {
        if let Some(s) = self.saved.pop() {
            self.state = s;
        }
    }

    pub fn set_filter(&mut self, filter: FilterChain) {
        self.state.filter = filter;
    }

    /// Intersect the current clip with a rounded rectangle.
    pub fn clip_rounded_rect(&mut self, rect: CellRect) {
        self.state.clips.push(RoundedClip::new(rect));
    }

    fn coverage(&self, x: i32, y: i32) -> f32 {
        self.state
            .clips
            .iter()
            .map(|c| c.coverage(x, y))
            .product()
    }

    /// Fill the whole surface, honoring the current clip.
    pub fn fill(&mut self, paint: &Paint) {
        let (w, h) = (self.surface.width, self.surface.height);
        for y in 0..h {
            let row_color = match *paint {
                Paint::Solid(c) => c,
                Paint::VerticalGradient { top, bottom } => {
                    let t = if h > 1 { y as f32 / (h - 1) as f32 } else { 0.0 };
                    top.lerp(bottom, t)
                }
            };
            for x in 0..w {
                self.blend_pixel(x as i32, y as i32, row_color);
            }
        }
    }

    #[inline]
    fn blend_pixel(&mut self, x: i32, y: i32, color: Rgb) {
        let a = if self.state.clips.is_empty() { 1.0 } else { self.coverage(x, y) };
        if a <= 0.0 {
            return;
        }
        let idx = y as usize * self.surface.width + x as usize;
        let under = Rgb::unpack(self.surface.pixels[idx]);
        self.surface.pixels[idx] = self.lut.mix(under, color, a).pack();
    }

    /// Draw `src` scaled to `width x height` at (x, y), through the current
    /// filter and clip. An empty source draws nothing.
    pub fn draw_image(
        &mut self,
        src: &FrameBuffer,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
    ) -> Result<()> {
        if src.width == 0 || src.height == 0 || width == 0 || height == 0 {
            return Ok(());
        }

        let mut tile = if src.width == width as usize && src.height == height as usize {
            src.clone()
        } else {
            let scaled = imageops::resize(&src.to_rgb_image(), width, height, FilterType::Triangle);
            FrameBuffer::from_rgb_image(&scaled)
        };
        self.state.filter.apply(&mut tile)?;

        for ty in 0..tile.height {
            let dy = y + ty as i32;
            if dy < 0 || dy >= self.surface.height as i32 {
                continue;
            }
            for tx in 0..tile.width {
                let dx = x + tx as i32;
                if dx < 0 || dx >= self.surface.width as i32 {
                    continue;
                }
                self.blend_pixel(dx, dy, tile.get(tx, ty));
            }
        }
        Ok(())
    }

    /// Centered text with glyph bottoms on `baseline` (canvas `textAlign = center`).
    pub fn fill_text_centered(&mut self, text: &str, cx: i32, baseline: i32, style: TextStyle) {
        font::draw_text_centered(&mut self.surface, cx, baseline, text, style);
    }
}
