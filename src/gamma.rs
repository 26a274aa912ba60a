// Speeds up gamma-correct blending by replacing powf with table lookups.
// Used wherever a partial coverage or alpha mixes two colors: anti-aliased
// clip edges in the strip and sticker edges over the preview.

use crate::types::Rgb;

pub struct GammaLut {
    // sRGB(0..255) -> linear (0..1) as f32
    srgb_to_linear: [f32; 256],
    // linear(0..1) -> sRGB(0..255) via 4096-step quantization
    // (index = (linear * 4095).round())
    linear_to_srgb: [u8; 4096],
}

impl GammaLut {
    /// Build both tables once at startup.
    pub fn new() -> Self {
        let mut s2l = [0.0f32; 256];
        for (v, slot) in s2l.iter_mut().enumerate() {
            let c = v as f32 / 255.0;
            *slot = if c <= 0.04045 { c / 12.92 } else { ((c + 0.055) / 1.055).powf(2.4) };
        }

        let mut l2s = [0u8; 4096];
        for (i, slot) in l2s.iter_mut().enumerate() {
            let l = (i as f32) / 4095.0;
            let s = if l <= 0.003_130_8 { 12.92 * l } else { 1.055 * l.powf(1.0 / 2.4) - 0.055 };
            *slot = (s * 255.0).round().clamp(0.0, 255.0) as u8;
        }

        Self { srgb_to_linear: s2l, linear_to_srgb: l2s }
    }

    #[inline]
    pub fn srgb_u8_to_linear(&self, v: u8) -> f32 {
        self.srgb_to_linear[v as usize]
    }

    #[inline]
    pub fn linear_to_srgb_u8(&self, l: f32) -> u8 {
        let idx = (l.clamp(0.0, 1.0) * 4095.0).round() as usize;
        self.linear_to_srgb[idx]
    }

    /// Mix `fg` over `bg` with weight `a` in linear light.
    /// a <= 0 keeps `bg`, a >= 1 gives `fg` exactly.
    pub fn mix(&self, bg: Rgb, fg: Rgb, a: f32) -> Rgb {
        if a <= 0.0 {
            return bg;
        }
        if a >= 1.0 {
            return fg;
        }
        let inv = 1.0 - a;
        let ch = |b: u8, f: u8| {
            self.linear_to_srgb_u8(a * self.srgb_u8_to_linear(f) + inv * self.srgb_u8_to_linear(b))
        };
        Rgb::new(ch(bg.r, fg.r), ch(bg.g, fg.g), ch(bg.b, fg.b))
    }
}

impl Default for GammaLut {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_round_trip_endpoints() {
        let lut = GammaLut::new();
        assert_eq!(lut.linear_to_srgb_u8(lut.srgb_u8_to_linear(0)), 0);
        assert_eq!(lut.linear_to_srgb_u8(lut.srgb_u8_to_linear(255)), 255);
    }

    #[test]
    fn half_mix_of_black_and_white_is_brighter_than_mid_gray() {
        let lut = GammaLut::new();
        let m = lut.mix(Rgb::BLACK, Rgb::WHITE, 0.5);
        // linear-light midpoint lands around sRGB 188, not 128
        assert!(m.r > 180 && m.r < 195, "got {}", m.r);
        assert_eq!(lut.mix(Rgb::BLACK, Rgb::WHITE, 0.0), Rgb::BLACK);
        assert_eq!(lut.mix(Rgb::BLACK, Rgb::WHITE, 1.0), Rgb::WHITE);
    }
}
