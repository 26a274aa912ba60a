// Tiny 5x7 bitmap font, scalable by an integer factor.
// Used for the strip's timestamp footer (scale 2, ~14px tall) and for the
// preview HUD (countdown digits, hints).

use crate::types::{FrameBuffer, Rgb};

pub const GLYPH_W: i32 = 5;
pub const GLYPH_H: i32 = 7;
/// Horizontal advance per glyph at scale 1 (5 pixels + 1 spacing).
pub const ADVANCE: i32 = 6;

#[derive(Clone, Copy, Debug)]
pub struct TextStyle {
    pub color: Rgb,
    pub scale: i32,
    /// 1-pixel (times scale) black drop shadow for readability over video.
    pub shadow: bool,
}

impl TextStyle {
    pub const fn plain(color: Rgb, scale: i32) -> Self {
        Self { color, scale, shadow: false }
    }

    pub const fn hud(color: Rgb, scale: i32) -> Self {
        Self { color, scale, shadow: true }
    }
}

/// Return a 5x7 glyph bitmap. Lowercase letters fold to uppercase.
/// Each u8 is a row; the low 5 bits are the pixels (bit 4 = leftmost).
fn glyph5x7(ch: char) -> Option<[u8; 7]> {
    macro_rules! g { ($a:expr,$b:expr,$c:expr,$d:expr,$e:expr,$f:expr,$g:expr) => {
        Some([$a,$b,$c,$d,$e,$f,$g])
    }; }

    match ch.to_ascii_uppercase() {
        '0' => g!(0b01110,0b10001,0b10011,0b10101,0b11001,0b10001,0b01110),
        '1' => g!(0b00100,0b01100,0b00100,0b00100,0b00100,0b00100,0b01110),
        '2' => g!(0b01110,0b10001,0b00001,0b00010,0b00100,0b01000,0b11111),
        '3' => g!(0b11110,0b00001,0b00001,0b01110,0b00001,0b00001,0b11110),
        '4' => g!(0b00010,0b00110,0b01010,0b10010,0b11111,0b00010,0b00010),
        '5' => g!(0b11111,0b10000,0b11110,0b00001,0b00001,0b10001,0b01110),
        '6' => g!(0b00110,0b01000,0b10000,0b11110,0b10001,0b10001,0b01110),
        '7' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b01000,0b01000),
        '8' => g!(0b01110,0b10001,0b10001,0b01110,0b10001,0b10001,0b01110),
        '9' => g!(0b01110,0b10001,0b10001,0b01111,0b00001,0b00010,0b01100),

        'A' => g!(0b01110,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'B' => g!(0b11110,0b10001,0b10001,0b11110,0b10001,0b10001,0b11110),
        'C' => g!(0b01110,0b10001,0b10000,0b10000,0b10000,0b10001,0b01110),
        'D' => g!(0b11100,0b10010,0b10001,0b10001,0b10001,0b10010,0b11100),
        'E' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b11111),
        'F' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b10000),
        'G' => g!(0b01110,0b10001,0b10000,0b10111,0b10001,0b10001,0b01111),
        'H' => g!(0b10001,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'I' => g!(0b01110,0b00100,0b00100,0b00100,0b00100,0b00100,0b01110),
        'J' => g!(0b00111,0b00010,0b00010,0b00010,0b00010,0b10010,0b01100),
        'K' => g!(0b10001,0b10010,0b10100,0b11000,0b10100,0b10010,0b10001),
        'L' => g!(0b10000,0b10000,0b10000,0b10000,0b10000,0b10000,0b11111),
        'M' => g!(0b10001,0b11011,0b10101,0b10101,0b10001,0b10001,0b10001),
        'N' => g!(0b10001,0b10001,0b11001,0b10101,0b10011,0b10001,0b10001),
        'O' => g!(0b01110,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'P' => g!(0b11110,0b10001,0b10001,0b11110,0b10000,0b10000,0b10000),
        'Q' => g!(0b01110,0b10001,0b10001,0b10001,0b10101,0b10010,0b01101),
        'R' => g!(0b11110,0b10001,0b10001,0b11110,0b10100,0b10010,0b10001),
        'S' => g!(0b01111,0b10000,0b10000,0b01110,0b00001,0b00001,0b11110),
        'T' => g!(0b11111,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        'U' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'V' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b01010,0b00100),
        'W' => g!(0b10001,0b10001,0b10001,0b10101,0b10101,0b10101,0b01010),
        'X' => g!(0b10001,0b10001,0b01010,0b00100,0b01010,0b10001,0b10001),
        'Y' => g!(0b10001,0b10001,0b10001,0b01010,0b00100,0b00100,0b00100),
        'Z' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b10000,0b11111),

        ' ' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00000,0b00000),
        '|' => g!(0b00100,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        ':' => g!(0b00000,0b00100,0b00000,0b00000,0b00100,0b00000,0b00000),
        '.' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00100,0b00000),
        ',' => g!(0b00000,0b00000,0b00000,0b00000,0b01100,0b00100,0b01000),
        '/' => g!(0b00000,0b00001,0b00010,0b00100,0b01000,0b10000,0b00000),
        '-' => g!(0b00000,0b00000,0b00000,0b11111,0b00000,0b00000,0b00000),
        '+' => g!(0b00000,0b00100,0b00100,0b11111,0b00100,0b00100,0b00000),
        '(' => g!(0b00010,0b00100,0b01000,0b01000,0b01000,0b00100,0b00010),
        ')' => g!(0b01000,0b00100,0b00010,0b00010,0b00010,0b00100,0b01000),
        '!' => g!(0b00100,0b00100,0b00100,0b00100,0b00100,0b00000,0b00100),
        '?' => g!(0b01110,0b10001,0b00001,0b00010,0b00100,0b00000,0b00100),
        '%' => g!(0b11000,0b11001,0b00010,0b00100,0b01000,0b10011,0b00011),
        '#' => g!(0b01010,0b01010,0b11111,0b01010,0b11111,0b01010,0b01010),

        _ => None,
    }
}

/// 11x8 camera pictogram shown while a countdown flashes.
const CAMERA_ICON: [u16; 8] = [
    0b00011100000,
    0b11111111111,
    0b10001110001,
    0b10010001001,
    0b10010001001,
    0b10001110001,
    0b10000000001,
    0b11111111111,
];
const CAMERA_W: i32 = 11;
const CAMERA_H: i32 = 8;

fn fill_block(fb: &mut FrameBuffer, x: i32, y: i32, scale: i32, color: Rgb) {
    for dy in 0..scale {
        for dx in 0..scale {
            fb.put(x + dx, y + dy, color);
        }
    }
}

fn draw_rows(fb: &mut FrameBuffer, x: i32, y: i32, rows: &[u8; 7], scale: i32, color: Rgb) {
    for (ry, rowbits) in rows.iter().enumerate() {
        for rx in 0..GLYPH_W {
            if (rowbits & (1 << (4 - rx))) != 0 {
                fill_block(fb, x + rx * scale, y + ry as i32 * scale, scale, color);
            }
        }
    }
}

/// Width in pixels of `text` drawn at `scale` (no trailing spacing).
pub fn text_width(text: &str, scale: i32) -> i32 {
    let n = text.chars().count() as i32;
    if n == 0 { 0 } else { (n * ADVANCE - 1) * scale }
}

/// Draw `text` with its top-left corner at (x, y).
/// Unknown characters leave a blank cell.
pub fn draw_text(fb: &mut FrameBuffer, mut x: i32, y: i32, text: &str, style: TextStyle) {
    let s = style.scale.max(1);
    for ch in text.chars() {
        if let Some(rows) = glyph5x7(ch) {
            if style.shadow {
                draw_rows(fb, x + s, y + s, &rows, s, Rgb::BLACK);
            }
            draw_rows(fb, x, y, &rows, s, style.color);
        }
        x += ADVANCE * s;
    }
}

/// Draw `text` horizontally centered on `cx`, glyph bottoms on `baseline`.
pub fn draw_text_centered(fb: &mut FrameBuffer, cx: i32, baseline: i32, text: &str, style: TextStyle) {
    let s = style.scale.max(1);
    let x = cx - text_width(text, s) / 2;
    draw_text(fb, x, baseline - GLYPH_H * s, text, style);
}

/// Draw the camera pictogram centered on (cx, cy).
pub fn draw_camera_icon(fb: &mut FrameBuffer, cx: i32, cy: i32, scale: i32, color: Rgb) {
    let s = scale.max(1);
    let x0 = cx - CAMERA_W * s / 2;
    let y0 = cy - CAMERA_H * s / 2;
    for (ry, rowbits) in CAMERA_ICON.iter().enumerate() {
        for rx in 0..CAMERA_W {
            if (rowbits & (1 << (CAMERA_W - 1 - rx))) != 0 {
                fill_block(fb, x0 + rx * s, y0 + ry as i32 * s, s, color);
            }
        }
    }
}
