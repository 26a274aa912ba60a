// Separable box blur on packed 0x00RRGGBB frames.
// Backs the `blur(<n>px)` filter function: a cell drawn with blur looks soft
// without darkening at its borders (edges are extended, not zero-padded).

use crate::error::{Error, Result};
use crate::types::FrameBuffer;

#[inline]
fn channels(p: u32) -> (u32, u32, u32) {
    ((p >> 16) & 0xFF, (p >> 8) & 0xFF, p & 0xFF)
}

/// Blur `src` into `dst`, using `tmp` for the horizontal pass.
/// All three buffers must share the same size.
pub fn box_blur_rgb(
    src: &FrameBuffer,
    tmp: &mut FrameBuffer,
    dst: &mut FrameBuffer,
    radius: usize,
) -> Result<()> {
    if src.width != dst.width || src.height != dst.height {
        return Err(Error::filter("box_blur: size mismatch src/dst"));
    }
    if tmp.width != src.width || tmp.height != src.height {
        return Err(Error::filter("box_blur: size mismatch tmp"));
    }
    if src.width == 0 || src.height == 0 {
        return Ok(());
    }
    let w = src.width as i32;
    let h = src.height as i32;
    // wider than the frame only repeats edge pixels; keeps the sums in range
    let r = radius.min(src.width.max(src.height)) as i32;
    let win = (2 * r + 1) as u32;

    // Pass 1: horizontal, rows of src -> tmp
    for y in 0..h {
        let row = (y * w) as usize;
        let (r0, g0, b0) = channels(src.pixels[row]);
        let (mut sr, mut sg, mut sb) = (r0 * (r as u32 + 1), g0 * (r as u32 + 1), b0 * (r as u32 + 1));
        for x in 1..=r {
            let (pr, pg, pb) = channels(src.pixels[row + x.min(w - 1) as usize]);
            sr += pr;
            sg += pg;
            sb += pb;
        }
        for x in 0..w {
            tmp.pixels[row + x as usize] = ((sr / win) << 16) | ((sg / win) << 8) | (sb / win);

            let (ar, ag, ab) = channels(src.pixels[row + (x + r + 1).min(w - 1) as usize]);
            let (dr, dg, db) = channels(src.pixels[row + (x - r).max(0) as usize]);
            sr = sr + ar - dr;
            sg = sg + ag - dg;
            sb = sb + ab - db;
        }
    }

    // Pass 2: vertical, columns of tmp -> dst
    let at = |x: i32, y: i32| (y * w + x) as usize;
    for x in 0..w {
        let (r0, g0, b0) = channels(tmp.pixels[at(x, 0)]);
        let (mut sr, mut sg, mut sb) = (r0 * (r as u32 + 1), g0 * (r as u32 + 1), b0 * (r as u32 + 1));
        for y in 1..=r {
            let (pr, pg, pb) = channels(tmp.pixels[at(x, y.min(h - 1))]);
            sr += pr;
            sg += pg;
            sb += pb;
        }
        for y in 0..h {
            dst.pixels[at(x, y)] = ((sr / win) << 16) | ((sg / win) << 8) | (sb / win);

            let (ar, ag, ab) = channels(tmp.pixels[at(x, (y + r + 1).min(h - 1))]);
            let (dr, dg, db) = channels(tmp.pixels[at(x, (y - r).max(0))]);
            sr = sr + ar - dr;
            sg = sg + ag - dg;
            sb = sb + ab - db;
        }
    }

    Ok(())
}

/// Convenience: blur a frame in place, allocating the scratch buffers.
/// Radii beyond the frame size are clamped to it.
pub fn blur_in_place(frame: &mut FrameBuffer, radius: usize) -> Result<()> {
    if radius == 0 {
        return Ok(());
    }
    let mut tmp = frame.clone();
    let src = frame.clone();
    box_blur_rgb(&src, &mut tmp, frame, radius)
}
