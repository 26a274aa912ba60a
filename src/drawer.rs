// Rounded-rect clipped drawer: paints one (filtered) video frame into a
// strip cell with rounded corners.

use crate::canvas::Canvas;
use crate::error::Result;
use crate::filter::FilterChain;
use crate::types::{CellRect, FrameBuffer};

/// Draw `source` scaled into `rect`, clipped to a rounded rectangle of
/// `rect.radius`, through `filter`.
///
/// The canvas clip and filter are saved before and restored after, so the
/// caller sees the same drawing state it had. The radius is not checked: a
/// radius above `min(width, height) / 2` just draws an odd shape.
pub fn draw_rounded_image(
    canvas: &mut Canvas,
    source: &FrameBuffer,
    rect: CellRect,
    filter: &FilterChain,
) -> Result<()> {
    canvas.save();
    canvas.clip_rounded_rect(rect);
    canvas.set_filter(filter.clone());
    let drawn = canvas.draw_image(source, rect.x, rect.y, rect.width, rect.height);
    canvas.restore();
    drawn
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Paint;
    use crate::types::Rgb;

    fn cell() -> CellRect {
        CellRect { x: 15, y: 15, width: 200, height: 200, radius: 40 }
    }

    #[test]
    fn paints_inside_and_leaves_corners_alone() {
        let mut canvas = Canvas::new(230, 230);
        canvas.fill(&Paint::Solid(Rgb::WHITE));
        let frame = FrameBuffer::new(64, 48, Rgb::hex(0x204080));

        draw_rounded_image(&mut canvas, &frame, cell(), &FilterChain::none()).unwrap();

        let s = canvas.surface();
        assert_eq!(s.get(115, 115), Rgb::hex(0x204080));
        assert_eq!(s.get(15, 15), Rgb::WHITE); // clipped corner
        assert_eq!(s.get(214, 214), Rgb::WHITE);
        assert_eq!(s.get(14, 115), Rgb::WHITE); // outside the cell
    }

    #[test]
    fn applies_filter_then_restores_state() {
        let mut canvas = Canvas::new(230, 230);
        let before = canvas.state().clone();
        let frame = FrameBuffer::new(10, 10, Rgb::hex(0xff0000));
        let gray: FilterChain = "grayscale(100%)".parse().unwrap();

        draw_rounded_image(&mut canvas, &frame, cell(), &gray).unwrap();

        let mid = canvas.surface().get(115, 115);
        assert_eq!((mid.r, mid.g, mid.b), (54, 54, 54));
        assert_eq!(canvas.state(), &before);
    }
}
