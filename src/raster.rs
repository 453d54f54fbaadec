//! Pixel canvas: allocation, stroke drawing and PNG encoding.

use crate::bounds::CanvasSize;
use crate::config::Background;
use crate::error::RenderError;
use crate::interpreter::Segment;
use image::{ImageFormat, Pixel, RgbaImage};
use imageproc::drawing::{draw_filled_rect_mut, BresenhamLineIter};
use imageproc::rect::Rect;
use std::io::Cursor;

pub fn allocate(size: CanvasSize, background: &Background) -> RgbaImage {
    RgbaImage::from_pixel(size.width, size.height, background.to_rgba())
}

/// Stamp a square brush of `stroke_width` pixels along the segment.
///
/// The square brush gives square caps that extend half a stroke past each
/// endpoint. Pixels outside the canvas are clipped.
pub fn draw_segment(canvas: &mut RgbaImage, segment: &Segment, stroke_width: u32) {
    let width = stroke_width.max(1);
    let lead = ((width - 1) / 2) as i32;
    let color = segment.color.to_rgba();
    let from = (segment.from.0 as f32, segment.from.1 as f32);
    let to = (segment.to.0 as f32, segment.to.1 as f32);

    for (x, y) in BresenhamLineIter::new(from, to) {
        draw_filled_rect_mut(canvas, Rect::at(x - lead, y - lead).of_size(width, width), color);
    }
}

/// Paint segments in order onto a fresh canvas. Later segments overwrite
/// earlier ones where they cross.
pub fn render(
    size: CanvasSize,
    background: &Background,
    segments: &[Segment],
    stroke_width: u32,
) -> RgbaImage {
    let mut canvas = allocate(size, background);
    for segment in segments {
        draw_segment(&mut canvas, segment, stroke_width);
    }
    canvas
}

pub fn encode_png(canvas: &RgbaImage) -> Result<Vec<u8>, RenderError> {
    let mut bytes = Vec::new();
    canvas.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::ThreadColor;
    use image::{Rgb, Rgba};

    const CLEAR: Rgba<u8> = Rgba([255, 255, 255, 0]);

    fn size(width: u32, height: u32) -> CanvasSize {
        CanvasSize { width, height }
    }

    fn segment(from: (i32, i32), to: (i32, i32), rgb: [u8; 3]) -> Segment {
        Segment {
            from,
            to,
            color: Rgb(rgb),
        }
    }

    #[test]
    fn canvas_starts_filled_with_background() {
        let transparent = allocate(size(4, 3), &Background::Transparent);
        assert_eq!(transparent.dimensions(), (4, 3));
        assert!(transparent.pixels().all(|p| *p == CLEAR));

        let navy = Background::Color(ThreadColor::rgb(0, 0, 128));
        let opaque = allocate(size(4, 3), &navy);
        assert!(opaque.pixels().all(|p| *p == Rgba([0, 0, 128, 255])));
    }

    #[test]
    fn hairline_covers_exactly_the_line() {
        let canvas = render(
            size(5, 5),
            &Background::Transparent,
            &[segment((0, 2), (4, 2), [255, 0, 0])],
            1,
        );
        for x in 0..5 {
            assert_eq!(*canvas.get_pixel(x, 2), Rgba([255, 0, 0, 255]));
            assert_eq!(*canvas.get_pixel(x, 1), CLEAR);
            assert_eq!(*canvas.get_pixel(x, 3), CLEAR);
        }
    }

    #[test]
    fn wide_stroke_thickens_the_line() {
        let canvas = render(
            size(9, 9),
            &Background::Transparent,
            &[segment((2, 4), (6, 4), [0, 0, 255])],
            3,
        );
        for x in 1..=7 {
            for y in 3..=5 {
                assert_eq!(*canvas.get_pixel(x, y), Rgba([0, 0, 255, 255]), "({x}, {y})");
            }
        }
        assert_eq!(*canvas.get_pixel(0, 4), CLEAR);
        assert_eq!(*canvas.get_pixel(8, 4), CLEAR);
        assert_eq!(*canvas.get_pixel(4, 2), CLEAR);
        assert_eq!(*canvas.get_pixel(4, 6), CLEAR);
    }

    #[test]
    fn later_segments_paint_over_earlier_ones() {
        let canvas = render(
            size(5, 5),
            &Background::Transparent,
            &[
                segment((0, 2), (4, 2), [255, 0, 0]),
                segment((2, 0), (2, 4), [0, 255, 0]),
            ],
            1,
        );
        assert_eq!(*canvas.get_pixel(2, 2), Rgba([0, 255, 0, 255]));
        assert_eq!(*canvas.get_pixel(1, 2), Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn off_canvas_pixels_are_clipped() {
        let canvas = render(
            size(4, 4),
            &Background::Transparent,
            &[segment((-3, 1), (10, 1), [0, 0, 0])],
            2,
        );
        assert_eq!(canvas.dimensions(), (4, 4));
        assert_eq!(*canvas.get_pixel(0, 1), Rgba([0, 0, 0, 255]));
        assert_eq!(*canvas.get_pixel(3, 2), Rgba([0, 0, 0, 255]));
        assert_eq!(*canvas.get_pixel(3, 3), CLEAR);
    }

    #[test]
    fn zero_length_segment_marks_a_dot() {
        let canvas = render(
            size(3, 3),
            &Background::white(),
            &[segment((1, 1), (1, 1), [0, 0, 0])],
            1,
        );
        assert_eq!(*canvas.get_pixel(1, 1), Rgba([0, 0, 0, 255]));
        assert_eq!(*canvas.get_pixel(0, 0), Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn png_encoding_preserves_dimensions() {
        let canvas = render(
            size(7, 5),
            &Background::Transparent,
            &[segment((0, 0), (6, 4), [10, 20, 30])],
            1,
        );
        let bytes = encode_png(&canvas).expect("png encoding should succeed");
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");

        let decoded = image::load_from_memory(&bytes)
            .expect("encoded png should decode")
            .to_rgba8();
        assert_eq!(decoded, canvas);
    }
}
