//! Half-block pixel renderer.
//!
//! Each terminal cell shows two vertically stacked pixels using the upper
//! half block `▀`: the foreground is the top pixel and the background is the
//! bottom one. Colours are written as inline `[#rrggbb:#rrggbb]` tags which
//! the widget turns into styled spans (see [`crate::tui::markup`]).

use std::fmt::Write as _;

use image::{Rgba, RgbaImage};

/// Character drawn for every two-pixel cell.
pub const HALF_BLOCK: char = '▀';

/// Errors from converting an image to text
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PixelError {
    #[error("Can't process image with uneven height ({height})")]
    UnevenHeight { height: u32 },

    #[error("Can't process image with no pixels ({width}x{height})")]
    Empty { width: u32, height: u32 },
}

/// Render an RGBA frame as colour-tagged half-block text, one line per pixel pair.
pub fn frame_to_text(image: &RgbaImage) -> Result<String, PixelError> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(PixelError::Empty { width, height });
    }
    if height % 2 != 0 {
        return Err(PixelError::UnevenHeight { height });
    }

    // Rough size: one tag plus a 3-byte glyph per cell.
    let mut out = String::with_capacity((width as usize) * (height as usize / 2) * 24);
    for y in (0..height).step_by(2) {
        if y > 0 {
            out.push('\n');
        }
        let mut last: Option<(Rgba<u8>, Rgba<u8>)> = None;
        for x in 0..width {
            let pair = (*image.get_pixel(x, y), *image.get_pixel(x, y + 1));
            if last != Some(pair) {
                push_tag(&mut out, pair.0, pair.1);
                last = Some(pair);
            }
            out.push(HALF_BLOCK);
        }
    }
    Ok(out)
}

fn push_tag(out: &mut String, fg: Rgba<u8>, bg: Rgba<u8>) {
    let [r1, g1, b1, _] = fg.0;
    let [r2, g2, b2, _] = bg.0;
    // Writing into a String cannot fail.
    let _ = write!(out, "[#{r1:02x}{g1:02x}{b1:02x}:#{r2:02x}{g2:02x}{b2:02x}]");
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_uneven_height_rejected() {
        let img = RgbaImage::new(4, 3);
        assert_eq!(
            frame_to_text(&img),
            Err(PixelError::UnevenHeight { height: 3 })
        );
    }

    #[test]
    fn test_empty_image_rejected() {
        let img = RgbaImage::new(0, 2);
        assert!(matches!(frame_to_text(&img), Err(PixelError::Empty { .. })));
    }

    #[test]
    fn test_two_by_four_image() {
        let red = Rgba([255, 0, 0, 255]);
        let blue = Rgba([0, 0, 255, 255]);
        let mut img = RgbaImage::from_pixel(2, 4, red);
        img.put_pixel(1, 1, blue);

        let text = frame_to_text(&img).unwrap();
        assert_eq!(
            text,
            "[#ff0000:#ff0000]▀[#ff0000:#0000ff]▀\n[#ff0000:#ff0000]▀▀"
        );
    }

    #[test]
    fn test_line_count_is_half_height() {
        let img = RgbaImage::new(3, 10);
        let text = frame_to_text(&img).unwrap();
        assert_eq!(text.lines().count(), 5);
    }
}
