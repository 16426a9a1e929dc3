//! GIF container decoding.
//!
//! Thin layer over `image`'s GIF decoder that keeps the per-frame delay in
//! the container's own unit (centiseconds) next to each composited frame.

use std::fs::File;
use std::io::{BufRead, BufReader, Seek};
use std::path::Path;

use image::codecs::gif::GifDecoder;
use image::{AnimationDecoder, ImageDecoder, ImageResult, RgbaImage};
use tracing::debug;

use crate::{GifViewError, Result};

/// Frames and delays of a decoded GIF.
#[derive(Debug, Clone)]
pub struct DecodedGif {
    /// Fully composited frames, each the size of the logical screen.
    pub frames: Vec<RgbaImage>,
    /// Per-frame delay in hundredths of a second, index-aligned with `frames`.
    pub delays_cs: Vec<u16>,
    pub width: u32,
    pub height: u32,
}

/// Decode every frame of a GIF stream.
pub fn decode_gif<R: BufRead + Seek>(reader: R) -> ImageResult<DecodedGif> {
    let decoder = GifDecoder::new(reader)?;
    let (width, height) = decoder.dimensions();

    let mut frames = Vec::new();
    let mut delays_cs = Vec::new();
    for frame in decoder.into_frames() {
        let frame = frame?;
        let (numer, denom) = frame.delay().numer_denom_ms();
        delays_cs.push(ms_ratio_to_centiseconds(numer, denom));
        frames.push(frame.into_buffer());
    }

    debug!(width, height, frames = frames.len(), "Decoded GIF");
    Ok(DecodedGif {
        frames,
        delays_cs,
        width,
        height,
    })
}

/// Open and decode a GIF file from disk.
pub fn read_gif_file(path: impl AsRef<Path>) -> Result<DecodedGif> {
    let path = path.as_ref();
    let file = File::open(path).map_err(GifViewError::Open)?;
    Ok(decode_gif(BufReader::new(file))?)
}

fn ms_ratio_to_centiseconds(numer: u32, denom: u32) -> u16 {
    if denom == 0 {
        return 0;
    }
    let cs = u64::from(numer) / u64::from(denom) / 10;
    u16::try_from(cs).unwrap_or(u16::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::codecs::gif::GifEncoder;
    use image::{Delay, Frame, Rgba};
    use std::io::Cursor;

    fn encode(frames: &[(RgbaImage, u32)]) -> Vec<u8> {
        let mut bytes = Vec::new();
        {
            let mut encoder = GifEncoder::new(&mut bytes);
            for (img, delay_ms) in frames {
                let frame = Frame::from_parts(
                    img.clone(),
                    0,
                    0,
                    Delay::from_numer_denom_ms(*delay_ms, 1),
                );
                encoder.encode_frame(frame).unwrap();
            }
        }
        bytes
    }

    #[test]
    fn test_decode_keeps_frames_and_delays() {
        let red = RgbaImage::from_pixel(4, 2, Rgba([255, 0, 0, 255]));
        let green = RgbaImage::from_pixel(4, 2, Rgba([0, 255, 0, 255]));
        let bytes = encode(&[(red, 100), (green, 250)]);

        let gif = decode_gif(Cursor::new(bytes)).unwrap();
        assert_eq!((gif.width, gif.height), (4, 2));
        assert_eq!(gif.frames.len(), 2);
        assert_eq!(gif.delays_cs, vec![10, 25]);
    }

    #[test]
    fn test_truncated_stream_fails() {
        assert!(decode_gif(Cursor::new(b"GIF89a".to_vec())).is_err());
    }

    #[test]
    fn test_missing_file_is_open_error() {
        let err = read_gif_file("definitely/not/here.gif").unwrap_err();
        assert!(matches!(err, GifViewError::Open(_)));
        assert!(err.to_string().starts_with("Unable to open file: "));
    }

    #[test]
    fn test_ms_ratio_conversion() {
        assert_eq!(ms_ratio_to_centiseconds(100, 1), 10);
        assert_eq!(ms_ratio_to_centiseconds(0, 1), 0);
        assert_eq!(ms_ratio_to_centiseconds(5, 0), 0);
    }
}
