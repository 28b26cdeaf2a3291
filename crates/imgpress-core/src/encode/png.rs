//! PNG encoding. Lossless, so export quality has no effect.

use std::io::Cursor;

use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};

use super::{validate_buffer, EncodeError};
use crate::decode::PixelBuffer;

/// Encode a buffer to PNG bytes, keeping the alpha channel.
pub fn encode_png(buffer: &PixelBuffer) -> Result<Vec<u8>, EncodeError> {
    validate_buffer(buffer)?;

    let mut output = Cursor::new(Vec::new());
    PngEncoder::new(&mut output)
        .write_image(&buffer.pixels, buffer.width, buffer.height, ExtendedColorType::Rgba8)
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    Ok(output.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::test_support::noisy_image;

    #[test]
    fn test_png_signature() {
        let bytes = encode_png(&noisy_image(8, 8)).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn test_png_is_lossless_with_alpha() {
        let mut img = noisy_image(12, 7);
        img.pixels[3] = 0;
        img.pixels[7] = 77;

        let decoded = image::load_from_memory(&encode_png(&img).unwrap())
            .unwrap()
            .to_rgba8();
        assert_eq!(decoded.into_raw(), img.pixels);
    }
}
