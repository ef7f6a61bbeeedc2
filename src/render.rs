use std::io::Cursor;

use image::{DynamicImage, ImageBuffer, ImageFormat, Rgb, RgbImage};

use crate::error::{CardError, Result};
use crate::qrcode::{EcLevel, QrCode, Version};

const DARK: Rgb<u8> = Rgb([0, 0, 0]);
const LIGHT: Rgb<u8> = Rgb([255, 255, 255]);

/// Largest image side accepted, in pixels.
pub const MAX_SIDE_PX: u32 = 65_535;

/// A rasterized QR symbol: black modules on white, surrounded by a light quiet zone.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedImage {
    image: RgbImage,
    version: Version,
    symbol_modules: u32,
    module_px: u32,
    quiet_zone_modules: u32,
}

impl EncodedImage {
    pub fn version(&self) -> Version {
        self.version
    }

    /// Side of the symbol alone, in modules.
    pub fn symbol_modules(&self) -> u32 {
        self.symbol_modules
    }

    /// Side of the symbol plus quiet zone, in modules.
    pub fn grid_modules(&self) -> u32 {
        self.symbol_modules + 2 * self.quiet_zone_modules
    }

    pub fn module_px(&self) -> u32 {
        self.module_px
    }

    pub fn quiet_zone_modules(&self) -> u32 {
        self.quiet_zone_modules
    }

    /// Side in pixels; the image is square.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Whether the module at `(x, y)` of the padded grid is dark.
    ///
    /// Returns `None` outside the grid.
    pub fn is_dark(&self, x: u32, y: u32) -> Option<bool> {
        let grid = self.grid_modules();
        if x >= grid || y >= grid {
            return None;
        }
        let px = x * self.module_px + self.module_px / 2;
        let py = y * self.module_px + self.module_px / 2;
        Some(*self.image.get_pixel(px, py) == DARK)
    }

    pub fn as_rgb(&self) -> &RgbImage {
        &self.image
    }

    pub fn into_rgb(self) -> RgbImage {
        self.image
    }

    /// Renders the padded grid as text, two characters per module, for terminal previews.
    /// Always uses Unix newlines (\n).
    pub fn to_text_preview(&self) -> String {
        let grid = self.grid_modules();
        let mut result = String::with_capacity((grid as usize * 2 * 3 + 1) * grid as usize);
        for y in 0..grid {
            for x in 0..grid {
                let c: char = if self.is_dark(x, y) == Some(true) { '█' } else { ' ' };
                result.push(c);
                result.push(c);
            }
            result.push('\n');
        }
        result
    }
}

/// Encodes `text` as a QR symbol at `ec_level` and rasterizes it.
///
/// Each module becomes a `module_px` square block; `quiet_zone_modules` light modules pad all four
/// sides. The version is chosen automatically.
///
/// # Errors
///
/// - [`CardError::EmptyPayload`] if `text` is empty.
/// - [`CardError::InvalidParameter`] if `module_px` or `quiet_zone_modules` is zero, or the image
///   side would overflow.
/// - [`CardError::EncodingFailure`] if `text` exceeds the version 40 capacity at `ec_level`.
///
/// # Example
///
/// ```rust
/// use cardqr::qrcode::EcLevel;
/// use cardqr::render::encode_payload;
///
/// let img = encode_payload("https://example.com", 8, 2, EcLevel::Medium).unwrap();
/// assert_eq!(img.width(), (img.symbol_modules() + 4) * 8);
/// ```
pub fn encode_payload(
    text: &str,
    module_px: u32,
    quiet_zone_modules: u32,
    ec_level: EcLevel
) -> Result<EncodedImage> {
    if text.is_empty() {
        return Err(CardError::EmptyPayload);
    }
    if module_px == 0 {
        return Err(CardError::InvalidParameter {
            field: "module_px",
            message: "must be at least 1".to_string(),
        });
    }
    if quiet_zone_modules == 0 {
        return Err(CardError::InvalidParameter {
            field: "quiet_zone_modules",
            message: "must be at least 1".to_string(),
        });
    }

    let qr = QrCode::encode_text(text, ec_level)?;
    rasterize(&qr, module_px, quiet_zone_modules)
}

/// Paints `qr` into an RGB bitmap.
pub fn rasterize(qr: &QrCode, module_px: u32, quiet_zone_modules: u32) -> Result<EncodedImage> {
    let symbol_modules = qr.size() as u32;
    let side = quiet_zone_modules
        .checked_mul(2)
        .and_then(|border| border.checked_add(symbol_modules))
        .and_then(|grid| grid.checked_mul(module_px))
        .filter(|&side| side <= MAX_SIDE_PX)
        .ok_or_else(|| CardError::InvalidParameter {
            field: "module_px",
            message: format!(
                "{symbol_modules} modules with a {quiet_zone_modules}-module border at {module_px} px exceeds {MAX_SIDE_PX} px"
            ),
        })?;

    let border = quiet_zone_modules as i32;
    let mut img: RgbImage = ImageBuffer::new(side, side);
    for (x, y, pixel) in img.enumerate_pixels_mut() {
        let qr_x = (x / module_px) as i32 - border;
        let qr_y = (y / module_px) as i32 - border;
        *pixel = if qr.get_module(qr_x, qr_y) { DARK } else { LIGHT };
    }

    tracing::debug!(
        version = qr.version().value(),
        side_px = side,
        module_px,
        quiet_zone_modules,
        "rasterized QR symbol"
    );
    Ok(EncodedImage {
        image: img,
        version: qr.version(),
        symbol_modules,
        module_px,
        quiet_zone_modules,
    })
}

/// Serializes the image as an 8-bit RGB PNG. Identical images give identical bytes.
pub fn serialize_png(image: &EncodedImage) -> Result<Vec<u8>> {
    let mut buf: Vec<u8> = Vec::new();
    DynamicImage::ImageRgb8(image.image.clone()).write_to(
        &mut Cursor::new(&mut buf),
        ImageFormat::Png
    )?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimensions_follow_symbol_and_border() {
        let img = encode_payload("Hello", 8, 2, EcLevel::Medium).unwrap();
        assert_eq!(img.symbol_modules(), 21);
        assert_eq!(img.grid_modules(), 25);
        assert_eq!(img.width(), 200);
        assert_eq!(img.as_rgb().height(), 200);
    }

    #[test]
    fn test_quiet_zone_is_light() {
        let img = encode_payload("BEGIN:VCARD\nFN:Jane\nEND:VCARD", 3, 2, EcLevel::Medium).unwrap();
        let side = img.width();
        let band = 2 * 3;
        for (x, y, pixel) in img.as_rgb().enumerate_pixels() {
            if x < band || y < band || x >= side - band || y >= side - band {
                assert_eq!(*pixel, LIGHT, "pixel ({x}, {y})");
            }
        }
    }

    #[test]
    fn test_only_black_and_white_pixels() {
        let img = encode_payload("https://example.com", 2, 1, EcLevel::Medium).unwrap();
        assert!(img.as_rgb().pixels().all(|p| *p == DARK || *p == LIGHT));
    }

    #[test]
    fn test_modules_match_symbol() {
        let qr = QrCode::encode_text("HELLO", EcLevel::Medium).unwrap();
        let img = rasterize(&qr, 4, 2).unwrap();
        for y in 0..qr.size() {
            for x in 0..qr.size() {
                assert_eq!(
                    img.is_dark(x as u32 + 2, y as u32 + 2),
                    Some(qr.get_module(x, y))
                );
            }
        }
        assert_eq!(img.is_dark(img.grid_modules(), 0), None);
    }

    #[test]
    fn test_empty_payload_is_rejected() {
        assert!(matches!(
            encode_payload("", 8, 2, EcLevel::Medium),
            Err(CardError::EmptyPayload)
        ));
    }

    #[test]
    fn test_zero_parameters_are_rejected() {
        assert!(matches!(
            encode_payload("x", 0, 2, EcLevel::Medium),
            Err(CardError::InvalidParameter { field: "module_px", .. })
        ));
        assert!(matches!(
            encode_payload("x", 8, 0, EcLevel::Medium),
            Err(CardError::InvalidParameter { field: "quiet_zone_modules", .. })
        ));
    }

    #[test]
    fn test_oversized_image_is_rejected() {
        assert!(matches!(
            encode_payload("x", u32::MAX / 2, 2, EcLevel::Medium),
            Err(CardError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_png_signature_and_idempotence() {
        let a = serialize_png(&encode_payload("Jane Doe", 8, 2, EcLevel::Medium).unwrap()).unwrap();
        let b = serialize_png(&encode_payload("Jane Doe", 8, 2, EcLevel::Medium).unwrap()).unwrap();
        assert_eq!(&a[..8], b"\x89PNG\r\n\x1a\n");
        assert_eq!(a, b);
    }

    #[test]
    fn test_text_preview_has_one_row_per_module() {
        let img = encode_payload("HI", 1, 1, EcLevel::Medium).unwrap();
        let preview = img.to_text_preview();
        assert_eq!(preview.lines().count(), 23);
        assert!(preview.lines().all(|l| l.chars().count() == 46));
        assert!(preview.lines().next().unwrap().trim().is_empty());
    }
}
