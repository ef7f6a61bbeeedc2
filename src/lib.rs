//! # cardqr
//!
//! A Rust library for generating digital business cards: a vCard contact record and a QR code
//! image that encodes either that record or a URL.
//!
//! The pipeline has two stages:
//!
//! 1. The Record Encoder ([`vcard`]) turns contact fields into a fixed-order vCard 3.0 record.
//! 2. The Payload Imager ([`qrcode`], [`render`]) encodes a text payload into a QR Code Model 2
//!    symbol, picking the smallest version that fits, and rasterizes it to a black-on-white PNG.
//!
//! Everything is a pure, synchronous transformation: identical inputs give byte-identical outputs.
//!
//! ## Example
//!
//! ```rust
//! use cardqr::{build_record, make_image, select_payload, serialize_png, ContactFields, PayloadMode};
//!
//! let fields = ContactFields {
//!     full_name: "Jane Doe".into(),
//!     email: "jane@example.com".into(),
//!     ..Default::default()
//! };
//! let record = build_record(&fields);
//! let payload = select_payload(PayloadMode::VCard, &record, &fields.website, &fields.profile_url);
//! let png = serialize_png(&make_image(&payload).unwrap()).unwrap();
//! assert!(png.starts_with(b"\x89PNG"));
//! ```
//!
//! ## Modules
//!
//! - [`vcard`]: Contact fields and the vCard line builder.
//! - [`payload`]: Choosing what the QR symbol carries.
//! - [`qrcode`]: Core QR code encoding functionality.
//! - [`render`]: Rasterizing symbols and PNG serialization.
//! - [`export`]: Download filenames and writing both artifacts to disk.

pub mod config;
pub mod error;
pub mod export;
pub mod logger;
pub mod payload;
pub mod qrcode;
pub mod render;
pub mod vcard;

#[cfg(feature = "cli")]
pub mod cli;

pub use config::{CardConfig, ImagerConfig};
pub use error::{CardError, Result};
pub use export::ExportBundle;
pub use payload::PayloadMode;
pub use qrcode::EcLevel;
pub use render::EncodedImage;
pub use vcard::{encode_record, ContactFields, ContactRecord};

/// Returns the vCard text for `fields`.
pub fn build_record(fields: &ContactFields) -> String {
    encode_record(fields).to_text()
}

/// Returns the text to encode: the record in vCard mode, otherwise the website, the fallback URL
/// or a single space, whichever comes first.
pub fn select_payload(
    mode: PayloadMode,
    record_text: &str,
    website: &str,
    fallback_url: &str
) -> String {
    payload::select_payload(mode, record_text, website, fallback_url)
}

/// Encodes `payload` with the default imager settings: 8 px modules, a 2-module quiet zone and
/// medium error correction.
pub fn make_image(payload: &str) -> Result<EncodedImage> {
    let config = ImagerConfig::default();
    render::encode_payload(payload, config.module_px, config.quiet_zone_modules, config.ec_level)
}

/// Returns PNG bytes ready for export.
pub fn serialize_png(image: &EncodedImage) -> Result<Vec<u8>> {
    render::serialize_png(image)
}

/// Everything produced for one set of contact fields.
#[derive(Debug, Clone)]
pub struct GeneratedCard {
    pub record: ContactRecord,
    pub payload: String,
    pub image: EncodedImage,
}

/// Runs the whole pipeline: record, payload selection and symbol image.
pub fn generate_card(
    fields: &ContactFields,
    mode: PayloadMode,
    imager: &ImagerConfig
) -> Result<GeneratedCard> {
    imager.validate()?;
    let record = encode_record(fields);
    let payload = select_payload(mode, &record.to_text(), &fields.website, &fields.profile_url);
    let image = render::encode_payload(
        &payload,
        imager.module_px,
        imager.quiet_zone_modules,
        imager.ec_level
    )?;
    tracing::debug!(
        lines = record.len(),
        payload_bytes = payload.len(),
        mode = ?mode,
        "generated card"
    );
    Ok(GeneratedCard { record, payload, image })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jane() -> ContactFields {
        ContactFields {
            full_name: "Jane Doe".into(),
            title: "Advisor".into(),
            company: "Example Capital".into(),
            phone: "+34 600 000 000".into(),
            email: "jane@example.com".into(),
            location: "Palma de Mallorca, Spain".into(),
            website: "https://jane.example".into(),
            profile_url: "https://social.example/jane".into(),
        }
    }

    #[test]
    fn test_generate_card_vcard_mode() {
        let card = generate_card(&jane(), PayloadMode::VCard, &ImagerConfig::default()).unwrap();
        assert_eq!(card.payload, card.record.to_text());
        assert_eq!(card.image.module_px(), 8);
        assert_eq!(card.image.quiet_zone_modules(), 2);
        assert_eq!(card.image.width(), card.image.grid_modules() * 8);
    }

    #[test]
    fn test_generate_card_url_mode() {
        let mut fields = jane();
        fields.website.clear();
        let card = generate_card(&fields, PayloadMode::Url, &ImagerConfig::default()).unwrap();
        assert_eq!(card.payload, "https://social.example/jane");
        assert_eq!(card.image.version().value(), 3);
    }

    #[test]
    fn test_generate_card_rejects_invalid_config() {
        let imager = ImagerConfig { module_px: 0, ..Default::default() };
        assert!(matches!(
            generate_card(&jane(), PayloadMode::VCard, &imager),
            Err(CardError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_make_image_is_idempotent() {
        let a = serialize_png(&make_image("https://jane.example").unwrap()).unwrap();
        let b = serialize_png(&make_image("https://jane.example").unwrap()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_make_image_surfaces_encoding_failure() {
        let too_long = "x".repeat(2332);
        assert!(matches!(make_image(&too_long), Err(CardError::EncodingFailure(_))));
    }
}
