use serde::{Deserialize, Serialize};

use crate::vcard::present;

/// Placeholder encoded when no URL is available, the symbol needs at least one character.
pub const EMPTY_URL_PLACEHOLDER: &str = " ";

/// What the QR symbol carries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum PayloadMode {
    /// The full contact record, so scanning imports the contact.
    #[default]
    #[cfg_attr(feature = "cli", value(name = "vcard"))]
    VCard,
    /// Just a link: the website, else the profile URL.
    Url,
}

/// Chooses the text to encode.
///
/// In [`PayloadMode::Url`] the trimmed `website` wins, then the trimmed `fallback_url`, then a
/// single space. The result is never empty.
pub fn select_payload(
    mode: PayloadMode,
    record_text: &str,
    website: &str,
    fallback_url: &str
) -> String {
    match mode {
        PayloadMode::VCard => record_text.to_string(),
        PayloadMode::Url => present(website)
            .or_else(|| present(fallback_url))
            .map(str::trim)
            .unwrap_or(EMPTY_URL_PLACEHOLDER)
            .to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECORD: &str = "BEGIN:VCARD\nVERSION:3.0\nEND:VCARD";

    #[test]
    fn test_vcard_mode_returns_record() {
        assert_eq!(select_payload(PayloadMode::VCard, RECORD, "https://w.example", ""), RECORD);
    }

    #[test]
    fn test_url_mode_prefers_website() {
        let payload = select_payload(
            PayloadMode::Url,
            RECORD,
            " https://w.example ",
            "https://li.example/x"
        );
        assert_eq!(payload, "https://w.example");
    }

    #[test]
    fn test_url_mode_falls_back_to_profile() {
        assert_eq!(
            select_payload(PayloadMode::Url, RECORD, "", "https://li.example/x"),
            "https://li.example/x"
        );
        assert_eq!(
            select_payload(PayloadMode::Url, RECORD, "  ", "https://li.example/x"),
            "https://li.example/x"
        );
    }

    #[test]
    fn test_url_mode_single_space_when_nothing_available() {
        assert_eq!(select_payload(PayloadMode::Url, RECORD, "", ""), " ");
        assert_eq!(select_payload(PayloadMode::Url, RECORD, " ", "\t"), " ");
    }

    #[test]
    fn test_mode_parses_from_lowercase() {
        #[derive(Deserialize)]
        struct Wrapper {
            mode: PayloadMode,
        }
        let w: Wrapper = toml::from_str("mode = \"url\"").unwrap();
        assert_eq!(w.mode, PayloadMode::Url);
        let w: Wrapper = toml::from_str("mode = \"vcard\"").unwrap();
        assert_eq!(w.mode, PayloadMode::VCard);
    }
}
