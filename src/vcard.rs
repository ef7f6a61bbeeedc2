//! vCard 3.0 contact records.
//!
//! [`encode_record`] turns a set of [`ContactFields`] into a [`ContactRecord`]: a fixed-order
//! sequence of vCard lines. Fields that are empty or blank emit no line at all.
//!
//! Values are written verbatim. Reserved characters (`;`, `,`, `\`) are not escaped.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Contact details as entered by the user.
///
/// All fields are free text and optional; an empty or whitespace-only value counts as absent.
/// `profile_url` is never written to the record, it only serves as a fallback QR payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactFields {
    pub full_name: String,
    pub title: String,
    pub company: String,
    pub phone: String,
    pub email: String,
    pub location: String,
    pub website: String,
    pub profile_url: String,
}

impl ContactFields {
    /// Copy with leading and trailing whitespace removed from every field.
    pub fn trimmed(&self) -> Self {
        Self {
            full_name: self.full_name.trim().to_string(),
            title: self.title.trim().to_string(),
            company: self.company.trim().to_string(),
            phone: self.phone.trim().to_string(),
            email: self.email.trim().to_string(),
            location: self.location.trim().to_string(),
            website: self.website.trim().to_string(),
            profile_url: self.profile_url.trim().to_string(),
        }
    }
}

/// Returns the value unless it is empty or blank.
pub(crate) fn present(value: &str) -> Option<&str> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

/// One line of a contact record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordLine {
    Begin,
    Version,
    Name(String),
    FormattedName(String),
    Organization(String),
    Title(String),
    CellPhone(String),
    WorkEmail(String),
    WorkAddress(String),
    Url(String),
    End,
}

impl fmt::Display for RecordLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordLine::Begin => f.write_str("BEGIN:VCARD"),
            RecordLine::Version => f.write_str("VERSION:3.0"),
            RecordLine::Name(v) => write!(f, "N:{v};;;;"),
            RecordLine::FormattedName(v) => write!(f, "FN:{v}"),
            RecordLine::Organization(v) => write!(f, "ORG:{v}"),
            RecordLine::Title(v) => write!(f, "TITLE:{v}"),
            RecordLine::CellPhone(v) => write!(f, "TEL;TYPE=CELL:{v}"),
            RecordLine::WorkEmail(v) => write!(f, "EMAIL;TYPE=WORK:{v}"),
            // Location sits in the locality slot, the other address parts stay empty
            RecordLine::WorkAddress(v) => write!(f, "ADR;TYPE=WORK:;;{v};;;;"),
            RecordLine::Url(v) => write!(f, "URL:{v}"),
            RecordLine::End => f.write_str("END:VCARD"),
        }
    }
}

/// An immutable vCard built by [`encode_record`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactRecord {
    lines: Vec<RecordLine>,
}

impl ContactRecord {
    pub fn lines(&self) -> &[RecordLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Pairs with [`len`](Self::len). Always `false` for records from [`encode_record`], which
    /// carry at least the `BEGIN`, `VERSION` and `END` lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Lines joined with `\n`, without a trailing newline.
    pub fn to_text(&self) -> String {
        self.to_string()
    }

    /// UTF-8 bytes of [`to_text`](Self::to_text), ready for a `.vcf` file.
    pub fn into_bytes(self) -> Vec<u8> {
        self.to_text().into_bytes()
    }
}

impl fmt::Display for ContactRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{line}")?;
        }
        Ok(())
    }
}

struct LineBuilder {
    lines: Vec<RecordLine>,
}

impl LineBuilder {
    fn new() -> Self {
        Self { lines: vec![RecordLine::Begin, RecordLine::Version] }
    }

    fn push_if(&mut self, value: &str, line: fn(String) -> RecordLine) -> &mut Self {
        if let Some(v) = present(value) {
            self.lines.push(line(v.to_string()));
        }
        self
    }

    fn finish(mut self) -> ContactRecord {
        self.lines.push(RecordLine::End);
        ContactRecord { lines: self.lines }
    }
}

/// Builds the vCard for `fields`.
///
/// The output always starts with `BEGIN:VCARD` and `VERSION:3.0` and ends with `END:VCARD`.
/// In between, present fields appear in this order: `N` and `FN` (name), `ORG`, `TITLE`,
/// `TEL;TYPE=CELL`, `EMAIL;TYPE=WORK`, `ADR;TYPE=WORK` (location) and `URL`.
///
/// # Example
///
/// ```rust
/// use cardqr::vcard::{encode_record, ContactFields};
///
/// let fields = ContactFields {
///     full_name: "Jane Doe".into(),
///     email: "jane@x.com".into(),
///     ..Default::default()
/// };
/// assert_eq!(
///     encode_record(&fields).to_text(),
///     "BEGIN:VCARD\nVERSION:3.0\nN:Jane Doe;;;;\nFN:Jane Doe\nEMAIL;TYPE=WORK:jane@x.com\nEND:VCARD"
/// );
/// ```
pub fn encode_record(fields: &ContactFields) -> ContactRecord {
    let mut builder = LineBuilder::new();
    builder
        .push_if(&fields.full_name, RecordLine::Name)
        .push_if(&fields.full_name, RecordLine::FormattedName)
        .push_if(&fields.company, RecordLine::Organization)
        .push_if(&fields.title, RecordLine::Title)
        .push_if(&fields.phone, RecordLine::CellPhone)
        .push_if(&fields.email, RecordLine::WorkEmail)
        .push_if(&fields.location, RecordLine::WorkAddress)
        .push_if(&fields.website, RecordLine::Url);
    builder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full() -> ContactFields {
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
    fn test_all_fields_in_fixed_order() {
        let expected = [
            "BEGIN:VCARD",
            "VERSION:3.0",
            "N:Jane Doe;;;;",
            "FN:Jane Doe",
            "ORG:Example Capital",
            "TITLE:Advisor",
            "TEL;TYPE=CELL:+34 600 000 000",
            "EMAIL;TYPE=WORK:jane@example.com",
            "ADR;TYPE=WORK:;;Palma de Mallorca, Spain;;;;",
            "URL:https://jane.example",
            "END:VCARD",
        ]
        .join("\n");
        assert_eq!(encode_record(&full()).to_text(), expected);
    }

    #[test]
    fn test_all_absent_yields_structural_lines() {
        let record = encode_record(&ContactFields::default());
        assert_eq!(record.len(), 3);
        assert!(!record.is_empty());
        assert_eq!(record.to_text(), "BEGIN:VCARD\nVERSION:3.0\nEND:VCARD");
    }

    #[test]
    fn test_name_and_email_only() {
        let fields = ContactFields {
            full_name: "Jane Doe".into(),
            email: "jane@x.com".into(),
            ..Default::default()
        };
        assert_eq!(
            encode_record(&fields).to_text(),
            "BEGIN:VCARD\nVERSION:3.0\nN:Jane Doe;;;;\nFN:Jane Doe\nEMAIL;TYPE=WORK:jane@x.com\nEND:VCARD"
        );
    }

    #[test]
    fn test_every_subset_emits_only_present_fields() {
        let all = full();
        let tags = ["N:", "ORG:", "TITLE:", "TEL;", "EMAIL;", "ADR;", "URL:"];
        for mask in 0u8..128 {
            let pick = |bit: u8, value: &str| {
                if mask & (1 << bit) != 0 { value.to_string() } else { String::new() }
            };
            let fields = ContactFields {
                full_name: pick(0, &all.full_name),
                company: pick(1, &all.company),
                title: pick(2, &all.title),
                phone: pick(3, &all.phone),
                email: pick(4, &all.email),
                location: pick(5, &all.location),
                website: pick(6, &all.website),
                profile_url: all.profile_url.clone(),
            };
            let text = encode_record(&fields).to_text();
            let lines: Vec<&str> = text.lines().collect();

            let name_lines = if mask & 1 != 0 { 2 } else { 0 };
            let expected_len = 3 + name_lines + (mask >> 1).count_ones() as usize;
            assert_eq!(lines.len(), expected_len, "mask {mask:#09b}");
            assert_eq!(lines[0], "BEGIN:VCARD");
            assert_eq!(lines[1], "VERSION:3.0");
            assert_eq!(lines[lines.len() - 1], "END:VCARD");

            // Tags of present fields appear in fixed order, absent ones never
            let body = &lines[2..lines.len() - 1];
            let mut expected_tags: Vec<&str> = Vec::new();
            for (bit, &tag) in tags.iter().enumerate() {
                if mask & (1 << bit) != 0 {
                    expected_tags.push(tag);
                    if bit == 0 {
                        expected_tags.push("FN:");
                    }
                }
            }
            for (line, tag) in body.iter().zip(expected_tags.iter()) {
                assert!(line.starts_with(tag), "mask {mask:#09b}: {line} vs {tag}");
            }
        }
    }

    #[test]
    fn test_blank_values_are_absent() {
        let fields = ContactFields {
            full_name: "   ".into(),
            phone: "\t".into(),
            ..Default::default()
        };
        assert_eq!(encode_record(&fields).len(), 3);
    }

    #[test]
    fn test_profile_url_is_not_written() {
        let fields = ContactFields {
            profile_url: "https://social.example/jane".into(),
            ..Default::default()
        };
        assert!(!encode_record(&fields).to_text().contains("social.example"));
    }

    #[test]
    fn test_reserved_characters_are_kept_verbatim() {
        let fields = ContactFields {
            company: "Doe; Sons, Ltd\\".into(),
            ..Default::default()
        };
        assert!(encode_record(&fields).to_text().contains("ORG:Doe; Sons, Ltd\\\n"));
    }

    #[test]
    fn test_trimmed_strips_every_field() {
        let fields = ContactFields {
            full_name: "  Jane Doe ".into(),
            website: " https://jane.example\n".into(),
            ..Default::default()
        };
        let trimmed = fields.trimmed();
        assert_eq!(trimmed.full_name, "Jane Doe");
        assert_eq!(trimmed.website, "https://jane.example");
    }

    #[test]
    fn test_into_bytes_is_utf8_text() {
        let fields = ContactFields { full_name: "Zoë".into(), ..Default::default() };
        let bytes = encode_record(&fields).into_bytes();
        assert_eq!(String::from_utf8(bytes).unwrap().lines().nth(3), Some("FN:Zoë"));
    }
}
