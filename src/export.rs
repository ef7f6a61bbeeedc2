use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

use crate::error::{CardError, Result};
use crate::render;
use crate::GeneratedCard;

pub const VCARD_MIME: &str = "text/vcard";
pub const PNG_MIME: &str = "image/png";

const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// `<name>_<timestamp>.vcf`. Whitespace, path separators and other characters that are not
/// portable in filenames are replaced by underscores in the trimmed name.
pub fn record_filename(full_name: &str, timestamp: &NaiveDateTime) -> String {
    let name: String = full_name
        .trim()
        .chars()
        .map(|c| if is_portable(c) { c } else { '_' })
        .collect();
    format!("{}_{}.vcf", name, timestamp.format(TIMESTAMP_FORMAT))
}

fn is_portable(c: char) -> bool {
    !(c.is_whitespace()
        || c.is_control()
        || matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|'))
}

/// Rejects names that would resolve outside the directory they are joined to.
fn plain_file_name(name: &str) -> Result<&str> {
    if Path::new(name).file_name() == Some(OsStr::new(name)) {
        Ok(name)
    } else {
        Err(CardError::InvalidParameter {
            field: "filename",
            message: format!("{name:?} is not a plain file name"),
        })
    }
}

/// `qr_<timestamp>.png`
pub fn image_filename(timestamp: &NaiveDateTime) -> String {
    format!("qr_{}.png", timestamp.format(TIMESTAMP_FORMAT))
}

/// The two downloadable artifacts with their suggested filenames.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportBundle {
    pub record_filename: String,
    pub record_bytes: Vec<u8>,
    pub image_filename: String,
    pub image_bytes: Vec<u8>,
}

impl ExportBundle {
    pub fn from_card(card: &GeneratedCard, full_name: &str, timestamp: &NaiveDateTime) -> Result<Self> {
        Ok(Self {
            record_filename: record_filename(full_name, timestamp),
            record_bytes: card.record.clone().into_bytes(),
            image_filename: image_filename(timestamp),
            image_bytes: render::serialize_png(&card.image)?,
        })
    }

    /// `(filename, MIME type, bytes)` for each download, record first.
    pub fn downloads(&self) -> [(&str, &str, &[u8]); 2] {
        [
            (self.record_filename.as_str(), VCARD_MIME, self.record_bytes.as_slice()),
            (self.image_filename.as_str(), PNG_MIME, self.image_bytes.as_slice()),
        ]
    }

    /// Writes both files into `dir`, creating it if needed. Returns the record and image paths.
    pub fn write_to<P: AsRef<Path>>(&self, dir: P) -> Result<(PathBuf, PathBuf)> {
        let dir = dir.as_ref();
        let record_name = plain_file_name(&self.record_filename)?;
        let image_name = plain_file_name(&self.image_filename)?;
        if !dir.exists() {
            fs::create_dir_all(dir)?;
        }

        let record_path = dir.join(record_name);
        fs::write(&record_path, &self.record_bytes)?;
        let image_path = dir.join(image_name);
        fs::write(&image_path, &self.image_bytes)?;

        tracing::info!(
            record = %record_path.display(),
            image = %image_path.display(),
            "exported card"
        );
        Ok((record_path, image_path))
    }
}
