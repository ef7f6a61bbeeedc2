use thiserror::Error;

use crate::qrcode::DataTooLong;

#[derive(Error, Debug)]
pub enum CardError {
    #[error("Payload does not fit in a QR symbol: {0}")]
    EncodingFailure(#[from] DataTooLong),

    #[error("Payload is empty, a QR symbol needs at least one data character")]
    EmptyPayload,

    #[error("Invalid parameter `{field}`: {message}")]
    InvalidParameter { field: &'static str, message: String },

    #[error("Image encoding failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CardError {
    /// Short suggestion shown to the user next to the error.
    pub fn recovery_hint(&self) -> &'static str {
        match self {
            CardError::EncodingFailure(_) => {
                "Shorten the payload (leave out some contact fields) or lower the error correction level"
            }
            CardError::EmptyPayload => "Provide a website or profile URL, or switch to vCard mode",
            CardError::InvalidParameter { field: "filename", .. } => {
                "Export files are named after the contact; check the full name"
            }
            CardError::InvalidParameter { .. } => "Use a module size and quiet zone of at least 1",
            CardError::Image(_) => "Retry with a smaller module size",
            CardError::Io(_) => "Check that the output directory is writable",
            CardError::Config { .. } => "Check the TOML syntax of the configuration file",
        }
    }
}

pub type Result<T> = std::result::Result<T, CardError>;
