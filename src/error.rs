use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScanifyError {
    #[error("Input error: {0}")]
    InputError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Decode error: {0}")]
    DecodeError(String),

    #[error("Page processing error: {0}")]
    PageError(String),

    #[error("Encode error: {0}")]
    EncodeError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Generates factory methods for [`ScanifyError`] variants that wrap a `String`.
macro_rules! error_constructors {
    ($(
        $(#[doc = $doc:expr])*
        $method:ident => $variant:ident
    ),* $(,)?) => {
        impl ScanifyError {
            $(
                $(#[doc = $doc])*
                pub fn $method(msg: impl Into<String>) -> Self {
                    Self::$variant(msg.into())
                }
            )*
        }
    };
}

error_constructors! {
    /// Create an input rejection error.
    input => InputError,
    /// Create a configuration error.
    config => ConfigError,
    /// Create a decode error.
    decode => DecodeError,
    /// Create a page processing error.
    page => PageError,
    /// Create an encode error.
    encode => EncodeError,
}

impl From<lopdf::Error> for ScanifyError {
    fn from(e: lopdf::Error) -> Self {
        Self::EncodeError(e.to_string())
    }
}

impl From<serde_yml::Error> for ScanifyError {
    fn from(e: serde_yml::Error) -> Self {
        Self::ConfigError(e.to_string())
    }
}

impl From<pdfium_render::prelude::PdfiumError> for ScanifyError {
    fn from(e: pdfium_render::prelude::PdfiumError) -> Self {
        Self::DecodeError(e.to_string())
    }
}

impl From<image::ImageError> for ScanifyError {
    fn from(e: image::ImageError) -> Self {
        Self::EncodeError(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ScanifyError>;
