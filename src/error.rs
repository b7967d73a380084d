//! Crate-wide error type.

use std::path::PathBuf;

/// Errors raised while turning an image into a topology report.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The image file could not be opened or decoded.
    #[error("unable to read image at {}: {source}", .path.display())]
    ImageRead {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// In-memory image bytes could not be decoded.
    #[error("failed to decode image: {0}")]
    ImageDecode(#[source] image::ImageError),

    /// Re-encoding the grayscale image for display failed.
    #[error("failed to encode image: {0}")]
    ImageEncode(#[source] image::ImageError),

    /// The input image data was empty.
    #[error("input image data is empty")]
    EmptyInput,

    /// Canny found no edge pixels, so there is no point cloud.
    #[error("no edges detected in the image")]
    NoEdges,

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A TOML configuration file could not be parsed.
    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_match_user_facing_text() {
        assert_eq!(Error::NoEdges.to_string(), "no edges detected in the image");
        assert_eq!(
            Error::InvalidConfig("max_points must be positive".into()).to_string(),
            "invalid configuration: max_points must be positive"
        );
    }
}
