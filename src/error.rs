use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong in the toolkit.
///
/// Decode failures are fatal to the calling operation and never retried.
/// Validation failures are raised before any pixel is touched, so the
/// matrix is always left as it was.
#[derive(Debug, Error)]
pub enum EnhanceError {
    #[error("image {path} does not exist")]
    NotFound { path: PathBuf },

    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to encode {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to create {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("matrix must contain at least one sample")]
    EmptyMatrix,

    #[error("sample {value} exceeds the {levels}-level range")]
    SampleOutOfRange { value: u32, levels: u32 },

    #[error("both images should be of the same resolution, got {lhs:?} and {rhs:?}")]
    ResolutionMismatch {
        lhs: (usize, usize),
        rhs: (usize, usize),
    },

    #[error("bit plane must be between 1 and 8, got {0}")]
    BitPlaneOutOfRange(u32),

    #[error("operation requires a grayscale image")]
    UnsupportedMode,
}

pub type Result<T> = std::result::Result<T, EnhanceError>;
