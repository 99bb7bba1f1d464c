//! Error types shared by both pipelines
//!
//! Every failure is fatal to the current invocation: the binaries print the
//! diagnostic and exit with a nonzero status. There is no retry and no
//! partial-output recovery.

use std::path::{Path, PathBuf};

use plotters::drawing::DrawingAreaErrorKind;

/// Errors raised while loading plotfiles, extracting data or drawing figures
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The plotfile could not be read or is not in a recognized format
    #[error("failed to load plotfile {path}: {reason}")]
    Load { path: PathBuf, reason: String },

    /// The field is neither stored in the plotfile nor derivable from it
    #[error("field `{field}` not found (available: {})", available.join(", "))]
    FieldNotFound { field: String, available: Vec<String> },

    /// A caller-supplied argument is outside its legal domain
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The output image could not be rendered or written
    #[error("failed to write {path}: {reason}")]
    Write { path: PathBuf, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn load(path: impl AsRef<Path>, reason: impl Into<String>) -> Self {
        Error::Load {
            path: path.as_ref().to_path_buf(),
            reason: reason.into(),
        }
    }

    pub(crate) fn write(path: impl AsRef<Path>, reason: impl std::fmt::Display) -> Self {
        Error::Write {
            path: path.as_ref().to_path_buf(),
            reason: reason.to_string(),
        }
    }
}

/// Drawing failures carry no path; [`crate::output::visualization`] attaches
/// the output path when it converts them into [`Error::Write`].
#[derive(Debug)]
pub(crate) struct DrawError(pub String);

impl<E: std::error::Error + Send + Sync> From<DrawingAreaErrorKind<E>> for DrawError {
    fn from(e: DrawingAreaErrorKind<E>) -> Self {
        DrawError(e.to_string())
    }
}
