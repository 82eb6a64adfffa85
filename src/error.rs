use miette::Diagnostic;
use thiserror::Error;

use crate::parser::ImportError;

/// Main error type for wgsldoc operations
#[derive(Error, Diagnostic, Debug)]
pub enum DocError {
    #[error("IO error: {0}")]
    #[diagnostic(code(wgsldoc::io))]
    IoError(#[from] std::io::Error),

    #[error("IO error with {path}: {message}")]
    #[diagnostic(code(wgsldoc::io))]
    Io {
        path: std::path::PathBuf,
        message: String,
    },

    #[error("Invalid import in {path}")]
    #[diagnostic(
        code(wgsldoc::import),
        help("Check the `#import` statement near the reported position")
    )]
    Import {
        path: std::path::PathBuf,
        #[source]
        source: ImportError,
    },

    #[error("Configuration error: {message}")]
    #[diagnostic(code(wgsldoc::config))]
    Config {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Render error: {message}")]
    #[diagnostic(code(wgsldoc::render))]
    Render { message: String },

    #[error("Build error: {message}")]
    #[diagnostic(code(wgsldoc::build))]
    Build {
        message: String,
        #[help]
        help: Option<String>,
    },
}

impl From<std::fmt::Error> for DocError {
    fn from(_: std::fmt::Error) -> Self {
        DocError::Render {
            message: "Failed to format page".to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DocError>;
