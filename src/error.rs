use std::path::PathBuf;

use thiserror::Error;

use crate::encoding::TextEncoding;

#[derive(Error, Debug)]
pub enum RewriterError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("{path} is not valid {encoding} text")]
    Encoding {
        path: PathBuf,
        encoding: TextEncoding,
    },

    #[error("Invalid rule: {0}")]
    InvalidRule(String),

    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),
}

pub type Result<T> = std::result::Result<T, RewriterError>;
