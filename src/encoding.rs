//! Text encoding used when reading and writing pages.
//!
//! Pages are decoded to a `String` before rewriting and encoded back with the
//! same encoding afterwards. A UTF-8 byte-order mark survives the round trip as
//! a leading `U+FEFF` character.

use std::fmt;
use std::path::Path;

use clap::ValueEnum;

use crate::error::{Result, RewriterError};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum TextEncoding {
    #[default]
    #[value(name = "utf-8", alias = "utf8")]
    Utf8,
    /// ISO-8859-1, one byte per code point.
    #[value(name = "latin1", alias = "iso-8859-1")]
    Latin1,
}

impl TextEncoding {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "utf-8",
            TextEncoding::Latin1 => "latin1",
        }
    }

    pub fn decode(&self, bytes: Vec<u8>, path: &Path) -> Result<String> {
        match self {
            TextEncoding::Utf8 => String::from_utf8(bytes).map_err(|_| self.error(path)),
            TextEncoding::Latin1 => Ok(bytes.into_iter().map(char::from).collect()),
        }
    }

    pub fn encode(&self, text: &str, path: &Path) -> Result<Vec<u8>> {
        match self {
            TextEncoding::Utf8 => Ok(text.as_bytes().to_vec()),
            TextEncoding::Latin1 => text
                .chars()
                .map(|c| u8::try_from(c).map_err(|_| self.error(path)))
                .collect(),
        }
    }

    fn error(&self, path: &Path) -> RewriterError {
        RewriterError::Encoding {
            path: path.to_path_buf(),
            encoding: *self,
        }
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
