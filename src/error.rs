// src/error.rs
//
// Parsing itself never fails; these cover reading input and writing output.

use std::io;
use std::string::FromUtf8Error;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Reading input or writing output failed
    #[error(transparent)]
    Io(#[from] io::Error),

    /// Input bytes are not UTF-8
    #[error("input is not valid UTF-8: {0}")]
    Utf8(#[from] FromUtf8Error),

    /// JSON encoding of the segment list failed
    #[error("json encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
