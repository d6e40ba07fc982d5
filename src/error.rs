//! Error types for reading and writing tries.
//!
//! Every failure is fatal: a dictionary file is either well formed or it is the
//! product of an upstream tooling bug, so nothing here is retried or partially
//! recovered.

use std::io;

use thiserror::Error;

/// Errors produced while decoding or encoding a trie.
#[derive(Error, Debug)]
pub enum TrieError {
    /// The input carries no recognizable `TrieXv<N>` / `base=<radix>` header.
    #[error("Unknown file format")]
    Format,

    /// The header is well formed but no decoder is registered for its version.
    #[error("Unsupported version: {0}")]
    Version(u32),

    /// The body of the file could not be parsed.
    ///
    /// `position` is the character offset into the body for the streaming
    /// formats (V3, V4) and the line number for the line formats (V1, V2).
    #[error("Invalid trie data at {position}: {message}")]
    StreamSyntax {
        /// Where in the body the problem was found.
        position: usize,
        /// What went wrong.
        message: String,
    },

    /// An export option cannot be honoured.
    #[error("Invalid export option: {0}")]
    InvalidOption(String),

    /// Reading word lists or writing encoded output failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Result type alias for trie operations.
pub type Result<T> = std::result::Result<T, TrieError>;

impl TrieError {
    /// Creates a body syntax error.
    pub fn syntax<S: Into<String>>(position: usize, message: S) -> Self {
        TrieError::StreamSyntax {
            position,
            message: message.into(),
        }
    }

    /// Creates an invalid option error.
    pub fn invalid_option<S: Into<String>>(msg: S) -> Self {
        TrieError::InvalidOption(msg.into())
    }
}
