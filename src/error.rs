//! Error types shared by every stage of the codec.

use thiserror::Error;

use crate::symbol::Symbol;

/// Broad category of a [`HuffmanError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The persisted tree description is malformed.
    Format,
    /// The tree cannot drive a decode (empty, or the bits end mid-code).
    Structural,
    /// A symbol cannot be encoded or emitted.
    Encoding,
    Io,
}

#[derive(Error, Debug)]
pub enum HuffmanError {
    #[error("line {line}: symbol id is not a non-negative integer: {text:?}")]
    InvalidSymbol { line: usize, text: String },

    #[error("line {line}: path may only contain '0' and '1': {text:?}")]
    InvalidPath { line: usize, text: String },

    #[error("line {line}: symbol id without a path line")]
    TruncatedRecord { line: usize },

    #[error("line {line}: path {path:?} collides with a node already in the tree")]
    PathConflict { line: usize, path: String },

    #[error("tree description leaves branch {path:?} without both children")]
    IncompleteTree { path: String },

    #[error("code tree is empty, nothing to decode")]
    EmptyTree,

    #[error("bit stream ended inside a code after {bits_read} bits")]
    TruncatedCode { bits_read: u64 },

    #[error("symbol {0} is not present in the code tree")]
    UnknownSymbol(Symbol),

    #[error("symbol {0} does not fit in a byte")]
    SymbolOutOfRange(Symbol),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl HuffmanError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            HuffmanError::InvalidSymbol { .. }
            | HuffmanError::InvalidPath { .. }
            | HuffmanError::TruncatedRecord { .. }
            | HuffmanError::PathConflict { .. }
            | HuffmanError::IncompleteTree { .. } => ErrorKind::Format,
            HuffmanError::EmptyTree | HuffmanError::TruncatedCode { .. } => ErrorKind::Structural,
            HuffmanError::UnknownSymbol(_) | HuffmanError::SymbolOutOfRange(_) => {
                ErrorKind::Encoding
            }
            HuffmanError::Io(_) => ErrorKind::Io,
        }
    }
}

pub type Result<T, E = HuffmanError> = std::result::Result<T, E>;
