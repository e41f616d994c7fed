//! Error types for fltree.

use thiserror::Error;

/// Error type for fltree operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Read past the end of an input buffer
    #[error("out of bounds: tried to read {requested} byte(s) at position {position}, {available} available")]
    OutOfBounds {
        position: usize,
        requested: usize,
        available: usize,
    },

    /// Leading type tag did not match the expected node kind
    #[error("type tag mismatch while reading {node_kind}: expected 0x{expected:02x}, got 0x{actual:02x}")]
    TypeTagMismatch {
        node_kind: &'static str,
        expected: u8,
        actual: u8,
    },

    /// Leading byte is not a known node type tag
    #[error("unknown binary type tag: 0x{0:02x}")]
    UnknownTypeTag(u8),

    /// Property tag not defined for the node kind being read
    #[error("unknown property tag 0x{tag:02x} while reading {node_kind}")]
    UnknownPropertyTag { node_kind: &'static str, tag: u8 },

    /// Children collection exceeds its count-prefix width
    #[error("{node_kind} has {count} children, which exceeds the limit of {limit}")]
    CapacityExceeded {
        node_kind: &'static str,
        count: usize,
        limit: usize,
    },

    /// More than one scriptlet call in a single-call syntax body
    #[error("multiple scriptlet calls are not allowed in {syntax} syntax")]
    MultipleScriptletCalls { syntax: &'static str },

    /// String payload is not valid UTF-8
    #[error("invalid UTF-8 in string payload at position {0}")]
    InvalidUtf8(usize),

    /// Invalid binary file magic bytes
    #[error("invalid magic bytes: expected FLTREE header")]
    InvalidMagic,

    /// Unsupported binary format version
    #[error("unsupported format version: {0}")]
    UnsupportedVersion(u32),

    /// Checksum mismatch
    #[error("checksum mismatch")]
    ChecksumMismatch,

    /// Invalid header size
    #[error("invalid header size: expected {expected}, got {actual}")]
    InvalidHeaderSize { expected: usize, actual: usize },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Rule text could not be parsed
    #[error("parse error: {0}")]
    Parse(String),
}

/// Result type alias for fltree operations.
pub type Result<T> = std::result::Result<T, Error>;
