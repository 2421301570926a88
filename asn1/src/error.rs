//! Error types for ASN.1 decoding and construction.

use thiserror::Error;

/// Decode and construction failures of the value layer.
///
/// Together with the wire-level kinds wrapped by [`Error::Wire`], these
/// are the positioned failure kinds of the codec: every variant carries
/// the byte offset at which it was detected. Constructor-raised
/// `WrongData` uses offset 0, since no wire position exists on that
/// path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    #[error(transparent)]
    Wire(#[from] der::Error),

    #[error("offset {offset}: universal tag {tag} is not supported")]
    UnsupportedTag { offset: usize, tag: u8 },

    #[error("offset {offset}: malformed content")]
    WrongData { offset: usize },
}
