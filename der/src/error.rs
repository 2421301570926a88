use thiserror::Error;

/// Wire-level decode failures. Every variant carries the byte offset at
/// which it was detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    #[error("offset {offset}: input too short, {needed} byte(s) requested past the end")]
    InputTooShort { offset: usize, needed: usize },
    #[error("offset {offset}: length field of {length_bytes} bytes is not supported")]
    TooLong { offset: usize, length_bytes: usize },
    #[error("offset {offset}: multi-byte tag numbers are not supported")]
    TagTooBig { offset: usize },
    #[error("offset {offset}: unsupported tag class {class}")]
    UnsupportedTagClass { offset: usize, class: u8 },
    #[error("offset {offset}: indefinite length is not allowed here")]
    IndefiniteLength { offset: usize },
}
