//! Decoder trait for type-safe conversions.
//!
//! The `Decoder` trait converts a source type `T` into a destination
//! type `D`. It is implemented on the source; the destination carries
//! the `DecodableFrom<T>` marker so that only declared conversions
//! exist.
//!
//! `T` is `?Sized` so that slice types such as `[u8]` can act as a
//! conversion source, which lets call sites write
//! `bytes.as_ref().decode()`.
//!
//! # Implementation Guide
//!
//! ```no_run
//! use tlvkit::decoder::{DecodableFrom, Decoder};
//!
//! struct Wire(Vec<u8>);
//! struct Message(String);
//!
//! #[derive(Debug)]
//! struct MyError;
//!
//! // 1. Mark the destination type as decodable from the source type
//! impl DecodableFrom<Wire> for Message {}
//!
//! // 2. Implement the decoder on the source type
//! impl Decoder<Wire, Message> for Wire {
//!     type Error = MyError;
//!
//!     fn decode(&self) -> Result<Message, MyError> {
//!         Ok(Message(String::from_utf8_lossy(&self.0).to_string()))
//!     }
//! }
//! ```

/// Decoder trait for converting from type `T` to type `D`.
///
/// Implemented by the source type `T`; the destination type must
/// implement `DecodableFrom<T>`.
pub trait Decoder<T: ?Sized, D: DecodableFrom<T>> {
    /// The error type returned when decoding fails.
    type Error;

    /// Decodes `self` into type `D`.
    ///
    /// # Errors
    ///
    /// Returns an error if the conversion fails. The specific error
    /// conditions depend on the implementing type.
    fn decode(&self) -> Result<D, Self::Error>;
}

/// Marker trait indicating that type `D` can be decoded from type `T`.
///
/// Has no methods; it exists only so the compiler can verify a
/// conversion is declared before allowing a `Decoder` bound to resolve.
pub trait DecodableFrom<T: ?Sized> {}
