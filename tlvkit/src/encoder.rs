//! Encoder trait for type-safe conversions.
//!
//! The mirror image of [`crate::decoder`]: `Encoder` converts a value
//! into its encoded form `E`, and `EncodableTo<T>` marks which encoded
//! forms exist for a source type.

/// Encoder trait for converting from type `T` to type `E`.
///
/// Implemented by the source type `T`; the destination type must
/// implement `EncodableTo<T>`.
pub trait Encoder<T, E: EncodableTo<T>> {
    /// The error type returned when encoding fails.
    type Error;

    /// Encodes `self` into type `E`.
    fn encode(&self) -> Result<E, Self::Error>;
}

/// Marker trait indicating that type `E` is an encoded form of type `T`.
pub trait EncodableTo<T> {}
