//! # tlvkit
//!
//! Core traits for encoding and decoding in the tlvkit ASN.1 codec.
//!
//! This crate defines the fundamental `Decoder` and `Encoder` traits that
//! establish a type-safe conversion pattern used by the `der` and `asn1`
//! crates.
//!
//! ## Overview
//!
//! The conversion pattern flows like this:
//! ```text
//! Vec<u8> → Asn1 (decode)
//! Asn1 → Vec<u8> (encode)
//! ```
//!
//! Each direction is expressed through a trait pair: `Decoder` with the
//! `DecodableFrom` marker, and `Encoder` with the `EncodableTo` marker.
//! The marker traits constrain which conversions exist, so an invalid
//! source/destination pairing is a compile error rather than a runtime
//! surprise.
//!
//! ## Example
//!
//! The `asn1` crate implements the pattern for DER bytes:
//!
//! ```ignore
//! use tlvkit::decoder::Decoder;
//! use asn1::Asn1;
//!
//! let bytes = vec![0x05, 0x00];
//! let value: Asn1 = bytes.decode().unwrap();
//! ```

#![forbid(unsafe_code)]

pub mod decoder;
pub mod encoder;
