use std::fmt::Display;
use std::sync::LazyLock;

use chrono::NaiveDateTime;
use der::{
    Length, Reader, TAG_BIT_STRING, TAG_BMP_STRING, TAG_BOOLEAN, TAG_CONSTRUCTED, TAG_CONTEXT,
    TAG_GENERALIZED_TIME, TAG_IA5_STRING, TAG_INTEGER, TAG_NULL, TAG_OBJECT_IDENTIFIER,
    TAG_OCTET_STRING, TAG_PRINTABLE_STRING, TAG_SEQUENCE, TAG_SET, TAG_T61_STRING,
    TAG_UTC_TIME, TAG_UTF8_STRING, Tag, TagClass, length_field_len, write_length,
};
use error::Error;
use num_bigint::{BigInt, BigUint};
use num_traits::{ToPrimitive, Zero};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tlvkit::decoder::{DecodableFrom, Decoder};
use tlvkit::encoder::{EncodableTo, Encoder};

pub mod error;

/// Substitute byte for characters outside a string type's charset.
const SUBSTITUTE: u8 = 0x3f;

/// End-of-content marker closing an indefinite-length value.
const END_MARKER: [u8; 2] = [0x00, 0x00];

const UTC_TIME_FORMAT: &str = "%y%m%d%H%M%SZ";
const GENERALIZED_TIME_FORMAT: &str = "%Y%m%d%H%M%SZ";

/// The ASN1 null value.
pub const NULL: Asn1 = Asn1::Null;

/// The ASN1 integer 0.
pub static ZERO: LazyLock<Asn1> = LazyLock::new(|| Asn1::Integer(Integer::from(0)));

/// The ASN1 integer 1.
pub static ONE: LazyLock<Asn1> = LazyLock::new(|| Asn1::Integer(Integer::from(1)));

/// A decoded or constructed ASN.1 value.
///
/// Decoding accepts BER laxity (indefinite lengths on SEQUENCE/SET,
/// non-minimal definite length fields); encoding always produces
/// canonical DER.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Asn1 {
    Boolean(bool),
    Integer(Integer),
    BitString(BitString),
    OctetString(OctetString),
    Null,
    ObjectIdentifier(ObjectIdentifier),
    Utf8String(Asn1String),
    PrintableString(Asn1String),
    T61String(Asn1String),
    IA5String(Asn1String),
    BmpString(Asn1String),
    UtcTime(Asn1String),
    GeneralizedTime(Asn1String),
    Sequence(Sequence),
    Set(Set),
    ContextTagged(Ctx),
}

impl Asn1 {
    /// The tag number of this value. For context-tagged values this is
    /// the application-chosen tag.
    pub fn tag(&self) -> u8 {
        match self {
            Asn1::Boolean(_) => TAG_BOOLEAN,
            Asn1::Integer(_) => TAG_INTEGER,
            Asn1::BitString(_) => TAG_BIT_STRING,
            Asn1::OctetString(_) => TAG_OCTET_STRING,
            Asn1::Null => TAG_NULL,
            Asn1::ObjectIdentifier(_) => TAG_OBJECT_IDENTIFIER,
            Asn1::Utf8String(_) => TAG_UTF8_STRING,
            Asn1::PrintableString(_) => TAG_PRINTABLE_STRING,
            Asn1::T61String(_) => TAG_T61_STRING,
            Asn1::IA5String(_) => TAG_IA5_STRING,
            Asn1::BmpString(_) => TAG_BMP_STRING,
            Asn1::UtcTime(_) => TAG_UTC_TIME,
            Asn1::GeneralizedTime(_) => TAG_GENERALIZED_TIME,
            Asn1::Sequence(_) => TAG_SEQUENCE,
            Asn1::Set(_) => TAG_SET,
            Asn1::ContextTagged(ctx) => ctx.tag(),
        }
    }

    pub fn tag_class(&self) -> TagClass {
        match self {
            Asn1::ContextTagged(_) => TagClass::ContextSpecific,
            _ => TagClass::Universal,
        }
    }

    pub fn is_constructed(&self) -> bool {
        matches!(
            self,
            Asn1::Sequence(_) | Asn1::Set(_) | Asn1::ContextTagged(_)
        )
    }

    /// Constructs a UTF8String. Code units below 0x800 are encoded as
    /// 1-2 UTF-8 bytes, anything above is substituted with `?`.
    pub fn utf8_string(s: &str) -> Asn1 {
        Asn1::Utf8String(Asn1String::from(utf8_bytes(s)))
    }

    /// Constructs a PrintableString; non-ASCII characters are
    /// substituted with `?`.
    pub fn printable_string(s: &str) -> Asn1 {
        Asn1::PrintableString(Asn1String::from(ascii_bytes(s)))
    }

    /// Constructs a T61String; characters outside ISO 8859-1 are
    /// substituted with `?`.
    pub fn t61_string(s: &str) -> Asn1 {
        Asn1::T61String(Asn1String::from(iso8859_bytes(s)))
    }

    /// Constructs an IA5String; non-ASCII characters are substituted
    /// with `?`.
    pub fn ia5_string(s: &str) -> Asn1 {
        Asn1::IA5String(Asn1String::from(ascii_bytes(s)))
    }

    /// Constructs a BMPString of UTF-16BE code unit pairs.
    pub fn bmp_string(s: &str) -> Asn1 {
        Asn1::BmpString(Asn1String::from(utf16_bytes(s)))
    }

    /// Constructs a UTCTime from a datetime, formatted `YYMMDDHHMMSSZ`.
    pub fn utc_time(datetime: &NaiveDateTime) -> Asn1 {
        Asn1::UtcTime(Asn1String::from(
            datetime.format(UTC_TIME_FORMAT).to_string().into_bytes(),
        ))
    }

    /// Constructs a GeneralizedTime from a datetime, formatted
    /// `YYYYMMDDHHMMSSZ`.
    pub fn generalized_time(datetime: &NaiveDateTime) -> Asn1 {
        Asn1::GeneralizedTime(Asn1String::from(
            datetime
                .format(GENERALIZED_TIME_FORMAT)
                .to_string()
                .into_bytes(),
        ))
    }

    /// Wraps a value in a context-specific tag.
    pub fn context(tag: u8, value: Asn1) -> Result<Asn1, Error> {
        Ctx::new(tag, value).map(Asn1::ContextTagged)
    }

    /// Decodes the first value in `input`.
    ///
    /// Fails with a positioned [`Error`] on malformed input; no partial
    /// value is ever returned. Trailing bytes after the first value are
    /// ignored.
    pub fn decode(input: &[u8]) -> Result<Asn1, Error> {
        let mut reader = Reader::new(input);
        Asn1::decode_node(&mut reader)
    }

    fn decode_node(reader: &mut Reader) -> Result<Asn1, Error> {
        let tag_offset = reader.offset();
        let tag = Tag::read(reader)?;
        let length_offset = reader.offset();
        let length = Length::read(reader)?;
        match tag.class {
            TagClass::ContextSpecific => {
                // Context tags always carry definite lengths and wrap
                // exactly one value.
                let length = require_definite(length, length_offset)?;
                let end = reader.offset() + length;
                let value = Asn1::decode_node(reader)?;
                if reader.offset() != end {
                    return Err(Error::WrongData {
                        offset: reader.offset(),
                    });
                }
                Ok(Asn1::ContextTagged(Ctx {
                    tag: tag.number,
                    value: Box::new(value),
                }))
            }
            TagClass::Universal => {
                Asn1::decode_universal(tag.number, tag_offset, length, length_offset, reader)
            }
        }
    }

    fn decode_universal(
        number: u8,
        tag_offset: usize,
        length: Length,
        length_offset: usize,
        reader: &mut Reader,
    ) -> Result<Asn1, Error> {
        match number {
            TAG_SEQUENCE => Ok(Asn1::Sequence(Sequence::from(Asn1::decode_children(
                length, reader,
            )?))),
            TAG_SET => Ok(Asn1::Set(Set::from(Asn1::decode_children(length, reader)?))),
            _ => {
                let length = require_definite(length, length_offset)?;
                Asn1::decode_primitive(number, tag_offset, length, length_offset, reader)
            }
        }
    }

    fn decode_primitive(
        number: u8,
        tag_offset: usize,
        length: usize,
        length_offset: usize,
        reader: &mut Reader,
    ) -> Result<Asn1, Error> {
        match number {
            TAG_BOOLEAN => {
                if length != 1 {
                    return Err(Error::WrongData {
                        offset: length_offset,
                    });
                }
                Ok(Asn1::Boolean(reader.read_byte()? != 0))
            }
            TAG_INTEGER => {
                let data = reader.read_bytes(length)?;
                Integer::from_signed_bytes(data)
                    .map(Asn1::Integer)
                    .map_err(|_| Error::WrongData {
                        offset: length_offset,
                    })
            }
            TAG_BIT_STRING => {
                if length == 0 {
                    return Err(Error::WrongData {
                        offset: length_offset,
                    });
                }
                let content_offset = reader.offset();
                let unused = reader.read_byte()?;
                let bits = reader.read_bytes(length - 1)?;
                BitString::new(bits.to_vec(), unused)
                    .map(Asn1::BitString)
                    .map_err(|_| Error::WrongData {
                        offset: content_offset,
                    })
            }
            TAG_OCTET_STRING => Ok(Asn1::OctetString(OctetString::from(
                reader.read_bytes(length)?,
            ))),
            TAG_NULL => {
                if length != 0 {
                    return Err(Error::WrongData {
                        offset: length_offset,
                    });
                }
                Ok(NULL)
            }
            TAG_OBJECT_IDENTIFIER => Ok(Asn1::ObjectIdentifier(ObjectIdentifier::from_bytes(
                reader.read_bytes(length)?.to_vec(),
            ))),
            TAG_UTF8_STRING => Ok(Asn1::Utf8String(Asn1String::from(
                reader.read_bytes(length)?,
            ))),
            TAG_PRINTABLE_STRING => Ok(Asn1::PrintableString(Asn1String::from(
                reader.read_bytes(length)?,
            ))),
            TAG_T61_STRING => Ok(Asn1::T61String(Asn1String::from(
                reader.read_bytes(length)?,
            ))),
            TAG_IA5_STRING => Ok(Asn1::IA5String(Asn1String::from(
                reader.read_bytes(length)?,
            ))),
            TAG_BMP_STRING => {
                if length % 2 != 0 {
                    return Err(Error::WrongData {
                        offset: length_offset,
                    });
                }
                Ok(Asn1::BmpString(Asn1String::from(
                    reader.read_bytes(length)?,
                )))
            }
            TAG_UTC_TIME => Ok(Asn1::UtcTime(Asn1String::from(reader.read_bytes(length)?))),
            TAG_GENERALIZED_TIME => Ok(Asn1::GeneralizedTime(Asn1String::from(
                reader.read_bytes(length)?,
            ))),
            _ => Err(Error::UnsupportedTag {
                offset: tag_offset,
                tag: number,
            }),
        }
    }

    fn decode_children(length: Length, reader: &mut Reader) -> Result<Vec<Asn1>, Error> {
        let mut children = Vec::new();
        match length {
            Length::Definite(length) => {
                let end = reader.offset() + length;
                while reader.offset() < end {
                    children.push(Asn1::decode_node(reader)?);
                }
            }
            Length::Indefinite => {
                while reader.peek_bytes(2)? != &END_MARKER {
                    children.push(Asn1::decode_node(reader)?);
                }
                reader.read_bytes(2)?;
            }
        }
        Ok(children)
    }

    /// Encodes this value as canonical DER.
    ///
    /// Total: any constructible value encodes, invalid shapes are
    /// rejected at construction time instead.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.encode_into(&mut out);
        out
    }

    fn encode_into(&self, out: &mut Vec<u8>) {
        match self {
            Asn1::Boolean(b) => {
                out.push(TAG_BOOLEAN);
                write_length(1, out);
                out.push(if *b { 0xff } else { 0x00 });
            }
            Asn1::Integer(integer) => {
                let content = integer.to_signed_bytes();
                encode_primitive(TAG_INTEGER, &content, out);
            }
            Asn1::BitString(bits) => {
                out.push(TAG_BIT_STRING);
                write_length(bits.bits().len() + 1, out);
                out.push(bits.unused_bits());
                out.extend_from_slice(bits.bits());
            }
            Asn1::OctetString(octets) => encode_primitive(TAG_OCTET_STRING, octets.as_bytes(), out),
            Asn1::Null => {
                out.push(TAG_NULL);
                write_length(0, out);
            }
            Asn1::ObjectIdentifier(oid) => {
                encode_primitive(TAG_OBJECT_IDENTIFIER, oid.as_bytes(), out)
            }
            Asn1::Utf8String(s) => encode_primitive(TAG_UTF8_STRING, s.as_bytes(), out),
            Asn1::PrintableString(s) => encode_primitive(TAG_PRINTABLE_STRING, s.as_bytes(), out),
            Asn1::T61String(s) => encode_primitive(TAG_T61_STRING, s.as_bytes(), out),
            Asn1::IA5String(s) => encode_primitive(TAG_IA5_STRING, s.as_bytes(), out),
            Asn1::BmpString(s) => encode_primitive(TAG_BMP_STRING, s.as_bytes(), out),
            Asn1::UtcTime(s) => encode_primitive(TAG_UTC_TIME, s.as_bytes(), out),
            Asn1::GeneralizedTime(s) => encode_primitive(TAG_GENERALIZED_TIME, s.as_bytes(), out),
            Asn1::Sequence(seq) => {
                out.push(TAG_SEQUENCE | TAG_CONSTRUCTED);
                write_length(self.content_len(), out);
                for child in seq.elements() {
                    child.encode_into(out);
                }
            }
            Asn1::Set(set) => {
                out.push(TAG_SET | TAG_CONSTRUCTED);
                write_length(self.content_len(), out);
                for child in set.elements() {
                    child.encode_into(out);
                }
            }
            Asn1::ContextTagged(ctx) => {
                out.push(TAG_CONTEXT | TAG_CONSTRUCTED | ctx.tag());
                write_length(ctx.value().total_len(), out);
                ctx.value().encode_into(out);
            }
        }
    }

    fn content_len(&self) -> usize {
        match self {
            Asn1::Boolean(_) => 1,
            Asn1::Integer(integer) => integer.to_signed_bytes().len(),
            Asn1::BitString(bits) => bits.bits().len() + 1,
            Asn1::OctetString(octets) => octets.as_bytes().len(),
            Asn1::Null => 0,
            Asn1::ObjectIdentifier(oid) => oid.as_bytes().len(),
            Asn1::Utf8String(s)
            | Asn1::PrintableString(s)
            | Asn1::T61String(s)
            | Asn1::IA5String(s)
            | Asn1::BmpString(s)
            | Asn1::UtcTime(s)
            | Asn1::GeneralizedTime(s) => s.as_bytes().len(),
            Asn1::Sequence(seq) => seq.elements().iter().map(Asn1::total_len).sum(),
            Asn1::Set(set) => set.elements().iter().map(Asn1::total_len).sum(),
            Asn1::ContextTagged(ctx) => ctx.value().total_len(),
        }
    }

    fn total_len(&self) -> usize {
        let content = self.content_len();
        1 + length_field_len(content) + content
    }

    /// Renders an indented, human-readable dump of the value tree.
    /// Diagnostic only; the output is not meant to round-trip.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        self.dump_node(&mut out, 0);
        out
    }

    fn dump_node(&self, out: &mut String, level: usize) {
        for _ in 0..level {
            out.push_str("  ");
        }
        match self {
            Asn1::Boolean(b) => out.push_str(&format!("Boolean: {}\n", b)),
            Asn1::Integer(integer) => out.push_str(&format!("Integer: {}\n", integer)),
            Asn1::BitString(bits) => {
                out.push_str(&format!("Bit String ({}):", bits.bit_len()));
                if !bits.bits().is_empty() {
                    out.push(' ');
                    out.push_str(&binary_string(bits.bits(), bits.unused_bits()));
                }
                out.push('\n');
            }
            Asn1::OctetString(octets) => {
                out.push_str(&format!("Octet String ({}):", octets.as_bytes().len()));
                if !octets.as_bytes().is_empty() {
                    out.push(' ');
                    out.push_str(&hex_string(octets.as_bytes()));
                }
                out.push('\n');
            }
            Asn1::Null => out.push_str("Null\n"),
            Asn1::ObjectIdentifier(oid) => {
                out.push_str(&format!("Object Identifier: {}\n", oid))
            }
            Asn1::Utf8String(s) => {
                out.push_str(&format!("UTF8String: {}\n", String::from_utf8_lossy(s.as_bytes())))
            }
            Asn1::PrintableString(s) => {
                out.push_str(&format!("PrintableString: {}\n", ascii_text(s.as_bytes())))
            }
            Asn1::T61String(s) => {
                out.push_str(&format!("T61String: {}\n", latin1_text(s.as_bytes())))
            }
            Asn1::IA5String(s) => {
                out.push_str(&format!("IA5String: {}\n", ascii_text(s.as_bytes())))
            }
            Asn1::BmpString(s) => {
                out.push_str(&format!("BMPString: {}\n", utf16_text(s.as_bytes())))
            }
            Asn1::UtcTime(s) => out.push_str(&format!("UTC Time: {}\n", ascii_text(s.as_bytes()))),
            Asn1::GeneralizedTime(s) => {
                out.push_str(&format!("Generalized Time: {}\n", ascii_text(s.as_bytes())))
            }
            Asn1::Sequence(seq) => {
                out.push_str(&format!("Sequence ({}):\n", seq.len()));
                for child in seq.elements() {
                    child.dump_node(out, level + 1);
                }
            }
            Asn1::Set(set) => {
                out.push_str(&format!("Set ({}):\n", set.len()));
                for child in set.elements() {
                    child.dump_node(out, level + 1);
                }
            }
            Asn1::ContextTagged(ctx) => {
                out.push_str(&format!("[{}] =\n", ctx.tag()));
                ctx.value().dump_node(out, level + 1);
            }
        }
    }
}

impl Display for Asn1 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.dump().trim_end_matches('\n'))
    }
}

fn encode_primitive(tag: u8, content: &[u8], out: &mut Vec<u8>) {
    out.push(tag);
    write_length(content.len(), out);
    out.extend_from_slice(content);
}

fn require_definite(length: Length, offset: usize) -> Result<usize, Error> {
    match length {
        Length::Definite(length) => Ok(length),
        Length::Indefinite => Err(der::Error::IndefiniteLength { offset }.into()),
    }
}

// ASN1 integer can be an arbitrary sized positive or negative value.
// The wire form is the minimal two's complement byte sequence, which
// BigInt produces and consumes directly.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Integer {
    inner: BigInt,
}

impl Integer {
    /// Builds an Integer from its two's complement big-endian content
    /// bytes. Empty content is malformed.
    pub fn from_signed_bytes(data: &[u8]) -> Result<Self, Error> {
        if data.is_empty() {
            return Err(Error::WrongData { offset: 0 });
        }
        Ok(Integer {
            inner: BigInt::from_signed_bytes_be(data),
        })
    }

    /// The minimal two's complement big-endian content bytes.
    pub fn to_signed_bytes(&self) -> Vec<u8> {
        self.inner.to_signed_bytes_be()
    }

    pub fn as_bigint(&self) -> &BigInt {
        &self.inner
    }

    pub fn to_i32(&self) -> Option<i32> {
        self.inner.to_i32()
    }

    pub fn to_u32(&self) -> Option<u32> {
        self.inner.to_u32()
    }

    pub fn to_i64(&self) -> Option<i64> {
        self.inner.to_i64()
    }

    pub fn to_u64(&self) -> Option<u64> {
        self.inner.to_u64()
    }
}

impl From<BigInt> for Integer {
    fn from(value: BigInt) -> Self {
        Integer { inner: value }
    }
}

impl From<i64> for Integer {
    fn from(value: i64) -> Self {
        Integer {
            inner: BigInt::from(value),
        }
    }
}

impl Display for Integer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl Serialize for Integer {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.inner.to_string())
    }
}

impl<'de> Deserialize<'de> for Integer {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let inner = s.parse::<BigInt>().map_err(serde::de::Error::custom)?;
        Ok(Integer { inner })
    }
}

/// A bit sequence: content bytes plus the count of unused trailing bits
/// in the last byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitString {
    bits: Vec<u8>,
    unused: u8,
}

impl BitString {
    /// Builds a BitString. `unused` must be 0-7 and must be 0 when
    /// `bits` is empty; the trailing `unused` bits of the last byte are
    /// forced to zero.
    pub fn new(mut bits: Vec<u8>, unused: u8) -> Result<Self, Error> {
        if unused > 7 {
            return Err(Error::WrongData { offset: 0 });
        }
        if bits.is_empty() && unused != 0 {
            return Err(Error::WrongData { offset: 0 });
        }
        if let Some(last) = bits.last_mut() {
            *last &= 0xff << unused;
        }
        Ok(BitString { bits, unused })
    }

    pub fn bits(&self) -> &[u8] {
        &self.bits
    }

    pub fn unused_bits(&self) -> u8 {
        self.unused
    }

    /// Number of bits, excluding the unused trailing bits.
    pub fn bit_len(&self) -> usize {
        if self.bits.is_empty() {
            0
        } else {
            self.bits.len() * 8 - self.unused as usize
        }
    }
}

impl AsRef<[u8]> for BitString {
    fn as_ref(&self) -> &[u8] {
        &self.bits
    }
}

impl Display for BitString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut result = String::new();
        for (i, byte) in self.bits.iter().enumerate() {
            if i == self.bits.len() - 1 && self.unused > 0 {
                let valid = byte >> self.unused;
                let width = 8 - self.unused as usize;
                result.push_str(&format!("{:0width$b}", valid, width = width));
            } else {
                result.push_str(&format!("{:08b}", byte));
            }
        }
        write!(f, "{}", result)
    }
}

impl Serialize for BitString {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if serializer.is_human_readable() {
            use serde::ser::SerializeStruct;
            let mut state = serializer.serialize_struct("BitString", 2)?;
            state.serialize_field("bit_length", &self.bit_len())?;
            let hex = self
                .bits
                .iter()
                .map(|b| format!("{:02x}", b))
                .collect::<Vec<_>>()
                .join(":");
            state.serialize_field("bits", &hex)?;
            state.end()
        } else {
            (self.unused, &self.bits).serialize(serializer)
        }
    }
}

impl<'de> Deserialize<'de> for BitString {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        if deserializer.is_human_readable() {
            let _ = String::deserialize(deserializer)?;
            Err(serde::de::Error::custom(
                "BitString deserialization from bit string not supported",
            ))
        } else {
            let (unused, bits) = <(u8, Vec<u8>)>::deserialize(deserializer)?;
            BitString::new(bits, unused).map_err(serde::de::Error::custom)
        }
    }
}

/// A raw byte sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OctetString {
    inner: Vec<u8>,
}

impl OctetString {
    pub fn as_bytes(&self) -> &[u8] {
        &self.inner
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.inner
    }
}

impl AsRef<[u8]> for OctetString {
    fn as_ref(&self) -> &[u8] {
        &self.inner
    }
}

impl From<Vec<u8>> for OctetString {
    fn from(value: Vec<u8>) -> Self {
        OctetString { inner: value }
    }
}

impl From<&[u8]> for OctetString {
    fn from(value: &[u8]) -> Self {
        OctetString {
            inner: value.to_vec(),
        }
    }
}

impl Display for OctetString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = self
            .inner
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect::<String>();
        write!(f, "{}", s)
    }
}

impl Serialize for OctetString {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if serializer.is_human_readable() {
            let hex = self
                .inner
                .iter()
                .map(|b| format!("{:02x}", b))
                .collect::<String>();
            serializer.serialize_str(&hex)
        } else {
            self.inner.serialize(serializer)
        }
    }
}

impl<'de> Deserialize<'de> for OctetString {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        if deserializer.is_human_readable() {
            let hex = String::deserialize(deserializer)?;
            let cleaned = hex.replace(|c: char| c.is_whitespace() || c == ':' || c == '-', "");
            if cleaned.len() % 2 != 0 {
                return Err(serde::de::Error::custom("hex string must have even length"));
            }
            let mut inner = Vec::with_capacity(cleaned.len() / 2);
            for i in (0..cleaned.len()).step_by(2) {
                let byte = u8::from_str_radix(&cleaned[i..i + 2], 16)
                    .map_err(|e| serde::de::Error::custom(format!("invalid hex string: {}", e)))?;
                inner.push(byte);
            }
            Ok(OctetString { inner })
        } else {
            let inner = Vec::<u8>::deserialize(deserializer)?;
            Ok(OctetString { inner })
        }
    }
}

/// The charset-restricted byte payload shared by the string and time
/// variants. Charset substitution happens in the `Asn1` text
/// constructors; the decoder stores wire bytes as given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asn1String {
    inner: Vec<u8>,
}

impl Asn1String {
    pub fn as_bytes(&self) -> &[u8] {
        &self.inner
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.inner
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl AsRef<[u8]> for Asn1String {
    fn as_ref(&self) -> &[u8] {
        &self.inner
    }
}

impl From<Vec<u8>> for Asn1String {
    fn from(value: Vec<u8>) -> Self {
        Asn1String { inner: value }
    }
}

impl From<&[u8]> for Asn1String {
    fn from(value: &[u8]) -> Self {
        Asn1String {
            inner: value.to_vec(),
        }
    }
}

/// An object identifier: the dotted-decimal form and its base-128
/// content bytes, each derived from whichever one the value was built
/// from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectIdentifier {
    oid: String,
    der: Vec<u8>,
}

impl ObjectIdentifier {
    /// Builds an identifier from a dotted-decimal string.
    ///
    /// Returns `None` when the string is not encodable: fewer than two
    /// arcs, a non-numeric or negative arc, a first arc above 2, or a
    /// second arc of 40 or more under first arc 0 or 1. There is no
    /// upper bound on arc values; arcs are arbitrary-precision.
    pub fn new(oid: &str) -> Option<Self> {
        let der = oid_to_bytes(oid)?;
        Some(ObjectIdentifier {
            oid: oid.to_string(),
            der,
        })
    }

    /// Builds an identifier from base-128 content bytes, deriving the
    /// dotted form. Total: empty content derives the empty string and
    /// the first-byte split is taken at face value.
    pub fn from_bytes(der: Vec<u8>) -> Self {
        let oid = bytes_to_oid(&der);
        ObjectIdentifier { oid, der }
    }

    pub fn as_str(&self) -> &str {
        &self.oid
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.der
    }

    /// A child identifier with `arc` appended as an additional dotted
    /// component. `None` when the parent's dotted form is not
    /// encodable (possible for byte-built identifiers).
    pub fn branch(&self, arc: u64) -> Option<Self> {
        ObjectIdentifier::new(&format!("{}.{}", self.oid, arc))
    }
}

impl Display for ObjectIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.oid)
    }
}

impl Serialize for ObjectIdentifier {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.oid)
    }
}

impl<'de> Deserialize<'de> for ObjectIdentifier {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ObjectIdentifier::new(&s).ok_or_else(|| {
            serde::de::Error::custom(format!("invalid object identifier '{}'", s))
        })
    }
}

/// An ordered collection; insertion order is significant.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Sequence {
    elements: Vec<Asn1>,
}

impl Sequence {
    pub fn new() -> Self {
        Sequence {
            elements: Vec::new(),
        }
    }

    pub fn elements(&self) -> &[Asn1] {
        &self.elements
    }

    pub fn append(&mut self, value: Asn1) {
        self.elements.push(value);
    }

    /// Removes and returns the element at `index`.
    ///
    /// Panics if `index` is out of bounds, like `Vec::remove`.
    pub fn remove_at(&mut self, index: usize) -> Asn1 {
        self.elements.remove(index)
    }

    pub fn get(&self, index: usize) -> Option<&Asn1> {
        self.elements.get(index)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl From<Vec<Asn1>> for Sequence {
    fn from(elements: Vec<Asn1>) -> Self {
        Sequence { elements }
    }
}

/// An unordered collection kept sorted ascending by member tag number;
/// the sort is restored after every mutation, so insertion order never
/// shows in the canonical encoding. Ties keep insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Set {
    elements: Vec<Asn1>,
}

impl Set {
    pub fn new() -> Self {
        Set {
            elements: Vec::new(),
        }
    }

    pub fn elements(&self) -> &[Asn1] {
        &self.elements
    }

    pub fn append(&mut self, value: Asn1) {
        self.elements.push(value);
        self.elements.sort_by_key(Asn1::tag);
    }

    /// Removes and returns the element at `index` in sorted order.
    ///
    /// Panics if `index` is out of bounds, like `Vec::remove`.
    pub fn remove_at(&mut self, index: usize) -> Asn1 {
        self.elements.remove(index)
    }

    pub fn get(&self, index: usize) -> Option<&Asn1> {
        self.elements.get(index)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl From<Vec<Asn1>> for Set {
    fn from(elements: Vec<Asn1>) -> Self {
        let mut set = Set { elements };
        set.elements.sort_by_key(Asn1::tag);
        set
    }
}

/// A context-specific tag wrapping exactly one value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ctx {
    tag: u8,
    value: Box<Asn1>,
}

impl Ctx {
    /// Wraps `value` under context tag `tag`. Tags above 30 would need
    /// the multi-byte tag form and are rejected.
    pub fn new(tag: u8, value: Asn1) -> Result<Self, Error> {
        if tag > 30 {
            return Err(Error::WrongData { offset: 0 });
        }
        Ok(Ctx {
            tag,
            value: Box::new(value),
        })
    }

    pub fn tag(&self) -> u8 {
        self.tag
    }

    pub fn value(&self) -> &Asn1 {
        &self.value
    }

    pub fn into_value(self) -> Asn1 {
        *self.value
    }
}

/// Encodes a dotted-decimal identifier string as base-128 content
/// bytes, or `None` when the string is outside the encodable space.
fn oid_to_bytes(oid: &str) -> Option<Vec<u8>> {
    let components = oid
        .split('.')
        .map(|c| c.parse::<BigUint>().ok())
        .collect::<Option<Vec<_>>>()?;
    if components.len() < 2 {
        return None;
    }
    let first = components[0].to_u8().filter(|first| *first <= 2)?;
    if first < 2 && components[1] >= BigUint::from(40u8) {
        return None;
    }
    let mut bytes = Vec::new();
    push_base128(components[1].clone() + u32::from(first) * 40, &mut bytes);
    for arc in &components[2..] {
        push_base128(arc.clone(), &mut bytes);
    }
    Some(bytes)
}

/// Decodes base-128 content bytes to the dotted-decimal form. The
/// first byte splits as `b/40 . b%40`, which is ambiguous for large
/// second arcs under first arc 2; that loss is inherent to the
/// 40-multiplier scheme and accepted. A trailing component left open
/// by a set continuation bit is dropped.
fn bytes_to_oid(bytes: &[u8]) -> String {
    let Some((&first, rest)) = bytes.split_first() else {
        return String::new();
    };
    let mut oid = format!("{}.{}", first / 40, first % 40);
    let mut arc = BigUint::zero();
    for &b in rest {
        arc = (arc << 7) | BigUint::from(b & 0x7f);
        if b & 0x80 == 0 {
            oid.push('.');
            oid.push_str(&arc.to_string());
            arc = BigUint::zero();
        }
    }
    oid
}

/// Appends `value` in base-128 big-endian form with the continuation
/// bit set on all bytes but the last.
fn push_base128(value: BigUint, out: &mut Vec<u8>) {
    let digits = value.to_radix_le(128);
    for &digit in digits[1..].iter().rev() {
        out.push(digit | 0x80);
    }
    out.push(digits[0]);
}

fn ascii_bytes(s: &str) -> Vec<u8> {
    s.encode_utf16()
        .map(|x| if x < 0x80 { x as u8 } else { SUBSTITUTE })
        .collect()
}

fn iso8859_bytes(s: &str) -> Vec<u8> {
    s.encode_utf16()
        .map(|x| if x < 0x100 { x as u8 } else { SUBSTITUTE })
        .collect()
}

fn utf8_bytes(s: &str) -> Vec<u8> {
    let mut bytes = Vec::new();
    for x in s.encode_utf16() {
        if x < 0x80 {
            bytes.push(x as u8);
        } else if x < 0x800 {
            bytes.push(0xc0 | (x >> 6) as u8);
            bytes.push(0x80 | (x & 0x3f) as u8);
        } else {
            bytes.push(SUBSTITUTE);
        }
    }
    bytes
}

fn utf16_bytes(s: &str) -> Vec<u8> {
    let mut bytes = Vec::new();
    for x in s.encode_utf16() {
        bytes.push((x >> 8) as u8);
        bytes.push(x as u8);
    }
    bytes
}

/// Parses UTCTime content bytes (`YYMMDDHHMMSSZ`) into a datetime.
pub fn parse_utc_time(data: &[u8]) -> Option<NaiveDateTime> {
    let s = std::str::from_utf8(data).ok()?;
    NaiveDateTime::parse_from_str(s, UTC_TIME_FORMAT).ok()
}

/// Parses GeneralizedTime content bytes (`YYYYMMDDHHMMSSZ`) into a
/// datetime.
pub fn parse_generalized_time(data: &[u8]) -> Option<NaiveDateTime> {
    let s = std::str::from_utf8(data).ok()?;
    NaiveDateTime::parse_from_str(s, GENERALIZED_TIME_FORMAT).ok()
}

fn ascii_text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

fn latin1_text(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

fn utf16_text(bytes: &[u8]) -> String {
    let units = bytes
        .chunks_exact(2)
        .map(|pair| (pair[0] as u16) << 8 | pair[1] as u16)
        .collect::<Vec<_>>();
    String::from_utf16_lossy(&units)
}

fn hex_string(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join(" ")
}

fn binary_string(bits: &[u8], unused: u8) -> String {
    let mut groups = Vec::with_capacity(bits.len());
    for (i, byte) in bits.iter().enumerate() {
        if i == bits.len() - 1 && unused > 0 {
            let valid = byte >> unused;
            let width = 8 - unused as usize;
            groups.push(format!("{:0width$b}", valid, width = width));
        } else {
            groups.push(format!("{:08b}", byte));
        }
    }
    groups.join(" ")
}

impl DecodableFrom<[u8]> for Asn1 {}

impl Decoder<[u8], Asn1> for [u8] {
    type Error = Error;

    fn decode(&self) -> Result<Asn1, Self::Error> {
        Asn1::decode(self)
    }
}

impl DecodableFrom<Vec<u8>> for Asn1 {}

impl Decoder<Vec<u8>, Asn1> for Vec<u8> {
    type Error = Error;

    fn decode(&self) -> Result<Asn1, Self::Error> {
        Asn1::decode(self)
    }
}

impl EncodableTo<Asn1> for Vec<u8> {}

impl Encoder<Asn1, Vec<u8>> for Asn1 {
    type Error = Error;

    fn encode(&self) -> Result<Vec<u8>, Self::Error> {
        Ok(Asn1::encode(self))
    }
}
