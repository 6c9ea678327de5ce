//! Byte newtypes with their JSON encodings
//!
//! Bundle JSON is the protobuf JSON mapping of the Sigstore bundle, so byte
//! fields arrive base64-encoded and 64-bit integers arrive as strings. The
//! types here keep the decoded bytes and remember what they mean.

use crate::error::{Error, Result};
use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD, URL_SAFE, URL_SAFE_NO_PAD};
use base64::Engine;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Decode base64 the way protobuf JSON parsers do: standard or URL-safe
/// alphabet, with or without padding.
pub fn decode_base64(input: &str) -> Result<Vec<u8>> {
    let input = input.trim();
    STANDARD
        .decode(input)
        .or_else(|_| STANDARD_NO_PAD.decode(input))
        .or_else(|_| URL_SAFE.decode(input))
        .or_else(|_| URL_SAFE_NO_PAD.decode(input))
        .map_err(Error::Base64)
}

/// Encode bytes with the standard base64 alphabet
pub fn encode_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// `#[serde(with = "base64_bytes")]` for plain `Vec<u8>` fields
pub mod base64_bytes {
    use super::*;

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&encode_base64(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        decode_base64(&s).map_err(serde::de::Error::custom)
    }
}

/// `#[serde(with = "string_i64")]` for protobuf int64 fields.
///
/// Accepts both the canonical string form and a bare JSON number.
pub mod string_i64 {
    use super::*;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrNumber {
        String(String),
        Number(i64),
    }

    pub fn serialize<S: Serializer>(value: &i64, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<i64, D::Error> {
        match StringOrNumber::deserialize(deserializer)? {
            StringOrNumber::String(s) => s.parse().map_err(serde::de::Error::custom),
            StringOrNumber::Number(n) => Ok(n),
        }
    }
}

macro_rules! base64_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, Hash, Default)]
        pub struct $name(Vec<u8>);

        impl $name {
            /// Wrap raw bytes
            pub fn new(bytes: Vec<u8>) -> Self {
                Self(bytes)
            }

            /// Copy from a byte slice
            pub fn from_bytes(bytes: &[u8]) -> Self {
                Self(bytes.to_vec())
            }

            /// Decode from a base64 string
            pub fn from_base64(s: &str) -> Result<Self> {
                decode_base64(s).map(Self)
            }

            /// Borrow the raw bytes
            pub fn as_bytes(&self) -> &[u8] {
                &self.0
            }

            /// Take the raw bytes
            pub fn into_bytes(self) -> Vec<u8> {
                self.0
            }

            /// Encode as standard base64
            pub fn to_base64(&self) -> String {
                encode_base64(&self.0)
            }

            /// Whether there are no bytes
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }

        impl From<Vec<u8>> for $name {
            fn from(bytes: Vec<u8>) -> Self {
                Self(bytes)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.to_base64())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.to_base64())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                Self::from_base64(&s).map_err(serde::de::Error::custom)
            }
        }
    };
}

base64_newtype!(
    /// DER-encoded X.509 certificate
    DerCertificate
);
base64_newtype!(
    /// DER-encoded SubjectPublicKeyInfo
    DerPublicKey
);
base64_newtype!(
    /// Raw signature bytes (DER for ECDSA, 64 bytes for Ed25519)
    SignatureBytes
);
base64_newtype!(
    /// Canonicalized transparency log entry body
    CanonicalizedBody
);
base64_newtype!(
    /// DSSE payload bytes
    PayloadBytes
);
base64_newtype!(
    /// RFC 3161 timestamp response or token
    SignedTimestamp
);
base64_newtype!(
    /// Transparency or CT log key identifier
    LogKeyId
);
base64_newtype!(
    /// Digest bytes carried alongside their algorithm
    DigestBytes
);

impl LogKeyId {
    /// Hex form of the key ID, as used in SET payloads
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    /// The 4-byte key hint used by signed notes, if the ID is long enough
    pub fn key_hint(&self) -> Option<[u8; 4]> {
        self.0.get(..4).and_then(|s| s.try_into().ok())
    }
}

/// A SHA-256 hash value
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Sha256Hash([u8; 32]);

impl Sha256Hash {
    /// Wrap an array
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Copy from a slice, checking the length
    pub fn try_from_slice(bytes: &[u8]) -> Result<Self> {
        let arr: [u8; 32] = bytes.try_into().map_err(|_| Error::InvalidLength {
            expected: 32,
            actual: bytes.len(),
        })?;
        Ok(Self(arr))
    }

    /// Parse from hex
    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes = hex::decode(s)?;
        Self::try_from_slice(&bytes)
    }

    /// Borrow the hash bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Lower-case hex encoding
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl AsRef<[u8]> for Sha256Hash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Sha256Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sha256Hash({})", self.to_hex())
    }
}

impl fmt::Display for Sha256Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}
