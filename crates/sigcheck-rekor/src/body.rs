//! Entry body types by kind and API version

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use sigcheck_types::{
    decode_base64, DerCertificate, DerPublicKey, DigestBytes, HashAlgorithm, SignatureBytes,
};

/// A parsed entry body
#[derive(Debug, Clone, PartialEq)]
pub enum RekorEntryBody {
    HashedRekordV001(HashedRekordV001Body),
    HashedRekordV002(HashedRekordV002Body),
    DsseV001(DsseV001Body),
    DsseV002(DsseV002Body),
    IntotoV002(IntotoV002Body),
}

impl RekorEntryBody {
    /// Parse canonicalized body bytes according to the entry's kind and version
    pub fn parse(body: &[u8], kind: &str, version: &str) -> Result<Self> {
        Ok(match (kind, version) {
            ("hashedrekord", "0.0.1") => Self::HashedRekordV001(serde_json::from_slice(body)?),
            ("hashedrekord", "0.0.2") => Self::HashedRekordV002(serde_json::from_slice(body)?),
            ("dsse", "0.0.1") => Self::DsseV001(serde_json::from_slice(body)?),
            ("dsse", "0.0.2") => Self::DsseV002(serde_json::from_slice(body)?),
            ("intoto", "0.0.2") => Self::IntotoV002(serde_json::from_slice(body)?),
            _ => {
                return Err(Error::UnsupportedKind {
                    kind: kind.to_string(),
                    version: version.to_string(),
                })
            }
        })
    }
}

/// Lower-case hex digest with its algorithm name, as in v0.0.1 bodies
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HexDigest {
    pub algorithm: String,
    pub value: String,
}

impl HexDigest {
    /// The algorithm, if it is one we know
    pub fn hash_algorithm(&self) -> Option<HashAlgorithm> {
        self.algorithm.parse().ok()
    }

    /// Decoded digest bytes
    pub fn bytes(&self) -> Result<Vec<u8>> {
        hex::decode(&self.value)
            .map_err(|e| Error::Encoding(sigcheck_types::Error::Hex(e)))
    }
}

/// Base64 of a PEM document, as embedded in v0.0.1 bodies
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Base64Pem(pub String);

impl Base64Pem {
    /// DER bytes of the first PEM block
    pub fn to_der(&self) -> Result<Vec<u8>> {
        let pem = decode_base64(&self.0)?;
        Ok(sigcheck_crypto::der_from_pem(&pem)?)
    }
}

// hashedrekord v0.0.1

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HashedRekordV001Body {
    pub api_version: String,
    pub kind: String,
    pub spec: HashedRekordV001Spec,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashedRekordV001Spec {
    pub data: HashedRekordData,
    pub signature: HashedRekordSignature,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashedRekordData {
    pub hash: HexDigest,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HashedRekordSignature {
    pub content: SignatureBytes,
    pub public_key: PemContent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PemContent {
    pub content: Base64Pem,
}

// hashedrekord v0.0.2

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HashedRekordV002Body {
    pub api_version: String,
    pub kind: String,
    pub spec: HashedRekordV002Spec,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HashedRekordV002Spec {
    pub hashed_rekord_v002: HashedRekordV002,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashedRekordV002 {
    pub data: TypedDigest,
    pub signature: V002Signature,
}

/// Digest with a protobuf algorithm name, as in v0.0.2 bodies
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypedDigest {
    pub algorithm: HashAlgorithm,
    pub digest: DigestBytes,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct V002Signature {
    pub content: SignatureBytes,
    pub verifier: V002Verifier,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct V002Verifier {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x509_certificate: Option<RawCertificate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key: Option<RawPublicKey>,
    #[serde(default)]
    pub key_details: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCertificate {
    pub raw_bytes: DerCertificate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPublicKey {
    pub raw_bytes: DerPublicKey,
}

// dsse v0.0.1

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DsseV001Body {
    pub api_version: String,
    pub kind: String,
    pub spec: DsseV001Spec,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DsseV001Spec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub envelope_hash: Option<HexDigest>,
    pub payload_hash: HexDigest,
    pub signatures: Vec<DsseV001Signature>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DsseV001Signature {
    pub signature: SignatureBytes,
    pub verifier: Base64Pem,
}

// dsse v0.0.2

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DsseV002Body {
    pub api_version: String,
    pub kind: String,
    pub spec: DsseV002Spec,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DsseV002Spec {
    pub dsse_v002: DsseV002,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DsseV002 {
    pub payload_hash: TypedDigest,
    pub signatures: Vec<V002Signature>,
}

// intoto v0.0.2

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntotoV002Body {
    pub api_version: String,
    pub kind: String,
    pub spec: IntotoV002Spec,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntotoV002Spec {
    pub content: IntotoV002Content,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntotoV002Content {
    pub envelope: IntotoEnvelope,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<HexDigest>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload_hash: Option<HexDigest>,
}

/// The envelope as recorded by intoto entries: payload and signatures are
/// base64 of the base64 text found in the DSSE envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntotoEnvelope {
    #[serde(default)]
    pub payload: String,
    pub payload_type: String,
    pub signatures: Vec<IntotoSignature>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntotoSignature {
    pub sig: String,
    #[serde(default)]
    pub public_key: Option<Base64Pem>,
}

impl IntotoEnvelope {
    /// The DSSE payload bytes
    pub fn payload_bytes(&self) -> Result<Vec<u8>> {
        double_decode(&self.payload)
    }
}

impl IntotoSignature {
    /// The DSSE signature bytes
    pub fn signature_bytes(&self) -> Result<Vec<u8>> {
        double_decode(&self.sig)
    }
}

fn double_decode(value: &str) -> Result<Vec<u8>> {
    let once = decode_base64(value)?;
    let text = String::from_utf8(once)
        .map_err(|_| sigcheck_types::Error::MissingField("base64 text".to_string()))?;
    Ok(decode_base64(&text)?)
}
