//! A throwaway Sigstore deployment for end-to-end tests
//!
//! Each [`Scenario`] mints a fresh root and intermediate CA, a Fulcio-style
//! leaf carrying an embedded SCT, and a transparency log that holds the
//! signature in a small Merkle tree. Scenarios with a `tsa_time` also get a
//! timestamp authority and an RFC 3161 response over the bundle signature.
//! [`Fixture`] exposes the resulting trusted root and bundle as JSON so tests
//! can tamper with either.

#![allow(dead_code)]

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use cms::cert::{CertificateChoices, IssuerAndSerialNumber};
use cms::content_info::{CmsVersion, ContentInfo};
use cms::signed_data::{
    CertificateSet, EncapsulatedContentInfo, SignedAttributes, SignedData, SignerIdentifier,
    SignerInfo, SignerInfos,
};
use const_oid::db::rfc5912::{ECDSA_WITH_SHA_256, ID_SHA_256};
use const_oid::ObjectIdentifier;
use der::asn1::{GeneralizedTime, Int, OctetString, SetOfVec};
use der::{Any, Decode, Encode};
use p256::ecdsa::signature::hazmat::PrehashSigner;
use p256::ecdsa::signature::Signer;
use p256::ecdsa::{Signature, SigningKey};
use p256::pkcs8::{DecodePrivateKey, EncodePublicKey};
use rcgen::{
    BasicConstraints, Certificate, CertificateParams, CustomExtension, DnType,
    ExtendedKeyUsagePurpose, IsCa, KeyPair, KeyUsagePurpose, SanType, SerialNumber,
};
use serde_json::{json, Value};
use sha2::{Digest, Sha256};
use sigcheck_verify::merkle::{hash_children, hash_leaf};
use sigcheck_verify::policy::{CertificateIdentityPolicy, FulcioExtension, StringMatcher};
use sigcheck_verify::trust_root::TrustedRootMaterial;
use sigcheck_verify::types::{HashAlgorithm, Sha256Hash};
use sigcheck_verify::{bundle::SignedBundle, ArtifactPolicy, Policy};
use std::path::{Path, PathBuf};
use std::time::Duration;
use x509_cert::attr::Attribute;
use x509_cert::spki::AlgorithmIdentifierOwned;
use x509_tsp::{MessageImprint, TspVersion, TstInfo};

/// Leaf notBefore, 2024-06-01T00:00:00Z
pub const LEAF_NOT_BEFORE: i64 = 1_717_200_000;
/// Leaf notAfter, 2024-06-02T00:00:00Z
pub const LEAF_NOT_AFTER: i64 = 1_717_286_400;
/// Default SCT time, one minute into the leaf's life
pub const SCT_TIME: i64 = LEAF_NOT_BEFORE + 60;
/// Default integrated time, noon on the leaf's day
pub const INTEGRATED_TIME: i64 = LEAF_NOT_BEFORE + 12 * 3600;
/// A wall clock inside the leaf's validity
pub const NOW: i64 = INTEGRATED_TIME + 300;
/// 2025-01-01T00:00:00Z, long after the leaf expired
pub const NEXT_YEAR: i64 = 1_735_689_600;

pub const SAN: &str =
    "https://github.com/org/repo/.github/workflows/release.yml@refs/tags/v1.0.0";
pub const OIDC_ISSUER: &str = "https://token.actions.githubusercontent.com";
pub const REPOSITORY: &str = "https://github.com/org/repo";
pub const CHECKPOINT_ORIGIN: &str = "rekor.test - 2605736670972794746";

const SCT_EXTENSION_OID: &[u64] = &[1, 3, 6, 1, 4, 1, 11129, 2, 4, 2];
const ID_CONTENT_TYPE: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.9.3");
const ID_MESSAGE_DIGEST: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.9.4");
const ID_SIGNED_DATA: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.7.2");
const ID_CT_TST_INFO: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.9.16.1.4");
const TSA_POLICY: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.6.1.4.1.57264.2");
const TREE_SIZE: usize = 5;
const LEAF_INDEX: usize = 2;

/// What the fixture should look like
#[derive(Debug, Clone)]
pub struct Scenario {
    pub artifact: Vec<u8>,
    pub runner_environment: String,
    pub sct_time: i64,
    pub integrated_time: i64,
    /// End of the CA's validFor window, RFC 3339
    pub ca_valid_until: Option<String>,
    pub include_proof: bool,
    pub include_promise: bool,
    /// Sign some other digest while bundle and log name the artifact's
    pub mismatched_signature: bool,
    /// Wrap an in-toto statement in a DSSE envelope instead of signing the digest
    pub dsse: bool,
    /// Generation time of an RFC 3161 timestamp; `None` leaves the bundle without one
    pub tsa_time: Option<i64>,
    /// End of the TSA's validFor window, RFC 3339
    pub tsa_valid_until: Option<String>,
    /// Timestamp some other bytes instead of the bundle signature
    pub tsa_imprint_mismatch: bool,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            artifact: Vec::new(),
            runner_environment: "github-hosted".into(),
            sct_time: SCT_TIME,
            integrated_time: INTEGRATED_TIME,
            ca_valid_until: None,
            include_proof: true,
            include_promise: true,
            mismatched_signature: false,
            dsse: false,
            tsa_time: None,
            tsa_valid_until: None,
            tsa_imprint_mismatch: false,
        }
    }
}

/// A trusted root and a bundle minted together
#[derive(Debug, Clone)]
pub struct Fixture {
    pub trusted_root: Value,
    pub bundle: Value,
    pub digest_hex: String,
}

impl Fixture {
    pub fn material(&self) -> TrustedRootMaterial {
        TrustedRootMaterial::from_json(&self.trusted_root.to_string()).unwrap()
    }

    pub fn signed_bundle(&self) -> SignedBundle {
        sigcheck_verify::bundle::from_json(&self.bundle.to_string()).unwrap()
    }

    /// The policy the minted identity satisfies
    pub fn policy(&self) -> Policy {
        Policy::new(
            ArtifactPolicy::from_hex(HashAlgorithm::Sha2_256, &self.digest_hex).unwrap(),
            identity_policy(),
        )
    }

    /// Write the trusted root and bundle under `dir`
    pub fn write(&self, dir: &Path) -> (PathBuf, PathBuf) {
        let root = dir.join("trusted_root.json");
        let bundle = dir.join("artifact.sigstore.json");
        std::fs::write(&root, self.trusted_root.to_string()).unwrap();
        std::fs::write(&bundle, self.bundle.to_string()).unwrap();
        (root, bundle)
    }

    pub fn entry_mut(&mut self) -> &mut Value {
        &mut self.bundle["verificationMaterial"]["tlogEntries"][0]
    }

    pub fn timestamp_mut(&mut self) -> &mut Value {
        &mut self.bundle["verificationMaterial"]["timestampVerificationData"]["rfc3161Timestamps"]
            [0]["signedTimestamp"]
    }
}

pub fn identity_policy() -> CertificateIdentityPolicy {
    CertificateIdentityPolicy::new(
        StringMatcher::regex("^https://github.com/org/repo/").unwrap(),
        StringMatcher::literal(OIDC_ISSUER).unwrap(),
    )
    .with_extension("BuildTrigger", "release")
    .unwrap()
    .with_extension("SourceRepositoryURI", REPOSITORY)
    .unwrap()
    .with_extension("RunnerEnvironment", "github-hosted")
    .unwrap()
    .with_extension("SourceRepositoryVisibilityAtSigning", "public")
    .unwrap()
}

/// Replace a base64 field with the encoding of `f` applied to its bytes
pub fn tamper_base64(value: &mut Value, f: impl FnOnce(&mut Vec<u8>)) {
    let mut bytes = STANDARD.decode(value.as_str().unwrap()).unwrap();
    f(&mut bytes);
    *value = Value::String(STANDARD.encode(bytes));
}

struct Authority {
    root: Certificate,
    intermediate: Certificate,
    intermediate_key: KeyPair,
}

fn ca_params(common_name: &str) -> CertificateParams {
    let mut params = CertificateParams::default();
    params.distinguished_name.push(DnType::OrganizationName, "sigcheck.test");
    params.distinguished_name.push(DnType::CommonName, common_name);
    params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
    params.key_usages = vec![KeyUsagePurpose::KeyCertSign, KeyUsagePurpose::CrlSign];
    params.not_before = rcgen::date_time_ymd(2024, 1, 1);
    params.not_after = rcgen::date_time_ymd(2030, 1, 1);
    params
}

fn authority() -> Authority {
    let root_key = KeyPair::generate().unwrap();
    let root = ca_params("sigcheck-test-root").self_signed(&root_key).unwrap();

    let intermediate_key = KeyPair::generate().unwrap();
    let intermediate = ca_params("sigcheck-test-intermediate")
        .signed_by(&intermediate_key, &root, &root_key)
        .unwrap();

    Authority {
        root,
        intermediate,
        intermediate_key,
    }
}

/// DER UTF8String, the encoding of the newer Fulcio extensions
fn utf8_string(value: &str) -> Vec<u8> {
    let mut out = vec![0x0c];
    out.extend(der_length(value.len()));
    out.extend_from_slice(value.as_bytes());
    out
}

fn der_length(len: usize) -> Vec<u8> {
    match len {
        0..=0x7f => vec![len as u8],
        0x80..=0xff => vec![0x81, len as u8],
        _ => vec![0x82, (len >> 8) as u8, len as u8],
    }
}

fn fulcio_extension(ext: FulcioExtension, content: Vec<u8>) -> CustomExtension {
    let arcs: Vec<u64> = ext
        .oid()
        .arcs()
        .map(u64::from)
        .collect();
    CustomExtension::from_oid_content(&arcs, content)
}

fn leaf_params(scenario: &Scenario) -> CertificateParams {
    let mut params = CertificateParams::default();
    params.distinguished_name = rcgen::DistinguishedName::new();
    params.is_ca = IsCa::ExplicitNoCa;
    params.key_usages = vec![KeyUsagePurpose::DigitalSignature];
    params.extended_key_usages = vec![ExtendedKeyUsagePurpose::CodeSigning];
    params.subject_alt_names = vec![SanType::URI(SAN.to_string().try_into().unwrap())];
    params.serial_number = Some(SerialNumber::from(0x5eed_u64));
    params.not_before = rcgen::date_time_ymd(2024, 6, 1);
    params.not_after = rcgen::date_time_ymd(2024, 6, 2);
    params.custom_extensions = vec![
        fulcio_extension(FulcioExtension::Issuer, OIDC_ISSUER.as_bytes().to_vec()),
        fulcio_extension(FulcioExtension::IssuerV2, utf8_string(OIDC_ISSUER)),
        fulcio_extension(
            FulcioExtension::RunnerEnvironment,
            utf8_string(&scenario.runner_environment),
        ),
        fulcio_extension(FulcioExtension::SourceRepositoryUri, utf8_string(REPOSITORY)),
        fulcio_extension(FulcioExtension::BuildTrigger, utf8_string("release")),
        fulcio_extension(
            FulcioExtension::SourceRepositoryVisibilityAtSigning,
            utf8_string("public"),
        ),
    ];
    params
}

/// A signing key together with its RFC 6962 log ID
struct LogKey {
    signing: SigningKey,
    spki: Vec<u8>,
    log_id: [u8; 32],
}

impl LogKey {
    fn generate() -> Self {
        let signing = SigningKey::random(&mut rand_core::OsRng);
        let spki = signing
            .verifying_key()
            .to_public_key_der()
            .unwrap()
            .as_bytes()
            .to_vec();
        let log_id = Sha256::digest(&spki).into();
        Self {
            signing,
            spki,
            log_id,
        }
    }

    fn sign(&self, message: &[u8]) -> Vec<u8> {
        let signature: Signature = self.signing.sign(message);
        signature.to_der().as_bytes().to_vec()
    }
}

/// The SCT list extension value for a precertificate with `tbs`
fn sct_extension(ct: &LogKey, timestamp_ms: u64, issuer_key_hash: &[u8], tbs: &[u8]) -> Vec<u8> {
    let mut signed = vec![0, 0];
    signed.extend_from_slice(&timestamp_ms.to_be_bytes());
    signed.extend_from_slice(&1u16.to_be_bytes());
    signed.extend_from_slice(issuer_key_hash);
    signed.extend_from_slice(&(tbs.len() as u32).to_be_bytes()[1..]);
    signed.extend_from_slice(tbs);
    signed.extend_from_slice(&0u16.to_be_bytes());
    let signature = ct.sign(&signed);

    let mut sct = vec![0];
    sct.extend_from_slice(&ct.log_id);
    sct.extend_from_slice(&timestamp_ms.to_be_bytes());
    sct.extend_from_slice(&0u16.to_be_bytes());
    sct.extend_from_slice(&[4, 3]);
    sct.extend_from_slice(&(signature.len() as u16).to_be_bytes());
    sct.extend_from_slice(&signature);

    let mut list = ((sct.len() + 2) as u16).to_be_bytes().to_vec();
    list.extend_from_slice(&(sct.len() as u16).to_be_bytes());
    list.extend_from_slice(&sct);

    let mut octets = vec![0x04];
    octets.extend(der_length(list.len()));
    octets.extend(list);
    octets
}

/// A timestamp authority whose leaf is listed in its trusted chain
struct TimestampAuthority {
    root: Certificate,
    leaf: Certificate,
    signing: SigningKey,
}

fn timestamp_authority() -> TimestampAuthority {
    let root_key = KeyPair::generate().unwrap();
    let root = ca_params("sigcheck-test-tsa-root").self_signed(&root_key).unwrap();

    let leaf_key = KeyPair::generate().unwrap();
    let mut params = CertificateParams::default();
    params.distinguished_name.push(DnType::OrganizationName, "sigcheck.test");
    params.distinguished_name.push(DnType::CommonName, "sigcheck-test-tsa");
    params.is_ca = IsCa::ExplicitNoCa;
    params.key_usages = vec![KeyUsagePurpose::DigitalSignature];
    params.extended_key_usages = vec![ExtendedKeyUsagePurpose::TimeStamping];
    params.not_before = rcgen::date_time_ymd(2024, 1, 1);
    params.not_after = rcgen::date_time_ymd(2030, 1, 1);
    let leaf = params.signed_by(&leaf_key, &root, &root_key).unwrap();
    let signing = SigningKey::from_pkcs8_der(&leaf_key.serialize_der()).unwrap();

    TimestampAuthority {
        root,
        leaf,
        signing,
    }
}

impl TimestampAuthority {
    /// A granted TimeStampResp whose imprint is the SHA-256 of `message`
    fn respond(&self, message: &[u8], gen_time: i64) -> Vec<u8> {
        let sha256 = AlgorithmIdentifierOwned {
            oid: ID_SHA_256,
            parameters: None,
        };
        let tst_info = TstInfo {
            version: TspVersion::V1,
            policy: TSA_POLICY,
            message_imprint: MessageImprint {
                hash_algorithm: sha256.clone(),
                hashed_message: OctetString::new(Sha256::digest(message).to_vec()).unwrap(),
            },
            serial_number: Int::new(&[0x01]).unwrap(),
            gen_time: GeneralizedTime::from_unix_duration(Duration::from_secs(gen_time as u64))
                .unwrap(),
            accuracy: None,
            ordering: false,
            nonce: None,
            tsa: None,
            extensions: None,
        };
        let tst_der = tst_info.to_der().unwrap();

        let attribute = |oid: ObjectIdentifier, value: Any| Attribute {
            oid,
            values: SetOfVec::try_from(vec![value]).unwrap(),
        };
        let tst_digest = OctetString::new(Sha256::digest(&tst_der).to_vec()).unwrap();
        let signed_attrs: SignedAttributes = SetOfVec::try_from(vec![
            attribute(ID_CONTENT_TYPE, Any::encode_from(&ID_CT_TST_INFO).unwrap()),
            attribute(ID_MESSAGE_DIGEST, Any::encode_from(&tst_digest).unwrap()),
        ])
        .unwrap();
        let signature: Signature = self.signing.sign(&signed_attrs.to_der().unwrap());

        let cert = x509_cert::Certificate::from_der(self.leaf.der()).unwrap();
        let signer = SignerInfo {
            version: CmsVersion::V1,
            sid: SignerIdentifier::IssuerAndSerialNumber(IssuerAndSerialNumber {
                issuer: cert.tbs_certificate.issuer.clone(),
                serial_number: cert.tbs_certificate.serial_number.clone(),
            }),
            digest_alg: sha256.clone(),
            signed_attrs: Some(signed_attrs),
            signature_algorithm: AlgorithmIdentifierOwned {
                oid: ECDSA_WITH_SHA_256,
                parameters: None,
            },
            signature: OctetString::new(signature.to_der().as_bytes().to_vec()).unwrap(),
            unsigned_attrs: None,
        };
        let signed_data = SignedData {
            version: CmsVersion::V3,
            digest_algorithms: SetOfVec::try_from(vec![sha256]).unwrap(),
            encap_content_info: EncapsulatedContentInfo {
                econtent_type: ID_CT_TST_INFO,
                econtent: Some(Any::encode_from(&OctetString::new(tst_der).unwrap()).unwrap()),
            },
            certificates: Some(CertificateSet(
                SetOfVec::try_from(vec![CertificateChoices::Certificate(cert)]).unwrap(),
            )),
            crls: None,
            signer_infos: SignerInfos(SetOfVec::try_from(vec![signer]).unwrap()),
        };
        let token = ContentInfo {
            content_type: ID_SIGNED_DATA,
            content: Any::encode_from(&signed_data).unwrap(),
        }
        .to_der()
        .unwrap();

        // TimeStampResp { status: granted, timeStampToken }
        let mut body = vec![0x30, 0x03, 0x02, 0x01, 0x00];
        body.extend(token);
        let mut response = vec![0x30];
        response.extend(der_length(body.len()));
        response.extend(body);
        response
    }
}

fn largest_power_of_two_below(n: usize) -> usize {
    let mut k = 1;
    while k * 2 < n {
        k *= 2;
    }
    k
}

fn tree_hash(leaves: &[Sha256Hash]) -> Sha256Hash {
    if leaves.len() == 1 {
        return leaves[0];
    }
    let k = largest_power_of_two_below(leaves.len());
    hash_children(&tree_hash(&leaves[..k]), &tree_hash(&leaves[k..]))
}

fn audit_path(index: usize, leaves: &[Sha256Hash]) -> Vec<Sha256Hash> {
    if leaves.len() == 1 {
        return Vec::new();
    }
    let k = largest_power_of_two_below(leaves.len());
    if index < k {
        let mut path = audit_path(index, &leaves[..k]);
        path.push(tree_hash(&leaves[k..]));
        path
    } else {
        let mut path = audit_path(index - k, &leaves[k..]);
        path.push(tree_hash(&leaves[..k]));
        path
    }
}

fn rfc3339(time: &str) -> Value {
    Value::String(time.to_string())
}

/// Mint a deployment and a bundle for `scenario`
pub fn build(scenario: &Scenario) -> Fixture {
    let ca = authority();
    let ct = LogKey::generate();
    let rekor = LogKey::generate();

    let leaf_key = KeyPair::generate().unwrap();
    let leaf_signing = SigningKey::from_pkcs8_der(&leaf_key.serialize_der()).unwrap();

    // The precertificate is the final certificate without the SCT extension
    let mut params = leaf_params(scenario);
    let precert = params
        .clone()
        .signed_by(&leaf_key, &ca.intermediate, &ca.intermediate_key)
        .unwrap();
    let tbs = sigcheck_verify::crypto::extract_tbs_der(precert.der()).unwrap();
    let issuer_spki = sigcheck_verify::crypto::parse_certificate_info(ca.intermediate.der())
        .unwrap()
        .spki_der;
    let issuer_key_hash = Sha256::digest(&issuer_spki);
    let sct = sct_extension(
        &ct,
        scenario.sct_time as u64 * 1000,
        &issuer_key_hash,
        &tbs,
    );
    params
        .custom_extensions
        .push(CustomExtension::from_oid_content(SCT_EXTENSION_OID, sct));
    let leaf = params
        .signed_by(&leaf_key, &ca.intermediate, &ca.intermediate_key)
        .unwrap();
    let leaf_der = leaf.der().to_vec();
    let leaf_pem_b64 = STANDARD.encode(leaf.pem());

    let artifact_digest = Sha256::digest(&scenario.artifact);
    let digest_hex = hex::encode(artifact_digest);

    let (content_key, content, body, kind, signature_bytes) = if scenario.dsse {
        let statement = json!({
            "_type": "https://in-toto.io/Statement/v1",
            "subject": [{"name": "artifact.bin", "digest": {"sha256": digest_hex}}],
            "predicateType": "https://slsa.dev/provenance/v1",
            "predicate": {}
        })
        .to_string();
        let payload_type = "application/vnd.in-toto+json";
        let pae = sigcheck_verify::types::pae(payload_type, statement.as_bytes());
        let signature: Signature = leaf_signing.sign(&pae);
        let signature_bytes = signature.to_der().as_bytes().to_vec();
        let signature_b64 = STANDARD.encode(&signature_bytes);
        let body = json!({
            "apiVersion": "0.0.1",
            "kind": "dsse",
            "spec": {
                "payloadHash": {"algorithm": "sha256", "value": hex::encode(Sha256::digest(&statement))},
                "signatures": [{"signature": signature_b64, "verifier": leaf_pem_b64}]
            }
        });
        let content = json!({
            "payload": STANDARD.encode(&statement),
            "payloadType": payload_type,
            "signatures": [{"sig": signature_b64, "keyid": ""}]
        });
        ("dsseEnvelope", content, body, "dsse", signature_bytes)
    } else {
        let signed_digest = if scenario.mismatched_signature {
            Sha256::digest(b"something else")
        } else {
            artifact_digest
        };
        let signature: Signature = leaf_signing.sign_prehash(&signed_digest).unwrap();
        let logged_digest = artifact_digest;
        let signature_bytes = signature.to_der().as_bytes().to_vec();
        let signature_b64 = STANDARD.encode(&signature_bytes);
        let body = json!({
            "apiVersion": "0.0.1",
            "kind": "hashedrekord",
            "spec": {
                "data": {"hash": {"algorithm": "sha256", "value": hex::encode(logged_digest)}},
                "signature": {"content": signature_b64, "publicKey": {"content": leaf_pem_b64}}
            }
        });
        let content = json!({
            "messageDigest": {"algorithm": "SHA2_256", "digest": STANDARD.encode(logged_digest)},
            "signature": signature_b64
        });
        ("messageSignature", content, body, "hashedrekord", signature_bytes)
    };
    let body = body.to_string();
    let body_b64 = STANDARD.encode(&body);

    let mut leaves: Vec<Sha256Hash> = (0..TREE_SIZE)
        .map(|i| hash_leaf(format!("entry {i}").as_bytes()))
        .collect();
    leaves[LEAF_INDEX] = hash_leaf(body.as_bytes());
    let root_hash = tree_hash(&leaves);
    let path = audit_path(LEAF_INDEX, &leaves);

    let note = format!(
        "{CHECKPOINT_ORIGIN}\n{TREE_SIZE}\n{}\n",
        STANDARD.encode(root_hash.as_bytes())
    );
    let mut note_signature = rekor.log_id[..4].to_vec();
    note_signature.extend(rekor.sign(note.as_bytes()));
    let checkpoint = format!(
        "{note}\n\u{2014} {CHECKPOINT_ORIGIN} {}\n",
        STANDARD.encode(note_signature)
    );

    let set_payload = format!(
        r#"{{"body":"{body_b64}","integratedTime":{},"logID":"{}","logIndex":{LEAF_INDEX}}}"#,
        scenario.integrated_time,
        hex::encode(rekor.log_id)
    );
    let set = STANDARD.encode(rekor.sign(set_payload.as_bytes()));

    let mut entry = json!({
        "logIndex": LEAF_INDEX.to_string(),
        "logId": {"keyId": STANDARD.encode(rekor.log_id)},
        "kindVersion": {"kind": kind, "version": "0.0.1"},
        "integratedTime": scenario.integrated_time.to_string(),
        "canonicalizedBody": body_b64
    });
    if scenario.include_promise {
        entry["inclusionPromise"] = json!({"signedEntryTimestamp": set});
    }
    if scenario.include_proof {
        entry["inclusionProof"] = json!({
            "logIndex": LEAF_INDEX.to_string(),
            "rootHash": STANDARD.encode(root_hash.as_bytes()),
            "treeSize": TREE_SIZE.to_string(),
            "hashes": path.iter().map(|h| STANDARD.encode(h.as_bytes())).collect::<Vec<_>>(),
            "checkpoint": {"envelope": checkpoint}
        });
    }

    let mut bundle = json!({
        "mediaType": "application/vnd.dev.sigstore.bundle.v0.3+json",
        "verificationMaterial": {
            "certificate": {"rawBytes": STANDARD.encode(&leaf_der)},
            "tlogEntries": [entry]
        }
    });
    bundle[content_key] = content;

    let tsa = scenario.tsa_time.map(|gen_time| {
        let tsa = timestamp_authority();
        let imprinted = if scenario.tsa_imprint_mismatch {
            b"another signature".to_vec()
        } else {
            signature_bytes.clone()
        };
        let response = tsa.respond(&imprinted, gen_time);
        bundle["verificationMaterial"]["timestampVerificationData"] = json!({
            "rfc3161Timestamps": [{"signedTimestamp": STANDARD.encode(response)}]
        });
        tsa
    });

    let mut ca_valid_for = json!({"start": rfc3339("2024-01-01T00:00:00Z")});
    if let Some(end) = &scenario.ca_valid_until {
        ca_valid_for["end"] = rfc3339(end);
    }
    let log_instance = |key: &LogKey, url: &str| {
        json!({
            "baseUrl": url,
            "hashAlgorithm": "SHA2_256",
            "publicKey": {
                "rawBytes": STANDARD.encode(&key.spki),
                "keyDetails": "PKIX_ECDSA_P256_SHA_256",
                "validFor": {"start": "2024-01-01T00:00:00Z"}
            },
            "logId": {"keyId": STANDARD.encode(key.log_id)}
        })
    };
    let mut trusted_root = json!({
        "mediaType": "application/vnd.dev.sigstore.trustedroot+json;version=0.1",
        "tlogs": [log_instance(&rekor, "https://rekor.sigcheck.test")],
        "certificateAuthorities": [{
            "uri": "https://fulcio.sigcheck.test",
            "certChain": {"certificates": [
                {"rawBytes": STANDARD.encode(ca.intermediate.der())},
                {"rawBytes": STANDARD.encode(ca.root.der())}
            ]},
            "validFor": ca_valid_for
        }],
        "ctlogs": [log_instance(&ct, "https://ctfe.sigcheck.test")]
    });

    if let Some(tsa) = &tsa {
        let mut tsa_valid_for = json!({"start": rfc3339("2024-01-01T00:00:00Z")});
        if let Some(end) = &scenario.tsa_valid_until {
            tsa_valid_for["end"] = rfc3339(end);
        }
        trusted_root["timestampAuthorities"] = json!([{
            "uri": "https://tsa.sigcheck.test",
            "certChain": {"certificates": [
                {"rawBytes": STANDARD.encode(tsa.leaf.der())},
                {"rawBytes": STANDARD.encode(tsa.root.der())}
            ]},
            "validFor": tsa_valid_for
        }]);
    }

    Fixture {
        trusted_root,
        bundle,
        digest_hex,
    }
}
