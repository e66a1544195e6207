//! Provider for the OpenSSL primitive lineage.
//!
//! Interoperates with deployments whose peers run SHA-family digests, PBKDF2
//! password hashing and HMAC confirmation messages, as well as two legacy
//! modes (unkeyed `H(msg | key)` MACs and the `H(salt.hex | password)` KDF)
//! that predate the keyed formulations.

use core::str::FromStr;

use digest::Digest;
use hmac::{Hmac, Mac};
use pbkdf2::pbkdf2_hmac;
use sha1::Sha1;
use sha2::{Sha256, Sha384, Sha512};
use subtle::ConstantTimeEq;

use crate::crypto::Crypto;
use crate::errors::SrpError;
use crate::value::Value;

/// Strip dashes and lowercase, so `"SHA-256"`, `"Sha256"` and `"sha256"`
/// name the same algorithm.
fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '-')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

macro_rules! hmac_with {
    ($d:ty, $key:expr, $msg:expr) => {{
        let mut mac =
            Hmac::<$d>::new_from_slice($key).expect("HMAC accepts keys of any length");
        mac.update($msg);
        mac.finalize().into_bytes().to_vec()
    }};
}

/// Digest selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpensslHash {
    Sha1,
    Sha256,
    Sha384,
    Sha512,
}

impl OpensslHash {
    /// Digest output size in bytes.
    pub fn digest_len(self) -> usize {
        match self {
            Self::Sha1 => 20,
            Self::Sha256 => 32,
            Self::Sha384 => 48,
            Self::Sha512 => 64,
        }
    }

    fn digest(self, data: &[u8]) -> Vec<u8> {
        match self {
            Self::Sha1 => Sha1::digest(data).to_vec(),
            Self::Sha256 => Sha256::digest(data).to_vec(),
            Self::Sha384 => Sha384::digest(data).to_vec(),
            Self::Sha512 => Sha512::digest(data).to_vec(),
        }
    }
}

impl FromStr for OpensslHash {
    type Err = SrpError;

    fn from_str(s: &str) -> Result<Self, SrpError> {
        match normalize(s).as_str() {
            "sha1" => Ok(Self::Sha1),
            "sha256" => Ok(Self::Sha256),
            "sha384" => Ok(Self::Sha384),
            "sha512" => Ok(Self::Sha512),
            _ => Err(SrpError::NotApplicable {
                option: "hash",
                value: s.to_owned(),
                allowed: "sha1, sha256, sha384, sha512",
            }),
        }
    }
}

/// Password-hashing selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpensslKdf {
    /// PBKDF2-HMAC with the configured digest.
    Pbkdf2,
    /// `H(salt.hex | password)`, kept bit-exact for interop with verifiers
    /// registered by historical deployments.
    Legacy,
}

impl FromStr for OpensslKdf {
    type Err = SrpError;

    fn from_str(s: &str) -> Result<Self, SrpError> {
        match normalize(s).as_str() {
            "pbkdf2" => Ok(Self::Pbkdf2),
            "legacy" => Ok(Self::Legacy),
            _ => Err(SrpError::NotApplicable {
                option: "kdf",
                value: s.to_owned(),
                allowed: "pbkdf2, legacy",
            }),
        }
    }
}

/// Confirmation-message MAC selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpensslMac {
    /// HMAC with the configured digest.
    Hmac,
    /// Unkeyed `H(msg | key)`.
    Legacy,
}

impl FromStr for OpensslMac {
    type Err = SrpError;

    fn from_str(s: &str) -> Result<Self, SrpError> {
        match normalize(s).as_str() {
            "hmac" => Ok(Self::Hmac),
            "legacy" => Ok(Self::Legacy),
            _ => Err(SrpError::NotApplicable {
                option: "mac",
                value: s.to_owned(),
                allowed: "hmac, legacy",
            }),
        }
    }
}

/// Configuration record for [`OpensslCrypto`].
#[derive(Debug, Clone)]
pub struct OpensslConfig {
    pub hash: OpensslHash,
    pub kdf: OpensslKdf,
    /// PBKDF2 iteration count; must be positive.
    pub kdf_iter: u32,
    pub mac: OpensslMac,
    /// When set, `h` and the legacy MAC concatenate the hex view of each
    /// input instead of the raw bytes.
    pub hex: bool,
}

impl Default for OpensslConfig {
    fn default() -> Self {
        Self {
            hash: OpensslHash::Sha256,
            kdf: OpensslKdf::Pbkdf2,
            kdf_iter: 20_000,
            mac: OpensslMac::Hmac,
            hex: false,
        }
    }
}

/// SHA-family provider: PBKDF2 private keys, HMAC proofs, legacy fallbacks.
#[derive(Debug, Clone)]
pub struct OpensslCrypto {
    config: OpensslConfig,
}

impl OpensslCrypto {
    /// Validate a configuration record and build the provider.
    pub fn new(config: OpensslConfig) -> Result<Self, SrpError> {
        if config.kdf_iter == 0 {
            return Err(SrpError::NotApplicable {
                option: "kdf_iter",
                value: config.kdf_iter.to_string(),
                allowed: "a positive iteration count",
            });
        }
        Ok(Self { config })
    }

    /// The validated configuration.
    pub fn config(&self) -> &OpensslConfig {
        &self.config
    }

    // Representation rule shared by `h` and the legacy MAC.
    fn concat(&self, values: &[&Value]) -> Vec<u8> {
        let mut buf = Vec::new();
        for value in values {
            if self.config.hex {
                buf.extend_from_slice(value.hex().as_bytes());
            } else {
                buf.extend_from_slice(value.bin());
            }
        }
        buf
    }
}

impl Default for OpensslCrypto {
    fn default() -> Self {
        Self {
            config: OpensslConfig::default(),
        }
    }
}

impl Crypto for OpensslCrypto {
    fn h(&self, values: &[&Value]) -> Value {
        Value::from_bytes(self.config.hash.digest(&self.concat(values)))
    }

    fn keyed_hash(&self, key: &Value, msg: &Value) -> Value {
        match self.config.mac {
            OpensslMac::Hmac => {
                let digest = match self.config.hash {
                    OpensslHash::Sha1 => hmac_with!(Sha1, key.bin(), msg.bin()),
                    OpensslHash::Sha256 => hmac_with!(Sha256, key.bin(), msg.bin()),
                    OpensslHash::Sha384 => hmac_with!(Sha384, key.bin(), msg.bin()),
                    OpensslHash::Sha512 => hmac_with!(Sha512, key.bin(), msg.bin()),
                };
                Value::from_bytes(digest)
            }
            OpensslMac::Legacy => self.h(&[msg, key]),
        }
    }

    fn password_hash(&self, salt: &Value, password: &str) -> Result<Value, SrpError> {
        match self.config.kdf {
            OpensslKdf::Pbkdf2 => {
                let mut out = vec![0u8; self.config.hash.digest_len()];
                let (pw, s, iter) = (password.as_bytes(), salt.bin(), self.config.kdf_iter);
                match self.config.hash {
                    OpensslHash::Sha1 => pbkdf2_hmac::<Sha1>(pw, s, iter, &mut out),
                    OpensslHash::Sha256 => pbkdf2_hmac::<Sha256>(pw, s, iter, &mut out),
                    OpensslHash::Sha384 => pbkdf2_hmac::<Sha384>(pw, s, iter, &mut out),
                    OpensslHash::Sha512 => pbkdf2_hmac::<Sha512>(pw, s, iter, &mut out),
                }
                Ok(Value::from_bytes(out))
            }
            OpensslKdf::Legacy => {
                // Salt enters as its hex string, whatever the `hex` flag says.
                let mut buf = salt.hex().as_bytes().to_vec();
                buf.extend_from_slice(password.as_bytes());
                Ok(Value::from_bytes(self.config.hash.digest(&buf)))
            }
        }
    }

    fn secure_compare(&self, a: &Value, b: &Value) -> bool {
        a.hex().as_bytes().ct_eq(b.hex().as_bytes()).into()
    }

    fn digest_len(&self) -> usize {
        self.config.hash.digest_len()
    }
}
