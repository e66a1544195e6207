//! Provider for the libsodium primitive lineage.
//!
//! Interoperates with deployments whose peers use libsodium: SHA-2 or
//! BLAKE2b digests, scrypt or argon2id password hashing with
//! `opslimit`/`memlimit` tuning, and HMAC-SHA-2 confirmation messages.
//! Work limits mean exactly what they mean to libsodium: scrypt cost
//! parameters are derived from them with the same rules libsodium applies.

use blake2::Blake2b;
use digest::consts::{U32, U64};
use digest::Digest;
use hmac::{Hmac, Mac};
use sha2::{Sha256, Sha512};
use subtle::ConstantTimeEq;

use crate::crypto::Crypto;
use crate::errors::SrpError;
use crate::value::Value;

use core::str::FromStr;

type Blake2b256 = Blake2b<U32>;
type Blake2b512 = Blake2b<U64>;

/// Digest selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SodiumHash {
    Sha256,
    Sha512,
    Blake2b,
}

impl FromStr for SodiumHash {
    type Err = SrpError;

    fn from_str(s: &str) -> Result<Self, SrpError> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '-')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match normalized.as_str() {
            "sha256" => Ok(Self::Sha256),
            "sha512" => Ok(Self::Sha512),
            "blake2b" => Ok(Self::Blake2b),
            _ => Err(SrpError::NotApplicable {
                option: "hash",
                value: s.to_owned(),
                allowed: "sha256, sha512, blake2b",
            }),
        }
    }
}

/// Password-hashing selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SodiumKdf {
    Scrypt,
    Argon2,
}

impl FromStr for SodiumKdf {
    type Err = SrpError;

    fn from_str(s: &str) -> Result<Self, SrpError> {
        match s.to_ascii_lowercase().as_str() {
            "scrypt" => Ok(Self::Scrypt),
            "argon2" => Ok(Self::Argon2),
            _ => Err(SrpError::NotApplicable {
                option: "kdf",
                value: s.to_owned(),
                allowed: "scrypt, argon2",
            }),
        }
    }
}

/// Caller overrides for the per-KDF work limits; unset fields keep the KDF's
/// defaults (scrypt: 2^20 ops / 2^24 bytes / 64-byte output; argon2: 5
/// passes / 2^24 bytes / 64-byte output).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KdfOverrides {
    pub opslimit: Option<u64>,
    pub memlimit: Option<usize>,
    pub digest_size: Option<usize>,
}

#[derive(Debug, Clone, Copy)]
struct KdfLimits {
    opslimit: u64,
    memlimit: usize,
    digest_size: usize,
}

impl KdfLimits {
    fn defaults(kdf: SodiumKdf) -> Self {
        match kdf {
            SodiumKdf::Scrypt => Self {
                opslimit: 1 << 20,
                memlimit: 1 << 24,
                digest_size: 64,
            },
            SodiumKdf::Argon2 => Self {
                opslimit: 5,
                memlimit: 1 << 24,
                digest_size: 64,
            },
        }
    }

    fn merge(kdf: SodiumKdf, overrides: KdfOverrides) -> Self {
        let defaults = Self::defaults(kdf);
        Self {
            opslimit: overrides.opslimit.unwrap_or(defaults.opslimit),
            memlimit: overrides.memlimit.unwrap_or(defaults.memlimit),
            digest_size: overrides.digest_size.unwrap_or(defaults.digest_size),
        }
    }
}

/// Configuration record for [`SodiumCrypto`].
#[derive(Debug, Clone)]
pub struct SodiumConfig {
    pub hash: SodiumHash,
    /// BLAKE2b output size in bytes; 32 or 64. Ignored for the SHA hashes.
    pub blake_digest_size: usize,
    pub kdf: SodiumKdf,
    pub kdf_options: KdfOverrides,
}

impl Default for SodiumConfig {
    fn default() -> Self {
        Self {
            hash: SodiumHash::Sha256,
            blake_digest_size: 32,
            kdf: SodiumKdf::Scrypt,
            kdf_options: KdfOverrides::default(),
        }
    }
}

/// libsodium-family provider: scrypt/argon2id private keys, HMAC-SHA-2
/// proofs.
///
/// The confirmation MAC is HMAC-SHA-512 when the configured digest is 64
/// bytes wide and HMAC-SHA-256 otherwise, including under BLAKE2b, where
/// deployed peers MAC with HMAC-SHA-2 rather than keyed BLAKE2b.
#[derive(Debug, Clone)]
pub struct SodiumCrypto {
    hash: SodiumHash,
    blake_digest_size: usize,
    kdf: SodiumKdf,
    limits: KdfLimits,
}

/// libsodium's scrypt cost derivation: turn `(opslimit, memlimit)` into
/// `(log2 N, r, p)` the way `crypto_pwhash_scryptsalsa208sha256` does, so
/// that configured limits select identical work factors on both ends.
fn scrypt_cost(opslimit: u64, memlimit: usize) -> (u8, u32, u32) {
    let opslimit = opslimit.max(32_768);
    let r = 8u32;
    if opslimit < memlimit as u64 / 32 {
        let maxn = opslimit / u64::from(r * 4);
        (log2_bound(maxn), r, 1)
    } else {
        let maxn = memlimit as u64 / u64::from(r * 128);
        let log_n = log2_bound(maxn);
        let maxrp = ((opslimit / 4) >> log_n).min(0x3fff_ffff);
        (log_n, r, (maxrp as u32 / r).max(1))
    }
}

// Smallest l in 1..63 with 2^l > maxn / 2.
fn log2_bound(maxn: u64) -> u8 {
    let mut log_n = 1u8;
    while log_n < 63 && (1u64 << log_n) <= maxn / 2 {
        log_n += 1;
    }
    log_n
}

impl SodiumCrypto {
    /// Validate a configuration record and build the provider.
    pub fn new(config: SodiumConfig) -> Result<Self, SrpError> {
        if config.hash == SodiumHash::Blake2b
            && config.blake_digest_size != 32
            && config.blake_digest_size != 64
        {
            return Err(SrpError::NotApplicable {
                option: "blake_digest_size",
                value: config.blake_digest_size.to_string(),
                allowed: "32, 64",
            });
        }
        Ok(Self {
            hash: config.hash,
            blake_digest_size: config.blake_digest_size,
            kdf: config.kdf,
            limits: KdfLimits::merge(config.kdf, config.kdf_options),
        })
    }

    fn digest(&self, data: &[u8]) -> Vec<u8> {
        match (self.hash, self.blake_digest_size) {
            (SodiumHash::Sha256, _) => Sha256::digest(data).to_vec(),
            (SodiumHash::Sha512, _) => Sha512::digest(data).to_vec(),
            (SodiumHash::Blake2b, 64) => Blake2b512::digest(data).to_vec(),
            (SodiumHash::Blake2b, _) => Blake2b256::digest(data).to_vec(),
        }
    }

    fn scrypt_hash(&self, salt: &[u8], password: &str) -> Result<Vec<u8>, SrpError> {
        let (log_n, r, p) = scrypt_cost(self.limits.opslimit, self.limits.memlimit);
        let params = scrypt::Params::new(log_n, r, p, self.limits.digest_size)
            .map_err(|e| SrpError::PasswordHash(e.to_string()))?;
        let mut out = vec![0u8; self.limits.digest_size];
        scrypt::scrypt(password.as_bytes(), salt, &params, &mut out)
            .map_err(|e| SrpError::PasswordHash(e.to_string()))?;
        Ok(out)
    }

    fn argon2_hash(&self, salt: &[u8], password: &str) -> Result<Vec<u8>, SrpError> {
        let m_cost_kib = (self.limits.memlimit / 1024) as u32;
        let t_cost = self.limits.opslimit as u32;
        let params = argon2::Params::new(m_cost_kib, t_cost, 1, Some(self.limits.digest_size))
            .map_err(|e| SrpError::PasswordHash(e.to_string()))?;
        let argon2 = argon2::Argon2::new(
            argon2::Algorithm::Argon2id,
            argon2::Version::V0x13,
            params,
        );
        let mut out = vec![0u8; self.limits.digest_size];
        argon2
            .hash_password_into(password.as_bytes(), salt, &mut out)
            .map_err(|e| SrpError::PasswordHash(e.to_string()))?;
        Ok(out)
    }
}

impl Crypto for SodiumCrypto {
    fn h(&self, values: &[&Value]) -> Value {
        let mut buf = Vec::new();
        for value in values {
            buf.extend_from_slice(value.bin());
        }
        Value::from_bytes(self.digest(&buf))
    }

    fn keyed_hash(&self, key: &Value, msg: &Value) -> Value {
        let digest = if self.digest_len() == 64 {
            let mut mac = Hmac::<Sha512>::new_from_slice(key.bin())
                .expect("HMAC accepts keys of any length");
            mac.update(msg.bin());
            mac.finalize().into_bytes().to_vec()
        } else {
            let mut mac = Hmac::<Sha256>::new_from_slice(key.bin())
                .expect("HMAC accepts keys of any length");
            mac.update(msg.bin());
            mac.finalize().into_bytes().to_vec()
        };
        Value::from_bytes(digest)
    }

    fn password_hash(&self, salt: &Value, password: &str) -> Result<Value, SrpError> {
        let out = match self.kdf {
            SodiumKdf::Scrypt => self.scrypt_hash(salt.bin(), password)?,
            SodiumKdf::Argon2 => self.argon2_hash(salt.bin(), password)?,
        };
        Ok(Value::from_bytes(out))
    }

    // Fixed-length verification: hash both sides down to 32 bytes, then
    // compare the digests in constant time.
    fn secure_compare(&self, a: &Value, b: &Value) -> bool {
        let da = Sha256::digest(a.bin());
        let db = Sha256::digest(b.bin());
        da.as_slice().ct_eq(db.as_slice()).into()
    }

    fn digest_len(&self) -> usize {
        match self.hash {
            SodiumHash::Sha256 => 32,
            SodiumHash::Sha512 => 64,
            SodiumHash::Blake2b => self.blake_digest_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(config: SodiumConfig) -> SodiumCrypto {
        SodiumCrypto::new(config).unwrap()
    }

    // Cheap-but-real limits so KDF tests stay fast.
    fn quick_scrypt() -> SodiumCrypto {
        provider(SodiumConfig {
            kdf_options: KdfOverrides {
                opslimit: Some(32_768),
                memlimit: Some(1 << 24),
                digest_size: Some(32),
            },
            ..SodiumConfig::default()
        })
    }

    fn quick_argon2() -> SodiumCrypto {
        provider(SodiumConfig {
            kdf: SodiumKdf::Argon2,
            kdf_options: KdfOverrides {
                opslimit: Some(1),
                memlimit: Some(1 << 20),
                digest_size: Some(32),
            },
            ..SodiumConfig::default()
        })
    }

    #[test]
    fn hash_names_parse() {
        assert_eq!("BLAKE2b".parse::<SodiumHash>().unwrap(), SodiumHash::Blake2b);
        assert_eq!("sha-512".parse::<SodiumHash>().unwrap(), SodiumHash::Sha512);
        assert!(matches!(
            "sha1".parse::<SodiumHash>(),
            Err(SrpError::NotApplicable { option: "hash", .. })
        ));
        assert!(matches!(
            "pbkdf2".parse::<SodiumKdf>(),
            Err(SrpError::NotApplicable { option: "kdf", .. })
        ));
    }

    #[test]
    fn blake2b_64_matches_vector() {
        let crypto = provider(SodiumConfig {
            hash: SodiumHash::Blake2b,
            blake_digest_size: 64,
            ..SodiumConfig::default()
        });
        let v = Value::from_hex("07c0").unwrap();
        assert_eq!(
            crypto.h(&[&v]).hex(),
            "924bb7d1885981f00d721ace8e92406ff2d411d66f366c2273141f78fb4fca7a\
             1f44ed8fa53e7433d4ea0b4d61cc24a2c8c388e5010a38dec869015c392d71bd"
        );
    }

    #[test]
    fn blake2b_32_matches_vector() {
        let crypto = provider(SodiumConfig {
            hash: SodiumHash::Blake2b,
            ..SodiumConfig::default()
        });
        let v = Value::from_hex("07c0").unwrap();
        assert_eq!(
            crypto.h(&[&v]).hex(),
            "db37202f77f5c6c7c6dd07f893547753d7f07dc649e97477eaca178366cc0125"
        );
    }

    #[test]
    fn odd_blake_digest_size_is_rejected() {
        let config = SodiumConfig {
            hash: SodiumHash::Blake2b,
            blake_digest_size: 48,
            ..SodiumConfig::default()
        };
        assert!(matches!(
            SodiumCrypto::new(config),
            Err(SrpError::NotApplicable { option: "blake_digest_size", .. })
        ));
    }

    #[test]
    fn keyed_hash_uses_hmac_sha256_for_32_byte_digests() {
        let key =
            Value::from_hex("f4ffd830b255f778b9d88966e87ae1d72702227cfcbeae4bd1e4b39fff136060")
                .unwrap();
        let msg = Value::from_hex("07c0").unwrap();
        let expected = "ecfa17f317164259824287aa9feabeda9c784e7d672b118965ebff33f5373abe";

        let sha = provider(SodiumConfig::default());
        assert_eq!(sha.keyed_hash(&key, &msg).hex(), expected);

        // BLAKE2b-32 MACs with HMAC-SHA-256 as well: the MAC follows the
        // digest width, not the digest family.
        let blake = provider(SodiumConfig {
            hash: SodiumHash::Blake2b,
            ..SodiumConfig::default()
        });
        assert_eq!(blake.keyed_hash(&key, &msg).hex(), expected);
    }

    #[test]
    fn keyed_hash_uses_hmac_sha512_for_64_byte_digests() {
        let key =
            Value::from_hex("f4ffd830b255f778b9d88966e87ae1d72702227cfcbeae4bd1e4b39fff136060")
                .unwrap();
        let msg = Value::from_hex("07c0").unwrap();
        let crypto = provider(SodiumConfig {
            hash: SodiumHash::Sha512,
            ..SodiumConfig::default()
        });
        assert_eq!(
            crypto.keyed_hash(&key, &msg).hex(),
            "8a93a38e2f274f99cdd25be0620bcee180e1cec062b22b09c314b051edf51ab3\
             fb221b191e569d500bce1708f0e6ed7b745a1df6575c05c7ed5742a78ca7ad71"
        );
    }

    #[test]
    fn scrypt_cost_follows_libsodium() {
        assert_eq!(scrypt_cost(1 << 20, 1 << 24), (14, 8, 2));
        assert_eq!(scrypt_cost(32_768, 1 << 24), (10, 8, 1));
        // Below the floor, opslimit is clamped up to 32768.
        assert_eq!(scrypt_cost(1, 1 << 24), (10, 8, 1));
    }

    #[test]
    fn scrypt_is_deterministic_and_sized() {
        let crypto = quick_scrypt();
        let salt = Value::from_bytes(vec![0x11, 0x17]);
        let a = crypto.password_hash(&salt, "verysecure").unwrap();
        let b = crypto.password_hash(&salt, "verysecure").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.bin().len(), 32);
        let other = crypto.password_hash(&salt, "verysecurf").unwrap();
        assert_ne!(a, other);
    }

    #[test]
    fn argon2_is_deterministic_and_sized() {
        let crypto = quick_argon2();
        let salt = Value::from_bytes(vec![0u8; 16]);
        let a = crypto.password_hash(&salt, "verysecure").unwrap();
        let b = crypto.password_hash(&salt, "verysecure").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.bin().len(), 32);
    }

    #[test]
    fn secure_compare_hashes_then_compares() {
        let crypto = provider(SodiumConfig::default());
        let a = Value::from_hex("00ff3b16").unwrap();
        let same = Value::from_hex("00ff3b16").unwrap();
        let diff = Value::from_hex("00ff3b17").unwrap();
        let longer = Value::from_hex("00ff3b1600").unwrap();
        assert!(crypto.secure_compare(&a, &same));
        assert!(!crypto.secure_compare(&a, &diff));
        assert!(!crypto.secure_compare(&a, &longer));
    }

    #[test]
    fn salt_tracks_digest_len() {
        assert_eq!(provider(SodiumConfig::default()).salt().bin().len(), 32);
        let wide = provider(SodiumConfig {
            hash: SodiumHash::Sha512,
            ..SodiumConfig::default()
        });
        assert_eq!(wide.salt().bin().len(), 64);
    }
}
