//! Cryptographic primitive providers.
//!
//! The engine never names a concrete hash, KDF or MAC; it talks to a
//! [`Crypto`] implementation. Two provider families ship with the crate,
//! selected for wire compatibility with the two primitive lineages deployed
//! SRP peers actually use:
//!
//! * [`OpensslCrypto`]: the OpenSSL lineage. SHA-1/256/384/512, PBKDF2 and
//!   HMAC, plus the legacy unkeyed modes some older deployments still run.
//! * [`SodiumCrypto`]: the libsodium lineage. SHA-2/BLAKE2b digests with
//!   scrypt or argon2id password hashing.
//!
//! Callers with other needs implement [`Crypto`] themselves and hand it to
//! the engine.

use rand::rngs::OsRng;
use rand::RngCore;

use crate::errors::SrpError;
use crate::value::Value;

mod openssl;
mod sodium;

pub use openssl::{OpensslConfig, OpensslCrypto, OpensslHash, OpensslKdf, OpensslMac};
pub use sodium::{KdfOverrides, SodiumConfig, SodiumCrypto, SodiumHash, SodiumKdf};

/// The primitive suite an [`Engine`](crate::Engine) draws on.
///
/// Implementations are immutable after construction and safe to share across
/// threads; the only non-determinism lives in [`salt`](Crypto::salt) and
/// [`random`](Crypto::random).
pub trait Crypto {
    /// Digest the concatenation of the given values. Which view of each
    /// value is concatenated is a provider property.
    fn h(&self, values: &[&Value]) -> Value;

    /// MAC `msg` under `key`.
    fn keyed_hash(&self, key: &Value, msg: &Value) -> Value;

    /// Stretch `password` with the configured password-hashing function.
    /// Deterministic for fixed `(salt, password)`.
    fn password_hash(&self, salt: &Value, password: &str) -> Result<Value, SrpError>;

    /// A fresh random salt, one digest wide.
    fn salt(&self) -> Value {
        self.random(self.digest_len())
    }

    /// `n` cryptographically random bytes.
    fn random(&self, n: usize) -> Value {
        let mut bytes = vec![0u8; n];
        OsRng.fill_bytes(&mut bytes);
        Value::from_bytes(bytes)
    }

    /// Constant-time equality of two values.
    fn secure_compare(&self, a: &Value, b: &Value) -> bool;

    /// Output size of the configured digest, in bytes.
    fn digest_len(&self) -> usize;
}
