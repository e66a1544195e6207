//! Engine variants: the deployed formulations of `x`, `M1` and `M2`.

use crate::crypto::Crypto;
use crate::engine::{Engine, Variant};
use crate::errors::SrpError;
use crate::value::Value;

/// The enhanced formulation.
///
/// The private key comes from the provider's password-hashing function
/// (PBKDF2/scrypt/argon2) rather than a bare digest, and both confirmation
/// messages are MACs under the session key. The username does not enter any
/// derivation, so accounts can be renamed without re-registering a verifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct Standard;

impl Variant for Standard {
    fn compute_x<C: Crypto>(
        engine: &Engine<C, Self>,
        password: &str,
        salt: &Value,
        _username: Option<&str>,
    ) -> Result<Value, SrpError> {
        engine.crypto().password_hash(salt, password)
    }

    // M1 = MAC(K, A | s | B)
    fn compute_m1<C: Crypto>(
        engine: &Engine<C, Self>,
        key: &Value,
        a_pub: &Value,
        b_pub: &Value,
        _premaster: &Value,
        salt: &Value,
        _username: &str,
    ) -> Value {
        let mut msg = a_pub.bin().to_vec();
        msg.extend_from_slice(salt.bin());
        msg.extend_from_slice(b_pub.bin());
        engine.crypto().keyed_hash(key, &Value::from_bytes(msg))
    }

    // M2 = MAC(K, A | M1)
    fn compute_m2<C: Crypto>(
        engine: &Engine<C, Self>,
        key: &Value,
        a_pub: &Value,
        m1: &Value,
        _premaster: &Value,
    ) -> Value {
        let mut msg = a_pub.bin().to_vec();
        msg.extend_from_slice(m1.bin());
        engine.crypto().keyed_hash(key, &Value::from_bytes(msg))
    }
}

/// The RFC 5054 / RFC 2945 formulation, for interop with textbook SRP-6a
/// peers.
///
/// `x = H(s | H(I | ':' | p))`, `M1 = H(H(N) XOR H(PAD(g)) | H(I) | s | A |
/// B | K)`, `M2 = H(A | M1 | K)`. The username is bound into both `x` and
/// `M1`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Rfc5054;

impl Variant for Rfc5054 {
    fn compute_x<C: Crypto>(
        engine: &Engine<C, Self>,
        password: &str,
        salt: &Value,
        username: Option<&str>,
    ) -> Result<Value, SrpError> {
        let crypto = engine.crypto();
        let identity = Value::from_bytes(identity_string(username.unwrap_or(""), password));
        let identity_hash = crypto.h(&[&identity]);
        Ok(crypto.h(&[salt, &identity_hash]))
    }

    fn compute_m1<C: Crypto>(
        engine: &Engine<C, Self>,
        key: &Value,
        a_pub: &Value,
        b_pub: &Value,
        _premaster: &Value,
        salt: &Value,
        username: &str,
    ) -> Value {
        let crypto = engine.crypto();
        let n = Value::from_bytes(engine.group().n.to_bytes_be());
        let g = Value::from_int(engine.group().g.clone());
        let h_n = crypto.h(&[&n]);
        let h_g = crypto.h(&[&engine.pad(&g)]);
        let n_xor_g: Vec<u8> = h_n
            .bin()
            .iter()
            .zip(h_g.bin())
            .map(|(a, b)| a ^ b)
            .collect();
        let h_i = crypto.h(&[&Value::from_bytes(username.as_bytes().to_vec())]);
        crypto.h(&[
            &Value::from_bytes(n_xor_g),
            &h_i,
            salt,
            a_pub,
            b_pub,
            key,
        ])
    }

    fn compute_m2<C: Crypto>(
        engine: &Engine<C, Self>,
        key: &Value,
        a_pub: &Value,
        m1: &Value,
        _premaster: &Value,
    ) -> Value {
        engine.crypto().h(&[a_pub, m1, key])
    }
}

// I | ':' | p
fn identity_string(username: &str, password: &str) -> Vec<u8> {
    let mut buf = username.as_bytes().to_vec();
    buf.push(b':');
    buf.extend_from_slice(password.as_bytes());
    buf
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{OpensslConfig, OpensslCrypto, OpensslHash};
    use crate::groups::G_1024;
    use hex_literal::hex;

    #[test]
    fn standard_proofs_match_hmac_vectors() {
        let crypto = OpensslCrypto::default();
        let engine: Engine<OpensslCrypto, Standard> = Engine::new(crypto, &G_1024);
        let key =
            Value::from_hex("f4ffd830b255f778b9d88966e87ae1d72702227cfcbeae4bd1e4b39fff136060")
                .unwrap();
        let a_pub = Value::from_hex("0a0b0c").unwrap();
        let b_pub = Value::from_hex("1f2e3d").unwrap();
        let salt = Value::from_hex("1117").unwrap();
        let premaster = Value::from_hex("00").unwrap();

        let m1 = engine.compute_m1(&key, &a_pub, &b_pub, &premaster, &salt, "ignored");
        assert_eq!(
            m1.hex(),
            "4ba070cb34f6b16adc372061c4d614d07e49130a7c6fb5258da602615a1abb4e"
        );
        let m2 = engine.compute_m2(&key, &a_pub, &m1, &premaster);
        assert_eq!(
            m2.hex(),
            "358bd1e42fa1de52dbe5f5395dcd75967ca52d9efd1cd78c9474749b23eec58f"
        );
    }

    #[test]
    fn standard_x_ignores_the_username() {
        let crypto = OpensslCrypto::default();
        let engine: Engine<OpensslCrypto, Standard> = Engine::new(crypto, &G_1024);
        let salt = Value::from_hex("1117").unwrap();
        let anonymous = engine.compute_x("verysecure", &salt, None).unwrap();
        let named = engine.compute_x("verysecure", &salt, Some("alice")).unwrap();
        assert_eq!(anonymous, named);
    }

    #[test]
    fn rfc5054_x_matches_the_published_vector() {
        let crypto = OpensslCrypto::new(OpensslConfig {
            hash: OpensslHash::Sha1,
            ..OpensslConfig::default()
        })
        .unwrap();
        let engine: Engine<OpensslCrypto, Rfc5054> = Engine::new(crypto, &G_1024);
        let salt = Value::from_bytes(hex!("BEB25379 D1A8581E B5A72767 3A2441EE").to_vec());
        let x = engine
            .compute_x("password123", &salt, Some("alice"))
            .unwrap();
        assert_eq!(
            x.bin(),
            hex!("94B7555A ABE9127C C58CCF49 93DB6CF8 4D16C124")
        );
    }

    #[test]
    fn rfc5054_x_binds_the_username() {
        let crypto = OpensslCrypto::default();
        let engine: Engine<OpensslCrypto, Rfc5054> = Engine::new(crypto, &G_1024);
        let salt = Value::from_hex("1117").unwrap();
        let alice = engine.compute_x("verysecure", &salt, Some("alice")).unwrap();
        let bob = engine.compute_x("verysecure", &salt, Some("bob")).unwrap();
        assert_ne!(alice, bob);
    }
}
