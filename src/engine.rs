//! The SRP-6a arithmetic engine.
//!
//! [`Engine`] binds a [`Crypto`] provider to a [`Group`] and exposes every
//! protocol-defined derivation: the multiplier `k`, verifier `v`, public
//! ephemerals `A`/`B`, scrambling parameter `u`, both premaster secrets and
//! the session key `K`. The private-key and proof formulations differ across
//! deployed SRP dialects, so those three (`x`, `M1`, `M2`) are delegated to a
//! [`Variant`] type parameter.
//!
//! The engine is deterministic: it never draws randomness (ephemerals and
//! salts come from the caller or the provider) and is safe for concurrent
//! use once constructed.

use std::marker::PhantomData;

use num_bigint::BigUint;
use once_cell::sync::OnceCell;

use crate::crypto::Crypto;
use crate::errors::SrpError;
use crate::groups::Group;
use crate::value::Value;
use crate::variants::Standard;

/// A dialect of the `x`/`M1`/`M2` formulations.
///
/// Implementations are stateless markers; every operation receives the
/// engine it runs against.
pub trait Variant: Sized {
    /// Derive the private key `x` from the user's credentials.
    fn compute_x<C: Crypto>(
        engine: &Engine<C, Self>,
        password: &str,
        salt: &Value,
        username: Option<&str>,
    ) -> Result<Value, SrpError>;

    /// Derive the client proof `M1`.
    fn compute_m1<C: Crypto>(
        engine: &Engine<C, Self>,
        key: &Value,
        a_pub: &Value,
        b_pub: &Value,
        premaster: &Value,
        salt: &Value,
        username: &str,
    ) -> Value;

    /// Derive the server proof `M2` (HAMK).
    fn compute_m2<C: Crypto>(
        engine: &Engine<C, Self>,
        key: &Value,
        a_pub: &Value,
        m1: &Value,
        premaster: &Value,
    ) -> Value;
}

/// SRP arithmetic over one `(crypto, group)` pair.
pub struct Engine<C: Crypto, V: Variant = Standard> {
    crypto: C,
    group: &'static Group,
    k: OnceCell<Value>,
    variant: PhantomData<V>,
}

impl<C: Crypto, V: Variant> Engine<C, V> {
    /// Bind a provider to a group.
    pub fn new(crypto: C, group: &'static Group) -> Self {
        Self {
            crypto,
            group,
            k: OnceCell::new(),
            variant: PhantomData,
        }
    }

    /// Bind a provider to the default 2048-bit group.
    pub fn with_default_group(crypto: C) -> Self {
        Self::new(crypto, Group::default_group())
    }

    pub fn crypto(&self) -> &C {
        &self.crypto
    }

    pub fn group(&self) -> &'static Group {
        self.group
    }

    /// The multiplier `k = H(N | PAD(g))`, computed once per engine.
    pub fn k(&self) -> &Value {
        self.k.get_or_init(|| {
            let n = Value::from_bytes(self.group.n.to_bytes_be());
            let g = Value::from_int(self.group.g.clone());
            self.crypto.h(&[&n, &self.pad(&g)])
        })
    }

    /// Left-pad a value's bytes with NULs to the byte width of `N`.
    pub fn pad(&self, value: &Value) -> Value {
        let bytes = value.bin();
        let width = self.group.n_bytes();
        if bytes.len() >= width {
            return Value::from_bytes(bytes.to_vec());
        }
        let mut padded = vec![0u8; width - bytes.len()];
        padded.extend_from_slice(bytes);
        Value::from_bytes(padded)
    }

    /// Password verifier `v = g^x mod N`.
    pub fn compute_v(&self, x: &Value) -> Value {
        Value::from_int(self.group.g.modpow(x.int(), &self.group.n))
    }

    /// Client public ephemeral `A = g^a mod N`.
    pub fn compute_a_pub(&self, a: &Value) -> Value {
        Value::from_int(self.group.g.modpow(a.int(), &self.group.n))
    }

    /// Server public ephemeral `B = (k*v + g^b) % N`.
    ///
    /// The outer reduction is load-bearing: an unreduced `B` leaks that the
    /// sender knows `v`.
    pub fn compute_b_pub(&self, b: &Value, v: &Value) -> Value {
        let n = &self.group.n;
        let kv = (self.k().int() * v.int()) % n;
        Value::from_int((kv + self.group.g.modpow(b.int(), n)) % n)
    }

    /// Scrambling parameter `u = H(PAD(A) | PAD(B))`.
    pub fn compute_u(&self, a_pub: &Value, b_pub: &Value) -> Value {
        self.crypto.h(&[&self.pad(a_pub), &self.pad(b_pub)])
    }

    /// Client-side premaster secret `S = (B - k*g^x) ^ (a + u*x) % N`.
    pub fn compute_client_premaster_secret(
        &self,
        b_pub: &Value,
        a: &Value,
        x: &Value,
        u: &Value,
    ) -> Value {
        let n = &self.group.n;
        let kgx = (self.k().int() * self.group.g.modpow(x.int(), n)) % n;
        // B may be smaller than k*g^x % N; lift by N before subtracting.
        let base = ((n + b_pub.int()) - &kgx) % n;
        let exp = (u.int() * x.int()) + a.int();
        Value::from_int(base.modpow(&exp, n))
    }

    /// Server-side premaster secret `S = (A * v^u) ^ b % N`.
    pub fn compute_server_premaster_secret(
        &self,
        a_pub: &Value,
        b: &Value,
        v: &Value,
        u: &Value,
    ) -> Value {
        let n = &self.group.n;
        let base = (a_pub.int() * v.int().modpow(u.int(), n)) % n;
        Value::from_int(base.modpow(b.int(), n))
    }

    /// Session key `K = H(S)`.
    pub fn compute_session_key(&self, premaster: &Value) -> Value {
        self.crypto.h(&[premaster])
    }

    /// Private key `x`, per the engine's variant.
    pub fn compute_x(
        &self,
        password: &str,
        salt: &Value,
        username: Option<&str>,
    ) -> Result<Value, SrpError> {
        V::compute_x(self, password, salt, username)
    }

    /// Client proof `M1`, per the engine's variant.
    pub fn compute_m1(
        &self,
        key: &Value,
        a_pub: &Value,
        b_pub: &Value,
        premaster: &Value,
        salt: &Value,
        username: &str,
    ) -> Value {
        V::compute_m1(self, key, a_pub, b_pub, premaster, salt, username)
    }

    /// Server proof `M2`, per the engine's variant.
    pub fn compute_m2(
        &self,
        key: &Value,
        a_pub: &Value,
        m1: &Value,
        premaster: &Value,
    ) -> Value {
        V::compute_m2(self, key, a_pub, m1, premaster)
    }

    /// True iff the given public ephemeral reduces to zero mod N; such a
    /// value forces the premaster secret and must abort the handshake.
    pub fn is_zero_mod_n(&self, public: &Value) -> bool {
        public.int() % &self.group.n == BigUint::default()
    }
}
