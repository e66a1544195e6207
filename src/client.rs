//! SRP client session.
//!
//! # Usage
//! Create a client from a crypto provider and a group (both must match the
//! server's), register once, then authenticate per session:
//!
//! ```
//! use esrp::{Crypto, Group, OpensslCrypto, SrpClient};
//!
//! let client: SrpClient<OpensslCrypto> =
//!     SrpClient::new(OpensslCrypto::default(), Group::default_group());
//!
//! // Registration: send the record to the server over a protected channel.
//! let record = client.register("alice", "password123").unwrap();
//! # let server: esrp::SrpServer<OpensslCrypto> =
//! #     esrp::SrpServer::new(OpensslCrypto::default(), Group::default_group());
//!
//! // Authentication: exchange ephemerals, then proofs.
//! let a = client.engine().crypto().random(32);
//! let a_pub = client.compute_public_ephemeral(&a);
//! # let b = server.engine().crypto().random(32);
//! # let b_pub = server.compute_public_ephemeral(&b, &record.verifier);
//! let verifier = client
//!     .process_reply(&a, "alice", "password123", &record.salt, &b_pub)
//!     .unwrap();
//! # let sv = server.process_reply(&record, &b, &a_pub).unwrap();
//! # sv.verify_client(verifier.proof()).unwrap();
//! // send `verifier.proof()`, then check the server's reply:
//! # let m2 = sv.proof();
//! verifier.verify_server(m2).unwrap();
//! let session_key = verifier.key();
//! ```

use crate::crypto::Crypto;
use crate::engine::{Engine, Variant};
use crate::errors::SrpError;
use crate::groups::Group;
use crate::server::UserRecord;
use crate::value::Value;
use crate::variants::Standard;

/// Client side of the handshake.
pub struct SrpClient<C: Crypto, V: Variant = Standard> {
    engine: Engine<C, V>,
}

/// Client state after processing the server's reply: holds the session key
/// and both proofs.
pub struct SrpClientVerifier<'a, C: Crypto, V: Variant> {
    engine: &'a Engine<C, V>,
    key: Value,
    proof: Value,
    server_proof: Value,
}

impl<C: Crypto, V: Variant> SrpClient<C, V> {
    pub fn new(crypto: C, group: &'static Group) -> Self {
        Self {
            engine: Engine::new(crypto, group),
        }
    }

    pub fn engine(&self) -> &Engine<C, V> {
        &self.engine
    }

    /// Registration: draw a fresh salt, derive the verifier, and bundle the
    /// record the server persists. The password itself never leaves here.
    pub fn register(&self, username: &str, password: &str) -> Result<UserRecord, SrpError> {
        let salt = self.engine.crypto().salt();
        let verifier = self.compute_verifier(username, password, &salt)?;
        Ok(UserRecord {
            username: username.to_owned(),
            salt,
            verifier,
        })
    }

    /// `v = g^x mod N` for a caller-chosen salt.
    pub fn compute_verifier(
        &self,
        username: &str,
        password: &str,
        salt: &Value,
    ) -> Result<Value, SrpError> {
        let x = self.engine.compute_x(password, salt, Some(username))?;
        Ok(self.engine.compute_v(&x))
    }

    /// `A = g^a mod N` for handshaking with the server.
    pub fn compute_public_ephemeral(&self, a: &Value) -> Value {
        self.engine.compute_a_pub(a)
    }

    /// Process the server's `(salt, B)` reply.
    ///
    /// `a` is the session's random secret ephemeral. Rejects a hostile
    /// `B ≡ 0 (mod N)` and a zero scrambling parameter before touching the
    /// password.
    pub fn process_reply(
        &self,
        a: &Value,
        username: &str,
        password: &str,
        salt: &Value,
        b_pub: &Value,
    ) -> Result<SrpClientVerifier<'_, C, V>, SrpError> {
        if self.engine.is_zero_mod_n(b_pub) {
            return Err(SrpError::IllegalParameter { name: "b_pub" });
        }

        let a_pub = self.engine.compute_a_pub(a);
        let u = self.engine.compute_u(&a_pub, b_pub);
        if self.engine.is_zero_mod_n(&u) {
            return Err(SrpError::IllegalParameter { name: "u" });
        }

        let x = self.engine.compute_x(password, salt, Some(username))?;
        let premaster = self.engine.compute_client_premaster_secret(b_pub, a, &x, &u);
        let key = self.engine.compute_session_key(&premaster);
        let proof = self
            .engine
            .compute_m1(&key, &a_pub, b_pub, &premaster, salt, username);
        let server_proof = self.engine.compute_m2(&key, &a_pub, &proof, &premaster);

        Ok(SrpClientVerifier {
            engine: &self.engine,
            key,
            proof,
            server_proof,
        })
    }
}

impl<C: Crypto, V: Variant> SrpClientVerifier<'_, C, V> {
    /// The shared session key. Meaningful only after [`verify_server`]
    /// succeeds (or the key is confirmed through other authenticated means).
    ///
    /// [`verify_server`]: Self::verify_server
    pub fn key(&self) -> &Value {
        &self.key
    }

    /// `M1`, for sending to the server.
    pub fn proof(&self) -> &Value {
        &self.proof
    }

    /// Check the server's `M2` against the locally derived one.
    pub fn verify_server(&self, reply: &Value) -> Result<(), SrpError> {
        if self.engine.crypto().secure_compare(&self.server_proof, reply) {
            Ok(())
        } else {
            Err(SrpError::BadRecordMac { peer: "server" })
        }
    }
}
