//! SRP server session.
//!
//! # Usage
//! Look the user's record up by username, generate `b`, and send back
//! `(salt, B)`:
//!
//! ```
//! use esrp::{Crypto, Group, OpensslCrypto, SrpClient, SrpServer};
//!
//! let server: SrpServer<OpensslCrypto> =
//!     SrpServer::new(OpensslCrypto::default(), Group::default_group());
//! # let client: SrpClient<OpensslCrypto> =
//! #     SrpClient::new(OpensslCrypto::default(), Group::default_group());
//! # let record = client.register("alice", "password123").unwrap();
//! # let a = client.engine().crypto().random(32);
//! # let a_pub = client.compute_public_ephemeral(&a);
//!
//! let b = server.engine().crypto().random(32);
//! let b_pub = server.compute_public_ephemeral(&b, &record.verifier);
//! // send (record.salt, b_pub); receive the client's A and M1
//!
//! let verifier = server.process_reply(&record, &b, &a_pub).unwrap();
//! # let cv = client
//! #     .process_reply(&a, "alice", "password123", &record.salt, &b_pub)
//! #     .unwrap();
//! # let m1 = cv.proof();
//! verifier.verify_client(m1).unwrap();
//! // authentication succeeded: reply with M2 and start using the key
//! let m2 = verifier.proof();
//! let session_key = verifier.key();
//! # cv.verify_server(m2).unwrap();
//! ```

use crate::crypto::Crypto;
use crate::engine::{Engine, Variant};
use crate::errors::SrpError;
use crate::groups::Group;
use crate::value::Value;
use crate::variants::Standard;

/// What the server persists per user. Produced by registration, consumed
/// when a handshake starts; the serialization is the caller's business.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub username: String,
    pub salt: Value,
    /// Password verifier
    pub verifier: Value,
}

/// Server side of the handshake.
pub struct SrpServer<C: Crypto, V: Variant = Standard> {
    engine: Engine<C, V>,
}

/// Server state after processing the client's handshake: holds the session
/// key, the expected `M1` and the reply proof `M2`.
pub struct SrpServerVerifier<'a, C: Crypto, V: Variant> {
    engine: &'a Engine<C, V>,
    m1: Value,
    m2: Value,
    key: Value,
}

impl<C: Crypto, V: Variant> SrpServer<C, V> {
    pub fn new(crypto: C, group: &'static Group) -> Self {
        Self {
            engine: Engine::new(crypto, group),
        }
    }

    pub fn engine(&self) -> &Engine<C, V> {
        &self.engine
    }

    /// `B = (k*v + g^b) % N` for sending to the client.
    pub fn compute_public_ephemeral(&self, b: &Value, verifier: &Value) -> Value {
        self.engine.compute_b_pub(b, verifier)
    }

    /// Process the client's `A`.
    ///
    /// `b` is the same secret ephemeral `B` was computed from. Rejects a
    /// hostile `A ≡ 0 (mod N)` before deriving anything.
    pub fn process_reply(
        &self,
        user: &UserRecord,
        b: &Value,
        a_pub: &Value,
    ) -> Result<SrpServerVerifier<'_, C, V>, SrpError> {
        if self.engine.is_zero_mod_n(a_pub) {
            return Err(SrpError::IllegalParameter { name: "a_pub" });
        }

        let b_pub = self.engine.compute_b_pub(b, &user.verifier);
        let u = self.engine.compute_u(a_pub, &b_pub);
        let premaster = self
            .engine
            .compute_server_premaster_secret(a_pub, b, &user.verifier, &u);
        let key = self.engine.compute_session_key(&premaster);
        let m1 = self.engine.compute_m1(
            &key,
            a_pub,
            &b_pub,
            &premaster,
            &user.salt,
            &user.username,
        );
        let m2 = self.engine.compute_m2(&key, a_pub, &m1, &premaster);

        Ok(SrpServerVerifier {
            engine: &self.engine,
            m1,
            m2,
            key,
        })
    }
}

impl<C: Crypto, V: Variant> SrpServerVerifier<'_, C, V> {
    /// The shared session key. Hand it out only after [`verify_client`]
    /// succeeds.
    ///
    /// [`verify_client`]: Self::verify_client
    pub fn key(&self) -> &Value {
        &self.key
    }

    /// `M2`, for the reply once the client's proof checks out.
    pub fn proof(&self) -> &Value {
        &self.m2
    }

    /// Check the client's `M1` against the locally derived one. A mismatch
    /// means the password (or the record) is wrong; abort without replying.
    pub fn verify_client(&self, reply: &Value) -> Result<(), SrpError> {
        if self.engine.crypto().secure_compare(&self.m1, reply) {
            Ok(())
        } else {
            Err(SrpError::BadRecordMac { peer: "client" })
        }
    }
}
