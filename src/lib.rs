//! An enhanced [Secure Remote Password][1] (SRP-6a) implementation.
//!
//! SRP is an augmented password-authenticated key exchange: the client
//! proves knowledge of a password to a server that stores only a one-way
//! *verifier* derived from it, and both sides come away with a shared
//! session key. Nothing equivalent to the password ever crosses the wire,
//! and a stolen verifier database does not let an attacker impersonate
//! clients.
//!
//! Two things are "enhanced" relative to the textbook protocol:
//!
//! * the private key `x` comes from a real password-hashing function
//!   (PBKDF2, scrypt or argon2id) instead of a bare digest, and
//! * the confirmation messages `M1`/`M2` are HMACs under the session key
//!   instead of plain hashes.
//!
//! Both behaviors live in the [`Standard`] engine variant; the textbook
//! RFC 5054 / RFC 2945 formulation is available as the [`Rfc5054`] variant
//! for interoperating with classic deployments.
//!
//! # Structure
//!
//! * [`Value`]: every protocol quantity, viewable as a big integer,
//!   big-endian bytes or lowercase hex.
//! * [`Group`]: the RFC 5054 safe-prime groups (1024–8192 bits).
//! * [`Crypto`]: the primitive suite: hashing, password hashing, MACs,
//!   randomness, constant-time comparison. Shipped implementations:
//!   [`OpensslCrypto`] and [`SodiumCrypto`].
//! * [`Engine`]: the SRP derivations (`k`, `v`, `A`, `B`, `u`, `S`, `K`),
//!   parameterized by a proof [`Variant`].
//! * [`SrpClient`] / [`SrpServer`]: the two-round session orchestration.
//!
//! # Usage
//!
//! Pick a provider configuration and a group (both sides must agree on
//! them) and run the handshake:
//!
//! ```
//! use esrp::{Crypto, Group, OpensslCrypto, SrpClient, SrpServer};
//!
//! let group = Group::from_bits(2048).unwrap();
//! let client: SrpClient<OpensslCrypto> = SrpClient::new(OpensslCrypto::default(), group);
//! let server: SrpServer<OpensslCrypto> = SrpServer::new(OpensslCrypto::default(), group);
//!
//! // Registration (once, over a protected channel).
//! let record = client.register("alice", "correct horse").unwrap();
//!
//! // Per-session: exchange public ephemerals...
//! let a = client.engine().crypto().random(32);
//! let a_pub = client.compute_public_ephemeral(&a);
//! let b = server.engine().crypto().random(32);
//! let b_pub = server.compute_public_ephemeral(&b, &record.verifier);
//!
//! // ...then prove key agreement in both directions.
//! let client_session = client
//!     .process_reply(&a, "alice", "correct horse", &record.salt, &b_pub)
//!     .unwrap();
//! let server_session = server.process_reply(&record, &b, &a_pub).unwrap();
//!
//! server_session.verify_client(client_session.proof()).unwrap();
//! client_session.verify_server(server_session.proof()).unwrap();
//! assert_eq!(client_session.key(), server_session.key());
//! ```
//!
//! The library performs no I/O and imposes no wire format: `Value` exposes
//! canonical bytes and hex for whatever transport the application uses.
//!
//! [1]: https://datatracker.ietf.org/doc/html/rfc5054

pub mod client;
pub mod crypto;
pub mod engine;
pub mod errors;
pub mod groups;
pub mod server;
pub mod value;
pub mod variants;

pub use crate::client::{SrpClient, SrpClientVerifier};
pub use crate::crypto::{
    Crypto, KdfOverrides, OpensslConfig, OpensslCrypto, OpensslHash, OpensslKdf, OpensslMac,
    SodiumConfig, SodiumCrypto, SodiumHash, SodiumKdf,
};
pub use crate::engine::{Engine, Variant};
pub use crate::errors::SrpError;
pub use crate::groups::Group;
pub use crate::server::{SrpServer, SrpServerVerifier, UserRecord};
pub use crate::value::Value;
pub use crate::variants::{Rfc5054, Standard};
