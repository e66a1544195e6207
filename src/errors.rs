//! Error types.

use core::fmt;
use std::error;

/// Errors surfaced by value parsing, provider configuration and the
/// authentication protocol itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SrpError {
    /// A configuration record selected an option value the provider does not
    /// implement.
    NotApplicable {
        /// Configuration key that was rejected
        option: &'static str,
        /// Offending value, as supplied
        value: String,
        /// Human-readable list of accepted values
        allowed: &'static str,
    },
    /// An input string failed value-representation parsing.
    MalformedValue(String),
    /// Requested group bit-length has no RFC 5054 entry.
    UnknownGroup(u32),
    /// A protocol value failed its validity check (`A ≡ 0`, `B ≡ 0`, `u = 0`).
    IllegalParameter {
        /// Parameter name
        name: &'static str,
    },
    /// A peer's proof did not match the locally derived one.
    BadRecordMac {
        /// Which peer's proof is invalid
        peer: &'static str,
    },
    /// The password KDF itself failed (e.g. parameter rejection or
    /// out-of-memory); the underlying reason is carried verbatim.
    PasswordHash(String),
}

impl fmt::Display for SrpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotApplicable {
                option,
                value,
                allowed,
            } => {
                write!(
                    f,
                    "not_applicable: '{value}' is not a supported '{option}' (allowed: {allowed})"
                )
            }
            Self::MalformedValue(input) => {
                write!(f, "malformed_value: cannot parse '{input}' as hex")
            }
            Self::UnknownGroup(bits) => {
                write!(f, "unknown_group: no {bits}-bit group")
            }
            Self::IllegalParameter { name } => {
                write!(f, "illegal_parameter: bad '{name}' value")
            }
            Self::BadRecordMac { peer } => {
                write!(f, "bad_record_mac: incorrect '{peer}' proof")
            }
            Self::PasswordHash(reason) => {
                write!(f, "password hashing failed: {reason}")
            }
        }
    }
}

impl error::Error for SrpError {}
