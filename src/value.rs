//! Representation-agnostic protocol values.
//!
//! Every quantity SRP exchanges or derives is one non-negative integer that
//! different peers want in different shapes: big-endian bytes on the wire,
//! lowercase hex in JSON-ish transports, a big integer inside the modular
//! arithmetic. [`Value`] holds one integer and serves all three views,
//! converting lazily and caching each view the first time it is asked for.

use core::fmt;

use num_bigint::BigUint;
use once_cell::sync::OnceCell;

use crate::errors::SrpError;

/// An immutable non-negative integer with memoized integer, big-endian byte
/// and lowercase-hex views.
///
/// The view supplied at construction is authoritative; the others derive from
/// it on first access:
///
/// ```
/// use esrp::Value;
///
/// let v = Value::from(14159265359u64);
/// assert_eq!(v.hex(), "034bf53e4f");
/// assert_eq!(v.bin(), [0x03, 0x4b, 0xf5, 0x3e, 0x4f]);
/// ```
#[derive(Clone)]
pub struct Value {
    int: OnceCell<BigUint>,
    bin: OnceCell<Vec<u8>>,
    hex: OnceCell<String>,
}

impl Value {
    fn empty() -> Self {
        Self {
            int: OnceCell::new(),
            bin: OnceCell::new(),
            hex: OnceCell::new(),
        }
    }

    /// Wrap an unsigned big integer.
    pub fn from_int(n: BigUint) -> Self {
        let value = Self::empty();
        let _ = value.int.set(n);
        value
    }

    /// Wrap a big-endian byte string. Leading zero bytes are kept as given;
    /// they do not change the integer the value encodes.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        let value = Self::empty();
        let _ = value.bin.set(bytes.into());
        value
    }

    /// Parse a hexadecimal string (case-insensitive on input, lowercase on
    /// output). Odd-length input is left-padded with a single `'0'`.
    pub fn from_hex(hex: &str) -> Result<Self, SrpError> {
        if hex.is_empty() || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(SrpError::MalformedValue(hex.to_owned()));
        }
        let mut normalized = String::with_capacity(hex.len() + 1);
        if hex.len() % 2 == 1 {
            normalized.push('0');
        }
        normalized.extend(hex.chars().map(|c| c.to_ascii_lowercase()));

        let value = Self::empty();
        let _ = value.hex.set(normalized);
        Ok(value)
    }

    /// The unsigned integer view.
    pub fn int(&self) -> &BigUint {
        self.int.get_or_init(|| {
            let hex = self.hex();
            if hex.is_empty() {
                BigUint::default()
            } else {
                BigUint::parse_bytes(hex.as_bytes(), 16)
                    .expect("hex view is validated at construction")
            }
        })
    }

    /// The big-endian byte view.
    pub fn bin(&self) -> &[u8] {
        self.bin.get_or_init(|| {
            hex::decode(self.hex()).expect("hex view is validated at construction")
        })
    }

    /// The lowercase even-length hex view.
    pub fn hex(&self) -> &str {
        self.hex.get_or_init(|| match self.bin.get() {
            Some(bin) => hex::encode(bin),
            None => {
                let int = self.int.get().expect("one view is seeded at construction");
                let mut hex = format!("{int:x}");
                if hex.len() % 2 == 1 {
                    hex.insert(0, '0');
                }
                hex
            }
        })
    }
}

impl PartialEq for Value {
    /// Integer equality across whichever views the two sides hold. Not
    /// constant-time; protocol proof comparison goes through
    /// [`Crypto::secure_compare`](crate::Crypto::secure_compare).
    fn eq(&self, other: &Self) -> bool {
        self.int() == other.int()
    }
}

impl Eq for Value {}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Value({})", self.hex())
    }
}

impl From<BigUint> for Value {
    fn from(n: BigUint) -> Self {
        Self::from_int(n)
    }
}

macro_rules! impl_from_uint {
    ($($t:ty),*) => {
        $(impl From<$t> for Value {
            fn from(n: $t) -> Self {
                Self::from_int(BigUint::from(n))
            }
        })*
    };
}

impl_from_uint!(u8, u16, u32, u64, u128);
