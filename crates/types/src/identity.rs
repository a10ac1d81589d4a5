use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const HEX_PREFIX: &str = "0x";
const DERIVE_DOMAIN: &[u8] = b"PET_REGISTRY_IDENTITY";

/// Why a caller identity could not be decoded.
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("caller identity is missing its '0x' prefix")]
    MissingPrefix,
    #[error("caller identity holds {len} bytes, expected 32")]
    BadLength { len: usize },
    #[error("caller identity is not hexadecimal")]
    BadHex(#[from] hex::FromHexError),
}

/// Opaque caller principal handed to the registry by its host on every call.
///
/// The registry never authenticates it; equality is all that matters. Text
/// form is `0x` plus 64 lowercase hex digits, which is also how serde
/// encodes it.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identity(pub [u8; 32]);

impl Identity {
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Stable identity for a label, for hosts and tests that mint their own
    /// principals.
    pub fn derive(label: impl AsRef<[u8]>) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(DERIVE_DOMAIN);
        hasher.update(label.as_ref());
        Self(*hasher.finalize().as_bytes())
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Rebuild from a raw storage key.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, IdentityError> {
        <[u8; 32]>::try_from(bytes)
            .map(Self)
            .map_err(|_| IdentityError::BadLength { len: bytes.len() })
    }
}

impl FromStr for Identity {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix(HEX_PREFIX)
            .ok_or(IdentityError::MissingPrefix)?;
        Self::from_slice(&hex::decode(digits)?)
    }
}

impl TryFrom<String> for Identity {
    type Error = IdentityError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Identity> for String {
    fn from(value: Identity) -> Self {
        value.to_string()
    }
}

impl From<[u8; 32]> for Identity {
    fn from(value: [u8; 32]) -> Self {
        Self(value)
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{HEX_PREFIX}{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identity({self})")
    }
}
