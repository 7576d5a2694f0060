//! Opaque record identifiers and the sources that generate them.

use std::fmt;
use std::str::FromStr;

use rand::rngs::OsRng;
use rand::RngCore;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};

use crate::Error;

/// Number of random bytes in an identifier.
pub const IDENTIFIER_LEN: usize = 29;

/// Key shared by customers and reservations.
///
/// Ordering is lexicographic over the raw bytes, which is also the order
/// of the lower-case hex text form.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Identifier([u8; IDENTIFIER_LEN]);

impl Identifier {
    pub const fn from_bytes(bytes: [u8; IDENTIFIER_LEN]) -> Self {
        Self(bytes)
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identifier({})", self.to_hex())
    }
}

impl FromStr for Identifier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut bytes = [0u8; IDENTIFIER_LEN];
        hex::decode_to_slice(s.trim(), &mut bytes)
            .map_err(|_| Error::InvalidIdentifier(s.to_owned()))?;
        Ok(Self(bytes))
    }
}

impl Serialize for Identifier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Identifier {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(de::Error::custom)
    }
}

/// Produces fresh identifiers for newly created records.
pub trait IdentifierSource: Send + Sync {
    fn generate(&self) -> Result<Identifier, Error>;
}

/// Draws identifiers from the operating system's CSPRNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsRandomSource;

impl IdentifierSource for OsRandomSource {
    fn generate(&self) -> Result<Identifier, Error> {
        let mut bytes = [0u8; IDENTIFIER_LEN];
        OsRng.try_fill_bytes(&mut bytes)?;
        Ok(Identifier(bytes))
    }
}
