use crate::result::Error;
use rand::{rngs::StdRng, RngCore, SeedableRng};
use serde::{Deserialize, Serialize};
use sha3::{Digest, Sha3_256};
use std::fmt;
use std::str::FromStr;

/// Domain separation tag mixed into every RNG derived from a seed.
const RNG_DOMAIN: &[u8] = b"ARMOR_CONSTRAINT_GENERATION";

/// A 256-bit generation seed
///
/// Every pseudorandom choice made while building a constraint system is drawn
/// from the RNG returned by [`Seed::create_deterministic_rng`], so a seed and a
/// secret fully determine the generated artifact.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Seed {
    /// The 256-bit seed
    inner: [u8; 32],
}

impl Seed {
    /// Generate a new random 256-bit seed
    pub fn generate() -> Self {
        let mut seed = [0u8; 32];
        rand::rng().fill_bytes(&mut seed);
        Self { inner: seed }
    }

    /// Create from an integer seed, as accepted on the command line.
    ///
    /// The integer is stored little-endian in the low 16 bytes, so `0` and
    /// `-1` are distinct seeds.
    pub fn from_integer(value: i128) -> Self {
        let mut seed = [0u8; 32];
        seed[..16].copy_from_slice(&value.to_le_bytes());
        Self { inner: seed }
    }

    /// Create from hex string (with or without 0x prefix)
    pub fn from_hex(hex: &str) -> Result<Self, Error> {
        let hex = hex.strip_prefix("0x").unwrap_or(hex);
        if hex.len() != 64 {
            return Err(Error::InvalidSeedLength(hex.len()));
        }

        let bytes = hex::decode(hex).map_err(|_| Error::InvalidSeedHex)?;
        let mut seed = [0u8; 32];
        seed.copy_from_slice(&bytes);
        Ok(Self { inner: seed })
    }

    /// Convert to hex string with 0x prefix
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.inner))
    }

    /// Create a deterministic RNG for constraint generation.
    ///
    /// The same seed always yields the same stream, regardless of whether the
    /// seed came from an integer, from hex, or from [`Seed::generate`].
    pub fn create_deterministic_rng(&self) -> StdRng {
        let mut hasher = Sha3_256::new();
        hasher.update(RNG_DOMAIN);
        hasher.update(self.inner);
        let seed_hash: [u8; 32] = hasher.finalize().into();

        StdRng::from_seed(seed_hash)
    }

    /// Get a hash of this seed for identification purposes
    pub fn hash(&self) -> [u8; 32] {
        let mut hasher = Sha3_256::new();
        hasher.update(self.inner);
        hasher.finalize().into()
    }

    /// Get the hash as hex string
    pub fn hash_hex(&self) -> String {
        format!("0x{}", hex::encode(self.hash()))
    }
}

impl FromStr for Seed {
    type Err = Error;

    /// Parses either a 0x-prefixed 64 digit hex seed or a decimal integer.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.starts_with("0x") {
            return Self::from_hex(s);
        }
        s.parse::<i128>()
            .map(Self::from_integer)
            .map_err(|_| Error::InvalidSeed(s.to_string()))
    }
}

impl fmt::Display for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Seed({})", self.to_hex())
    }
}
