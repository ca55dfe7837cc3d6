use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Deserialize};
use sha2::{Sha256, Digest};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HashAlgorithmError {
    #[error("Unknown hash algorithm: {0}. Expected sha256 or blake3")]
    UnknownAlgorithm(String)
}

/// Hash function used to calculate blocks digests.
/// 
/// Digests are stored as lowercase hex strings so
/// the chosen algorithm is not recorded in the chain file.
/// Opening a chain with a different algorithm than the one
/// it was written with will make every block fail validation.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    #[default]
    Sha256,
    Blake3
}

impl HashAlgorithm {
    #[inline]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Sha256 => "sha256",
            Self::Blake3 => "blake3"
        }
    }

    /// Calculate hex encoded digest of the given bytes.
    pub fn digest(&self, data: impl AsRef<[u8]>) -> String {
        match self {
            Self::Sha256 => hex::encode(Sha256::digest(data.as_ref())),
            Self::Blake3 => blake3::hash(data.as_ref()).to_hex().to_string()
        }
    }
}

impl fmt::Display for HashAlgorithm {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HashAlgorithm {
    type Err = HashAlgorithmError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "sha256" | "sha-256" => Ok(Self::Sha256),
            "blake3" => Ok(Self::Blake3),

            _ => Err(HashAlgorithmError::UnknownAlgorithm(value.to_string()))
        }
    }
}

#[inline]
/// Calculate SHA-256 hex digest of the given bytes.
pub fn hash(data: impl AsRef<[u8]>) -> String {
    HashAlgorithm::Sha256.digest(data)
}
