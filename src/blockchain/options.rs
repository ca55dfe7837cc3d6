use serde::{Serialize, Deserialize};

use crate::block::HashAlgorithm;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainOptions {
    /// Hash function used to calculate digests of the
    /// new blocks and to validate the stored ones.
    /// 
    /// Must be the same as the one used to write
    /// the chain file.
    /// 
    /// Default is sha256.
    pub hash_algorithm: HashAlgorithm,

    /// Flush file content to the disk after
    /// each appended block.
    /// 
    /// Default is false.
    pub sync_on_append: bool
}

impl Default for ChainOptions {
    fn default() -> Self {
        Self {
            hash_algorithm: HashAlgorithm::Sha256,
            sync_on_append: false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize() -> Result<(), serde_json::Error> {
        assert_eq!(serde_json::from_str::<ChainOptions>("{}")?, ChainOptions::default());

        let options = serde_json::from_str::<ChainOptions>(r#"{ "hash_algorithm": "blake3" }"#)?;

        assert_eq!(options.hash_algorithm, HashAlgorithm::Blake3);
        assert!(!options.sync_on_append);

        let options = serde_json::from_str::<ChainOptions>(r#"{ "sync_on_append": true }"#)?;

        assert_eq!(options.hash_algorithm, HashAlgorithm::Sha256);
        assert!(options.sync_on_append);

        assert!(serde_json::from_str::<ChainOptions>(r#"{ "hash_algorithm": "md5" }"#).is_err());

        Ok(())
    }
}
