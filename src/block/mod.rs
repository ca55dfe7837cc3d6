use serde::{Serialize, Deserialize};

pub(crate) mod digest;
pub(crate) mod time;
pub(crate) mod builder;

pub use digest::*;
pub use time::*;
pub use builder::*;

pub mod prelude {
    pub use super::{
        Block,
        BlockBuilder,
        HashAlgorithm,
        HashAlgorithmError,
        hash,
        timestamp_millis
    };
}

/// Single immutable record of the ledger.
/// 
/// Blocks are plain values: reading a block from a chain
/// returns an independent copy with no reference to the storage.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Block {
    // Header
    pub(crate) index: u64,
    pub(crate) timestamp: u64,
    pub(crate) prev_digest: String,

    // Body
    pub(crate) payload: Vec<u8>,
    pub(crate) digest: String
}

impl Block {
    /// Create new block with the current timestamp
    /// and SHA-256 digest of the payload.
    /// 
    /// `prev_digest` must be empty for the genesis block.
    /// 
    /// ```
    /// use hashledger::block::{Block, hash};
    /// 
    /// let root = Block::create("", 0, b"genesis");
    /// let block = Block::create(root.digest(), 1, b"second");
    /// 
    /// assert!(root.is_genesis());
    /// assert_eq!(block.prev_digest(), root.digest());
    /// assert_eq!(block.digest(), hash(b"second"));
    /// ```
    pub fn create(prev_digest: impl Into<String>, index: u64, payload: impl Into<Vec<u8>>) -> Self {
        BlockBuilder::new()
            .with_previous(prev_digest)
            .with_index(index)
            .with_payload(payload)
            .build()
    }

    #[inline]
    /// Sequence number of the block in the chain.
    pub fn index(&self) -> u64 {
        self.index
    }

    #[inline]
    /// UTC timestamp (amount of milliseconds) when
    /// this block was made.
    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    #[inline]
    /// Digest of the previous block.
    /// 
    /// Empty for the genesis block.
    pub fn prev_digest(&self) -> &str {
        &self.prev_digest
    }

    #[inline]
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    #[inline]
    /// Get digest stored in the block.
    /// 
    /// This method will not validate the digest so
    /// you should treat its value as insecure.
    pub fn digest(&self) -> &str {
        &self.digest
    }

    #[inline]
    /// Check if the block looks like a chain's root.
    pub fn is_genesis(&self) -> bool {
        self.index == 0 && self.prev_digest.is_empty()
    }

    #[inline]
    /// Calculate digest of the block's payload.
    /// 
    /// Only the payload is hashed: index, timestamp and
    /// previous digest are not covered by the digest.
    pub fn calculate_digest(&self, algorithm: HashAlgorithm) -> String {
        algorithm.digest(&self.payload)
    }

    #[inline]
    /// Compare stored digest with the calculated one.
    pub fn verify_digest(&self, algorithm: HashAlgorithm) -> bool {
        self.digest == self.calculate_digest(algorithm)
    }
}
