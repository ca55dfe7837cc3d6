use std::fmt;

use crate::block::{Block, BlockBuilder, HashAlgorithm};

mod codec;
mod options;
mod chain_file;
mod memory_chain;

pub use codec::*;
pub use options::*;
pub use chain_file::*;
pub use memory_chain::*;

pub mod prelude {
    pub use super::{
        Blockchain,
        ChainValidationResult,
        ValidationFailure,
        IndexOverflow,
        ChainOptions,
        ChainFile,
        ChainFileError,
        ChainCursor,
        Blocks,
        MemoryChain
    };
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ChainValidationResult {
    /// Root block doesn't have index 0, references
    /// some previous block or has invalid digest.
    InvalidRoot {
        got_index: u64,
        got_previous: String
    },

    /// Stored digest doesn't match the block's payload.
    /// 
    /// `index` is the block's position in the chain.
    InvalidHash {
        index: u64,
        stored: String,
        calculated: String
    },

    /// Block's index doesn't follow the previous block's one.
    /// 
    /// `index` is the value expected at this position.
    InvalidIndex {
        index: u64,
        got: u64
    },

    /// Block doesn't reference the previous block's digest.
    /// 
    /// `index` is the block's position in the chain.
    InvalidPreviousHash {
        index: u64,
        expected: String,
        got: String
    },

    /// Blockchain is valid.
    Valid
}

impl ChainValidationResult {
    #[inline]
    pub fn is_valid(&self) -> bool {
        self == &Self::Valid
    }

    /// Position of the first invalid block in the chain.
    /// 
    /// Stored indexes of invalid blocks can't be trusted,
    /// so this is always a 0-based position, not the index
    /// written in the block.
    pub fn index(&self) -> Option<u64> {
        match self {
            Self::InvalidRoot { .. } => Some(0),

            Self::InvalidHash { index, .. } |
            Self::InvalidIndex { index, .. } |
            Self::InvalidPreviousHash { index, .. } => Some(*index),

            Self::Valid => None
        }
    }

    /// Kind of the validation failure.
    pub fn kind(&self) -> Option<ValidationFailure> {
        match self {
            Self::InvalidRoot { .. }         => Some(ValidationFailure::BadRoot),
            Self::InvalidHash { .. }         => Some(ValidationFailure::BadHash),
            Self::InvalidIndex { .. }        => Some(ValidationFailure::BadIndex),
            Self::InvalidPreviousHash { .. } => Some(ValidationFailure::BadPreviousHash),

            Self::Valid => None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationFailure {
    BadRoot,
    BadHash,
    BadIndex,
    BadPreviousHash
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadRoot         => f.write_str("bad root"),
            Self::BadHash         => f.write_str("bad hash"),
            Self::BadIndex        => f.write_str("bad idx"),
            Self::BadPreviousHash => f.write_str("bad previous hash")
        }
    }
}

/// Tail block already has the largest possible index
/// so no block can be chained after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
#[error("Can't chain a new block after the block with index {0}")]
pub struct IndexOverflow(pub u64);

/// Linear sequence of blocks.
/// 
/// Implementors only provide sequential reading and appending.
/// Lookups, tail search and validation are built on top of a
/// full scan, so every one of them costs O(n) reads.
pub trait Blockchain {
    type Error: std::error::Error + Send + Sync + From<IndexOverflow>;

    /// Iterator over all the stored blocks starting from the root.
    type Blocks<'a>: Iterator<Item = Result<Block, Self::Error>> where Self: 'a;

    /// Hash function used to calculate and verify blocks digests.
    fn hash_algorithm(&self) -> HashAlgorithm;

    /// Check if the blockchain doesn't have any blocks.
    fn is_empty(&self) -> Result<bool, Self::Error>;

    /// Start new sequential scan from the root block.
    /// 
    /// The scan is independent from any other scan
    /// or lookup made before.
    fn blocks(&mut self) -> Result<Self::Blocks<'_>, Self::Error>;

    /// Append block to the end of the blockchain.
    /// 
    /// This method doesn't verify that the block references
    /// the current tail. Use `add` to build a properly
    /// chained block.
    fn append(&mut self, block: Block) -> Result<(), Self::Error>;

    /// Get root block.
    fn first(&mut self) -> Result<Option<Block>, Self::Error> {
        self.blocks()?.next().transpose()
    }

    /// Get blockchain's tail (last) block with its
    /// 0-based position in the chain.
    /// 
    /// Return `None` if the blockchain is empty.
    fn last(&mut self) -> Result<Option<(u64, Block)>, Self::Error> {
        let mut tail = None;

        for (position, block) in self.blocks()?.enumerate() {
            tail = Some((position as u64, block?));
        }

        Ok(tail)
    }

    /// Count stored blocks.
    /// 
    /// The value is not cached and requires reading
    /// the whole blockchain.
    fn count(&mut self) -> Result<u64, Self::Error> {
        let mut count = 0;

        for block in self.blocks()? {
            block?;

            count += 1;
        }

        Ok(count)
    }

    /// Get the first block with the given index.
    fn get_by_index(&mut self, index: u64) -> Result<Option<Block>, Self::Error> {
        for block in self.blocks()? {
            let block = block?;

            if block.index == index {
                return Ok(Some(block));
            }
        }

        Ok(None)
    }

    /// Get the first block with the given digest.
    fn get_by_digest(&mut self, digest: &str) -> Result<Option<Block>, Self::Error> {
        for block in self.blocks()? {
            let block = block?;

            if block.digest == digest {
                return Ok(Some(block));
            }
        }

        Ok(None)
    }

    /// Build new block from the given payload, chain
    /// it to the current tail block and append it.
    /// 
    /// Return the appended block, or `IndexOverflow` error
    /// if the tail block's index is `u64::MAX`.
    fn add(&mut self, payload: impl Into<Vec<u8>>) -> Result<Block, Self::Error> {
        let builder = match self.last()? {
            Some((_, tail)) => BlockBuilder::chained(&tail)
                .ok_or(IndexOverflow(tail.index))?,

            None => BlockBuilder::genesis()
        };

        let block = builder
            .with_payload(payload)
            .with_hash_algorithm(self.hash_algorithm())
            .build();

        self.append(block.clone())?;

        Ok(block)
    }

    /// Validate blockchain structure.
    /// 
    /// This method will:
    /// 
    /// 1. Verify that the root block has index 0,
    ///    empty previous digest and valid digest.
    /// 
    /// 2. Verify digest of every following block.
    /// 
    /// 3. Verify that blocks indexes are increasing by one.
    /// 
    /// 4. Verify that each block references the previous
    ///    block's digest.
    /// 
    /// Validation stops on the first invalid block. Errors
    /// returned while reading blocks are not validation
    /// failures and are propagated as is.
    fn validate(&mut self) -> Result<ChainValidationResult, Self::Error> {
        let algorithm = self.hash_algorithm();

        let mut blocks = self.blocks()?;

        // No need in validating empty blockchain
        let Some(root) = blocks.next().transpose()? else {
            return Ok(ChainValidationResult::Valid);
        };

        if !root.is_genesis() || !root.verify_digest(algorithm) {
            tracing::warn!(index = 0, got = root.index, "invalid root block");

            return Ok(ChainValidationResult::InvalidRoot {
                got_index: root.index,
                got_previous: root.prev_digest
            });
        }

        let mut prev_digest = root.digest;

        // Every block before the current one passed the index
        // check, so the position equals the expected index.
        for (position, block) in (1..).zip(blocks) {
            let block = block?;

            let calculated = block.calculate_digest(algorithm);

            if block.digest != calculated {
                tracing::warn!(index = position, got = block.index, "invalid block digest");

                return Ok(ChainValidationResult::InvalidHash {
                    index: position,
                    stored: block.digest,
                    calculated
                });
            }

            if block.index != position {
                tracing::warn!(index = position, got = block.index, "invalid block index");

                return Ok(ChainValidationResult::InvalidIndex {
                    index: position,
                    got: block.index
                });
            }

            if block.prev_digest != prev_digest {
                tracing::warn!(index = position, "invalid previous block reference");

                return Ok(ChainValidationResult::InvalidPreviousHash {
                    index: position,
                    expected: prev_digest,
                    got: block.prev_digest
                });
            }

            prev_digest = block.digest;
        }

        Ok(ChainValidationResult::Valid)
    }
}
