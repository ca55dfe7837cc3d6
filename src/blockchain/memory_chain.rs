use super::*;

/// Blockchain stored in RAM.
/// 
/// Useful to validate a list of blocks without
/// writing them to the disk.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct MemoryChain {
    blocks: Vec<Block>,
    hash_algorithm: HashAlgorithm
}

impl MemoryChain {
    #[inline]
    pub fn new(hash_algorithm: HashAlgorithm) -> Self {
        Self {
            blocks: Vec::new(),
            hash_algorithm
        }
    }

    #[inline]
    /// Wrap given blocks as is, without any validation.
    pub fn from_blocks(blocks: impl Into<Vec<Block>>, hash_algorithm: HashAlgorithm) -> Self {
        Self {
            blocks: blocks.into(),
            hash_algorithm
        }
    }

    #[inline]
    pub fn into_blocks(self) -> Vec<Block> {
        self.blocks
    }
}

impl Blockchain for MemoryChain {
    type Error = IndexOverflow;
    type Blocks<'a> = MemoryBlocks<'a>;

    #[inline]
    fn hash_algorithm(&self) -> HashAlgorithm {
        self.hash_algorithm
    }

    #[inline]
    fn is_empty(&self) -> Result<bool, Self::Error> {
        Ok(self.blocks.is_empty())
    }

    #[inline]
    fn blocks(&mut self) -> Result<Self::Blocks<'_>, Self::Error> {
        Ok(MemoryBlocks(self.blocks.iter()))
    }

    #[inline]
    fn append(&mut self, block: Block) -> Result<(), Self::Error> {
        self.blocks.push(block);

        Ok(())
    }

    #[inline]
    fn count(&mut self) -> Result<u64, Self::Error> {
        Ok(self.blocks.len() as u64)
    }
}

pub struct MemoryBlocks<'a>(std::slice::Iter<'a, Block>);

impl Iterator for MemoryBlocks<'_> {
    type Item = Result<Block, IndexOverflow>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().cloned().map(Ok)
    }
}

#[cfg(test)]
mod tests {
    use crate::block::builder::tests::get_chain;

    use super::*;

    #[test]
    fn blocks() -> Result<(), IndexOverflow> {
        let mut chain = MemoryChain::default();

        assert!(chain.is_empty()?);
        assert_eq!(chain.last()?, None);
        assert_eq!(chain.validate()?, ChainValidationResult::Valid);

        let root = chain.add("genesis")?;
        let second = chain.add("second")?;
        let third = chain.add("third")?;

        assert_eq!(chain.count()?, 3);
        assert_eq!(chain.first()?, Some(root));
        assert_eq!(chain.last()?, Some((2, third.clone())));

        assert_eq!(chain.get_by_index(1)?, Some(second));
        assert_eq!(chain.get_by_digest(third.digest())?, Some(third));
        assert_eq!(chain.get_by_index(3)?, None);

        assert!(chain.validate()?.is_valid());

        Ok(())
    }

    #[test]
    fn tampered() -> Result<(), IndexOverflow> {
        let blocks = get_chain(&["genesis", "second", "third"]);

        let mut forged = blocks.clone();

        forged[1].payload = b"forged".to_vec();

        assert_eq!(MemoryChain::from_blocks(forged, HashAlgorithm::Sha256).validate()?.kind(), Some(ValidationFailure::BadHash));

        // Swapped blocks keep their digests valid but
        // break indexes and references.
        let swapped = vec![blocks[0].clone(), blocks[2].clone(), blocks[1].clone()];

        let result = MemoryChain::from_blocks(swapped, HashAlgorithm::Sha256).validate()?;

        assert_eq!(result.kind(), Some(ValidationFailure::BadIndex));
        assert_eq!(result.index(), Some(1));

        // Duplicated root
        let duplicated = vec![blocks[0].clone(), blocks[0].clone()];

        let result = MemoryChain::from_blocks(duplicated, HashAlgorithm::Sha256).validate()?;

        assert_eq!(result, ChainValidationResult::InvalidIndex {
            index: 1,
            got: 0
        });

        Ok(())
    }

    #[test]
    fn add_after_max_index() {
        let root = BlockBuilder::genesis()
            .with_index(u64::MAX)
            .build();

        let mut chain = MemoryChain::from_blocks(vec![root], HashAlgorithm::Sha256);

        assert_eq!(chain.add("next"), Err(IndexOverflow(u64::MAX)));
        assert_eq!(chain.into_blocks().len(), 1);
    }
}
