use super::*;

#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct BlockBuilder {
    prev_digest: String,
    index: u64,
    created_at: u64,
    payload: Vec<u8>,
    hash_algorithm: HashAlgorithm
}

impl BlockBuilder {
    pub fn new() -> Self {
        Self {
            created_at: timestamp_millis(),
            ..Self::default()
        }
    }

    /// Make a builder for the root block of a new chain.
    #[inline]
    pub fn genesis() -> Self {
        Self::new()
    }

    /// Make a builder for the block following the given one.
    /// 
    /// The new block will reference the given block's
    /// digest and use the next index.
    /// 
    /// Return `None` if the given block's index is `u64::MAX`.
    pub fn chained(previous: &Block) -> Option<Self> {
        let index = previous.index().checked_add(1)?;

        Some(Self::new()
            .with_previous(previous.digest())
            .with_index(index))
    }

    /// Set reference to the previous block.
    pub fn with_previous(self, prev_digest: impl Into<String>) -> Self {
        Self {
            prev_digest: prev_digest.into(),
            ..self
        }
    }

    /// Change sequence number of the block.
    pub fn with_index(self, index: u64) -> Self {
        Self {
            index,
            ..self
        }
    }

    /// Change creation timestamp of the block.
    pub fn with_created_at(self, created_at: u64) -> Self {
        Self {
            created_at,
            ..self
        }
    }

    /// Change block's payload.
    pub fn with_payload(self, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            payload: payload.into(),
            ..self
        }
    }

    /// Change hash function used to calculate block's digest.
    /// 
    /// Default is SHA-256.
    pub fn with_hash_algorithm(self, hash_algorithm: HashAlgorithm) -> Self {
        Self {
            hash_algorithm,
            ..self
        }
    }

    /// Build block by hashing its payload.
    pub fn build(self) -> Block {
        let digest = self.hash_algorithm.digest(&self.payload);

        Block {
            index: self.index,
            timestamp: self.created_at,
            prev_digest: self.prev_digest,
            payload: self.payload,
            digest
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Build a chain of blocks with fixed timestamps.
    pub fn get_chain(payloads: &[&str]) -> Vec<Block> {
        let mut chain: Vec<Block> = Vec::with_capacity(payloads.len());

        for (i, payload) in payloads.iter().enumerate() {
            let builder = match chain.last() {
                Some(previous) => BlockBuilder::chained(previous)
                    .expect("test chains are short"),

                None => BlockBuilder::genesis()
            };

            chain.push(builder
                .with_created_at(1_700_000_000_000 + i as u64)
                .with_payload(*payload)
                .build());
        }

        chain
    }

    #[test]
    fn build() {
        let block = BlockBuilder::new()
            .with_created_at(123456)
            .with_index(7)
            .with_previous("abcdef")
            .with_payload(b"Hello, World!")
            .build();

        assert_eq!(block.timestamp(), 123456);
        assert_eq!(block.index(), 7);
        assert_eq!(block.prev_digest(), "abcdef");
        assert_eq!(block.payload(), b"Hello, World!");
        assert_eq!(block.digest(), hash(b"Hello, World!"));
    }

    #[test]
    fn chained() {
        let chain = get_chain(&["genesis", "second", "third"]);

        assert!(chain[0].is_genesis());

        for pair in chain.windows(2) {
            assert_eq!(pair[1].index(), pair[0].index() + 1);
            assert_eq!(pair[1].prev_digest(), pair[0].digest());
        }
    }

    #[test]
    fn hash_algorithm() {
        let block = BlockBuilder::genesis()
            .with_payload(b"genesis")
            .with_hash_algorithm(HashAlgorithm::Blake3)
            .build();

        assert_eq!(block.digest(), HashAlgorithm::Blake3.digest(b"genesis"));
        assert!(block.verify_digest(HashAlgorithm::Blake3));
    }

    #[test]
    fn chained_after_max_index() {
        let block = BlockBuilder::genesis()
            .with_index(u64::MAX)
            .build();

        assert_eq!(BlockBuilder::chained(&block), None);

        let block = BlockBuilder::genesis()
            .with_index(u64::MAX - 1)
            .build();

        assert_eq!(BlockBuilder::chained(&block).map(|builder| builder.build().index()), Some(u64::MAX));
    }
}
