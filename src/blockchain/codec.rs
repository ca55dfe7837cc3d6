//! On-disk encoding of the blocks.
//!
//! ## Record structure
//!
//! ```text
//! [u64 index][u64 timestamp]
//! [u32 prev_digest_len]<prev_digest>
//! [u32 payload_len]<payload>
//! [u32 digest_len]<digest>
//! ```
//!
//! All the integers are little-endian. The chain file is a plain
//! sequence of records without any header, separator or trailer,
//! so records boundaries are known only from the length prefixes.

use std::io::{Read, ErrorKind};

use crate::block::Block;

use super::ChainFileError;

/// Size of the fixed-width part of a record.
pub const RECORD_HEADER_SIZE: usize = 8 + 8 + 4 * 3;

/// Encode block to a record buffer.
/// 
/// The whole record is built in memory first so it
/// can be written to the file with a single call.
pub fn encode_block(block: &Block) -> Result<Vec<u8>, ChainFileError> {
    let prev_digest_len = field_len(block.prev_digest.len())?;
    let payload_len = field_len(block.payload.len())?;
    let digest_len = field_len(block.digest.len())?;

    let mut record = Vec::with_capacity(RECORD_HEADER_SIZE + block.prev_digest.len() + block.payload.len() + block.digest.len());

    record.extend_from_slice(&block.index.to_le_bytes());
    record.extend_from_slice(&block.timestamp.to_le_bytes());

    record.extend_from_slice(&prev_digest_len.to_le_bytes());
    record.extend_from_slice(block.prev_digest.as_bytes());

    record.extend_from_slice(&payload_len.to_le_bytes());
    record.extend_from_slice(&block.payload);

    record.extend_from_slice(&digest_len.to_le_bytes());
    record.extend_from_slice(block.digest.as_bytes());

    Ok(record)
}

/// Decode single record from the reader.
/// 
/// `offset` is the position of the record in the chain file.
/// It's used only to report errors.
/// 
/// Return decoded block and the amount of bytes consumed.
pub fn decode_block(reader: &mut impl Read, offset: u64) -> Result<(Block, u64), ChainFileError> {
    let index = u64::from_le_bytes(read_array(reader, offset, "index")?);
    let timestamp = u64::from_le_bytes(read_array(reader, offset, "timestamp")?);

    let prev_digest = read_bytes(reader, offset, "prev_digest")?;
    let payload = read_bytes(reader, offset, "payload")?;
    let digest = read_bytes(reader, offset, "digest")?;

    let size = (RECORD_HEADER_SIZE + prev_digest.len() + payload.len() + digest.len()) as u64;

    let block = Block {
        index,
        timestamp,
        prev_digest: into_digest(prev_digest, offset, "prev_digest")?,
        payload,
        digest: into_digest(digest, offset, "digest")?
    };

    Ok((block, size))
}

fn field_len(len: usize) -> Result<u32, ChainFileError> {
    u32::try_from(len).map_err(|_| ChainFileError::PayloadTooLarge(len))
}

fn read_array<const N: usize>(reader: &mut impl Read, offset: u64, field: &'static str) -> Result<[u8; N], ChainFileError> {
    let mut buf = [0; N];

    reader.read_exact(&mut buf).map_err(|err| {
        if err.kind() == ErrorKind::UnexpectedEof {
            ChainFileError::Truncated { offset, field }
        } else {
            ChainFileError::Io(err)
        }
    })?;

    Ok(buf)
}

fn read_bytes(reader: &mut impl Read, offset: u64, field: &'static str) -> Result<Vec<u8>, ChainFileError> {
    let len = u32::from_le_bytes(read_array(reader, offset, field)?) as u64;

    // Length prefix can be corrupted so don't trust it
    // with the buffer allocation.
    let mut bytes = Vec::new();

    reader.by_ref().take(len).read_to_end(&mut bytes)?;

    if bytes.len() as u64 != len {
        return Err(ChainFileError::Truncated { offset, field });
    }

    Ok(bytes)
}

fn into_digest(bytes: Vec<u8>, offset: u64, field: &'static str) -> Result<String, ChainFileError> {
    String::from_utf8(bytes).map_err(|_| ChainFileError::MalformedDigest { offset, field })
}

#[cfg(test)]
mod tests {
    use crate::block::prelude::*;

    use super::*;

    fn decode(record: &[u8]) -> Result<(Block, u64), ChainFileError> {
        decode_block(&mut &record[..], 0)
    }

    #[test]
    fn round_trip() -> Result<(), ChainFileError> {
        let root = BlockBuilder::genesis()
            .with_created_at(123456)
            .with_payload(Vec::<u8>::new())
            .build();

        let block = BlockBuilder::chained(&root)
            .expect("root has index 0")
            .with_created_at(123457)
            .with_payload(b"\x00\xffbinary payload")
            .build();

        for block in [root, block] {
            let record = encode_block(&block)?;

            assert_eq!(decode(&record)?, (block, record.len() as u64));
        }

        Ok(())
    }

    #[test]
    fn layout() -> Result<(), ChainFileError> {
        let block = BlockBuilder::new()
            .with_index(1)
            .with_created_at(2)
            .with_previous("ab")
            .with_payload(b"xyz")
            .build();

        let record = encode_block(&block)?;

        assert_eq!(record.len(), RECORD_HEADER_SIZE + 2 + 3 + 64);

        assert_eq!(&record[0..8], &1u64.to_le_bytes());
        assert_eq!(&record[8..16], &2u64.to_le_bytes());
        assert_eq!(&record[16..20], &2u32.to_le_bytes());
        assert_eq!(&record[20..22], b"ab");
        assert_eq!(&record[22..26], &3u32.to_le_bytes());
        assert_eq!(&record[26..29], b"xyz");
        assert_eq!(&record[29..33], &64u32.to_le_bytes());
        assert_eq!(&record[33..], hash(b"xyz").as_bytes());

        Ok(())
    }

    #[test]
    fn sequential_records() -> Result<(), ChainFileError> {
        let root = Block::create("", 0, b"genesis");
        let block = Block::create(root.digest(), 1, b"second");

        let mut file = encode_block(&root)?;

        file.extend(encode_block(&block)?);

        let mut reader = &file[..];

        let (first, first_size) = decode_block(&mut reader, 0)?;
        let (second, _) = decode_block(&mut reader, first_size)?;

        assert_eq!(first, root);
        assert_eq!(second, block);
        assert!(reader.is_empty());

        Ok(())
    }

    #[test]
    fn truncated() -> Result<(), ChainFileError> {
        let record = encode_block(&Block::create("", 0, b"genesis"))?;

        assert!(matches!(decode(&[]), Err(ChainFileError::Truncated { field: "index", .. })));
        assert!(matches!(decode(&record[..12]), Err(ChainFileError::Truncated { field: "timestamp", .. })));
        assert!(matches!(decode(&record[..24]), Err(ChainFileError::Truncated { field: "payload", .. })));
        assert!(matches!(decode(&record[..record.len() - 1]), Err(ChainFileError::Truncated { field: "digest", .. })));

        Ok(())
    }

    #[test]
    fn malformed_digest() -> Result<(), ChainFileError> {
        let mut record = encode_block(&Block::create("", 0, b"genesis"))?;

        let last = record.len() - 1;

        record[last] = 0xff;

        assert!(matches!(decode(&record), Err(ChainFileError::MalformedDigest { field: "digest", .. })));

        Ok(())
    }
}
