use std::path::{Path, PathBuf};
use std::fs::File;
use std::io::{BufReader, Seek, SeekFrom, Write};

use super::*;

#[derive(Debug, thiserror::Error)]
pub enum ChainFileError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Truncated block record at offset {offset}: failed to read {field}")]
    Truncated {
        offset: u64,
        field: &'static str
    },

    #[error("Malformed {field} in block record at offset {offset}: digest is not valid UTF-8")]
    MalformedDigest {
        offset: u64,
        field: &'static str
    },

    #[error("Block field is too large to be stored: {0} bytes")]
    PayloadTooLarge(usize),

    #[error(transparent)]
    IndexOverflow(#[from] IndexOverflow)
}

/// Position of a block record in the chain file.
/// 
/// Cursors are plain values owned by the caller, so
/// lookups and scans made between two `ChainFile::read_block`
/// calls don't affect the cursor.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChainCursor {
    offset: u64
}

impl ChainCursor {
    #[inline]
    /// Cursor pointing to the root block.
    pub fn start() -> Self {
        Self::default()
    }

    #[inline]
    /// Byte offset of the next record.
    pub fn offset(&self) -> u64 {
        self.offset
    }
}

/// Append-only blockchain stored in a single flat file.
/// 
/// Blocks are stored one after another without any index,
/// so all the lookups are made by a sequential scan from
/// the beginning of the file.
/// 
/// Only one `ChainFile` should be opened for a given
/// path at a time. There's no locking.
#[derive(Debug)]
pub struct ChainFile {
    file: File,
    path: PathBuf,
    options: ChainOptions
}

impl ChainFile {
    #[inline]
    /// Open existing chain file or create a new one
    /// with default options.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ChainFileError> {
        Self::open_with_options(path, ChainOptions::default())
    }

    /// Open existing chain file or create a new one.
    pub fn open_with_options(path: impl Into<PathBuf>, options: ChainOptions) -> Result<Self, ChainFileError> {
        let path: PathBuf = path.into();

        let file = File::options()
            .read(true)
            .append(true)
            .create(true)
            .open(&path)?;

        let size = file.metadata()?.len();

        tracing::debug!(
            path = %path.display(),
            size,
            hash_algorithm = %options.hash_algorithm,
            "opened chain file"
        );

        Ok(Self {
            file,
            path,
            options
        })
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[inline]
    pub fn options(&self) -> &ChainOptions {
        &self.options
    }

    #[inline]
    /// Size of the chain file in bytes.
    pub fn size(&self) -> Result<u64, ChainFileError> {
        Ok(self.file.metadata()?.len())
    }

    #[inline]
    /// Get cursor pointing to the root block.
    pub fn cursor(&self) -> ChainCursor {
        ChainCursor::start()
    }

    #[inline]
    /// Check if there's no more blocks after the cursor.
    pub fn at_end(&self, cursor: &ChainCursor) -> Result<bool, ChainFileError> {
        Ok(cursor.offset >= self.size()?)
    }

    /// Read block under the cursor and move
    /// the cursor to the next block.
    /// 
    /// Return `None` if the cursor is at the end of the chain.
    pub fn read_block(&mut self, cursor: &mut ChainCursor) -> Result<Option<Block>, ChainFileError> {
        if self.at_end(cursor)? {
            return Ok(None);
        }

        self.file.seek(SeekFrom::Start(cursor.offset))?;

        let mut reader = BufReader::new(&mut self.file);

        let (block, size) = decode_block(&mut reader, cursor.offset)?;

        cursor.offset += size;

        Ok(Some(block))
    }
}

impl Blockchain for ChainFile {
    type Error = ChainFileError;
    type Blocks<'a> = Blocks<'a>;

    #[inline]
    fn hash_algorithm(&self) -> HashAlgorithm {
        self.options.hash_algorithm
    }

    #[inline]
    fn is_empty(&self) -> Result<bool, Self::Error> {
        Ok(self.size()? == 0)
    }

    fn blocks(&mut self) -> Result<Self::Blocks<'_>, Self::Error> {
        let size = self.size()?;

        self.file.seek(SeekFrom::Start(0))?;

        Ok(Blocks {
            reader: BufReader::new(&mut self.file),
            offset: 0,
            size,
            failed: false
        })
    }

    fn append(&mut self, block: Block) -> Result<(), Self::Error> {
        // Encode the whole record before writing anything
        // so a too large block doesn't leave a partial record.
        let record = encode_block(&block)?;

        self.file.seek(SeekFrom::End(0))?;
        self.file.write_all(&record)?;

        if self.options.sync_on_append {
            self.file.sync_data()?;
        }

        tracing::debug!(
            index = block.index,
            digest = %block.digest,
            size = record.len(),
            "appended block"
        );

        Ok(())
    }
}

/// Sequential scan over the chain file.
/// 
/// Iteration stops after the first read error.
pub struct Blocks<'a> {
    reader: BufReader<&'a mut File>,
    offset: u64,
    size: u64,
    failed: bool
}

impl Blocks<'_> {
    #[inline]
    /// Offset of the next record.
    pub fn offset(&self) -> u64 {
        self.offset
    }
}

impl Iterator for Blocks<'_> {
    type Item = Result<Block, ChainFileError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.offset >= self.size {
            return None;
        }

        match decode_block(&mut self.reader, self.offset) {
            Ok((block, size)) => {
                self.offset += size;

                Some(Ok(block))
            }

            Err(err) => {
                tracing::debug!(offset = self.offset, error = %err, "failed to read block");

                self.failed = true;

                Some(Err(err))
            }
        }
    }
}
