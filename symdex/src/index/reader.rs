//! Index lookup: directory scan, targeted block loads, exact-leaf filter.

use crate::domain::{DefinitionMatch, IndexError, SymbolRecord};
use crate::index::format::DirectoryEntry;
use log::debug;
use std::fs::File;
use std::io::{BufReader, Seek, SeekFrom};
use std::path::Path;

/// An open index file: the whole directory in memory, payload on disk.
///
/// Opened once per session; never mutates the file. A query deserializes
/// only the blocks whose directory range can contain the leaf, so its cost
/// is O(directory) + O(block size), independent of total index size.
#[derive(Debug)]
pub struct Index {
    reader: BufReader<File>,
    directory: Vec<DirectoryEntry>,
    payload_start: u64,
}

impl Index {
    /// Open an index file and load its block directory.
    ///
    /// # Errors
    /// A missing file is a hard failure (`IndexError::NotFound`); a present
    /// but undecodable directory is `IndexError::Decode`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, IndexError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(IndexError::NotFound(path.to_path_buf()));
        }

        let mut reader = BufReader::new(File::open(path)?);
        let directory: Vec<DirectoryEntry> = rmp_serde::decode::from_read(&mut reader)?;
        // The decoder consumed exactly the directory; everything after this
        // position is block payload.
        let payload_start = reader.stream_position()?;
        debug!("opened index: {} blocks, payload at byte {payload_start}", directory.len());

        Ok(Self { reader, directory, payload_start })
    }

    /// Number of blocks in the index.
    #[must_use]
    pub fn block_count(&self) -> usize {
        self.directory.len()
    }

    /// Find every definition whose leaf exactly equals `leaf` (case
    /// sensitive), ordered by (path, line). An absent leaf yields an empty
    /// vector, not an error.
    ///
    /// # Errors
    /// Fails only on I/O or block-decoding errors.
    pub fn lookup(&mut self, leaf: &str) -> Result<Vec<DefinitionMatch>, IndexError> {
        // First block whose first leaf sorts after the query. Everything at
        // and beyond it can only hold greater leaves.
        let end = self.directory.partition_point(|entry| entry.first_leaf.as_str() <= leaf);

        // Directory entries are non-decreasing but not unique: a leaf whose
        // records straddle a block boundary repeats as first leaf, so walk
        // backward linearly past the ties instead of bisecting.
        let mut begin = 0;
        for n in (0..end).rev() {
            if self.directory[n].first_leaf.as_str() < leaf {
                begin = n;
                break;
            }
        }

        // Offsets first: reading a block needs the file handle mutably.
        let offsets: Vec<u64> =
            self.directory[begin..end].iter().map(|entry| entry.byte_offset).collect();

        let mut matches: Vec<DefinitionMatch> = Vec::new();
        for byte_offset in offsets {
            let block = self.read_block(byte_offset)?;
            matches.extend(
                block.into_iter().filter(|r| r.leaf == leaf).map(DefinitionMatch::from),
            );
        }

        matches.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
        Ok(matches)
    }

    /// Seek to one block within the payload section and deserialize it.
    fn read_block(&mut self, byte_offset: u64) -> Result<Vec<SymbolRecord>, IndexError> {
        self.reader.seek(SeekFrom::Start(self.payload_start + byte_offset))?;
        Ok(rmp_serde::decode::from_read(&mut self.reader)?)
    }
}
