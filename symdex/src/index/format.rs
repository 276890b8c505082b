//! On-disk index format constants and the block directory entry.

use serde::{Deserialize, Serialize};

/// Records per block. Large enough that the directory stays tiny relative to
/// the payload, small enough that a query deserializes little.
pub const DEFAULT_BLOCK_SIZE: usize = 1000;

/// Default index file name, resolved against the working directory.
pub const DEFAULT_INDEX_FILE: &str = ".symdex_index";

/// One directory entry per block: the first leaf stored in the block and the
/// block's byte offset relative to the start of the payload section.
///
/// The directory as a whole is assumed small enough to load wholly; it is
/// what lets a lookup bound its reads to a contiguous block range without
/// touching any payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    pub first_leaf: String,
    pub byte_offset: u64,
}
