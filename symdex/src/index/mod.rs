//! The block-partitioned on-disk definition index
//!
//! An index holds every `SymbolRecord` for one build, sorted by
//! (leaf, full) and chunked into fixed-size blocks so a query never loads
//! more than the directory plus the blocks that can contain its leaf. The
//! index can reach hundreds of megabytes for large binary sets; loading it
//! wholesale per query is what this layout exists to avoid.
//!
//! File layout (all values MessagePack):
//!
//! ```text
//! ┌────────────────────────────────────────────────┐
//! │ directory: Vec<DirectoryEntry>                 │  one msgpack value
//! ├────────────────────────────────────────────────┤
//! │ block 0: Vec<SymbolRecord>                     │  ┐ offsets in the
//! │ block 1: Vec<SymbolRecord>                     │  │ directory are
//! │ ...                                            │  │ relative to the
//! │ block N-1: Vec<SymbolRecord>                   │  ┘ payload start
//! └────────────────────────────────────────────────┘
//! ```
//!
//! Invariants: the ordered concatenation of blocks reproduces the full
//! sorted record sequence; each block deserializes independently; directory
//! entries are non-decreasing by first leaf (ties across block boundaries
//! are expected when one leaf's records straddle two blocks).
//!
//! The file is immutable once written and overwritten wholesale on rebuild;
//! there is no reader/writer coordination.

pub mod builder;
pub mod format;
pub mod reader;

pub use builder::{BuildStats, IndexBuilder};
pub use format::{DirectoryEntry, DEFAULT_BLOCK_SIZE, DEFAULT_INDEX_FILE};
pub use reader::Index;
