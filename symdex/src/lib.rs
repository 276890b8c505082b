//! # symdex - Symbol-Definition Index for Native Binaries
//!
//! symdex answers "where is function/method X defined" for compiled native
//! binaries without reparsing debug info per query. It correlates two
//! independently produced tables by address - the symbol table (`nm`) and
//! the decoded debug-line table (`readelf`) - canonicalizes each decorated
//! name down to its leaf identifier, and writes a sorted, block-partitioned
//! index that lookups read only small pieces of.
//!
//! ## Architecture Overview
//!
//! ```text
//!  nm -C          readelf --debug-dump=decodedline          ldd
//!    │                          │                            │
//!    ▼                          ▼                            ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                extraction (DebugDataSource)                 │
//! │   (symbol, address) pairs     (address, path, line) rows    │
//! └───────────────────────┬─────────────────────────────────────┘
//!                         │ join by address
//!                         ▼
//! ┌─────────────────────────────┐      ┌───────────────────────┐
//! │        index::builder       │─────▶│  .symdex_index file   │
//! │ canonicalize → accumulate   │      │ [directory][blocks…]  │
//! │ → sort → block partition    │      └───────────┬───────────┘
//! └─────────────────────────────┘                  │
//!                                                  ▼
//!                                      ┌───────────────────────┐
//!                                      │     index::reader     │
//!                                      │ directory scan →      │
//!                                      │ targeted block loads  │
//!                                      └───────────────────────┘
//! ```
//!
//! ## Module Structure
//!
//! - [`extraction`]: adapters over the external binutils tools; parses their
//!   text output into raw address rows (tool failure = "no debug info")
//! - [`canonical`]: pure decorated-name → leaf-identifier reduction
//! - [`index`]: builder (join, canonicalize, merge, serialize) and reader
//!   (directory scan, targeted block loads)
//! - [`domain`]: core record types and structured errors
//! - [`cli`], [`preflight`]: command-line surface and tool checks
//!
//! Everything is single-threaded: one builder writes at a time, readers run
//! after a build completes, and external tools are invoked sequentially.

pub mod canonical;
pub mod cli;
pub mod domain;
pub mod extraction;
pub mod index;
pub mod preflight;
