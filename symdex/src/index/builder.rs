//! Index construction: extract, join by address, canonicalize, serialize.

use crate::canonical;
use crate::domain::{BinarySpec, BuildError, SymbolRecord};
use crate::extraction::{canonical_hex, DebugDataSource};
use crate::index::format::{DirectoryEntry, DEFAULT_BLOCK_SIZE};
use log::{debug, info};
use std::collections::{HashMap, HashSet};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Symbol-table entries that are vtable dispatch wrappers, not definitions.
const THUNK_PREFIX: &str = "non-virtual thunk";

/// Summary of one build, for the end-of-run status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildStats {
    pub binaries: usize,
    pub records: usize,
    pub blocks: usize,
}

/// Builds the on-disk index from a list of binaries.
///
/// Each run starts from an empty mapping and overwrites the target file
/// wholesale; there is no merge with a prior index. The target is opened
/// only after every block has been staged, so an I/O failure mid-build can
/// never leave a partially written target behind.
pub struct IndexBuilder<S> {
    source: S,
    output: PathBuf,
    block_size: usize,
    quiet: bool,
}

impl<S: DebugDataSource> IndexBuilder<S> {
    pub fn new(source: S, output: impl Into<PathBuf>) -> Self {
        Self { source, output: output.into(), block_size: DEFAULT_BLOCK_SIZE, quiet: false }
    }

    #[must_use]
    pub fn block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size;
        self
    }

    #[must_use]
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Index every binary (and each of its shared libraries matching the
    /// spec's filter), then serialize the sorted, block-partitioned result.
    ///
    /// # Errors
    /// Fails on a zero block size and on staging or target I/O errors;
    /// extraction problems never abort a build.
    pub fn build(&self, specs: &[BinarySpec]) -> Result<BuildStats, BuildError> {
        if self.block_size == 0 {
            return Err(BuildError::InvalidBlockSize);
        }

        let mut mapping: HashMap<String, HashSet<SymbolRecord>> = HashMap::new();
        let mut binaries = 0;

        for spec in specs {
            if !self.quiet {
                println!("Index [{}] ...", spec.path.display());
            }
            self.index_binary(&spec.path, &mut mapping);
            binaries += 1;

            for lib in self.source.shared_libraries(&spec.path, &spec.shared_lib_filter) {
                if !self.quiet {
                    println!("> Index shared library [{}] ...", lib.display());
                }
                self.index_binary(&lib, &mut mapping);
                binaries += 1;
            }
        }

        // Flatten to one deterministic sequence: sort by (leaf, full).
        let mut records: Vec<SymbolRecord> =
            mapping.into_values().flatten().collect();
        records.sort();

        let blocks = self.write_index(&records)?;

        Ok(BuildStats { binaries, records: records.len(), blocks })
    }

    /// Join the binary's symbol table with its decoded line table by address
    /// and accumulate canonicalized records.
    fn index_binary(&self, binary: &Path, mapping: &mut HashMap<String, HashSet<SymbolRecord>>) {
        let symbols = self.source.code_symbols(binary);
        let addresses: HashSet<u64> = symbols.iter().map(|(_, addr)| *addr).collect();
        let locations: HashMap<u64, _> =
            self.source.line_rows(binary, Some(&addresses)).into_iter().collect();

        let mut kept = 0usize;
        let total = symbols.len();
        for (full, address) in symbols {
            if full.starts_with(THUNK_PREFIX) {
                continue;
            }
            // Not every code symbol has a decoded line (compiler-generated
            // thunks, padding symbols); those are simply not indexable.
            let Some(location) = locations.get(&address) else {
                debug!("no line coverage for {full} at {}", canonical_hex(address));
                continue;
            };
            let leaf = canonical::leaf_of(&full);
            mapping
                .entry(leaf.clone())
                .or_default()
                .insert(SymbolRecord { leaf, full, location: location.clone() });
            kept += 1;
        }
        info!("{}: {kept} of {total} code symbols had line coverage", binary.display());
    }

    /// Serialize records into blocks staged in a scoped temporary directory,
    /// then write the directory and concatenate the blocks into the target.
    ///
    /// The staging directory is removed on every exit path, success or
    /// failure, when the `TempDir` guard drops.
    fn write_index(&self, records: &[SymbolRecord]) -> Result<usize, BuildError> {
        let staging = tempfile::Builder::new().prefix("symdex-blocks-").tempdir()?;

        let mut directory: Vec<DirectoryEntry> = Vec::new();
        let mut block_paths: Vec<PathBuf> = Vec::new();
        let mut byte_offset = 0u64;

        for (n, block) in records.chunks(self.block_size).enumerate() {
            let bytes = rmp_serde::to_vec(block)?;
            let block_path = staging.path().join(n.to_string());
            fs::write(&block_path, &bytes)?;

            directory.push(DirectoryEntry {
                first_leaf: block[0].leaf.clone(),
                byte_offset,
            });
            byte_offset += bytes.len() as u64;
            block_paths.push(block_path);
        }

        // All blocks are staged; only now touch the target file.
        let target = File::create(&self.output)?;
        let mut writer = BufWriter::new(target);

        // Directory first, then the block payloads in directory order.
        rmp_serde::encode::write(&mut writer, &directory)?;
        for block_path in &block_paths {
            writer.write_all(&fs::read(block_path)?)?;
        }
        writer.flush()?;

        Ok(directory.len())
    }
}
