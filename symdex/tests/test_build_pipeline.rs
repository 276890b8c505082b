//! Builder pipeline behavior: filtering, merging across binaries and shared
//! libraries, and rebuild determinism.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use symdex::domain::{BinarySpec, BuildError, SourceLocation};
use symdex::extraction::DebugDataSource;
use symdex::index::{Index, IndexBuilder};

/// In-memory data source holding per-binary tables.
#[derive(Default)]
struct MultiBinarySource {
    symbols: HashMap<PathBuf, Vec<(String, u64)>>,
    rows: HashMap<PathBuf, Vec<(u64, SourceLocation)>>,
    libs: HashMap<PathBuf, Vec<PathBuf>>,
}

impl MultiBinarySource {
    fn add_binary(&mut self, path: &str, entries: &[(&str, u64, &str, u32)]) -> &mut Self {
        let path = PathBuf::from(path);
        self.symbols.insert(
            path.clone(),
            entries.iter().map(|(full, addr, _, _)| ((*full).to_string(), *addr)).collect(),
        );
        self.rows.insert(
            path,
            entries
                .iter()
                .filter(|(_, _, file, _)| !file.is_empty())
                .map(|(_, addr, file, line)| (*addr, SourceLocation::new(*file, *line)))
                .collect(),
        );
        self
    }

    fn add_libs(&mut self, binary: &str, libs: &[&str]) -> &mut Self {
        self.libs.insert(PathBuf::from(binary), libs.iter().map(PathBuf::from).collect());
        self
    }
}

impl DebugDataSource for MultiBinarySource {
    fn code_symbols(&self, binary: &Path) -> Vec<(String, u64)> {
        self.symbols.get(binary).cloned().unwrap_or_default()
    }

    fn line_rows(
        &self,
        binary: &Path,
        addresses: Option<&HashSet<u64>>,
    ) -> Vec<(u64, SourceLocation)> {
        let wanted = addresses.expect("builder must restrict line decoding to symbol addresses");
        self.rows
            .get(binary)
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .filter(|(addr, _)| wanted.contains(addr))
            .collect()
    }

    fn shared_libraries(&self, binary: &Path, filter: &str) -> Vec<PathBuf> {
        if filter.is_empty() {
            return Vec::new();
        }
        self.libs
            .get(binary)
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .filter(|lib| lib.to_string_lossy().contains(filter))
            .collect()
    }
}

#[test]
fn test_thunks_are_never_indexed() {
    let mut source = MultiBinarySource::default();
    source.add_binary(
        "prog",
        &[
            ("Lib::Real()", 0x10, "/src/real.cpp", 3),
            ("non-virtual thunk to Lib::Real()", 0x20, "/src/real.cpp", 3),
        ],
    );

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("index");
    let stats = IndexBuilder::new(source, &output)
        .quiet(true)
        .build(&[BinarySpec::parse("prog").unwrap()])
        .unwrap();
    assert_eq!(stats.records, 1);

    let mut index = Index::open(&output).unwrap();
    assert_eq!(index.lookup("Real").unwrap().len(), 1);
    // The thunk's own leaf never became a record either
    assert!(index.lookup("thunk").unwrap().is_empty());
}

#[test]
fn test_symbols_without_line_coverage_are_skipped() {
    let mut source = MultiBinarySource::default();
    // 0x20 has no decoded line row (a compiler-generated thunk, say).
    source.add_binary(
        "prog",
        &[("covered()", 0x10, "/src/a.cpp", 1), ("uncovered()", 0x20, "", 0)],
    );

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("index");
    let stats = IndexBuilder::new(source, &output)
        .quiet(true)
        .build(&[BinarySpec::parse("prog").unwrap()])
        .unwrap();

    assert_eq!(stats.records, 1);
    let mut index = Index::open(&output).unwrap();
    assert!(index.lookup("uncovered").unwrap().is_empty());
    assert_eq!(index.lookup("covered").unwrap().len(), 1);
}

#[test]
fn test_shared_libraries_matching_filter_are_merged() {
    let mut source = MultiBinarySource::default();
    source
        .add_binary("out/debug/prog", &[("App::run()", 0x10, "/src/app.cpp", 7)])
        .add_binary("/opt/proj/out/debug/libcc.so", &[("Cc::run()", 0x10, "/src/cc.cpp", 9)])
        .add_binary("/usr/lib/libsystem.so", &[("Sys::run()", 0x10, "/src/sys.cpp", 11)])
        .add_libs(
            "out/debug/prog",
            &["/opt/proj/out/debug/libcc.so", "/usr/lib/libsystem.so"],
        );

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("index");
    let stats = IndexBuilder::new(source, &output)
        .quiet(true)
        .build(&[BinarySpec::parse("out/debug/prog:out/debug").unwrap()])
        .unwrap();

    // prog + libcc.so; libsystem.so does not match the filter
    assert_eq!(stats.binaries, 2);

    let mut index = Index::open(&output).unwrap();
    let matches = index.lookup("run").unwrap();
    let paths: Vec<&str> = matches.iter().map(|m| m.path.as_str()).collect();
    assert_eq!(paths, ["/src/app.cpp", "/src/cc.cpp"]);
}

#[test]
fn test_empty_filter_indexes_no_shared_libraries() {
    let mut source = MultiBinarySource::default();
    source
        .add_binary("prog", &[("App::run()", 0x10, "/src/app.cpp", 7)])
        .add_libs("prog", &["/opt/libcc.so"]);

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("index");
    let stats = IndexBuilder::new(source, &output)
        .quiet(true)
        .build(&[BinarySpec::parse("prog").unwrap()])
        .unwrap();
    assert_eq!(stats.binaries, 1);
}

#[test]
fn test_rebuild_is_byte_identical_and_query_stable() {
    fn make_source() -> MultiBinarySource {
        let mut source = MultiBinarySource::default();
        source.add_binary(
            "prog",
            &[
                ("Lib::B::Foo()", 0x20, "/src/b.cpp", 20),
                ("Lib::A::Foo(int)", 0x10, "/src/a.cpp", 10),
                ("Lib::Bar()", 0x30, "/src/c.cpp", 5),
                ("Aaa::first()", 0x40, "/src/d.cpp", 1),
            ],
        );
        source
    }

    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("index1");
    let second = dir.path().join("index2");
    let specs = [BinarySpec::parse("prog").unwrap()];

    IndexBuilder::new(make_source(), &first).block_size(2).quiet(true).build(&specs).unwrap();
    IndexBuilder::new(make_source(), &second).block_size(2).quiet(true).build(&specs).unwrap();

    // Identical directory entries and payload: the whole file matches.
    assert_eq!(std::fs::read(&first).unwrap(), std::fs::read(&second).unwrap());

    // Record order within a leaf is stable: sorted by (leaf, full).
    let mut index = Index::open(&first).unwrap();
    let matches = index.lookup("Foo").unwrap();
    assert_eq!(matches[0].full, "Lib::A::Foo(int)");
    assert_eq!(matches[1].full, "Lib::B::Foo()");
}

#[test]
fn test_duplicate_definition_collapses_to_one_record() {
    // The same decorated name seen from the main binary and again from a
    // shared library resolves to a single record (equality by full name).
    let mut source = MultiBinarySource::default();
    source
        .add_binary("prog", &[("Lib::Foo()", 0x10, "/src/a.cpp", 10)])
        .add_binary("/opt/out/libcc.so", &[("Lib::Foo()", 0x50, "/src/a.cpp", 10)])
        .add_libs("prog", &["/opt/out/libcc.so"]);

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("index");
    let stats = IndexBuilder::new(source, &output)
        .quiet(true)
        .build(&[BinarySpec::parse("prog:out").unwrap()])
        .unwrap();
    assert_eq!(stats.records, 1);
}

#[test]
fn test_zero_block_size_is_an_error_not_a_panic() {
    let mut source = MultiBinarySource::default();
    source.add_binary("prog", &[("App::run()", 0x10, "/src/app.cpp", 7)]);

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("index");
    let err = IndexBuilder::new(source, &output)
        .block_size(0)
        .quiet(true)
        .build(&[BinarySpec::parse("prog").unwrap()])
        .unwrap_err();
    assert!(matches!(err, BuildError::InvalidBlockSize));
    // Rejected before anything touched the target file.
    assert!(!output.exists());
}

#[test]
fn test_empty_extraction_builds_empty_queryable_index() {
    // No debug info anywhere: the build succeeds, the index is empty.
    let source = MultiBinarySource::default();
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("index");
    let stats = IndexBuilder::new(source, &output)
        .quiet(true)
        .build(&[BinarySpec::parse("prog").unwrap()])
        .unwrap();
    assert_eq!(stats.records, 0);
    assert_eq!(stats.blocks, 0);

    let mut index = Index::open(&output).unwrap();
    assert!(index.lookup("anything").unwrap().is_empty());
}
