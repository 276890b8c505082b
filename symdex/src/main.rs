//! # symdex - Main Entry Point
//!
//! Two subcommands:
//! - **`index`**: build the definition index from a set of binaries
//! - **`lookup`**: query the index for a leaf identifier

use anyhow::{Context, Result};
use clap::Parser;
use symdex::cli::{Args, Command};
use symdex::domain::{BinarySpec, BuildError, PathRewrite};
use symdex::extraction::BinutilsSource;
use symdex::index::{Index, IndexBuilder};
use symdex::preflight::run_preflight_checks;

// Exit codes
const EXIT_SUCCESS: i32 = 0;
const EXIT_ERROR: i32 = 1;
const EXIT_USAGE: i32 = 2;

fn main() {
    env_logger::init();
    std::process::exit(match run() {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            let code = exit_code_for(&e);
            eprintln!("error: {e:#}");
            code
        }
    });
}

fn exit_code_for(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<BuildError>() {
        Some(
            BuildError::InvalidSpec(_)
            | BuildError::InvalidRewrite(_)
            | BuildError::InvalidBlockSize,
        ) => EXIT_USAGE,
        _ => EXIT_ERROR,
    }
}

fn run() -> Result<()> {
    match Args::parse().command {
        Command::Index { binaries, substitute, output, block_size, quiet } => {
            cmd_index(&binaries, substitute.as_deref(), output, block_size, quiet)
        }
        Command::Lookup { leaf, index, json } => cmd_lookup(&leaf, &index, json),
    }
}

fn cmd_index(
    binaries: &[String],
    substitute: Option<&str>,
    output: std::path::PathBuf,
    block_size: usize,
    quiet: bool,
) -> Result<()> {
    // Fail fast on malformed input, before any extraction or disk write.
    let rewrite = substitute.map(PathRewrite::parse).transpose()?;
    let specs = binaries
        .iter()
        .map(|value| BinarySpec::parse(value))
        .collect::<Result<Vec<_>, _>>()?;

    let paths: Vec<_> = specs.iter().map(|s| s.path.clone()).collect();
    run_preflight_checks(&paths)?;

    let builder = IndexBuilder::new(BinutilsSource::new(rewrite), &output)
        .block_size(block_size)
        .quiet(quiet);
    let stats = builder.build(&specs).context("Failed to build index")?;

    if !quiet {
        println!(
            "indexed: {} binaries, {} records, {} blocks",
            stats.binaries, stats.records, stats.blocks
        );
        println!("saved: {}", output.display());
    }
    Ok(())
}

fn cmd_lookup(leaf: &str, index_path: &std::path::Path, json: bool) -> Result<()> {
    let mut index = Index::open(index_path)?;
    let matches = index.lookup(leaf)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&matches)?);
    } else {
        for definition in &matches {
            println!("{definition}");
        }
    }
    Ok(())
}
