//! CLI argument definitions

use crate::index::format::{DEFAULT_BLOCK_SIZE, DEFAULT_INDEX_FILE};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "symdex",
    about = "Index function/method definitions from native binaries and look them up",
    after_help = "\
EXAMPLES:
    symdex index out/debug/myprog                      Index one binary
    symdex index out/debug/myprog:out/debug            ... and its out/debug shared libs
    symdex index -s ../../= out/debug/myprog           Strip the ../../ path prefix
    symdex lookup Foo                                  Where is Foo defined?
    symdex lookup --json Foo                           Same, as JSON"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Build the definition index from one or more binaries
    Index {
        /// Binaries to index; append `:SUBSTRING` to also index shared
        /// libraries whose resolved path contains SUBSTRING
        #[arg(value_name = "BINARY[:LIB_FILTER]", required = true)]
        binaries: Vec<String>,

        /// Substitute the source-path prefix FROM with TO
        /// (e.g. `-s ../../=` removes the prefix `../../`)
        #[arg(short, long, value_name = "FROM=TO")]
        substitute: Option<String>,

        /// Index file to write
        #[arg(short, long, value_name = "FILE", default_value = DEFAULT_INDEX_FILE)]
        output: PathBuf,

        /// Records per index block
        #[arg(
            long,
            value_name = "N",
            default_value_t = DEFAULT_BLOCK_SIZE,
            value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..)
        )]
        block_size: usize,

        /// Suppress per-binary progress output
        #[arg(short, long)]
        quiet: bool,
    },

    /// Look up where a function or method is defined
    Lookup {
        /// Leaf identifier to find (case-sensitive exact match)
        #[arg(value_name = "NAME")]
        leaf: String,

        /// Index file to query
        #[arg(short, long, value_name = "FILE", default_value = DEFAULT_INDEX_FILE)]
        index: PathBuf,

        /// Print matches as JSON
        #[arg(long)]
        json: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parse_index() {
        let args =
            Args::try_parse_from(["symdex", "index", "-s", "../../=", "out/prog:out"]).unwrap();
        let Command::Index { binaries, substitute, output, block_size, quiet } = args.command
        else {
            panic!("expected index subcommand");
        };
        assert_eq!(binaries, ["out/prog:out"]);
        assert_eq!(substitute.as_deref(), Some("../../="));
        assert_eq!(output, PathBuf::from(DEFAULT_INDEX_FILE));
        assert_eq!(block_size, DEFAULT_BLOCK_SIZE);
        assert!(!quiet);
    }

    #[test]
    fn test_args_parse_lookup() {
        let args = Args::try_parse_from(["symdex", "lookup", "--json", "Foo"]).unwrap();
        let Command::Lookup { leaf, index, json } = args.command else {
            panic!("expected lookup subcommand");
        };
        assert_eq!(leaf, "Foo");
        assert_eq!(index, PathBuf::from(DEFAULT_INDEX_FILE));
        assert!(json);
    }

    #[test]
    fn test_index_requires_a_binary() {
        assert!(Args::try_parse_from(["symdex", "index"]).is_err());
    }

    #[test]
    fn test_index_rejects_zero_block_size() {
        assert!(Args::try_parse_from(["symdex", "index", "--block-size", "0", "prog"]).is_err());
        assert!(Args::try_parse_from(["symdex", "index", "--block-size", "1", "prog"]).is_ok());
    }
}
