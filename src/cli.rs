//! Command-line argument parsing.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use hashledger::block::HashAlgorithm;

/// Append-only hash linked ledger stored in a single file.
#[derive(Parser, Debug, Clone)]
#[command(name = "hashledger")]
#[command(version)]
pub struct Cli {
    /// Path to the chain file. Created if it doesn't exist.
    #[arg(long, env = "HASHLEDGER_FILE", default_value = "blockchain.dat")]
    pub file: PathBuf,

    /// Path to JSON file with chain options.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Hash function (sha256, blake3). Overrides the config file.
    #[arg(long)]
    pub hash: Option<HashAlgorithm>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Add new block. Words are joined with spaces,
    /// no words make an empty payload.
    #[command(alias = "a")]
    Add {
        words: Vec<String>
    },

    /// Print block with the given index.
    #[command(alias = "i")]
    GetIndex {
        index: u64
    },

    /// Print block with the given digest.
    #[command(alias = "h")]
    GetHash {
        digest: String
    },

    /// Validate the whole chain.
    #[command(alias = "r")]
    Validate,

    /// Print all the blocks.
    #[command(alias = "d")]
    Dump {
        /// Print one JSON object per block.
        #[arg(long)]
        json: bool
    }
}

impl Cli {
    #[inline]
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
