//! Ledger configuration.

use std::path::{Path, PathBuf};

use anyhow::Context;

use hashledger::blockchain::ChainOptions;

use crate::cli::Cli;

/// Complete ledger configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerConfig {
    /// Path to the chain file.
    pub chain_file: PathBuf,

    /// Options used to open the chain file.
    pub options: ChainOptions,

    /// Log level.
    pub log_level: String
}

impl LedgerConfig {
    /// Create a ledger configuration from CLI arguments.
    /// 
    /// Options are read from the config file if one is given,
    /// then overridden by the command line flags.
    pub fn from_cli(cli: &Cli) -> anyhow::Result<Self> {
        let mut options = match &cli.config {
            Some(path) => Self::read_options(path)?,
            None => ChainOptions::default()
        };

        if let Some(hash_algorithm) = cli.hash {
            options.hash_algorithm = hash_algorithm;
        }

        Ok(Self {
            chain_file: cli.file.clone(),
            options,
            log_level: cli.log_level.clone()
        })
    }

    fn read_options(path: &Path) -> anyhow::Result<ChainOptions> {
        let options = std::fs::read(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        serde_json::from_slice(&options)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }
}
