//! Command line interface of the ledger.
//!
//! Every command opens the chain file, performs one
//! operation and exits with a non-zero code on failure.

mod cli;
mod config;
mod display;

use std::process::ExitCode;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use hashledger::prelude::*;

use crate::cli::{Cli, Command};
use crate::config::LedgerConfig;

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse_args();

    let config = LedgerConfig::from_cli(&cli)?;

    // Set up logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let mut chain = ChainFile::open_with_options(&config.chain_file, config.options)
        .with_context(|| format!("Failed to open chain file {}", config.chain_file.display()))?;

    run(&mut chain, &cli.command)
}

fn run(chain: &mut ChainFile, command: &Command) -> anyhow::Result<ExitCode> {
    match command {
        Command::Add { words } => {
            let block = chain.add(words.join(" "))?;

            println!("added block {} with hash {}", block.index(), block.digest());
        }

        Command::GetIndex { index } => {
            let Some(block) = chain.get_by_index(*index)? else {
                println!("bad index!");

                return Ok(ExitCode::FAILURE);
            };

            print!("{}", display::format_block(&block));
        }

        Command::GetHash { digest } => {
            let Some(block) = chain.get_by_digest(digest)? else {
                println!("bad hash!");

                return Ok(ExitCode::FAILURE);
            };

            print!("{}", display::format_block(&block));
        }

        Command::Validate => {
            let result = chain.validate()?;

            if let (Some(index), Some(kind)) = (result.index(), result.kind()) {
                println!("bad block detected at idx={index}, with error: {kind}");

                return Ok(ExitCode::FAILURE);
            }

            println!("blockchain is correct!");
        }

        Command::Dump { json } => {
            let mut cursor = chain.cursor();
            let mut first = true;

            while let Some(block) = chain.read_block(&mut cursor)? {
                if *json {
                    println!("{}", display::format_block_json(&block)?);
                }

                else {
                    if !first {
                        println!("{}", display::SEPARATOR);
                    }

                    print!("{}", display::format_block(&block));
                }

                first = false;
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
