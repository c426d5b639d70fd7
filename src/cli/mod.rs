// ============================================================
// Layer 1: CLI / Presentation Layer
// ============================================================
// Entry point for all user interaction. Parses arguments with
// clap and delegates the work to Layer 2 (application).
//
// Two commands are supported:
//   1. `prepare`: build and store the chunked dataset
//   2. `read`   : load a stored dataset and print its shape

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, PrepareArgs, ReadArgs};

use crate::application::prepare_use_case::{PrepConfig, PrepareUseCase};
use crate::application::read_use_case::{summarize_sets, ReadUseCase};

#[derive(Parser, Debug)]
#[command(
    name = "contig-prep",
    version,
    about = "Prepare chunked, length-stratified training data from annotated contigs."
)]
pub struct Cli {
    /// The subcommand to run (prepare or read)
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Match on the subcommand and dispatch to the correct use case.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Prepare(args) => run_prepare(args),
            Commands::Read(args)    => run_read(args),
        }
    }
}

fn run_prepare(args: PrepareArgs) -> Result<()> {
    let config: PrepConfig = args.into();
    config.validate()?;

    let prepared = PrepareUseCase::new(config.clone()).execute()?;

    println!(
        "Prepared {} chunks, vocabulary of {} tokens, saved to '{}'",
        prepared.dataset.len(),
        prepared.dataset.vocabulary.len(),
        config.store_dir.display()
    );
    for row in &prepared.summary {
        let name = row.range.map_or_else(|| "unassigned".to_string(), |r| format!("[{}, {})", r.lo, r.hi));
        println!(
            "  bin {:<16} contigs={:<8} training={:<8} validation={:<8} test={}",
            name, row.contigs, row.training, row.validation, row.test
        );
    }
    Ok(())
}

fn run_read(args: ReadArgs) -> Result<()> {
    let reader  = ReadUseCase::new(&args.store_dir);
    let dataset = reader.execute()?;
    let config  = reader.config()?;

    println!(
        "{} chunks, vocabulary of {} tokens",
        dataset.len(),
        dataset.vocabulary.len()
    );
    let bins: Vec<String> = config.bins.iter().map(ToString::to_string).collect();
    println!(
        "  prepared with seed={} chunk_len={} chunk_offset={} validation={} test={} bins={}",
        config.seed,
        config.chunk_len,
        config.chunk_offset,
        config.validation_frac,
        config.test_frac,
        bins.join(",")
    );
    for s in summarize_sets(&dataset)? {
        if s.chunks == 0 {
            continue;
        }
        println!(
            "  {:<11} chunks={:<8} shape={:?} positive positions={}",
            s.set.as_str(), s.chunks, s.shape, s.positive_positions
        );
    }
    Ok(())
}
