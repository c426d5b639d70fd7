// ============================================================
// Layer 1: CLI Commands and Arguments
// ============================================================
// Defines the two subcommands: `prepare` and `read`
// and all their configurable flags.

use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::application::prepare_use_case::PrepConfig;
use crate::data::splitter::LengthBin;

/// The two top-level subcommands available to the user
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the chunked training/validation/test dataset and vocabulary
    Prepare(PrepareArgs),

    /// Load a previously prepared dataset and print its shape
    Read(ReadArgs),
}

/// All arguments for the `prepare` command.
#[derive(Args, Debug)]
pub struct PrepareArgs {
    /// Tab-separated annotation table (contig_ID, start, end, len)
    #[arg(long, default_value = "data/original_data/tn.contig.filter.tsv")]
    pub annotations: PathBuf,

    /// Directory with one tab-separated token file per contig
    #[arg(long, default_value = "data/original_data/contigs_func")]
    pub contigs_dir: PathBuf,

    /// Directory the chunk table, vocabulary and report are written to
    #[arg(long, default_value = "data/prep_trainvalidationtest_1")]
    pub store_dir: PathBuf,

    /// Share of contigs per bin drawn into the validation set
    #[arg(long, default_value_t = 0.05)]
    pub validation_frac: f64,

    /// Share of contigs per bin drawn into the test set
    #[arg(long, default_value_t = 0.05)]
    pub test_frac: f64,

    /// Length bins as half-open `lo:hi` ranges, comma separated
    #[arg(
        long,
        value_delimiter = ',',
        default_values = ["1:30", "30:500", "500:999999"]
    )]
    pub bins: Vec<LengthBin>,

    /// Positions per chunk
    #[arg(long, default_value_t = 150)]
    pub chunk_len: usize,

    /// Stride between chunk starts; may not exceed --chunk-len, so that
    /// every position lands in at least one chunk
    #[arg(long, default_value_t = 50)]
    pub chunk_offset: usize,

    /// Seed of the split generator
    #[arg(long, default_value_t = 4711)]
    pub seed: u64,
}

/// Convert CLI PrepareArgs into the application-layer PrepConfig.
impl From<PrepareArgs> for PrepConfig {
    fn from(a: PrepareArgs) -> Self {
        PrepConfig {
            annotations_path: a.annotations,
            contigs_dir:      a.contigs_dir,
            store_dir:        a.store_dir,
            validation_frac:  a.validation_frac,
            test_frac:        a.test_frac,
            bins:             a.bins,
            chunk_len:        a.chunk_len,
            chunk_offset:     a.chunk_offset,
            seed:             a.seed,
        }
    }
}

/// All arguments for the `read` command
#[derive(Args, Debug)]
pub struct ReadArgs {
    /// Directory written by `prepare`
    #[arg(long, default_value = "data/prep_trainvalidationtest_1")]
    pub store_dir: PathBuf,
}

#[cfg(test)]
mod tests {
    use crate::application::prepare_use_case::PrepConfig;
    use crate::cli::Cli;
    use crate::cli::commands::Commands;
    use crate::data::splitter::LengthBin;
    use clap::Parser;

    #[test]
    fn test_prepare_defaults_match_config_defaults() {
        let cli = Cli::try_parse_from(["contig-prep", "prepare"]).unwrap();
        let Commands::Prepare(args) = cli.command else {
            panic!("expected prepare");
        };
        assert_eq!(PrepConfig::from(args), PrepConfig::default());
    }

    #[test]
    fn test_prepare_bins_flag() {
        let cli = Cli::try_parse_from([
            "contig-prep", "prepare", "--bins", "1:10,10:20", "--chunk-len", "8", "--seed", "1",
        ])
        .unwrap();
        let Commands::Prepare(args) = cli.command else {
            panic!("expected prepare");
        };
        assert_eq!(args.bins, vec![LengthBin::new(1, 10), LengthBin::new(10, 20)]);
        assert_eq!(args.chunk_len, 8);
        assert_eq!(args.seed, 1);
    }

    #[test]
    fn test_bad_bin_is_a_parse_error() {
        assert!(Cli::try_parse_from(["contig-prep", "prepare", "--bins", "10"]).is_err());
    }
}
