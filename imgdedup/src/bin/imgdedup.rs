use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use color_eyre::eyre::{self, Context};
use imgdedup::{dupes_with, hash_with, RunConfig};
use imgdedup_common::bin_common::args::hashing::HashingCli;
use imgdedup_common::bin_common::args::similarity::SimiCli;
use imgdedup_common::bin_common::init::{init_eyre, init_logger};
use imgdedup_common::dedupe::store::HashFailure;

/// Finds visually identical images in a directory
#[derive(Parser, Debug)]
#[command()]
struct Cli {
    /// Print more details; use -vv for everything
    #[arg(long, short = 'v', action = ArgAction::Count)]
    verbose: u8,

    /// A file to additionally write the logs to
    #[arg(long)]
    logfile: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fingerprint every image under a directory
    Hash {
        #[command(flatten)]
        hashing: HashingCli,

        /// Directory with images
        #[arg(long, short = 'p', default_value = ".")]
        path: PathBuf,

        /// Only process up to this many files
        #[arg(long, default_value_t = usize::MAX)]
        limit: usize,

        /// Order the output by path
        #[arg(long)]
        sort: bool,
    },

    /// Group duplicate images, optionally deleting the redundant copies
    Dupes {
        #[command(flatten)]
        hashing: HashingCli,

        #[command(flatten)]
        simi: SimiCli,

        /// Directory with images
        #[arg(long, short = 'p', default_value = ".")]
        path: PathBuf,

        /// Only process up to this many files
        #[arg(long, default_value_t = usize::MAX)]
        limit: usize,

        /// Delete every non-canonical member of each group
        #[arg(long)]
        remove: bool,
    },
}

fn main() -> eyre::Result<()> {
    init_eyre()?;
    let cli = Cli::parse();
    init_logger(cli.verbose, cli.logfile.as_deref())?;

    match cli.command {
        Command::Hash {
            hashing,
            path,
            limit,
            sort,
        } => {
            let config = RunConfig::from_names(Some(hashing.algo()), Some(hashing.filter()))
                .wrap_err("invalid hashing configuration")?
                .limit(limit);

            let outcome = hash_with(&path, &config, sort)
                .wrap_err_with(|| format!("failed to hash {}", path.display()))?;

            for (path, fingerprint) in &outcome.hashes {
                println!("{fingerprint}\t{}", path.display());
            }
            report_failures(&outcome.failures);
        }

        Command::Dupes {
            hashing,
            simi,
            path,
            limit,
            remove,
        } => {
            let config = RunConfig::from_names(Some(hashing.algo()), Some(hashing.filter()))
                .wrap_err("invalid hashing configuration")?
                .limit(limit);

            let outcome = dupes_with(&path, &config, simi.threshold(), remove)
                .wrap_err_with(|| format!("failed to dedup {}", path.display()))?;

            if outcome.groups.is_empty() {
                log::info!("no duplicates found");
            }
            for (canonical, removable) in &outcome.groups {
                println!("{}", canonical.display());
                for dup in removable {
                    println!("  {}", dup.display());
                }
            }

            report_failures(&outcome.failures);

            let failed_removals = outcome
                .removals
                .iter()
                .filter(|o| o.result.is_err())
                .count();
            if failed_removals > 0 {
                log::error!("{failed_removals} files could not be removed");
            }
        }
    }

    Ok(())
}

fn report_failures(failures: &[HashFailure]) {
    for failure in failures {
        log::warn!("skipped {}: {}", failure.path.display(), failure.error);
    }
}
