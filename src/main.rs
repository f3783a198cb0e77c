use clap::Parser;
use foldersort::cli::{RunOptions, run_cli_with_config};
use foldersort::output::OutputFormatter;
use std::path::PathBuf;
use std::process::ExitCode;

/// Sort the files of a directory into category folders by extension.
#[derive(Debug, Parser)]
#[command(name = "foldersort", version, about)]
struct Args {
    /// Directory whose top-level files should be organized.
    directory: PathBuf,

    /// Custom category as NAME=.ext1,.ext2 (repeatable; later values win).
    #[arg(short = 'c', long = "category", value_name = "NAME=EXTS")]
    categories: Vec<String>,

    /// TOML file with [[category]] entries, applied before --category.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Show where files would go without creating folders or moving files.
    #[arg(long)]
    dry_run: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let options = RunOptions {
        dry_run: args.dry_run,
    };

    match run_cli_with_config(
        options,
        &args.directory,
        args.config.as_deref(),
        &args.categories,
    ) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            OutputFormatter::error(&e);
            ExitCode::FAILURE
        }
    }
}
