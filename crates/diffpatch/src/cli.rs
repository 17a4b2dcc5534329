use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use diffpatch::Config;

#[derive(Parser)]
#[command(
    name = "diffpatch",
    about = "Diff texts, build patches and apply them to drifted copies",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub tuning: TuningArgs,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the edit script between two files
    Diff(DiffArgs),
    /// Print a patch turning one file into another
    Make(MakeArgs),
    /// Apply a stored patch to a file
    Apply(ApplyArgs),
    /// Print the delta encoding of the edit script between two files
    Delta(DeltaArgs),
}

/// Tunables shared by every subcommand
#[derive(Args)]
pub struct TuningArgs {
    /// Edit script search budget in milliseconds, 0 for none
    #[arg(long, global = true, default_value_t = 1000)]
    pub timeout_ms: u64,

    /// Context characters around each patch entry
    #[arg(long, global = true, default_value_t = 4)]
    pub margin: usize,

    /// Cost of an extra edit when simplifying scripts
    #[arg(long, global = true, default_value_t = 4)]
    pub edit_cost: usize,

    /// Highest fuzzy match score accepted when applying patches
    #[arg(long, global = true, default_value_t = 0.5)]
    pub threshold: f64,
}

impl TuningArgs {
    /// Build and validate the library configuration
    pub fn config(&self) -> diffpatch::Result<Config> {
        let config = Config::default()
            .timeout(Duration::from_millis(self.timeout_ms))
            .margin(self.margin)
            .edit_cost(self.edit_cost)
            .threshold(self.threshold);
        config.validate()?;
        Ok(config)
    }
}

#[derive(Args)]
pub struct DiffArgs {
    pub old: PathBuf,
    pub new: PathBuf,

    /// Render the script as HTML
    #[arg(long)]
    pub html: bool,

    /// Always diff char by char
    #[arg(long)]
    pub no_line_mode: bool,
}

#[derive(Args)]
pub struct MakeArgs {
    pub old: PathBuf,
    pub new: PathBuf,
}

#[derive(Args)]
pub struct ApplyArgs {
    pub patch: PathBuf,
    pub file: PathBuf,

    /// Write the patched text here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct DeltaArgs {
    pub old: PathBuf,
    pub new: PathBuf,
}
