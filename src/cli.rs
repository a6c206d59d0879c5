use crate::task::{ExtractorKind, Task};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mpeds", version, about = "Protest event coding for news text")]
pub struct Cli {
    /// Config file (default: MPEDS_CONFIG or ~/.mpeds/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding vectorizer and classifier artifacts
    #[arg(long, env = "MPEDS_ARTIFACTS", global = true)]
    pub artifacts: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Label documents with a trained classifier
    Classify(ClassifyArgs),
    /// Extract organizations, crowd size, or location
    Extract(ExtractArgs),
    /// Print the first segment of each document
    Lede(InputArgs),
}

#[derive(Args)]
pub struct InputArgs {
    /// Input file (default: stdin)
    pub file: Option<PathBuf>,

    /// Input is a JSON string or array of strings instead of one document per line
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser)]
pub struct ClassifyArgs {
    /// Classification task
    #[arg(long, value_enum)]
    pub task: Task,

    /// Report class probabilities instead of labels
    #[arg(long)]
    pub probabilities: bool,

    #[command(flatten)]
    pub input: InputArgs,
}

#[derive(Parser)]
pub struct ExtractArgs {
    /// What to extract
    #[arg(long, value_enum)]
    pub kind: ExtractorKind,

    #[command(flatten)]
    pub input: InputArgs,
}
