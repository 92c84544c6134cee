use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(
    name = "prosody-dataset",
    version,
    about = "Builds and inspects duration/accent training examples"
)]
pub struct Cli {
    /// Path to the dataset configuration JSON.
    #[arg(long, value_name = "PATH")]
    pub config: PathBuf,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Index the dataset and print utterance and split counts.
    Summary,
    /// Materialize one example and print it as JSON.
    Sample(SampleArgs),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Split {
    Train,
    Test,
}

#[derive(Args, Debug, Clone)]
pub struct SampleArgs {
    #[arg(long, value_enum, default_value_t = Split::Train)]
    pub split: Split,
    #[arg(long)]
    pub index: usize,
    /// Seed for window and mask draws; the thread generator is used when absent.
    #[arg(long)]
    pub seed: Option<u64>,
}
