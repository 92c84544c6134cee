use anyhow::{Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

use prosody_dataset::cli::{Cli, Command, SampleArgs, Split};
use prosody_dataset::{create_dataset, DatasetConfig, Datasets};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = DatasetConfig::load(&cli.config)?;
    let datasets = create_dataset(&config).context("Failed to build dataset index")?;

    match cli.command {
        Command::Summary => print_summary(&datasets),
        Command::Sample(args) => print_sample(&datasets, &args),
    }
}

fn print_summary(datasets: &Datasets) -> Result<()> {
    println!("keys: {}", datasets.key_count());
    println!("train: {}", datasets.train.len());
    println!(
        "test: {} ({} utterances)",
        datasets.test.len(),
        datasets.test.utterance_count()
    );
    Ok(())
}

fn print_sample(datasets: &Datasets, args: &SampleArgs) -> Result<()> {
    let dataset = match args.split {
        Split::Train => &datasets.train,
        Split::Test => &datasets.test,
    };
    let example = match args.seed {
        Some(seed) => dataset.get(args.index, &mut StdRng::seed_from_u64(seed))?,
        None => dataset.get_with_thread_rng(args.index)?,
    };
    let json = serde_json::to_string_pretty(&example).context("Failed to serialize example")?;
    println!("{json}");
    Ok(())
}
