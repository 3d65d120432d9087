use std::{fs::File, path::PathBuf};

use anyhow::Context;
use clap::Parser;
use env_logger::Env;
use kaleido_json::{serde_json, JsonSer};
use kaleido_random::{
    rand::{rngs::StdRng, SeedableRng},
    random_requests,
};

#[derive(Parser)]
#[command(name = "gen_rand_scene")]
#[command(about = "Write random kaleidoscope requests to a JSON file", long_about = None)]
#[command(version)]
struct Cli {
    /// Where to write the requests
    #[arg(value_hint = clap::ValueHint::FilePath)]
    file: PathBuf,

    /// Number of requests to generate
    #[arg(default_value_t = 8)]
    count: usize,

    /// Seed the generator, for reproducible output
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let env = Env::default().default_filter_or("warn");
    env_logger::Builder::from_env(env).init();

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let requests = random_requests(cli.count, &mut rng);

    log::info!("writing {} requests to {}", requests.len(), cli.file.display());

    let file = File::create(&cli.file)
        .with_context(|| format!("failed to create {}", cli.file.display()))?;

    serde_json::to_writer_pretty(file, &requests.to_json())?;

    Ok(())
}
