use anyhow::Context;
use clap::Parser;
use sibyl::backend::{BackendHandle, OfflineLoader};
use sibyl::{GenConfig, Generator, Profile};
use std::path::PathBuf;
use std::sync::Arc;

/// Generate a poem and four predictions from a usage profile.
///
/// Without a model runtime wired in, output comes from the deterministic
/// template path.
#[derive(Parser)]
#[command(name = "sibyl", version, about)]
struct Cli {
    /// Path to the profile JSON produced by the extraction stage.
    #[arg(long)]
    profile: PathBuf,

    /// Optional TOML config overriding the generation defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log attempt-level diagnostics.
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    let config = match &cli.config {
        Some(path) => GenConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => GenConfig::default(),
    };

    let raw = std::fs::read_to_string(&cli.profile)
        .with_context(|| format!("reading profile from {}", cli.profile.display()))?;
    let profile = Profile::from_json(&raw)?;

    let handle = Arc::new(BackendHandle::new(Box::new(OfflineLoader), config.sampling));
    let generator = Generator::new(handle, config);

    let poem = generator.poem(&profile, None).await;
    let predictions = generator.predictions(&profile, None).await;

    println!("{poem}\n");
    for prediction in predictions {
        println!("- {prediction}");
    }
    Ok(())
}
