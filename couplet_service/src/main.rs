// CLI entry point for the couplet engine.
//
// Loads a pronunciation dictionary (the embedded one unless `--dict` is
// given), an optional JSON config, and two corpora, then either prints one
// batch of couplets or serves them over HTTP.
//
// Usage:
//   couplets [--dict FILE] [--config FILE] generate --corpus-a FILE --corpus-b FILE
//       [--column-a NAME] [--column-b NAME] [-n COUNT] [--seed N] [--json]
//   couplets [--dict FILE] [--config FILE] serve --corpus-a FILE --corpus-b FILE
//       [--column-a NAME] [--column-b NAME] [--port PORT] [--seed N] [--shared-cache]
//
// Logs go to stderr, filtered by RUST_LOG (default "info"). Couplets go to
// stdout. When no seed is given one is drawn from the clock and logged so a
// run can be reproduced.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use couplet_phonetics::{CmuDictionary, default_dictionary};
use couplet_prng::{CoupletRng, clock_seed};
use couplet_service::service::CoupletRecord;
use couplet_service::{CoupletService, ServiceConfig, check_coverage, http, load_corpus};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "couplets")]
#[command(about = "Pair lines from two corpora into rhyming couplets")]
#[command(version)]
struct Cli {
    /// CMU-format pronunciation dictionary. The embedded default knows only
    /// about a hundred common words; real corpora need a full CMU dictionary
    #[arg(long, global = true, env = "COUPLETS_DICT")]
    dict: Option<PathBuf>,

    /// JSON service/engine configuration
    #[arg(long, global = true, env = "COUPLETS_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print one batch of couplets
    Generate(GenerateArgs),
    /// Serve couplets over HTTP
    Serve(ServeArgs),
}

#[derive(Args, Debug)]
struct CorpusArgs {
    /// First corpus: supplies the first line of each couplet
    #[arg(long)]
    corpus_a: PathBuf,

    /// Second corpus: supplies the rhyming second line
    #[arg(long)]
    corpus_b: PathBuf,

    /// Field holding the line when corpus A is a JSON array of objects
    #[arg(long)]
    column_a: Option<String>,

    /// Field holding the line when corpus B is a JSON array of objects
    #[arg(long)]
    column_b: Option<String>,

    /// PRNG seed (default: drawn from the clock)
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Args, Debug)]
struct GenerateArgs {
    #[command(flatten)]
    corpus: CorpusArgs,

    /// Number of couplets, clamped to the configured range
    #[arg(short = 'n', long)]
    count: Option<i64>,

    /// Print JSON instead of plain text
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct ServeArgs {
    #[command(flatten)]
    corpus: CorpusArgs,

    /// Listen port (overrides the config file)
    #[arg(short, long, env = "COUPLETS_PORT")]
    port: Option<u16>,

    /// Keep one phonetic cache alive across requests
    #[arg(long)]
    shared_cache: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let dictionary = match &cli.dict {
        Some(path) => CmuDictionary::from_path(path)
            .with_context(|| format!("loading dictionary {}", path.display()))?,
        None => default_dictionary(),
    };
    let config = match &cli.config {
        Some(path) => ServiceConfig::from_path(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ServiceConfig::default(),
    };

    match cli.command {
        Command::Generate(args) => run_generate(&dictionary, config, args),
        Command::Serve(args) => run_serve(&dictionary, config, args),
    }
}

fn load_corpora(
    dictionary: &CmuDictionary,
    args: &CorpusArgs,
) -> anyhow::Result<(Vec<String>, Vec<String>)> {
    let a = load_corpus(&args.corpus_a, args.column_a.as_deref())?;
    let b = load_corpus(&args.corpus_b, args.column_b.as_deref())?;
    check_coverage("a", dictionary, &a);
    check_coverage("b", dictionary, &b);
    Ok((a, b))
}

fn seeded_rng(seed: Option<u64>) -> CoupletRng {
    let seed = seed.unwrap_or_else(clock_seed);
    info!(seed, "seeded random source");
    CoupletRng::new(seed)
}

fn run_generate(
    dictionary: &CmuDictionary,
    config: ServiceConfig,
    args: GenerateArgs,
) -> anyhow::Result<()> {
    let (corpus_a, corpus_b) = load_corpora(dictionary, &args.corpus)?;
    let mut rng = seeded_rng(args.corpus.seed);
    let count = config.clamp_count(args.count);
    let mut service = CoupletService::new(dictionary, corpus_a, corpus_b, config, false);

    let couplets = service.generate(count, &mut rng);
    info!(requested = count, returned = couplets.len(), "generation finished");

    if args.json {
        let records: Vec<CoupletRecord> = couplets.into_iter().map(CoupletRecord::from).collect();
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else {
        for (i, couplet) in couplets.iter().enumerate() {
            if i > 0 {
                println!();
            }
            println!("{}", couplet.line_a);
            println!("{}", couplet.line_b);
        }
    }
    Ok(())
}

fn run_serve(
    dictionary: &CmuDictionary,
    mut config: ServiceConfig,
    args: ServeArgs,
) -> anyhow::Result<()> {
    if let Some(port) = args.port {
        config.port = port;
    }
    let (corpus_a, corpus_b) = load_corpora(dictionary, &args.corpus)?;
    let mut rng = seeded_rng(args.corpus.seed);
    let port = config.port;
    let mut service =
        CoupletService::new(dictionary, corpus_a, corpus_b, config, args.shared_cache);
    http::serve(&mut service, port, &mut rng)?;
    Ok(())
}
