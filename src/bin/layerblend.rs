use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use layerblend::{
    Algorithm, Benchmark, BlendOptions, CompressionHint, Dispatcher, FilterHint, ImageSource,
};

#[derive(Parser, Debug)]
#[command(name = "layerblend", version)]
struct Cli {
    /// Log pool and compositing activity to stderr.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Blend a foreground PNG over a background PNG.
    Pair(PairArgs),
    /// Fold two or more PNGs left to right into one.
    Batch(BatchArgs),
    /// Print build metadata and supported algorithms as JSON.
    Info,
    /// Time every algorithm and compression level over a batch of PNGs.
    Benchmark(BenchmarkArgs),
}

#[derive(Args, Debug)]
struct EncodeArgs {
    /// Worker threads per composite (1 = inline, no pool).
    #[arg(long, default_value_t = 1)]
    threads: usize,

    /// PNG filter for the output.
    #[arg(long, default_value_t = FilterHint::NoFilter)]
    filter: FilterHint,

    /// PNG compression for the output.
    #[arg(long, default_value_t = CompressionHint::Fast)]
    compression: CompressionHint,
}

#[derive(Args, Debug)]
struct PairArgs {
    /// Background (bottom) PNG.
    #[arg(long)]
    bg: PathBuf,

    /// Foreground (top) PNG.
    #[arg(long)]
    fg: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Blend algorithm.
    #[arg(long, default_value_t = Algorithm::SourceOver)]
    algorithm: Algorithm,

    #[command(flatten)]
    encode: EncodeArgs,
}

#[derive(Args, Debug)]
struct BatchArgs {
    /// Input PNGs, bottom first.
    #[arg(required = true, num_args = 2..)]
    images: Vec<PathBuf>,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Blend algorithm for every step.
    #[arg(long, default_value_t = Algorithm::SourceOver)]
    algorithm: Algorithm,

    /// Comma-separated algorithm per step (one fewer than the number of images).
    #[arg(long, value_delimiter = ',')]
    steps: Vec<Algorithm>,

    #[command(flatten)]
    encode: EncodeArgs,
}

#[derive(Args, Debug)]
struct BenchmarkArgs {
    /// Input PNGs, bottom first.
    #[arg(required = true, num_args = 2..)]
    images: Vec<PathBuf>,

    /// Worker threads per composite.
    #[arg(long, default_value_t = 1)]
    threads: usize,

    /// Repetitions per algorithm and compression level.
    #[arg(long, default_value_t = 1)]
    runs: usize,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Pair(args) => cmd_pair(args),
        Command::Batch(args) => cmd_batch(args),
        Command::Info => cmd_info(),
        Command::Benchmark(args) => cmd_benchmark(args),
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn options(algorithm: Algorithm, encode: &EncodeArgs) -> BlendOptions {
    BlendOptions {
        num_threads: encode.threads,
        algorithm,
        filter: encode.filter,
        compression: encode.compression,
    }
}

fn ensure_parent(out: &std::path::Path) -> anyhow::Result<()> {
    if let Some(parent) = out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    Ok(())
}

fn cmd_pair(args: PairArgs) -> anyhow::Result<()> {
    let opts = options(args.algorithm, &args.encode);
    ensure_parent(&args.out)?;

    Dispatcher::new().blend_pair_to_file(
        &ImageSource::path(&args.bg),
        &ImageSource::path(&args.fg),
        &args.out,
        &opts,
    )?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_batch(args: BatchArgs) -> anyhow::Result<()> {
    let opts = options(args.algorithm, &args.encode);
    let sources: Vec<ImageSource> = args.images.iter().map(ImageSource::path).collect();
    let steps = (!args.steps.is_empty()).then_some(args.steps.as_slice());
    ensure_parent(&args.out)?;

    Dispatcher::new().blend_batch_to_file(&sources, steps, &args.out, &opts)?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_info() -> anyhow::Result<()> {
    let info = layerblend::meta::build_info();
    println!(
        "{}",
        serde_json::to_string_pretty(&info).context("serialize build info")?
    );
    Ok(())
}

fn cmd_benchmark(args: BenchmarkArgs) -> anyhow::Result<()> {
    let sources: Vec<ImageSource> = args.images.iter().map(ImageSource::path).collect();
    let dispatcher = Dispatcher::new();
    let codec = dispatcher.codec();
    let mut overall = Benchmark::new();

    println!(
        "{:<18} {:<9} {:>10}  {:<16}  timing",
        "algorithm", "level", "bytes", "fingerprint"
    );
    for algorithm in Algorithm::ALL {
        for compression in CompressionHint::ALL {
            let opts = BlendOptions {
                num_threads: args.threads,
                algorithm,
                filter: FilterHint::NoFilter,
                compression,
            };
            let mut bench = Benchmark::new();
            let mut encoded = Vec::new();
            for _ in 0..args.runs.max(1) {
                encoded = dispatcher
                    .blend_batch_timed(&sources, None, &opts, &mut bench)
                    .with_context(|| format!("blend with {algorithm}/{compression}"))?;
            }
            let fingerprint = layerblend::ImageCodec::decode(codec, &encoded)
                .context("re-decode benchmark output")?
                .fingerprint();
            println!(
                "{:<18} {:<9} {:>10}  {:016x}  {}",
                algorithm.name(),
                compression.name(),
                encoded.len(),
                fingerprint,
                bench
            );
            overall += bench;
        }
    }
    println!("total: {overall}");
    println!("pool: {:?}", layerblend::pool_status());
    Ok(())
}
