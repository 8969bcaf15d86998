use anyhow::{bail, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ipplan_cidr::{find_overlaps, NetworkBlock};
use ipplan_classify::classify;
use ipplan_core::{parse_mask, Address};
use ipplan_planner::{
    plan_uniform, OversizePolicy, PlanMode, PlannerConfig, SubnetRequirement, VlsmAllocator,
};

mod batch;
mod render;

/// IPv4 subnet planner: uniform CIDR splits, VLSM, classification and overlap checks
#[derive(Parser)]
#[command(name = "ipplan")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Output format
    #[arg(short, long, value_enum, default_value = "human", global = true)]
    output: OutputFormat,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Split a base block into uniform subnets or VLSM allocations
    Plan(PlanArgs),
    /// Show class and category of one or more addresses
    Classify(ClassifyArgs),
    /// Convert between prefix length and subnet mask
    Mask(MaskArgs),
    /// Show details of a CIDR block
    Info(InfoArgs),
    /// Report overlapping CIDR blocks (exits non-zero on conflicts)
    Overlap(OverlapArgs),
    /// Classify addresses in bulk from a file or stdin
    Batch(BatchArgs),
}

#[derive(Parser)]
struct PlanArgs {
    /// Base network in CIDR notation (e.g., 192.168.1.0/24)
    #[arg(short, long, value_name = "CIDR")]
    base: String,

    /// Number of equal subnets
    #[arg(short, long, value_name = "N")]
    count: Option<u64>,

    /// Usable hosts per equal subnet
    #[arg(long, value_name = "N")]
    hosts: Option<u64>,

    /// VLSM requirements as name:hosts,name:hosts,...
    #[arg(
        short,
        long,
        value_name = "LIST",
        conflicts_with_all = ["count", "hosts"]
    )]
    requirements: Option<String>,

    /// Fail instead of skipping VLSM requirements larger than the base
    #[arg(long)]
    strict: bool,

    /// List VLSM allocations in requirement order instead of address order
    #[arg(long)]
    input_order: bool,
}

#[derive(Parser)]
struct ClassifyArgs {
    /// IPv4 addresses
    #[arg(value_name = "ADDRESS", required = true)]
    addresses: Vec<String>,
}

#[derive(Parser)]
struct MaskArgs {
    /// Prefix length (24 or /24) or dotted mask (255.255.255.0)
    #[arg(value_name = "MASK")]
    value: String,
}

#[derive(Parser)]
struct InfoArgs {
    /// Block in CIDR notation
    #[arg(value_name = "CIDR")]
    cidr: String,
}

#[derive(Parser)]
struct OverlapArgs {
    /// Blocks in CIDR notation
    #[arg(value_name = "CIDR", required = true)]
    blocks: Vec<String>,
}

#[derive(Parser)]
struct BatchArgs {
    /// Input file (use '-' for stdin)
    #[arg(short, long, value_name = "FILE")]
    file: Option<String>,

    /// Number of worker threads (default: CPU cores)
    #[arg(short, long)]
    workers: Option<usize>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output (pretty-printed)
    Json,
    /// JSON output (compact)
    JsonCompact,
    /// CSV output
    Csv,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Plan(args) => handle_plan(args, cli.output)?,
        Commands::Classify(args) => handle_classify(args, cli.output)?,
        Commands::Mask(args) => handle_mask(args, cli.output)?,
        Commands::Info(args) => handle_info(args, cli.output)?,
        Commands::Overlap(args) => handle_overlap(args, cli.output)?,
        Commands::Batch(args) => handle_batch(args, cli.output)?,
    }

    Ok(())
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn planner_config(strict: bool) -> PlannerConfig {
    let mut config = PlannerConfig::from_env();
    if strict {
        config.oversize_policy = OversizePolicy::Fail;
    }
    config
}

fn handle_plan(args: PlanArgs, format: OutputFormat) -> Result<()> {
    let base = NetworkBlock::parse(&args.base)?;
    info!(%base, "planning");

    if let Some(ref list) = args.requirements {
        let requirements = SubnetRequirement::parse_list(list)?;
        let config = planner_config(args.strict);
        debug!(?config, count = requirements.len(), "vlsm allocation");

        let plan = VlsmAllocator::with_config(config).allocate(&base, &requirements)?;
        render::print_vlsm(&plan, format, args.input_order)?;
    } else {
        let mode = PlanMode::from_options(args.count, args.hosts)?;
        let plan = plan_uniform(&base, mode)?;
        render::print_uniform(&plan, format)?;
    }

    Ok(())
}

fn handle_classify(args: ClassifyArgs, format: OutputFormat) -> Result<()> {
    let results = args
        .addresses
        .iter()
        .map(|text| Address::parse(text).map(classify))
        .collect::<ipplan_core::Result<Vec<_>>>()?;

    render::print_classifications(&results, format)
}

fn handle_mask(args: MaskArgs, format: OutputFormat) -> Result<()> {
    let prefix = parse_mask(&args.value)?;
    render::print_mask(prefix, format)
}

fn handle_info(args: InfoArgs, format: OutputFormat) -> Result<()> {
    let block = NetworkBlock::parse(&args.cidr)?;
    render::print_block_info(&block, format)
}

fn handle_overlap(args: OverlapArgs, format: OutputFormat) -> Result<()> {
    let blocks = args
        .blocks
        .iter()
        .map(|text| NetworkBlock::parse(text))
        .collect::<ipplan_core::Result<Vec<_>>>()?;

    let report = find_overlaps(&blocks);
    render::print_overlaps(&report, format)?;

    if !report.is_empty() {
        bail!("{} overlapping pair(s) found", report.len());
    }
    Ok(())
}

fn handle_batch(args: BatchArgs, format: OutputFormat) -> Result<()> {
    match args.file.as_deref() {
        Some(file) => info!("Reading from: {}", file),
        None => info!("Reading from stdin"),
    }

    let text = batch::read_input(args.file.as_deref())?;
    let processor = batch::BatchProcessor::new(args.workers)?;
    let results = processor.process_lines(&text);

    render::print_batch(&results, format)
}
