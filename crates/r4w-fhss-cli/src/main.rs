//! R4W FHSS Command-Line Interface
//!
//! This CLI provides tools for:
//! - Listing the regulatory domain tables per radio chip
//! - Generating hop sequences from a domain and seed
//! - Applying domain override codes
//! - Walking a hop table the way a radio driver does
//! - Inspecting YAML configuration

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use r4w_fhss::{
    generate, DomainSelector, FhssConfig, FhssController, HopPlan, HopTable, LinearCongruential,
    OverrideCodes, RadioChip, SPREAD_SCALE,
};
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "r4w-fhss")]
#[command(author, version, about = "R4W frequency hopping sequence tool", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the regulatory domains of a radio chip
    Domains {
        /// Radio chip (sx127x, sx128x)
        #[arg(short, long, default_value = "sx127x")]
        radio: String,
    },

    /// Generate the hop sequence for a domain and seed
    Generate {
        /// Domain name or table index
        #[arg(short, long, default_value = "0")]
        domain: String,

        /// Hop seed (decimal or 0x-prefixed hex)
        #[arg(short, long, default_value = "0")]
        seed: String,

        /// Radio chip (sx127x, sx128x)
        #[arg(short, long, default_value = "sx127x")]
        radio: String,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Apply domain override codes and generate the resulting sequence
    Override {
        /// Start frequency code (0-5: 750..1000 MHz)
        #[arg(long)]
        start_code: u8,

        /// Stop frequency code (0-5: 750..1000 MHz)
        #[arg(long)]
        stop_code: u8,

        /// Channel count code (0-3: 10, 20, 30, 40)
        #[arg(long)]
        count_code: u8,

        /// Domain name or table index the override starts from
        #[arg(short, long, default_value = "0")]
        domain: String,

        /// Hop seed (decimal or 0x-prefixed hex)
        #[arg(short, long, default_value = "0")]
        seed: String,

        /// Radio chip (sx127x, sx128x)
        #[arg(short, long, default_value = "sx127x")]
        radio: String,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Walk the hop table, printing channel and frequency per hop
    Walk {
        /// Domain name or table index
        #[arg(short, long, default_value = "0")]
        domain: String,

        /// Hop seed (decimal or 0x-prefixed hex)
        #[arg(short, long, default_value = "0")]
        seed: String,

        /// Radio chip (sx127x, sx128x)
        #[arg(short, long, default_value = "sx127x")]
        radio: String,

        /// Number of hops to take
        #[arg(long, default_value = "20")]
        hops: usize,
    },

    /// Show the loaded configuration and the plan it produces
    Config {
        /// Configuration file (default: search path)
        #[arg(short, long)]
        path: Option<PathBuf>,

        /// Print an example configuration instead
        #[arg(long)]
        example: bool,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Serialize)]
struct PlanReport<'a> {
    radio: RadioChip,
    domain: &'a str,
    freq_start: u32,
    freq_stop: u32,
    freq_start_hz: u64,
    freq_stop_hz: u64,
    channel_count: u8,
    seed: u32,
    sync_channel: u8,
    freq_spread: u64,
    sequence: &'a [u8],
}

impl<'a> PlanReport<'a> {
    fn new(radio: RadioChip, plan: &'a HopPlan) -> Self {
        let domain = plan.domain();
        Self {
            radio,
            domain: &domain.name,
            freq_start: domain.freq_start,
            freq_stop: domain.freq_stop,
            freq_start_hz: radio.reg_to_hz(domain.freq_start),
            freq_stop_hz: radio.reg_to_hz(domain.freq_stop),
            channel_count: domain.channel_count,
            seed: plan.seed(),
            sync_channel: plan.sync_channel(),
            freq_spread: plan.freq_spread(),
            sequence: plan.sequence().as_slice(),
        }
    }
}

fn parse_radio(radio: &str) -> Result<RadioChip> {
    radio.parse::<RadioChip>().map_err(anyhow::Error::from)
}

fn parse_seed(seed: &str) -> Result<u32> {
    let seed = seed.trim();
    match seed.strip_prefix("0x").or_else(|| seed.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16).with_context(|| format!("Invalid hex seed: {}", seed)),
        None => seed
            .parse::<u32>()
            .with_context(|| format!("Invalid seed: {}. Must be a 32-bit integer", seed)),
    }
}

fn parse_domain(domain: &str) -> DomainSelector {
    match domain.parse::<DomainSelector>() {
        Ok(selector) => selector,
        Err(never) => match never {},
    }
}

fn mhz(hz: u64) -> f64 {
    hz as f64 / 1_000_000.0
}

fn print_plan(radio: RadioChip, plan: &HopPlan, format: OutputFormat) -> Result<()> {
    let report = PlanReport::new(radio, plan);

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("=== Hop Sequence ===");
    println!();
    println!("Radio:          {}", report.radio);
    println!("Domain:         {}", report.domain);
    println!(
        "Range:          {:.3} - {:.3} MHz ({} - {})",
        mhz(report.freq_start_hz),
        mhz(report.freq_stop_hz),
        report.freq_start,
        report.freq_stop
    );
    println!("Channels:       {}", report.channel_count);
    println!("Seed:           0x{:08x}", report.seed);
    println!("Sync channel:   {}", report.sync_channel);
    println!("Spread:         {} (/{})", report.freq_spread, SPREAD_SCALE);
    println!("Length:         {} ({} blocks)", report.sequence.len(), plan.sequence().block_count());
    println!();

    for line in report.sequence.chunks(20) {
        let rendered: Vec<String> = line.iter().map(|ch| format!("{:>2}", ch)).collect();
        println!("  {}", rendered.join(" "));
    }

    Ok(())
}

fn cmd_domains(radio: String) -> Result<()> {
    let radio = parse_radio(&radio)?;

    println!("=== {} Regulatory Domains ===", radio);
    println!();
    println!(
        "{:<4} {:<8} {:>10} {:>10} {:>9} {:>5} {:>10}",
        "#", "Domain", "Start MHz", "Stop MHz", "Channels", "Sync", "Spread"
    );
    println!("{}", "-".repeat(62));

    for index in 0..radio.domains().len() {
        let domain = radio.domain(index)?;
        let spread = generate(&domain, 0, &mut LinearCongruential::default())?.freq_spread();
        println!(
            "{:<4} {:<8} {:>10.3} {:>10.3} {:>9} {:>5} {:>10}",
            index,
            domain.name,
            mhz(radio.reg_to_hz(domain.freq_start)),
            mhz(radio.reg_to_hz(domain.freq_stop)),
            domain.channel_count,
            domain.sync_channel(),
            spread
        );
    }

    Ok(())
}

fn cmd_generate(domain: String, seed: String, radio: String, format: OutputFormat) -> Result<()> {
    let radio = parse_radio(&radio)?;
    let seed = parse_seed(&seed)?;
    let controller = FhssController::new(radio, &parse_domain(&domain), seed)
        .with_context(|| format!("Failed to generate sequence for domain {}", domain))?;

    info!("Generated plan for {} with seed 0x{:08x}", controller.domain(), seed);
    print_plan(radio, &controller.table().plan(), format)
}

#[allow(clippy::too_many_arguments)]
fn cmd_override(
    start_code: u8,
    stop_code: u8,
    count_code: u8,
    domain: String,
    seed: String,
    radio: String,
    format: OutputFormat,
) -> Result<()> {
    let radio = parse_radio(&radio)?;
    let seed = parse_seed(&seed)?;
    let codes = OverrideCodes::new(start_code, stop_code, count_code);

    let mut controller = FhssController::new(radio, &parse_domain(&domain), seed)?;
    let before = controller.domain().clone();
    controller
        .apply_override(codes, seed)
        .with_context(|| format!("Override {:?} rejected for domain {}", codes, before.name))?;

    if format == OutputFormat::Text {
        println!("=== Domain Override ===");
        println!();
        println!("Codes:          start={} stop={} count={}", start_code, stop_code, count_code);
        println!("Before:         {}", before);
        println!("After:          {}", controller.domain());
        for (name, code, valid) in [
            ("start", start_code, codes.start_hz().is_some()),
            ("stop", stop_code, codes.stop_hz().is_some()),
            ("count", count_code, codes.channel_count().is_some()),
        ] {
            if !valid {
                println!("Note:           {} code {} not recognised, field unchanged", name, code);
            }
        }
        println!();
    }

    print_plan(radio, &controller.table().plan(), format)
}

fn cmd_walk(domain: String, seed: String, radio: String, hops: usize) -> Result<()> {
    let radio = parse_radio(&radio)?;
    let seed = parse_seed(&seed)?;
    let controller = FhssController::new(radio, &parse_domain(&domain), seed)?;
    let table = controller.table();

    println!("=== Hop Walk: {} ===", controller.domain().name);
    println!();
    println!("{:<6} {:<8} {:>8} {:>12} {:>12}", "Hop", "Cursor", "Channel", "Register", "MHz");
    println!("{}", "-".repeat(50));

    print_hop(&table, radio, 0);
    for hop in 1..=hops {
        table.next_channel();
        print_hop(&table, radio, hop);
    }

    Ok(())
}

fn print_hop(table: &HopTable, radio: RadioChip, hop: usize) {
    let freq = table.current_frequency();
    let marker = if table.on_sync_channel() { " (sync)" } else { "" };
    println!(
        "{:<6} {:<8} {:>8} {:>12} {:>12.3}{}",
        hop,
        table.cursor(),
        table.current_channel(),
        freq,
        mhz(radio.reg_to_hz(freq)),
        marker
    );
}

fn cmd_config(path: Option<PathBuf>, example: bool) -> Result<()> {
    if example {
        print!("{}", FhssConfig::example_yaml());
        return Ok(());
    }

    let config = match &path {
        Some(path) => FhssConfig::load_from(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => FhssConfig::load().context("Failed to load config")?,
    };

    println!("=== FHSS Configuration ===");
    println!();
    println!("Radio:          {}", config.radio);
    println!("Domain:         {}", config.domain);
    println!("Seed:           0x{:08x}", config.seed);
    match &config.override_codes {
        Some(codes) => println!(
            "Override:       start={} stop={} count={}",
            codes.start_code, codes.stop_code, codes.count_code
        ),
        None => println!("Override:       none"),
    }
    println!();

    let controller = FhssController::from_config(&config).context("Invalid configuration")?;
    print_plan(config.radio, &controller.table().plan(), OutputFormat::Text)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = match cli.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Domains { radio } => cmd_domains(radio),

        Commands::Generate {
            domain,
            seed,
            radio,
            format,
        } => cmd_generate(domain, seed, radio, format),

        Commands::Override {
            start_code,
            stop_code,
            count_code,
            domain,
            seed,
            radio,
            format,
        } => cmd_override(start_code, stop_code, count_code, domain, seed, radio, format),

        Commands::Walk {
            domain,
            seed,
            radio,
            hops,
        } => cmd_walk(domain, seed, radio, hops),

        Commands::Config { path, example } => cmd_config(path, example),
    }
}
