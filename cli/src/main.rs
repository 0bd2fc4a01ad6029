// Copyright (C) 2024 - 2025 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

#![deny(elided_lifetimes_in_paths)]

mod config;
mod input;
mod logger;
mod report;

use std::{path::{Path, PathBuf}, process::exit};

use anyhow::Context;
use clap::Subcommand;
use colored::Colorize;
use linscan::{AllocatorConfig, Interval, LinearScanAllocator};
use log::{debug, LevelFilter};

use self::{
    config::ConfigRoot,
    input::read_intervals,
    logger::Logger,
    report::print_allocation,
};

#[derive(clap::Parser, Debug)]
#[command(version, about = "Linear-scan register allocation over live intervals", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,

    /// Number of allocatable registers (overrides the configuration file)
    #[arg(short, long, global = true, allow_negative_numbers = true)]
    registers: Option<i64>,

    /// Configuration file, `linscan.toml` in the working directory by default
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Check the register exclusivity and capacity invariants on the result
    #[arg(long, global = true)]
    verify: bool,

    #[arg(long, global = true)]
    no_color: bool,

    #[arg(short, long, global = true)]
    verbose: bool,
}

impl Args {
    pub fn parse_args() -> Self {
        use clap::Parser;
        Self::parse()
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Allocate a file of `<id> <start> <end>` lines
    Intervals {
        file: PathBuf,
    },

    /// Compute the live intervals of a three-address-code listing and allocate them
    Tac {
        file: PathBuf,
    },
}

fn main() {
    let args = Args::parse_args();

    if let Err(e) = run(args) {
        eprintln!("{}: {}", "error".red().bold(), format!("{e:#}").bold());
        exit(1);
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let config = ConfigRoot::load(args.config.as_deref())?;

    let level = if args.verbose || config.log.debug { LevelFilter::Trace } else { LevelFilter::Warn };
    Logger::initialize(level);

    if args.no_color || !config.output.color {
        colored::control::set_override(false);
    }

    let register_count = args.registers.unwrap_or(config.allocator.registers);
    let allocator = LinearScanAllocator::new(AllocatorConfig::try_new(register_count)?);

    let intervals = match &args.command {
        Commands::Intervals { file } => read_intervals(file)?,
        Commands::Tac { file } => read_listing(file)?,
    };

    debug!("Allocating {} intervals over {register_count} registers", intervals.len());

    let allocation = allocator.allocate(&intervals)?;

    if args.verify {
        allocation.verify().context("allocation violates an invariant")?;
    }

    print_allocation(&allocation);
    Ok(())
}

fn read_listing(path: &Path) -> anyhow::Result<Vec<Interval>> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("could not read \"{}\"", path.display()))?;

    let intervals = linscan_tac::intervals_from_listing(&source)
        .with_context(|| format!("in \"{}\"", path.display()))?;

    Ok(intervals)
}
