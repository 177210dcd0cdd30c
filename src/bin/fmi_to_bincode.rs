use std::{path::PathBuf, process::ExitCode, time::Instant};

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info};
use od_workloads::graphs::road_graph::RoadGraph;
use tracing_subscriber::EnvFilter;

/// Converts a road graph in `.fmi` format to `.bincode`, which
/// `generate_od_pairs` reads much faster.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Infile in .fmi format
    #[arg(short = 'f', long)]
    graph_fmi: PathBuf,

    /// Outfile in .bincode format
    #[arg(short = 'b', long)]
    graph_bincode: PathBuf,
}

fn try_main(args: Args) -> Result<()> {
    let start = Instant::now();
    let graph = RoadGraph::from_fmi_file(&args.graph_fmi)
        .with_context(|| format!("unable to read graph '{}'", args.graph_fmi.display()))?;
    info!("reading fmi graph took {:?}", start.elapsed());

    let start = Instant::now();
    graph
        .to_bincode_file(&args.graph_bincode)
        .with_context(|| format!("unable to write '{}'", args.graph_bincode.display()))?;
    info!("writing bincode took {:?}", start.elapsed());

    Ok(())
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = try_main(Args::parse()) {
        error!("{:#}", err);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
