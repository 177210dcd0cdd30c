use std::{
    fs::File,
    io::BufWriter,
    path::{Path, PathBuf},
    process::ExitCode,
};

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info};
use od_workloads::{
    graphs::road_graph::{CostFunction, RoadGraph},
    od_pairs::{
        config::{DistanceMode, ExhaustionPolicy, GenerationConfig, Methodology, DEFAULT_SEED},
        generate,
        writer::OdPairWriter,
    },
    utility::get_progressbar,
};
use tracing_subscriber::EnvFilter;

/// Generates OD-pairs, with the origin chosen uniformly at random. The
/// destination is also picked uniformly at random, or chosen by distance or
/// Dijkstra rank. Dijkstra ranks are specified in terms of powers of two.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Number of OD-pairs to be generated (per Dijkstra rank)
    #[arg(short = 'n', long)]
    number_of_pairs: u32,

    /// Seed for the random number generator
    #[arg(short, long, default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Use physical length as cost function (default: travel time)
    #[arg(long)]
    len: bool,

    /// Space-separated list of Dijkstra ranks, given as exponents of two
    #[arg(short, long, num_args = 1.., conflicts_with = "distance")]
    ranks: Option<Vec<u32>>,

    /// (Expected) distance between a pair's origin and destination
    #[arg(short, long)]
    distance: Option<u32>,

    /// Geometrically distributed distances with expected value --distance
    #[arg(long, requires = "distance")]
    geo: bool,

    /// Origins tried per pair before a rank or distance is given up
    #[arg(long, default_value_t = 1)]
    max_attempts: u32,

    /// Input graph in `.bincode` or `.fmi` format
    #[arg(short, long)]
    input: PathBuf,

    /// Output file, `.csv` is appended
    #[arg(short, long)]
    output: PathBuf,
}

impl Args {
    fn methodology(&self) -> Methodology {
        if let Some(exponents) = &self.ranks {
            return Methodology::DijkstraRank {
                exponents: exponents.clone(),
            };
        }

        if let Some(distance) = self.distance {
            let mode = if self.geo {
                DistanceMode::Geometric
            } else {
                DistanceMode::Equidistant
            };
            return Methodology::Distance { distance, mode };
        }

        Methodology::Random
    }

    fn cost_function(&self) -> CostFunction {
        if self.len {
            CostFunction::Length
        } else {
            CostFunction::TravelTime
        }
    }

    fn config(&self) -> GenerationConfig {
        GenerationConfig::new(self.number_of_pairs, self.methodology())
            .with_seed(self.seed)
            .with_exhaustion(ExhaustionPolicy {
                max_attempts: self.max_attempts,
            })
    }
}

fn csv_path(output: &Path) -> PathBuf {
    let mut path = output.as_os_str().to_owned();
    path.push(".csv");
    PathBuf::from(path)
}

fn batch_name(methodology: &Methodology, batch: usize) -> String {
    match methodology {
        Methodology::DijkstraRank { exponents } => match exponents.get(batch) {
            Some(exponent) => format!("Dijkstra rank 2^{}", exponent),
            None => "Dijkstra rank".to_string(),
        },
        Methodology::Distance { .. } | Methodology::Random => "Generating OD-pairs".to_string(),
    }
}

fn try_main(args: Args) -> Result<()> {
    let config = args.config();
    config.validate().context("invalid options")?;

    let cost_function = args.cost_function();
    info!("reading the input graph");
    let road_graph = RoadGraph::from_file(&args.input)
        .with_context(|| format!("unable to read graph '{}'", args.input.display()))?;
    let graph = road_graph.to_graph(cost_function);
    info!("cost function: {}", cost_function.describe());

    let output = csv_path(&args.output);
    let file = File::create(&output)
        .with_context(|| format!("file cannot be opened '{}'", output.display()))?;
    let mut writer = OdPairWriter::new(
        BufWriter::new(file),
        &args.input.display().to_string(),
        &config.methodology,
    )?;

    // one bar per batch, a new one starts whenever a batch is complete
    let batch_len = config.number_of_pairs as u64;
    let mut batch = 0;
    let mut bar = get_progressbar(&batch_name(&config.methodology, batch), batch_len);
    generate(&graph, &config, |pair| {
        writer.write(pair)?;
        bar.inc(1);
        if bar.position() == batch_len {
            bar.finish_and_clear();
            batch += 1;
            if batch < config.methodology.number_of_batches() {
                bar = get_progressbar(&batch_name(&config.methodology, batch), batch_len);
            }
        }
        Ok(())
    })
    .context("unable to generate OD-pairs")?;

    writer
        .finish()
        .with_context(|| format!("unable to write '{}'", output.display()))?;
    info!(
        "wrote {} OD-pairs to {}",
        config.total_pairs(),
        output.display()
    );

    Ok(())
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    if let Err(err) = try_main(args) {
        error!("{:#}", err);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_csv_suffix() {
        assert_eq!(csv_path(Path::new("out/pairs")), PathBuf::from("out/pairs.csv"));
        assert_eq!(csv_path(Path::new("pairs.csv")), PathBuf::from("pairs.csv.csv"));
    }

    #[test]
    fn names_batches_by_rank() {
        let methodology = Methodology::DijkstraRank {
            exponents: vec![4, 8],
        };

        assert_eq!(batch_name(&methodology, 0), "Dijkstra rank 2^4");
        assert_eq!(batch_name(&methodology, 1), "Dijkstra rank 2^8");
        assert_eq!(batch_name(&Methodology::Random, 0), "Generating OD-pairs");
    }

    #[test]
    fn parses_rank_list() {
        let args = Args::parse_from([
            "generate_od_pairs",
            "-n",
            "10",
            "-i",
            "graph.fmi",
            "-o",
            "pairs",
            "-r",
            "4",
            "8",
            "12",
        ]);

        assert_eq!(
            args.methodology(),
            Methodology::DijkstraRank {
                exponents: vec![4, 8, 12]
            }
        );
        assert_eq!(args.seed, DEFAULT_SEED);
        assert_eq!(args.cost_function(), CostFunction::TravelTime);
    }

    #[test]
    fn parses_geometric_distance() {
        let args = Args::parse_from([
            "generate_od_pairs",
            "-n",
            "10",
            "-i",
            "graph.fmi",
            "-o",
            "pairs",
            "-d",
            "3000",
            "--geo",
            "--len",
            "-s",
            "42",
        ]);

        assert_eq!(
            args.methodology(),
            Methodology::Distance {
                distance: 3000,
                mode: DistanceMode::Geometric
            }
        );
        assert_eq!(args.config().seed, 42);
        assert_eq!(args.cost_function(), CostFunction::Length);
    }

    #[test]
    fn defaults_to_random() {
        let args = Args::parse_from(["generate_od_pairs", "-n", "1", "-i", "g", "-o", "p"]);

        assert_eq!(args.methodology(), Methodology::Random);
    }

    #[test]
    fn rejects_ranks_with_distance() {
        let result = Args::try_parse_from([
            "generate_od_pairs",
            "-n",
            "1",
            "-i",
            "g",
            "-o",
            "p",
            "-r",
            "3",
            "-d",
            "5",
        ]);

        assert!(result.is_err());
    }

    #[test]
    fn geo_requires_distance() {
        let result =
            Args::try_parse_from(["generate_od_pairs", "-n", "1", "-i", "g", "-o", "p", "--geo"]);

        assert!(result.is_err());
    }
}
