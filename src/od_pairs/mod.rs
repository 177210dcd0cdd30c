//! Sampling of origin-destination pairs for routing benchmarks.
//!
//! The origin of every pair is drawn uniformly at random. The destination is
//! either drawn uniformly as well, or chosen by the Dijkstra rank or the
//! network distance it has relative to the origin.

use config::GenerationConfig;
use generator::OdPairGenerator;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

use crate::graphs::{Distance, Graph, Vertex};

pub mod config;
pub mod generator;
pub mod geometric;
pub mod writer;

pub type Result<T> = std::result::Result<T, OdPairError>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct OriginDestination {
    pub origin: Vertex,
    pub destination: Vertex,
}

/// Why a destination was chosen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Annotation {
    /// The destination is the vertex settled at this position.
    DijkstraRank(u32),
    /// Shortest path distance from origin to destination.
    Distance(Distance),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OdPair {
    pub pair: OriginDestination,
    pub annotation: Option<Annotation>,
}

impl OdPair {
    pub fn origin(&self) -> Vertex {
        self.pair.origin
    }

    pub fn destination(&self) -> Vertex {
        self.pair.destination
    }
}

#[derive(Debug, Error)]
pub enum OdPairError {
    #[error("the graph has no vertices")]
    EmptyGraph,

    #[error("the number of pairs must be positive")]
    InvalidPairCount,

    #[error("the distance must be positive")]
    InvalidDistance,

    #[error("the Dijkstra rank must be positive")]
    InvalidRank,

    #[error("rank exponent {0} is too large, expected a value below 32")]
    InvalidRankExponent(u32),

    #[error("the number of attempts per pair must be positive")]
    InvalidAttempts,

    #[error("origin {origin} is not a vertex of the graph ({number_of_vertices} vertices)")]
    VertexOutOfRange {
        origin: Vertex,
        number_of_vertices: u32,
    },

    #[error("vertex {origin} reaches only {reachable} vertices, Dijkstra rank {rank} is unattainable")]
    RankExhausted {
        origin: Vertex,
        rank: u32,
        reachable: u32,
    },

    #[error("no vertex at distance {distance} or more is reachable from vertex {origin} (farthest is at {farthest})")]
    DistanceExhausted {
        origin: Vertex,
        distance: Distance,
        farthest: Distance,
    },

    #[error("no pair found within {attempts} attempts")]
    AttemptsExceeded {
        attempts: u32,
        #[source]
        last: Box<OdPairError>,
    },

    #[error("unable to write pairs: {0}")]
    Io(#[from] std::io::Error),
}

impl OdPairError {
    /// Whether the error stems from an origin whose reachable component cannot
    /// satisfy the request. Only these errors are retried.
    pub fn is_exhaustion(&self) -> bool {
        matches!(
            self,
            OdPairError::RankExhausted { .. } | OdPairError::DistanceExhausted { .. }
        )
    }
}

/// Generates all pairs of `config` on `graph` with a `ChaCha8Rng` seeded from
/// `config.seed`, handing them to `emit` in order.
pub fn generate(
    graph: &dyn Graph,
    config: &GenerationConfig,
    emit: impl FnMut(&OdPair) -> Result<()>,
) -> Result<()> {
    config.validate()?;

    let rng = ChaCha8Rng::seed_from_u64(config.seed);
    let mut generator =
        OdPairGenerator::new(graph, rng)?.with_exhaustion_policy(config.exhaustion)?;

    generator.generate_pairs(&config.methodology, config.number_of_pairs, emit)
}
