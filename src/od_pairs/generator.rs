use log::{debug, info, warn};
use rand::{distributions::Distribution, Rng};

use super::{
    config::{DistanceMode, ExhaustionPolicy, Methodology},
    geometric::Geometric,
    Annotation, OdPair, OdPairError, OriginDestination, Result,
};
use crate::{
    graphs::{Distance, Graph, Vertex},
    search::dijkstra::Dijkstra,
};

/// Draws OD-pairs on a graph. The origin of each pair is chosen uniformly at
/// random, the destination by one of the selection rules below.
///
/// All randomness comes from `rng`, consumed in a fixed order per pair: the
/// origin, the distance (geometric distances only), and a new origin for each
/// retry. A seeded `rng` therefore reproduces the same pairs.
pub struct OdPairGenerator<'a, R: Rng> {
    graph: &'a dyn Graph,
    dijkstra: Dijkstra<'a>,
    rng: R,
    exhaustion: ExhaustionPolicy,
}

impl<'a, R: Rng> OdPairGenerator<'a, R> {
    pub fn new(graph: &'a dyn Graph, rng: R) -> Result<Self> {
        if graph.number_of_vertices() == 0 {
            return Err(OdPairError::EmptyGraph);
        }

        Ok(OdPairGenerator {
            graph,
            dijkstra: Dijkstra::new(graph),
            rng,
            exhaustion: ExhaustionPolicy::default(),
        })
    }

    pub fn with_exhaustion_policy(mut self, exhaustion: ExhaustionPolicy) -> Result<Self> {
        if exhaustion.max_attempts == 0 {
            return Err(OdPairError::InvalidAttempts);
        }
        self.exhaustion = exhaustion;
        Ok(self)
    }

    /// Picks a vertex uniformly at random.
    pub fn random_vertex(&mut self) -> Vertex {
        self.rng.gen_range(0..self.graph.number_of_vertices())
    }

    /// Returns the vertex settled at position `rank` by a Dijkstra search
    /// from `origin`. The origin itself has rank 1.
    pub fn destination_by_rank(&mut self, origin: Vertex, rank: u32) -> Result<Vertex> {
        if rank == 0 {
            return Err(OdPairError::InvalidRank);
        }
        self.check_origin(origin)?;

        self.dijkstra.init(origin);
        while let Some((vertex, _)) = self.dijkstra.settle_next() {
            if self.dijkstra.number_of_settled() == rank {
                return Ok(vertex);
            }
        }

        Err(OdPairError::RankExhausted {
            origin,
            rank,
            reachable: self.dijkstra.number_of_settled(),
        })
    }

    /// Returns the first vertex settled by a Dijkstra search from `origin`
    /// whose distance is at least `distance`, together with that distance.
    pub fn destination_by_distance(
        &mut self,
        origin: Vertex,
        distance: Distance,
    ) -> Result<(Vertex, Distance)> {
        if distance == 0 {
            return Err(OdPairError::InvalidDistance);
        }
        self.check_origin(origin)?;

        let mut farthest = 0;
        self.dijkstra.init(origin);
        while let Some((vertex, vertex_distance)) = self.dijkstra.settle_next() {
            if vertex_distance >= distance {
                return Ok((vertex, vertex_distance));
            }
            farthest = vertex_distance;
        }

        Err(OdPairError::DistanceExhausted {
            origin,
            distance,
            farthest,
        })
    }

    fn check_origin(&self, origin: Vertex) -> Result<()> {
        let number_of_vertices = self.graph.number_of_vertices();
        if origin >= number_of_vertices {
            return Err(OdPairError::VertexOutOfRange {
                origin,
                number_of_vertices,
            });
        }
        Ok(())
    }

    /// Picks the destination uniformly at random, regardless of whether it is
    /// reachable from the origin.
    pub fn destination_uniform(&mut self) -> Vertex {
        self.random_vertex()
    }

    pub fn random_pair(&mut self) -> OdPair {
        let origin = self.random_vertex();
        let destination = self.destination_uniform();

        OdPair {
            pair: OriginDestination {
                origin,
                destination,
            },
            annotation: None,
        }
    }

    pub fn random_pair_by_rank(&mut self, rank: u32) -> Result<OdPair> {
        let origin = self.random_vertex();
        let (origin, destination) =
            self.retry_exhausted(origin, |generator, origin| {
                generator.destination_by_rank(origin, rank)
            })?;

        Ok(OdPair {
            pair: OriginDestination {
                origin,
                destination,
            },
            annotation: Some(Annotation::DijkstraRank(rank)),
        })
    }

    /// Draws a pair whose destination is at least `distance` away. With
    /// `DistanceMode::Geometric` the threshold is drawn anew for every pair
    /// with `distance` as expected value.
    pub fn random_pair_by_distance(
        &mut self,
        distance: Distance,
        mode: DistanceMode,
    ) -> Result<OdPair> {
        let origin = self.random_vertex();
        let threshold = match mode {
            DistanceMode::Equidistant => distance,
            DistanceMode::Geometric => Geometric::new(distance)?.sample(&mut self.rng),
        };

        let (origin, (destination, reached)) =
            self.retry_exhausted(origin, |generator, origin| {
                generator.destination_by_distance(origin, threshold)
            })?;

        Ok(OdPair {
            pair: OriginDestination {
                origin,
                destination,
            },
            annotation: Some(Annotation::Distance(reached)),
        })
    }

    /// Runs `select` from `origin`, and from freshly drawn origins while it
    /// fails with an exhaustion error and attempts are left.
    fn retry_exhausted<T>(
        &mut self,
        mut origin: Vertex,
        mut select: impl FnMut(&mut Self, Vertex) -> Result<T>,
    ) -> Result<(Vertex, T)> {
        let max_attempts = self.exhaustion.max_attempts;
        let mut attempts = 1;

        loop {
            match select(self, origin) {
                Ok(selected) => return Ok((origin, selected)),
                Err(error) if error.is_exhaustion() && attempts < max_attempts => {
                    debug!("attempt {} failed: {}", attempts, error);
                    attempts += 1;
                    origin = self.random_vertex();
                }
                Err(error) if error.is_exhaustion() && attempts > 1 => {
                    return Err(OdPairError::AttemptsExceeded {
                        attempts,
                        last: Box::new(error),
                    });
                }
                Err(error) => return Err(error),
            }
        }
    }

    /// Generates `number_of_pairs` pairs per batch of `methodology` and hands
    /// them to `emit` in order. Rank batches are processed in the order of
    /// the exponents.
    pub fn generate_pairs(
        &mut self,
        methodology: &Methodology,
        number_of_pairs: u32,
        mut emit: impl FnMut(&OdPair) -> Result<()>,
    ) -> Result<()> {
        if number_of_pairs == 0 {
            return Err(OdPairError::InvalidPairCount);
        }
        methodology.validate()?;

        match methodology {
            Methodology::DijkstraRank { exponents } => {
                for &exponent in exponents {
                    let rank = 1 << exponent;
                    info!(
                        "generating {} OD-pairs with Dijkstra rank 2^{}",
                        number_of_pairs, exponent
                    );
                    for _ in 0..number_of_pairs {
                        let pair = self.random_pair_by_rank(rank)?;
                        emit(&pair)?;
                    }
                }
            }
            Methodology::Distance { distance, mode } => {
                match mode {
                    DistanceMode::Equidistant => {
                        info!("the origin-destination distance is {}", distance)
                    }
                    DistanceMode::Geometric => {
                        info!(
                            "the origin-destination distance is geometrically distributed with expected value {}",
                            distance
                        );
                        if *distance == 1 {
                            warn!("an expected distance of 1 makes every drawn distance 1");
                        }
                    }
                }
                info!("generating {} OD-pairs", number_of_pairs);
                for _ in 0..number_of_pairs {
                    let pair = self.random_pair_by_distance(*distance, *mode)?;
                    emit(&pair)?;
                }
            }
            Methodology::Random => {
                info!("generating {} OD-pairs", number_of_pairs);
                for _ in 0..number_of_pairs {
                    let pair = self.random_pair();
                    emit(&pair)?;
                }
            }
        }

        Ok(())
    }
}
