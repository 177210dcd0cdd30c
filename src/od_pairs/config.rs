use std::fmt;

use super::{OdPairError, Result};
use crate::graphs::Distance;

pub const DEFAULT_SEED: u64 = 19900325;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DistanceMode {
    /// Every pair uses the requested distance.
    #[default]
    Equidistant,
    /// Every pair draws its own distance from a geometric distribution with
    /// the requested distance as expected value.
    Geometric,
}

/// How destinations are chosen. Fixed for a whole run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Methodology {
    /// One batch per exponent `r`, with destinations of Dijkstra rank `2^r`.
    DijkstraRank { exponents: Vec<u32> },
    Distance {
        distance: Distance,
        mode: DistanceMode,
    },
    Random,
}

impl Methodology {
    /// Number of batches of `number_of_pairs` pairs a run produces.
    pub fn number_of_batches(&self) -> usize {
        match self {
            Methodology::DijkstraRank { exponents } => exponents.len(),
            Methodology::Distance { .. } | Methodology::Random => 1,
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            Methodology::DijkstraRank { exponents } => {
                if let Some(&exponent) = exponents.iter().find(|&&exponent| exponent >= 32) {
                    return Err(OdPairError::InvalidRankExponent(exponent));
                }
            }
            Methodology::Distance { distance, .. } => {
                if *distance == 0 {
                    return Err(OdPairError::InvalidDistance);
                }
            }
            Methodology::Random => {}
        }
        Ok(())
    }
}

impl fmt::Display for Methodology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Methodology::DijkstraRank { .. } => write!(f, "Dijkstra rank"),
            Methodology::Distance { distance, mode } => match mode {
                DistanceMode::Equidistant => write!(f, "equidistant ({})", distance),
                DistanceMode::Geometric => write!(f, "geometrically distributed ({})", distance),
            },
            Methodology::Random => write!(f, "random"),
        }
    }
}

/// Bound on the origins tried per pair before giving up. With a single
/// attempt the first origin that cannot satisfy the request fails the run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExhaustionPolicy {
    pub max_attempts: u32,
}

impl Default for ExhaustionPolicy {
    fn default() -> Self {
        ExhaustionPolicy { max_attempts: 1 }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerationConfig {
    pub seed: u64,
    /// Pairs per batch, i.e. per rank exponent for the rank methodology.
    pub number_of_pairs: u32,
    pub methodology: Methodology,
    pub exhaustion: ExhaustionPolicy,
}

impl GenerationConfig {
    pub fn new(number_of_pairs: u32, methodology: Methodology) -> Self {
        GenerationConfig {
            seed: DEFAULT_SEED,
            number_of_pairs,
            methodology,
            exhaustion: ExhaustionPolicy::default(),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_exhaustion(mut self, exhaustion: ExhaustionPolicy) -> Self {
        self.exhaustion = exhaustion;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.number_of_pairs == 0 {
            return Err(OdPairError::InvalidPairCount);
        }
        if self.exhaustion.max_attempts == 0 {
            return Err(OdPairError::InvalidAttempts);
        }
        self.methodology.validate()
    }

    /// Total number of pairs a run produces.
    pub fn total_pairs(&self) -> u64 {
        self.number_of_pairs as u64 * self.methodology.number_of_batches() as u64
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(Methodology::DijkstraRank { exponents: vec![1, 2] }, "Dijkstra rank")]
    #[case(
        Methodology::Distance { distance: 500, mode: DistanceMode::Equidistant },
        "equidistant (500)"
    )]
    #[case(
        Methodology::Distance { distance: 500, mode: DistanceMode::Geometric },
        "geometrically distributed (500)"
    )]
    #[case(Methodology::Random, "random")]
    fn describes_methodology(#[case] methodology: Methodology, #[case] expected: &str) {
        assert_eq!(methodology.to_string(), expected);
    }

    #[test]
    fn defaults() {
        let config = GenerationConfig::new(10, Methodology::Random);

        assert_eq!(config.seed, 19900325);
        assert_eq!(config.exhaustion.max_attempts, 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_zero_pairs() {
        let config = GenerationConfig::new(0, Methodology::Random);

        assert!(matches!(config.validate(), Err(OdPairError::InvalidPairCount)));
    }

    #[test]
    fn rejects_zero_distance() {
        let config = GenerationConfig::new(
            1,
            Methodology::Distance {
                distance: 0,
                mode: DistanceMode::Geometric,
            },
        );

        assert!(matches!(config.validate(), Err(OdPairError::InvalidDistance)));
    }

    #[test]
    fn rejects_large_rank_exponent() {
        let config = GenerationConfig::new(
            1,
            Methodology::DijkstraRank {
                exponents: vec![3, 32],
            },
        );

        assert!(matches!(
            config.validate(),
            Err(OdPairError::InvalidRankExponent(32))
        ));
    }

    #[test]
    fn rejects_zero_attempts() {
        let config = GenerationConfig::new(1, Methodology::Random)
            .with_exhaustion(ExhaustionPolicy { max_attempts: 0 });

        assert!(matches!(config.validate(), Err(OdPairError::InvalidAttempts)));
    }

    #[test]
    fn counts_pairs_per_rank_exponent() {
        let config = GenerationConfig::new(
            5,
            Methodology::DijkstraRank {
                exponents: vec![1, 2, 3],
            },
        );

        assert_eq!(config.total_pairs(), 15);
    }
}
