use rand::{distributions::Distribution, Rng};

use super::{OdPairError, Result};
use crate::graphs::Distance;

/// Geometric distribution over the number of Bernoulli trials up to and
/// including the first success, parameterized by its expected value. The
/// support is `1..`, so a drawn distance is never zero.
#[derive(Clone, Copy, Debug)]
pub struct Geometric {
    expected: Distance,
    // ln(1 - p) with p = 1 / expected
    ln_failure: f64,
}

impl Geometric {
    pub fn new(expected: Distance) -> Result<Geometric> {
        if expected == 0 {
            return Err(OdPairError::InvalidDistance);
        }

        let success = 1.0 / expected as f64;
        Ok(Geometric {
            expected,
            ln_failure: (-success).ln_1p(),
        })
    }
}

impl Distribution<Distance> for Geometric {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Distance {
        if self.expected == 1 {
            return 1;
        }

        // inversion, 1 - u lies in (0, 1]
        let u: f64 = rng.gen();
        let failures = ((1.0 - u).ln() / self.ln_failure).floor();

        // float to int casts saturate
        (failures as Distance).saturating_add(1)
    }
}
