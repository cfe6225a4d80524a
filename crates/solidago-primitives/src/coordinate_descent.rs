//! Random-order coordinate descent.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use solidago_core::errors::NumericError;
use tracing::warn;

/// Coordinate descent that visits coordinates in shuffled sweeps.
///
/// The shuffle is driven by a seeded RNG, so results only depend on the
/// inputs and the seed.
#[derive(Debug, Clone, Copy)]
pub struct CoordinateDescent {
    /// A coordinate whose update moves it by less than this is unchanged.
    pub tolerance: f64,
    /// Maximal number of single-coordinate updates.
    pub max_updates: usize,
    pub seed: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DescentOutcome {
    pub solution: Vec<f64>,
    pub updates: usize,
    /// False when `max_updates` was reached first.
    pub converged: bool,
}

impl CoordinateDescent {
    pub fn new(tolerance: f64, max_updates: usize, seed: u64) -> Self {
        Self {
            tolerance,
            max_updates,
            seed,
        }
    }

    /// Minimizes by repeatedly replacing one coordinate with
    /// `update(coordinate, &solution)`.
    ///
    /// Stops once every coordinate has been updated without change since
    /// the last change to any coordinate.
    pub fn minimize<F>(&self, initial: Vec<f64>, mut update: F) -> Result<DescentOutcome, NumericError>
    where
        F: FnMut(usize, &[f64]) -> Result<f64, NumericError>,
    {
        let mut solution = initial;
        let n = solution.len();
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut unchanged = vec![false; n];
        let mut n_unchanged = 0;
        let mut to_pick: Vec<usize> = Vec::with_capacity(n);
        let mut updates = 0;

        while n_unchanged < n && updates < self.max_updates {
            if to_pick.is_empty() {
                to_pick.extend(0..n);
                to_pick.shuffle(&mut rng);
            }
            let Some(coordinate) = to_pick.pop() else {
                break;
            };

            let old = solution[coordinate];
            let new = update(coordinate, &solution)?;
            solution[coordinate] = new;
            updates += 1;

            if (new - old).abs() < self.tolerance {
                if !unchanged[coordinate] {
                    unchanged[coordinate] = true;
                    n_unchanged += 1;
                }
            } else if n_unchanged > 0 {
                unchanged.iter_mut().for_each(|u| *u = false);
                n_unchanged = 0;
            }
        }

        let converged = n_unchanged == n;
        if !converged {
            warn!(updates, n_coordinates = n, "coordinate descent hit its update cap");
        }
        Ok(DescentOutcome {
            solution,
            updates,
            converged,
        })
    }
}
