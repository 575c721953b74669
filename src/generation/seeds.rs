//! Square-grid seed placement with Gaussian jitter
//!
//! Seeds sit on an `nx × ny` integer grid scaled by the spatial step. Each
//! coordinate is perturbed independently by normal noise before scaling, so
//! a standard deviation of `0.3` moves seeds by roughly a third of a cell.

use glam::DVec2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};

use crate::error::{LatticeError, Result};

/// Generate the seeds of a jittered square grid
///
/// Seeds are produced row by row: all `i` for `j = 0`, then `j = 1`, and so on.
/// Seed `(i, j)` is `((i + N(0, σ)) * step, (j + N(0, σ)) * step)`.
///
/// # Arguments
///
/// * `nx`, `ny` - Grid dimensions
/// * `jitter` - Standard deviation σ of the Gaussian noise, in grid units
/// * `spatial_step` - Distance between neighbouring grid points
/// * `seed` - Random seed for deterministic jitter
///
/// # Errors
///
/// Returns `InvalidConfig` if `jitter` is negative or not finite.
///
/// # Example
///
/// ```rust
/// use tissue_lattice::generation::generate_square_seeds;
///
/// let seeds = generate_square_seeds(3, 2, 0.0, 20.0, 7).unwrap();
/// assert_eq!(seeds.len(), 6);
/// assert_eq!(seeds[4].x, 20.0);
/// assert_eq!(seeds[4].y, 20.0);
/// ```
pub fn generate_square_seeds(
    nx: usize,
    ny: usize,
    jitter: f64,
    spatial_step: f64,
    seed: u64,
) -> Result<Vec<DVec2>> {
    let noise = Normal::new(0.0, jitter).map_err(|e| {
        LatticeError::InvalidConfig(format!("seed jitter {} is not a valid std-dev: {}", jitter, e))
    })?;
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let mut seeds = Vec::with_capacity(nx * ny);
    for j in 0..ny {
        for i in 0..nx {
            let x = (i as f64 + noise.sample(&mut rng)) * spatial_step;
            let y = (j as f64 + noise.sample(&mut rng)) * spatial_step;
            seeds.push(DVec2::new(x, y));
        }
    }

    Ok(seeds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_count_and_order() {
        let seeds = generate_square_seeds(4, 3, 0.0, 1.0, 42).unwrap();
        assert_eq!(seeds.len(), 12);
        assert_eq!(seeds[0], DVec2::new(0.0, 0.0));
        assert_eq!(seeds[1], DVec2::new(1.0, 0.0));
        assert_eq!(seeds[4], DVec2::new(0.0, 1.0));
        assert_eq!(seeds[11], DVec2::new(3.0, 2.0));
    }

    #[test]
    fn test_spatial_step_scales_grid() {
        let seeds = generate_square_seeds(2, 2, 0.0, 20.0, 1).unwrap();
        assert_eq!(seeds[3], DVec2::new(20.0, 20.0));
    }

    #[test]
    fn test_empty_grid() {
        assert!(generate_square_seeds(0, 5, 0.1, 1.0, 1).unwrap().is_empty());
    }

    #[test]
    fn test_jitter_determinism() {
        let a = generate_square_seeds(5, 5, 0.15, 20.0, 99).unwrap();
        let b = generate_square_seeds(5, 5, 0.15, 20.0, 99).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_jitter_moves_seeds() {
        let exact = generate_square_seeds(5, 5, 0.0, 1.0, 3).unwrap();
        let jittered = generate_square_seeds(5, 5, 0.2, 1.0, 3).unwrap();
        let moved = exact
            .iter()
            .zip(jittered.iter())
            .filter(|(a, b)| a.distance(**b) > 1e-9)
            .count();
        assert!(moved > 0, "non-zero jitter should perturb seeds");

        // Several standard deviations is plenty of headroom for 25 seeds
        for (a, b) in exact.iter().zip(jittered.iter()) {
            assert!((a.x - b.x).abs() < 1.5);
            assert!((a.y - b.y).abs() < 1.5);
        }
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = generate_square_seeds(4, 4, 0.2, 1.0, 12345).unwrap();
        let b = generate_square_seeds(4, 4, 0.2, 1.0, 67890).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_negative_jitter_rejected() {
        let result = generate_square_seeds(2, 2, -0.5, 1.0, 1);
        assert!(matches!(result, Err(LatticeError::InvalidConfig(_))));
    }
}
