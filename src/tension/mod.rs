//! Membrane density and cell volume sampling
//!
//! Densities play the role of line tension on each membrane (edge), volumes
//! are the target areas of each cell. Both are drawn once per mesh and handed
//! to the evolver script.

mod pattern;

pub use pattern::{Axis, TissuePattern};

use rand::distributions::WeightedIndex;
use rand::Rng;
use rand_distr::{Distribution, Normal};
use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{LatticeError, Result};
use crate::mesh::{EdgeId, Mesh};

/// Density per edge
pub type Densities = BTreeMap<EdgeId, f64>;

/// Target volume per cell, keyed by signed cell ID
pub type Volumes = BTreeMap<i64, i64>;

/// Trait for assigning a density to every edge of a mesh
pub trait DensitySampler {
    /// Sample one density per edge
    fn sample<R: Rng + ?Sized>(&self, mesh: &Mesh, rng: &mut R) -> Result<Densities>;
}

pub(crate) fn normal(mean: f64, std_dev: f64) -> Result<Normal<f64>> {
    Normal::new(mean, std_dev).map_err(|e| {
        LatticeError::InvalidConfig(format!(
            "N({}, {}) is not a valid distribution: {}",
            mean, std_dev, e
        ))
    })
}

/// Independent normally distributed densities
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalDensities {
    /// Mean density (default: 1.0)
    pub mean: f64,
    /// Standard deviation (default: 0.01)
    pub std_dev: f64,
}

impl Default for NormalDensities {
    fn default() -> Self {
        Self {
            mean: 1.0,
            std_dev: 0.01,
        }
    }
}

impl NormalDensities {
    pub fn new(mean: f64, std_dev: f64) -> Self {
        Self { mean, std_dev }
    }
}

impl DensitySampler for NormalDensities {
    fn sample<R: Rng + ?Sized>(&self, mesh: &Mesh, rng: &mut R) -> Result<Densities> {
        let distribution = normal(self.mean, self.std_dev)?;
        Ok(mesh
            .edges()
            .iter()
            .map(|edge| (edge.id, distribution.sample(rng)))
            .collect())
    }
}

/// Base densities with a tissue pattern applied on top
///
/// # Example
///
/// ```
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
/// use tissue_lattice::*;
///
/// let config = LatticeConfigBuilder::new().seed(1).cells(6, 6).build().unwrap();
/// let lattice = Lattice::generate(config).unwrap();
///
/// let sampler = PatternedDensities {
///     base: NormalDensities::new(1.0, 0.1),
///     pattern: TissuePattern::CircularFurrow { std_dev: 30.0 },
/// };
/// let mut rng = ChaCha8Rng::seed_from_u64(1);
/// let densities = sampler.sample(lattice.mesh(), &mut rng).unwrap();
/// assert_eq!(densities.len(), lattice.mesh().edges().len());
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct PatternedDensities {
    pub base: NormalDensities,
    pub pattern: TissuePattern,
}

impl DensitySampler for PatternedDensities {
    fn sample<R: Rng + ?Sized>(&self, mesh: &Mesh, rng: &mut R) -> Result<Densities> {
        let base = self.base.sample(mesh, rng)?;
        self.pattern.apply(mesh, &base, rng)
    }
}

/// Cell volumes drawn from a mixture of normals
///
/// With a single component every cell draws from it. With several, each cell
/// first picks a component (by `weights`, or uniformly when none are given).
/// Draws are truncated toward zero.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct VolumeSampler {
    means: Vec<f64>,
    std_devs: Vec<f64>,
    weights: Option<Vec<f64>>,
}

impl Default for VolumeSampler {
    fn default() -> Self {
        Self {
            means: vec![500.0],
            std_devs: vec![50.0],
            weights: None,
        }
    }
}

impl VolumeSampler {
    /// Create a mixture sampler
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if there are no components, or if `std_devs`
    /// or `weights` differ in length from `means`.
    pub fn new(means: Vec<f64>, std_devs: Vec<f64>, weights: Option<Vec<f64>>) -> Result<Self> {
        if means.is_empty() {
            return Err(LatticeError::InvalidConfig(
                "Volume mixture needs at least one component".to_string(),
            ));
        }
        if means.len() != std_devs.len() {
            return Err(LatticeError::InvalidConfig(format!(
                "Got {} volume means but {} standard deviations",
                means.len(),
                std_devs.len()
            )));
        }
        if let Some(weights) = &weights {
            if weights.len() != means.len() {
                return Err(LatticeError::InvalidConfig(format!(
                    "Got {} volume means but {} weights",
                    means.len(),
                    weights.len()
                )));
            }
        }
        Ok(Self {
            means,
            std_devs,
            weights,
        })
    }

    /// Single-component sampler
    pub fn normal(mean: f64, std_dev: f64) -> Self {
        Self {
            means: vec![mean],
            std_devs: vec![std_dev],
            weights: None,
        }
    }

    /// Sample one volume per cell
    pub fn sample<R: Rng + ?Sized>(&self, mesh: &Mesh, rng: &mut R) -> Result<Volumes> {
        let components = self
            .means
            .iter()
            .zip(&self.std_devs)
            .map(|(&mean, &std_dev)| normal(mean, std_dev))
            .collect::<Result<Vec<_>>>()?;

        let picker = match (&self.weights, components.len()) {
            (_, 1) => None,
            (Some(weights), _) => Some(WeightedIndex::new(weights).map_err(|e| {
                LatticeError::InvalidConfig(format!("invalid volume weights: {}", e))
            })?),
            (None, n) => Some(WeightedIndex::new(vec![1.0; n]).map_err(|e| {
                LatticeError::InvalidConfig(format!("invalid volume weights: {}", e))
            })?),
        };

        let mut volumes = Volumes::new();
        for cell in mesh.cells() {
            let component = match &picker {
                Some(picker) => picker.sample(rng),
                None => 0,
            };
            let volume = components[component].sample(rng).trunc() as i64;
            volumes.insert(cell.id.to_signed(), volume);
        }
        Ok(volumes)
    }
}
