//! Lattice configuration and builder
//!
//! This module provides the configuration for deterministic lattice generation.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{LatticeError, Result};
use crate::filter::DEFAULT_MAX_EDGE_LENGTH;
use crate::geometry::Precision;
use crate::mesh::{CanonicalizeOptions, DegenerateCellPolicy};

/// Configuration for deterministic lattice generation
///
/// The same configuration always produces the identical mesh, with identical
/// vertex, edge and cell IDs.
///
/// # Example
///
/// ```rust
/// use tissue_lattice::*;
///
/// let config = LatticeConfigBuilder::new()
///     .cells(10, 8)
///     .seed(42)
///     .build()
///     .unwrap();
///
/// // Config is serializable (with "serde" feature)
/// # #[cfg(feature = "serde")]
/// # {
/// let json = serde_json::to_string(&config).unwrap();
/// let restored: LatticeConfig = serde_json::from_str(&json).unwrap();
/// assert_eq!(config, restored);
/// # }
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatticeConfig {
    /// Number of seeds along x
    pub cells_x: usize,

    /// Number of seeds along y
    pub cells_y: usize,

    /// Random seed for the seed jitter
    pub seed: u64,

    /// Standard deviation of the Gaussian seed jitter, in grid units
    ///
    /// - 0.0: Perfect square grid (every interior cell is a square)
    /// - 0.15: Default, irregular but well-shaped cells
    /// - 0.4+: Strongly irregular, expect short edges
    pub seed_jitter: f64,

    /// Distance between neighbouring grid seeds
    pub spatial_step: f64,

    /// Regions with a consecutive boundary segment longer than this are dropped
    pub max_edge_length: f64,

    /// Rounding applied to vertex positions before deduplication
    pub precision: Precision,

    /// Sub-segments per raw Voronoi edge (1 keeps edges whole)
    pub segments_per_edge: usize,

    /// Handling of zero-area cells
    pub degenerate_cells: DegenerateCellPolicy,
}

impl LatticeConfig {
    /// Total number of seeds
    #[inline]
    pub fn seed_count(&self) -> usize {
        self.cells_x * self.cells_y
    }

    /// Canonicalization options derived from this configuration
    pub fn canonicalize_options(&self) -> CanonicalizeOptions {
        CanonicalizeOptions {
            precision: self.precision,
            segments_per_edge: self.segments_per_edge,
            degenerate_cells: self.degenerate_cells,
        }
    }
}

impl Default for LatticeConfig {
    fn default() -> Self {
        Self {
            cells_x: 10,
            cells_y: 10,
            seed: 0,
            seed_jitter: 0.15,
            spatial_step: 20.0,
            max_edge_length: DEFAULT_MAX_EDGE_LENGTH,
            precision: Precision::default(),
            segments_per_edge: 1,
            degenerate_cells: DegenerateCellPolicy::Skip,
        }
    }
}

/// Builder for creating LatticeConfig with validation
///
/// # Example
///
/// ```rust
/// use tissue_lattice::*;
///
/// // Use defaults
/// let config = LatticeConfigBuilder::new().build().unwrap();
///
/// // Customize
/// let config = LatticeConfigBuilder::new()
///     .cells(6, 6)
///     .seed(12345)
///     .seed_jitter(0.2)
///     .unwrap()
///     .spatial_step(1.0)
///     .unwrap()
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct LatticeConfigBuilder {
    cells_x: usize,
    cells_y: usize,
    seed: Option<u64>,
    seed_jitter: f64,
    spatial_step: f64,
    max_edge_length: f64,
    precision: Precision,
    segments_per_edge: usize,
    degenerate_cells: DegenerateCellPolicy,
}

impl LatticeConfigBuilder {
    /// Create a new builder with default values
    ///
    /// Defaults:
    /// - cells: 10 × 10
    /// - seed: Random (generated from thread_rng)
    /// - seed_jitter: 0.15
    /// - spatial_step: 20.0
    /// - max_edge_length: 50.0
    /// - precision: 3 decimals
    /// - segments_per_edge: 1
    /// - degenerate_cells: Skip
    pub fn new() -> Self {
        let defaults = LatticeConfig::default();
        Self {
            cells_x: defaults.cells_x,
            cells_y: defaults.cells_y,
            seed: None,
            seed_jitter: defaults.seed_jitter,
            spatial_step: defaults.spatial_step,
            max_edge_length: defaults.max_edge_length,
            precision: defaults.precision,
            segments_per_edge: defaults.segments_per_edge,
            degenerate_cells: defaults.degenerate_cells,
        }
    }

    /// Set the grid dimensions
    pub fn cells(mut self, cells_x: usize, cells_y: usize) -> Self {
        self.cells_x = cells_x;
        self.cells_y = cells_y;
        self
    }

    /// Set the random seed for the jitter
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the standard deviation of the seed jitter
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the value is negative or not finite
    pub fn seed_jitter(mut self, jitter: f64) -> Result<Self> {
        if !jitter.is_finite() || jitter < 0.0 {
            return Err(LatticeError::InvalidConfig(format!(
                "Seed jitter must be finite and >= 0 (got {})",
                jitter
            )));
        }
        self.seed_jitter = jitter;
        Ok(self)
    }

    /// Set the grid spacing
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the step is not strictly positive
    pub fn spatial_step(mut self, step: f64) -> Result<Self> {
        if !step.is_finite() || step <= 0.0 {
            return Err(LatticeError::InvalidConfig(format!(
                "Spatial step must be positive (got {})",
                step
            )));
        }
        self.spatial_step = step;
        Ok(self)
    }

    /// Set the longest accepted region boundary segment
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the length is not strictly positive
    pub fn max_edge_length(mut self, length: f64) -> Result<Self> {
        if length.is_nan() || length <= 0.0 {
            return Err(LatticeError::InvalidConfig(format!(
                "Max edge length must be positive (got {})",
                length
            )));
        }
        self.max_edge_length = length;
        Ok(self)
    }

    /// Set the number of decimals kept in vertex positions
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if decimals > 12
    pub fn decimals(mut self, decimals: u32) -> Result<Self> {
        if decimals > Precision::MAX_DECIMALS {
            return Err(LatticeError::InvalidConfig(format!(
                "Decimals must be <= {} (got {})",
                Precision::MAX_DECIMALS,
                decimals
            )));
        }
        self.precision = Precision::new(decimals);
        Ok(self)
    }

    /// Set how many sub-segments each raw Voronoi edge is split into
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if segments is 0
    pub fn segments_per_edge(mut self, segments: usize) -> Result<Self> {
        if segments == 0 {
            return Err(LatticeError::InvalidConfig(
                "Segments per edge must be >= 1 (got 0)".to_string(),
            ));
        }
        self.segments_per_edge = segments;
        Ok(self)
    }

    /// Set the policy for zero-area cells
    pub fn degenerate_cells(mut self, policy: DegenerateCellPolicy) -> Self {
        self.degenerate_cells = policy;
        self
    }

    /// Build the configuration
    ///
    /// If no seed was provided, generates a random seed using thread_rng.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if either grid dimension is zero
    pub fn build(self) -> Result<LatticeConfig> {
        if self.cells_x == 0 || self.cells_y == 0 {
            return Err(LatticeError::InvalidConfig(format!(
                "Grid must have at least one cell per axis (got {} x {})",
                self.cells_x, self.cells_y
            )));
        }

        let seed = self.seed.unwrap_or_else(|| rand::random());

        Ok(LatticeConfig {
            cells_x: self.cells_x,
            cells_y: self.cells_y,
            seed,
            seed_jitter: self.seed_jitter,
            spatial_step: self.spatial_step,
            max_edge_length: self.max_edge_length,
            precision: self.precision,
            segments_per_edge: self.segments_per_edge,
            degenerate_cells: self.degenerate_cells,
        })
    }
}

impl Default for LatticeConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
