//! Seed placement and planar Voronoi tessellation
//!
//! Produces the raw `regions` / `raw_vertices` pair consumed by the region
//! filter and the mesh builder.

mod seeds;
mod voronoi;

pub use seeds::generate_square_seeds;
pub use voronoi::{compute_tessellation, RegionVertex, Tessellation};

use glam::DVec2;

use crate::config::LatticeConfig;
use crate::error::Result;

/// Generate the seeds and tessellation described by a configuration
///
/// Returns the seeds alongside the tessellation since region `k` belongs to
/// seed `k`.
pub fn generate_tessellation(config: &LatticeConfig) -> Result<(Vec<DVec2>, Tessellation)> {
    // Step 1: Jittered square grid
    let seeds = generate_square_seeds(
        config.cells_x,
        config.cells_y,
        config.seed_jitter,
        config.spatial_step,
        config.seed,
    )?;

    // Step 2: Voronoi regions
    let tessellation = compute_tessellation(&seeds)?;
    Ok((seeds, tessellation))
}
