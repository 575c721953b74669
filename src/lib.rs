//! Voronoi cell lattices for 2D tissue mechanics
//!
//! Turns a planar Voronoi tessellation into a canonical mesh (deduplicated
//! vertices, shared oriented edges, signed cells) and writes it as a
//! Surface Evolver script for simulating epithelial tissue.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//! use tissue_lattice::*;
//!
//! // Generate a lattice
//! let config = LatticeConfigBuilder::new()
//!     .seed(42)
//!     .cells(20, 20)
//!     .build().unwrap();
//!
//! let lattice = Lattice::generate(config).unwrap();
//! let mesh = lattice.mesh();
//!
//! // Assign tensions and target areas
//! let mut rng = ChaCha8Rng::seed_from_u64(42);
//! let densities = NormalDensities::new(1.0, 0.1).sample(mesh, &mut rng).unwrap();
//! let volumes = VolumeSampler::normal(600.0, 50.0).sample(mesh, &mut rng).unwrap();
//!
//! // Write and run the simulation
//! let mut script = EvolverScript::new(mesh, &densities, &volumes, false).unwrap();
//! script.initial_relaxing(2500, 100).save_one_step("out", "tissue");
//! script.save("tissue.fe").unwrap();
//! run_evolver("tissue.fe", "evolver").unwrap();
//! ```
//!
//! # Features
//!
//! - `spatial-index` (default): Enables O(log n) position-to-cell lookups using KD-tree
//! - `serde`: Enables serialization support for configuration and meshes

// Modules
pub mod error;
pub mod geometry;
pub mod config;
pub mod generation;
pub mod filter;
pub mod mesh;
pub mod lattice;
pub mod tension;
pub mod evolver;

#[cfg(feature = "spatial-index")]
pub mod spatial;

// Re-export core types for convenience
pub use error::{DegenerateEdgeError, LatticeError, Result};
pub use config::{LatticeConfig, LatticeConfigBuilder};
pub use geometry::{line_value, signed_area, Orientation, Precision};
pub use generation::{compute_tessellation, generate_square_seeds, RegionVertex, Tessellation};
pub use filter::{filter_regions, BoundedRegion, DEFAULT_MAX_EDGE_LENGTH};
pub use mesh::{
    canonicalize, CanonicalizeOptions, Cell, CellId, DegenerateCellPolicy, Direction, Edge,
    EdgeId, Mesh, MeshBuilder, SignedEdge, Vertex, VertexId,
};
pub use lattice::Lattice;
pub use tension::{
    Axis, Densities, DensitySampler, NormalDensities, PatternedDensities, TissuePattern,
    VolumeSampler, Volumes,
};
pub use evolver::{run_evolver, EvolverScript};

#[cfg(feature = "spatial-index")]
pub use spatial::SpatialIndex;

// Re-export glam::DVec2 for convenience
pub use glam::DVec2;
