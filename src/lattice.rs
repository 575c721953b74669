//! Lattice main structure

use glam::DVec2;
use std::collections::HashMap;
use std::time::Instant;

use crate::config::LatticeConfig;
use crate::error::{LatticeError, Result};
use crate::filter::filter_regions;
use crate::generation::{compute_tessellation, generate_tessellation, Tessellation};
use crate::mesh::{canonicalize, Cell, EdgeId, Mesh};

#[cfg(feature = "spatial-index")]
use crate::spatial::SpatialIndex;

/// A generated cell lattice: seeds, raw tessellation and canonical mesh
///
/// # Examples
///
/// ```
/// use tissue_lattice::*;
///
/// let config = LatticeConfigBuilder::new()
///     .seed(42)
///     .cells(8, 8)
///     .build()
///     .unwrap();
///
/// let lattice = Lattice::generate(config).unwrap();
/// println!("Generated {} cells", lattice.cell_count());
///
/// for (id, edges) in lattice.mesh().cell_map() {
///     println!("cell {} has {} membranes", id, edges.len());
/// }
/// ```
#[derive(Clone)]
pub struct Lattice {
    /// Configuration used to generate this lattice
    config: LatticeConfig,

    /// Seed positions, one per raw region (empty for external tessellations)
    seeds: Vec<DVec2>,

    /// Raw Voronoi output, before filtering
    tessellation: Tessellation,

    /// Canonical mesh built from the bounded regions
    mesh: Mesh,

    /// Seed index → position in `mesh.cells()`
    seed_cells: HashMap<usize, usize>,

    /// Seed lookup (optional, requires spatial-index feature)
    #[cfg(feature = "spatial-index")]
    spatial_index: Option<SpatialIndex>,
}

impl Lattice {
    /// Generate a lattice from a jittered square grid of seeds
    ///
    /// # Example
    ///
    /// ```
    /// use tissue_lattice::*;
    ///
    /// let config = LatticeConfigBuilder::new()
    ///     .seed(12345)
    ///     .cells(6, 5)
    ///     .build()
    ///     .unwrap();
    ///
    /// let lattice = Lattice::generate(config).unwrap();
    /// assert!(lattice.cell_count() > 0);
    /// ```
    pub fn generate(config: LatticeConfig) -> Result<Self> {
        let start = Instant::now();
        let (seeds, tessellation) = generate_tessellation(&config)?;
        let lattice = Self::build(config, seeds, tessellation)?;

        log::info!(
            "generated {}x{} lattice (seed {}): {} cells in {:?}",
            config.cells_x,
            config.cells_y,
            config.seed,
            lattice.cell_count(),
            start.elapsed()
        );

        Ok(lattice)
    }

    /// Build a lattice from caller-supplied seeds
    ///
    /// The grid fields of `config` are ignored; filtering and canonicalization
    /// options still apply.
    pub fn from_seeds(seeds: Vec<DVec2>, config: LatticeConfig) -> Result<Self> {
        let tessellation = compute_tessellation(&seeds)?;
        Self::build(config, seeds, tessellation)
    }

    /// Build a lattice from an already computed tessellation
    ///
    /// Without seeds there is nothing to index, so
    /// [`find_cell_at`](Self::find_cell_at) always returns `None`.
    pub fn from_tessellation(tessellation: Tessellation, config: LatticeConfig) -> Result<Self> {
        Self::build(config, Vec::new(), tessellation)
    }

    fn build(config: LatticeConfig, seeds: Vec<DVec2>, tessellation: Tessellation) -> Result<Self> {
        let regions = filter_regions(&tessellation, config.max_edge_length)?;
        let mesh = canonicalize(
            &regions,
            &tessellation.raw_vertices,
            config.canonicalize_options(),
        )?;

        let seed_cells = mesh
            .cells()
            .iter()
            .enumerate()
            .filter_map(|(position, cell)| cell.seed.map(|seed| (seed, position)))
            .collect();

        #[cfg(feature = "spatial-index")]
        let spatial_index = (!seeds.is_empty()).then(|| SpatialIndex::new(&seeds));

        Ok(Self {
            config,
            seeds,
            tessellation,
            mesh,
            seed_cells,
            #[cfg(feature = "spatial-index")]
            spatial_index,
        })
    }

    /// Get the configuration used to generate this lattice
    #[inline]
    pub fn config(&self) -> &LatticeConfig {
        &self.config
    }

    /// Seed positions
    #[inline]
    pub fn seeds(&self) -> &[DVec2] {
        &self.seeds
    }

    /// Raw tessellation the mesh was built from
    #[inline]
    pub fn tessellation(&self) -> &Tessellation {
        &self.tessellation
    }

    /// The canonical mesh
    #[inline]
    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    /// Number of cells in the mesh
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.mesh.cells().len()
    }

    /// Cell grown from a given seed, if its region was bounded
    pub fn cell_for_seed(&self, seed: usize) -> Option<&Cell> {
        self.seed_cells
            .get(&seed)
            .and_then(|&position| self.mesh.cells().get(position))
    }

    /// Cell by its signed ID
    ///
    /// # Errors
    ///
    /// Returns `CellNotFound` when no cell carries this signed ID. A cell's
    /// ID with the opposite sign does not match.
    pub fn cell(&self, signed_id: i64) -> Result<&Cell> {
        self.mesh
            .cell(signed_id)
            .ok_or(LatticeError::CellNotFound(signed_id))
    }

    /// Midpoint of an edge
    ///
    /// # Errors
    ///
    /// Returns `EdgeNotFound` for an unknown edge
    pub fn edge_centroid(&self, id: EdgeId) -> Result<DVec2> {
        self.mesh
            .edge_centroid(id)
            .ok_or(LatticeError::EdgeNotFound(id.0 as i64))
    }

    /// Column-wise vertex coordinates, ordered by vertex ID
    pub fn coordinates(&self) -> (Vec<f64>, Vec<f64>) {
        self.mesh.coordinates()
    }

    /// Mean of all vertex positions
    pub fn center(&self) -> Option<DVec2> {
        self.mesh.center()
    }

    /// Axis-aligned bounds of all vertices
    pub fn bounds(&self) -> Option<(DVec2, DVec2)> {
        self.mesh.bounds()
    }

    /// Find the cell containing a position (requires spatial-index feature)
    ///
    /// Looks up the nearest seed; returns `None` when that seed's region was
    /// unbounded or filtered out.
    ///
    /// # Example
    ///
    /// ```
    /// # use tissue_lattice::*;
    /// # #[cfg(feature = "spatial-index")]
    /// # {
    /// let config = LatticeConfigBuilder::new()
    ///     .seed(7)
    ///     .cells(5, 5)
    ///     .build()
    ///     .unwrap();
    /// let lattice = Lattice::generate(config).unwrap();
    ///
    /// let middle = lattice.seeds()[12];
    /// assert!(lattice.find_cell_at(middle).is_some());
    /// # }
    /// ```
    #[cfg(feature = "spatial-index")]
    pub fn find_cell_at(&self, position: DVec2) -> Option<&Cell> {
        let index = self.spatial_index.as_ref()?;
        self.cell_for_seed(index.find_nearest(position))
    }
}
