//! Single-pass canonicalization of filtered regions into a mesh
//!
//! Regions are processed strictly in order. Every lookup depends on what was
//! inserted before it, so the resulting IDs are a pure function of the region
//! sequence and the options.

use glam::DVec2;
use std::collections::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::ids::{CellId, EdgeId, SignedEdge, VertexId};
use super::{Cell, Edge, Mesh, Vertex};
use crate::error::{LatticeError, Result};
use crate::filter::BoundedRegion;
use crate::geometry::{line_value, linspace, signed_area, Orientation, PositionKey, Precision};

/// What to do with a region whose boundary has zero signed area
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DegenerateCellPolicy {
    /// Drop the cell, log a warning and record it in [`Mesh::skipped_cells`]
    #[default]
    Skip,
    /// Abort the build with [`LatticeError::DegenerateCell`]
    Error,
}

/// Options controlling canonicalization
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanonicalizeOptions {
    /// Rounding applied to every vertex position
    pub precision: Precision,
    /// Number of sub-segments each raw Voronoi edge is split into
    ///
    /// `1` keeps raw edges whole. Larger values insert evenly spaced
    /// intermediate vertices along each edge.
    pub segments_per_edge: usize,
    /// Handling of zero-area cells
    pub degenerate_cells: DegenerateCellPolicy,
}

impl Default for CanonicalizeOptions {
    fn default() -> Self {
        Self {
            precision: Precision::default(),
            segments_per_edge: 1,
            degenerate_cells: DegenerateCellPolicy::default(),
        }
    }
}

/// Accumulates vertices, edges and cells for one tessellation
///
/// Call [`add_region`](Self::add_region) once per region in document order,
/// then [`finalize`](Self::finalize) to obtain the immutable [`Mesh`]. The
/// builder is consumed by `finalize`, so a half-built accumulator can never be
/// reused for another tessellation.
///
/// # Example
///
/// ```rust
/// use glam::DVec2;
/// use tissue_lattice::mesh::{CanonicalizeOptions, MeshBuilder};
///
/// let mut builder = MeshBuilder::new(CanonicalizeOptions::default());
/// builder.add_region(&[
///     DVec2::new(0.0, 0.0),
///     DVec2::new(1.0, 0.0),
///     DVec2::new(0.5, 1.0),
/// ]).unwrap();
///
/// let mesh = builder.finalize();
/// assert_eq!(mesh.vertices().len(), 3);
/// assert_eq!(mesh.edges().len(), 3);
/// assert_eq!(mesh.cells().len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct MeshBuilder {
    options: CanonicalizeOptions,
    vertices: Vec<Vertex>,
    vertex_lookup: HashMap<PositionKey, VertexId>,
    edges: Vec<Edge>,
    edge_lookup: HashMap<(VertexId, VertexId), EdgeId>,
    cells: Vec<Cell>,
    skipped_cells: Vec<u32>,
    cell_counter: u32,
}

impl MeshBuilder {
    /// Create an empty builder
    ///
    /// A `segments_per_edge` of zero is treated as one.
    pub fn new(options: CanonicalizeOptions) -> Self {
        let options = CanonicalizeOptions {
            segments_per_edge: options.segments_per_edge.max(1),
            ..options
        };
        Self {
            options,
            vertices: Vec::new(),
            vertex_lookup: HashMap::new(),
            edges: Vec::new(),
            edge_lookup: HashMap::new(),
            cells: Vec::new(),
            skipped_cells: Vec::new(),
            cell_counter: 1,
        }
    }

    /// Options in effect for this pass
    pub fn options(&self) -> &CanonicalizeOptions {
        &self.options
    }

    /// Vertex ID of a position, minting a new one if it is unseen
    ///
    /// The position is rounded first; two positions that round to the same
    /// value always resolve to the same ID.
    ///
    /// # Errors
    ///
    /// Returns `NonFiniteVertex` if a coordinate is NaN, infinite, or too
    /// large to quantize at the configured precision.
    pub fn resolve_vertex(&mut self, position: DVec2) -> Result<VertexId> {
        let precision = self.options.precision;
        let key = precision.key(position).ok_or(LatticeError::NonFiniteVertex {
            x: position.x,
            y: position.y,
        })?;

        if let Some(&id) = self.vertex_lookup.get(&key) {
            return Ok(id);
        }

        let id = VertexId(self.vertices.len() as u32 + 1);
        self.vertices.push(Vertex {
            id,
            position: precision.from_key(key),
        });
        self.vertex_lookup.insert(key, id);
        Ok(id)
    }

    /// Signed edge walking `start → end`, minting a new edge if the pair is unseen
    ///
    /// An existing `start → end` edge is returned forward, an existing
    /// `end → start` edge is returned reversed. New edges are stored in the
    /// requested orientation.
    pub fn resolve_edge(&mut self, start: VertexId, end: VertexId) -> SignedEdge {
        if let Some(&id) = self.edge_lookup.get(&(start, end)) {
            return SignedEdge::forward(id);
        }
        if let Some(&id) = self.edge_lookup.get(&(end, start)) {
            return SignedEdge::reverse(id);
        }

        let id = EdgeId(self.edges.len() as u32 + 1);
        self.edges.push(Edge { id, start, end });
        self.edge_lookup.insert((start, end), id);
        SignedEdge::forward(id)
    }

    /// Trace one closed polygon into a cell
    ///
    /// `corners` lists the polygon's corners without repeating the first one;
    /// the closing edge back to the first corner is added here. Returns the
    /// new cell's ID, or `None` if the polygon was degenerate and skipped.
    ///
    /// Consecutive corners that round to the same vertex contribute no edge:
    /// the zero-length segment is dropped with a warning instead of being
    /// stored as a self-loop.
    ///
    /// # Errors
    ///
    /// Returns `DegenerateCell` for a zero-area polygon under
    /// [`DegenerateCellPolicy::Error`], or `NonFiniteVertex` for a corner that
    /// cannot be placed.
    pub fn add_region(&mut self, corners: &[DVec2]) -> Result<Option<CellId>> {
        self.add_region_from_seed(corners, None)
    }

    /// Trace a filtered region, looking its corners up in `raw_vertices`
    ///
    /// # Errors
    ///
    /// Returns `InvalidRegion` if an index is out of range, or the errors of
    /// [`add_region`](Self::add_region).
    pub fn add_bounded_region(
        &mut self,
        region: &BoundedRegion,
        raw_vertices: &[DVec2],
    ) -> Result<Option<CellId>> {
        let corners = region
            .vertices
            .iter()
            .map(|&i| {
                raw_vertices.get(i).copied().ok_or(LatticeError::InvalidRegion {
                    region: region.seed,
                    index: i,
                    available: raw_vertices.len(),
                })
            })
            .collect::<Result<Vec<DVec2>>>()?;

        self.add_region_from_seed(&corners, Some(region.seed))
    }

    fn add_region_from_seed(
        &mut self,
        corners: &[DVec2],
        seed: Option<usize>,
    ) -> Result<Option<CellId>> {
        let index = self.cell_counter;
        self.cell_counter += 1;

        let mut boundary: Vec<SignedEdge> = Vec::with_capacity(corners.len());
        let mut traced: Vec<VertexId> = Vec::with_capacity(corners.len() * 2);

        for (k, &from) in corners.iter().enumerate() {
            let to = corners[(k + 1) % corners.len()];

            let samples = self.subdivide(from, to);
            for pair in samples.windows(2) {
                let v0 = self.resolve_vertex(pair[0])?;
                let v1 = self.resolve_vertex(pair[1])?;

                if v0 == v1 {
                    log::warn!(
                        "cell {}: dropping zero-length segment at vertex {} ({:?})",
                        index,
                        v0,
                        pair[0]
                    );
                    continue;
                }

                boundary.push(self.resolve_edge(v0, v1));
                traced.push(v0);
                traced.push(v1);
            }
        }

        let positions: Vec<DVec2> = traced
            .iter()
            .map(|id| self.vertices[id.0 as usize - 1].position)
            .collect();
        let orientation = Orientation::from_area(signed_area(&positions));

        if orientation == Orientation::Degenerate {
            return match self.options.degenerate_cells {
                DegenerateCellPolicy::Skip => {
                    log::warn!("cell {} has zero signed area, skipping it", index);
                    self.skipped_cells.push(index);
                    Ok(None)
                }
                DegenerateCellPolicy::Error => Err(LatticeError::DegenerateCell(index)),
            };
        }

        let id = CellId { index, orientation };
        self.cells.push(Cell { id, seed, boundary });
        Ok(Some(id))
    }

    /// Sample points along a raw edge, endpoints included
    ///
    /// x-coordinates are evenly spaced and y follows the line through the
    /// endpoints. A vertical edge has no `y(x)`, so it is sampled evenly along
    /// y at the shared x instead.
    fn subdivide(&self, from: DVec2, to: DVec2) -> Vec<DVec2> {
        let precision = self.options.precision;
        let from = precision.round_point(from);
        let to = precision.round_point(to);
        let count = self.options.segments_per_edge + 1;

        let xs = linspace(from.x, to.x, count);
        let ys: std::result::Result<Vec<f64>, _> = xs
            .iter()
            .map(|&x| line_value(from, to, x, precision))
            .collect();

        match ys {
            Ok(ys) => xs
                .into_iter()
                .zip(ys)
                .map(|(x, y)| precision.round_point(DVec2::new(x, y)))
                .collect(),
            Err(err) => {
                log::debug!("{}; sampling along y instead", err);
                linspace(from.y, to.y, count)
                    .into_iter()
                    .map(|y| precision.round_point(DVec2::new(from.x, y)))
                    .collect()
            }
        }
    }

    /// Freeze the accumulated maps into an immutable mesh
    pub fn finalize(self) -> Mesh {
        log::debug!(
            "canonical mesh: {} vertices, {} edges, {} cells ({} skipped)",
            self.vertices.len(),
            self.edges.len(),
            self.cells.len(),
            self.skipped_cells.len()
        );

        Mesh {
            vertices: self.vertices,
            edges: self.edges,
            cells: self.cells,
            skipped_cells: self.skipped_cells,
            precision: self.options.precision,
        }
    }
}

/// Canonicalize a list of filtered regions in one pass
///
/// # Errors
///
/// Propagates the first error of [`MeshBuilder::add_bounded_region`]; no
/// partial mesh is returned.
pub fn canonicalize(
    regions: &[BoundedRegion],
    raw_vertices: &[DVec2],
    options: CanonicalizeOptions,
) -> Result<Mesh> {
    let mut builder = MeshBuilder::new(options);
    for region in regions {
        builder.add_bounded_region(region, raw_vertices)?;
    }
    Ok(builder.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square() -> Vec<DVec2> {
        vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(1.0, 0.0),
            DVec2::new(1.0, 1.0),
            DVec2::new(0.0, 1.0),
        ]
    }

    #[test]
    fn test_resolve_vertex_is_idempotent() {
        let mut builder = MeshBuilder::new(CanonicalizeOptions::default());
        let a = builder.resolve_vertex(DVec2::new(1.25, -3.5)).unwrap();
        let b = builder.resolve_vertex(DVec2::new(2.0, 0.0)).unwrap();
        assert_eq!(a, VertexId(1));
        assert_eq!(b, VertexId(2));
        assert_eq!(builder.resolve_vertex(DVec2::new(1.25, -3.5)).unwrap(), a);
        // Rounds onto the same position
        assert_eq!(builder.resolve_vertex(DVec2::new(1.2501, -3.4999)).unwrap(), a);
    }

    #[test]
    fn test_large_positions_stay_distinct() {
        let options = CanonicalizeOptions {
            precision: Precision::new(12),
            ..Default::default()
        };
        let mut builder = MeshBuilder::new(options);
        assert!(matches!(
            builder.resolve_vertex(DVec2::new(1e8, 0.0)),
            Err(LatticeError::NonFiniteVertex { x, .. }) if x == 1e8
        ));
        assert!(builder.resolve_vertex(DVec2::new(2e8, 0.0)).is_err());

        let mut coarse = MeshBuilder::new(CanonicalizeOptions::default());
        let a = coarse.resolve_vertex(DVec2::new(1e8, 0.0)).unwrap();
        let b = coarse.resolve_vertex(DVec2::new(2e8, 0.0)).unwrap();
        assert_ne!(a, b);
        let mesh = coarse.finalize();
        assert_eq!(mesh.vertices()[0].position, DVec2::new(1e8, 0.0));
        assert_eq!(mesh.vertices()[1].position, DVec2::new(2e8, 0.0));
    }

    #[test]
    fn test_nan_vertex_is_error() {
        let mut builder = MeshBuilder::new(CanonicalizeOptions::default());
        assert!(builder.resolve_vertex(DVec2::new(f64::NAN, f64::NAN)).is_err());
        // Nothing was minted for the NaN position
        assert_eq!(builder.resolve_vertex(DVec2::ZERO).unwrap(), VertexId(1));

        let mut builder = MeshBuilder::new(CanonicalizeOptions::default());
        let corners = vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(f64::NAN, 0.0),
            DVec2::new(1.0, 1.0),
        ];
        assert!(matches!(
            builder.add_region(&corners),
            Err(LatticeError::NonFiniteVertex { .. })
        ));
    }

    #[test]
    fn test_zero_length_segment_dropped() {
        // Corners 1 and 2 round onto the same vertex at 3 decimals
        let corners = vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(1.0, 0.0),
            DVec2::new(1.0002, 0.0001),
            DVec2::new(1.0, 1.0),
            DVec2::new(0.0, 1.0),
        ];
        let mut builder = MeshBuilder::new(CanonicalizeOptions::default());
        builder.add_region(&corners).unwrap().unwrap();
        let mesh = builder.finalize();

        assert_eq!(mesh.vertices().len(), 4);
        assert_eq!(mesh.edges().len(), 4);
        assert!(mesh.edges().iter().all(|e| e.start != e.end));
        let cell = &mesh.cells()[0];
        assert_eq!(cell.boundary.len(), 4);
        assert!(mesh.is_closed(cell));
    }

    #[test]
    fn test_resolve_edge_reuses_with_sign_flip() {
        let mut builder = MeshBuilder::new(CanonicalizeOptions::default());
        let a = builder.resolve_vertex(DVec2::new(0.0, 0.0)).unwrap();
        let b = builder.resolve_vertex(DVec2::new(1.0, 0.0)).unwrap();
        let c = builder.resolve_vertex(DVec2::new(1.0, 1.0)).unwrap();

        let ab = builder.resolve_edge(a, b);
        assert_eq!(ab.to_signed(), 1);
        assert_eq!(builder.resolve_edge(b, a).to_signed(), -1);
        assert_eq!(builder.resolve_edge(a, b).to_signed(), 1);
        assert_eq!(builder.resolve_edge(c, b).to_signed(), 2);
        assert_eq!(builder.resolve_edge(b, c).to_signed(), -2);

        let mesh = builder.finalize();
        assert_eq!(mesh.edges().len(), 2);
    }

    #[test]
    fn test_square_orientation_sign() {
        let mut ccw = MeshBuilder::new(CanonicalizeOptions::default());
        let ccw_id = ccw.add_region(&unit_square()).unwrap().unwrap();

        let reversed: Vec<DVec2> = unit_square().into_iter().rev().collect();
        let mut cw = MeshBuilder::new(CanonicalizeOptions::default());
        let cw_id = cw.add_region(&reversed).unwrap().unwrap();

        assert_eq!(ccw_id.orientation, Orientation::CounterClockwise);
        assert_eq!(cw_id.orientation, Orientation::Clockwise);
        assert_eq!(ccw_id.to_signed(), 1);
        assert_eq!(cw_id.to_signed(), -1);
    }

    #[test]
    fn test_shared_membrane_between_adjacent_cells() {
        let left = unit_square();
        let right = vec![
            DVec2::new(1.0, 0.0),
            DVec2::new(2.0, 0.0),
            DVec2::new(2.0, 1.0),
            DVec2::new(1.0, 1.0),
        ];

        let mut builder = MeshBuilder::new(CanonicalizeOptions::default());
        builder.add_region(&left).unwrap();
        builder.add_region(&right).unwrap();
        let mesh = builder.finalize();

        assert_eq!(mesh.vertices().len(), 6);
        assert_eq!(mesh.edges().len(), 7);

        // Left walks (1,0)→(1,1) as edge 2; right walks it back as -2
        let left_cell = &mesh.cells()[0];
        let right_cell = &mesh.cells()[1];
        assert_eq!(left_cell.boundary[1].to_signed(), 2);
        assert_eq!(right_cell.boundary[3].to_signed(), -2);
        assert_eq!(mesh.cells()[1].id.to_signed(), 2);
    }

    #[test]
    fn test_vertical_edges_recovered() {
        // Both vertical sides would make line_value fail
        let mut builder = MeshBuilder::new(CanonicalizeOptions::default());
        builder.add_region(&unit_square()).unwrap();
        let mesh = builder.finalize();

        assert_eq!(mesh.vertices().len(), 4);
        for vertex in mesh.vertices() {
            assert!(vertex.position.x.is_finite() && vertex.position.y.is_finite());
        }
        assert!(mesh.is_closed(&mesh.cells()[0]));
    }

    #[test]
    fn test_subdivision_inserts_vertices() {
        let options = CanonicalizeOptions {
            segments_per_edge: 4,
            ..Default::default()
        };
        let mut builder = MeshBuilder::new(options);
        builder.add_region(&unit_square()).unwrap();
        let mesh = builder.finalize();

        assert_eq!(mesh.vertices().len(), 16);
        assert_eq!(mesh.edges().len(), 16);
        let cell = &mesh.cells()[0];
        assert_eq!(cell.boundary.len(), 16);
        assert!(mesh.is_closed(cell));
        assert!(mesh
            .vertices()
            .iter()
            .any(|v| v.position == DVec2::new(1.0, 0.25)));
    }

    #[test]
    fn test_zero_segments_treated_as_one() {
        let options = CanonicalizeOptions {
            segments_per_edge: 0,
            ..Default::default()
        };
        let builder = MeshBuilder::new(options);
        assert_eq!(builder.options().segments_per_edge, 1);
    }

    #[test]
    fn test_degenerate_cell_skipped_but_counted() {
        let line = vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(1.0, 1.0),
            DVec2::new(2.0, 2.0),
        ];

        let mut builder = MeshBuilder::new(CanonicalizeOptions::default());
        assert_eq!(builder.add_region(&line).unwrap(), None);
        let id = builder.add_region(&unit_square()).unwrap().unwrap();
        let mesh = builder.finalize();

        assert_eq!(id.index, 2, "the counter advances past skipped cells");
        assert_eq!(mesh.skipped_cells(), &[1]);
        assert_eq!(mesh.cells().len(), 1);
    }

    #[test]
    fn test_degenerate_cell_error_policy() {
        let options = CanonicalizeOptions {
            degenerate_cells: DegenerateCellPolicy::Error,
            ..Default::default()
        };
        let mut builder = MeshBuilder::new(options);
        let collapsed = vec![DVec2::new(0.0, 0.0), DVec2::new(0.0001, 0.0)];
        let result = builder.add_region(&collapsed);
        assert!(matches!(result, Err(LatticeError::DegenerateCell(1))));
    }

    #[test]
    fn test_precision_controls_dedup() {
        let square = vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(1.0, 0.0),
            DVec2::new(1.0, 1.0),
            DVec2::new(0.0, 1.0),
        ];
        let nudged = vec![
            DVec2::new(1.0004, 0.0),
            DVec2::new(2.0, 0.0),
            DVec2::new(2.0, 1.0),
            DVec2::new(1.0004, 1.0),
        ];

        let mut coarse = MeshBuilder::new(CanonicalizeOptions::default());
        coarse.add_region(&square).unwrap();
        coarse.add_region(&nudged).unwrap();
        assert_eq!(coarse.finalize().vertices().len(), 6);

        let fine_options = CanonicalizeOptions {
            precision: Precision::new(4),
            ..Default::default()
        };
        let mut fine = MeshBuilder::new(fine_options);
        fine.add_region(&square).unwrap();
        fine.add_region(&nudged).unwrap();
        assert_eq!(fine.finalize().vertices().len(), 8);
    }

    #[test]
    fn test_canonicalize_rejects_bad_index() {
        let regions = vec![BoundedRegion {
            seed: 3,
            vertices: vec![0, 1, 5],
        }];
        let raw = unit_square();
        let result = canonicalize(&regions, &raw, CanonicalizeOptions::default());
        assert!(matches!(
            result,
            Err(LatticeError::InvalidRegion { region: 3, index: 5, available: 4 })
        ));
    }

    #[test]
    fn test_canonicalize_records_seed() {
        let regions = vec![BoundedRegion {
            seed: 8,
            vertices: vec![0, 1, 2, 3],
        }];
        let mesh = canonicalize(&regions, &unit_square(), CanonicalizeOptions::default()).unwrap();
        assert_eq!(mesh.cells()[0].seed, Some(8));
    }
}
