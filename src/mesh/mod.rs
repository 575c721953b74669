//! Canonical planar mesh: deduplicated vertices, shared edges, oriented cells
//!
//! A [`Mesh`] is produced once per tessellation by [`MeshBuilder`] and is
//! read-only afterwards. The `*_map` methods export it in the signed-integer
//! form used by the Surface Evolver script.

mod builder;
mod ids;

pub use builder::{canonicalize, CanonicalizeOptions, DegenerateCellPolicy, MeshBuilder};
pub use ids::{CellId, Direction, EdgeId, SignedEdge, VertexId};

use glam::DVec2;
use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::geometry::Precision;

/// A deduplicated vertex
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub id: VertexId,
    /// Position, already rounded to the mesh precision
    pub position: DVec2,
}

/// A stored edge; its forward direction is `start → end`
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub id: EdgeId,
    pub start: VertexId,
    pub end: VertexId,
}

/// An oriented cell polygon
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub id: CellId,
    /// Index of the seed whose region produced this cell, when known
    pub seed: Option<usize>,
    /// Signed edges tracing the polygon; the last edge ends where the first starts
    pub boundary: Vec<SignedEdge>,
}

/// Immutable canonical mesh
///
/// Vertex and edge IDs are dense and 1-based, so lookups are direct indexing.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    vertices: Vec<Vertex>,
    edges: Vec<Edge>,
    cells: Vec<Cell>,
    skipped_cells: Vec<u32>,
    precision: Precision,
}

impl Mesh {
    /// All vertices, ordered by ID
    #[inline]
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// All edges, ordered by ID
    #[inline]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// All cells, ordered by counter
    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Counters of cells dropped for having zero area
    #[inline]
    pub fn skipped_cells(&self) -> &[u32] {
        &self.skipped_cells
    }

    /// Rounding used for every vertex position
    #[inline]
    pub fn precision(&self) -> Precision {
        self.precision
    }

    /// Check if the mesh has no cells
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Look up a vertex
    pub fn vertex(&self, id: VertexId) -> Option<&Vertex> {
        let index = (id.0 as usize).checked_sub(1)?;
        self.vertices.get(index)
    }

    /// Position of a vertex
    pub fn position(&self, id: VertexId) -> Option<DVec2> {
        self.vertex(id).map(|v| v.position)
    }

    /// Look up an edge
    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        let index = (id.0 as usize).checked_sub(1)?;
        self.edges.get(index)
    }

    /// Look up a cell by its signed ID
    pub fn cell(&self, signed_id: i64) -> Option<&Cell> {
        self.cells.iter().find(|c| c.id.to_signed() == signed_id)
    }

    /// Endpoints of a signed edge in traversal order
    pub fn edge_endpoints(&self, edge: SignedEdge) -> Option<(VertexId, VertexId)> {
        let stored = self.edge(edge.id)?;
        Some(match edge.direction {
            Direction::Forward => (stored.start, stored.end),
            Direction::Reverse => (stored.end, stored.start),
        })
    }

    /// Midpoint of an edge
    pub fn edge_centroid(&self, id: EdgeId) -> Option<DVec2> {
        let edge = self.edge(id)?;
        let a = self.position(edge.start)?;
        let b = self.position(edge.end)?;
        Some((a + b) * 0.5)
    }

    /// Corner vertices of a cell, in boundary order
    ///
    /// Each entry is the start vertex of the corresponding boundary edge.
    pub fn cell_vertices(&self, cell: &Cell) -> Option<Vec<VertexId>> {
        cell.boundary
            .iter()
            .map(|&edge| self.edge_endpoints(edge).map(|(start, _)| start))
            .collect()
    }

    /// Check that a cell's boundary is a closed walk
    ///
    /// Every edge must start where the previous one ended, and the last edge
    /// must end at the first edge's start.
    pub fn is_closed(&self, cell: &Cell) -> bool {
        let Some(walk) = cell
            .boundary
            .iter()
            .map(|&edge| self.edge_endpoints(edge))
            .collect::<Option<Vec<_>>>()
        else {
            return false;
        };

        if walk.is_empty() {
            return false;
        }

        (0..walk.len()).all(|i| walk[i].1 == walk[(i + 1) % walk.len()].0)
    }

    /// Column-wise coordinates of all vertices, ordered by vertex ID
    pub fn coordinates(&self) -> (Vec<f64>, Vec<f64>) {
        self.vertices
            .iter()
            .map(|v| (v.position.x, v.position.y))
            .unzip()
    }

    /// Mean position of all vertices, `None` for an empty mesh
    pub fn center(&self) -> Option<DVec2> {
        if self.vertices.is_empty() {
            return None;
        }
        let sum: DVec2 = self.vertices.iter().map(|v| v.position).sum();
        Some(sum / self.vertices.len() as f64)
    }

    /// Axis-aligned bounds `(min, max)` of all vertices
    pub fn bounds(&self) -> Option<(DVec2, DVec2)> {
        let first = self.vertices.first()?.position;
        Some(self.vertices.iter().fold((first, first), |(min, max), v| {
            (min.min(v.position), max.max(v.position))
        }))
    }

    /// Vertex map `id → (x, y)`
    pub fn vertex_map(&self) -> BTreeMap<u32, (f64, f64)> {
        self.vertices
            .iter()
            .map(|v| (v.id.0, (v.position.x, v.position.y)))
            .collect()
    }

    /// Edge map `|id| → (start, end)`
    pub fn edge_map(&self) -> BTreeMap<u32, (u32, u32)> {
        self.edges
            .iter()
            .map(|e| (e.id.0, (e.start.0, e.end.0)))
            .collect()
    }

    /// Cell map `signed id → signed edge ids`
    pub fn cell_map(&self) -> BTreeMap<i64, Vec<i64>> {
        self.cells
            .iter()
            .map(|c| {
                let boundary = c.boundary.iter().map(|e| e.to_signed()).collect();
                (c.id.to_signed(), boundary)
            })
            .collect()
    }
}
