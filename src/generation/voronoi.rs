//! Planar Voronoi tessellation from a Delaunay triangulation
//!
//! Voronoi vertices are the circumcenters of the Delaunay triangles. A seed's
//! region walks the triangles around it; any hull edge touching the seed means
//! the region extends to infinity and receives the unbounded sentinel.

use glam::DVec2;
use spade::{DelaunayTriangulation, Point2, Triangulation};
use std::collections::HashMap;
use std::time::Instant;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{LatticeError, Result};

/// Circumcenters that agree after scaling by this factor and rounding are merged
const CIRCUMCENTER_MERGE_SCALE: f64 = 1e7;

/// One entry of a raw region: a vertex index or the unbounded sentinel
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegionVertex {
    /// Index into [`Tessellation::raw_vertices`]
    Finite(usize),
    /// The region continues to infinity here
    Unbounded,
}

impl RegionVertex {
    /// Raw vertex index, or `None` for the sentinel
    #[inline]
    pub fn index(self) -> Option<usize> {
        match self {
            RegionVertex::Finite(index) => Some(index),
            RegionVertex::Unbounded => None,
        }
    }
}

impl From<usize> for RegionVertex {
    fn from(index: usize) -> Self {
        RegionVertex::Finite(index)
    }
}

/// Raw output of a planar Voronoi computation
///
/// `regions[k]` is the region of the `k`-th seed. Regions may be empty or hold
/// the unbounded sentinel; they are cleaned up by the region filter.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tessellation {
    /// Shared Voronoi vertex positions
    pub raw_vertices: Vec<DVec2>,
    /// Per-seed ordered vertex indices
    pub regions: Vec<Vec<RegionVertex>>,
}

impl Tessellation {
    /// Wrap an externally computed tessellation
    pub fn new(raw_vertices: Vec<DVec2>, regions: Vec<Vec<RegionVertex>>) -> Self {
        Self {
            raw_vertices,
            regions,
        }
    }

    /// Number of regions whose boundary is fully finite
    pub fn bounded_region_count(&self) -> usize {
        self.regions
            .iter()
            .filter(|r| !r.is_empty() && !r.contains(&RegionVertex::Unbounded))
            .count()
    }
}

/// Compute the Voronoi tessellation of a set of planar seeds
///
/// Regions are emitted in seed order, each ordered counter-clockwise around
/// its seed. Cocircular seeds yield coincident circumcenters; those are merged
/// so a region never repeats a vertex.
///
/// # Errors
///
/// Returns `TessellationFailed` if a seed is not finite or two seeds coincide.
pub fn compute_tessellation(seeds: &[DVec2]) -> Result<Tessellation> {
    let start = Instant::now();

    let mut triangulation: DelaunayTriangulation<Point2<f64>> = DelaunayTriangulation::new();
    let mut handles = Vec::with_capacity(seeds.len());

    for (i, seed) in seeds.iter().enumerate() {
        let before = triangulation.num_vertices();
        let handle = triangulation
            .insert(Point2::new(seed.x, seed.y))
            .map_err(|e| {
                LatticeError::TessellationFailed(format!("seed {} at {:?}: {:?}", i, seed, e))
            })?;
        if triangulation.num_vertices() == before {
            return Err(LatticeError::TessellationFailed(format!(
                "seed {} at {:?} duplicates an earlier seed",
                i, seed
            )));
        }
        handles.push(handle);
    }

    let mut raw_vertices: Vec<DVec2> = Vec::new();
    let mut vertex_lookup: HashMap<(i64, i64), usize> = HashMap::new();

    let regions: Vec<Vec<RegionVertex>> = handles
        .iter()
        .zip(seeds.iter())
        .map(|(&handle, &seed)| {
            let vertex = triangulation.vertex(handle);

            let mut corners: Vec<(f64, usize)> = Vec::new();
            let mut unbounded = false;

            for edge in vertex.out_edges() {
                let Some(face) = edge.face().as_inner() else {
                    unbounded = true;
                    continue;
                };
                let [a, b, c] = face.vertices().map(|v| {
                    let p = v.position();
                    DVec2::new(p.x, p.y)
                });
                let Some(center) = circumcenter(a, b, c) else {
                    unbounded = true;
                    continue;
                };

                let key = (
                    (center.x * CIRCUMCENTER_MERGE_SCALE).round() as i64,
                    (center.y * CIRCUMCENTER_MERGE_SCALE).round() as i64,
                );
                let index = *vertex_lookup.entry(key).or_insert_with(|| {
                    raw_vertices.push(center);
                    raw_vertices.len() - 1
                });

                let offset = raw_vertices[index] - seed;
                corners.push((offset.y.atan2(offset.x), index));
            }

            order_region(corners, unbounded)
        })
        .collect();

    log::debug!(
        "tessellated {} seeds into {} Voronoi vertices in {:?}",
        seeds.len(),
        raw_vertices.len(),
        start.elapsed()
    );

    Ok(Tessellation {
        raw_vertices,
        regions,
    })
}

/// Sort corners counter-clockwise and drop repeats of merged circumcenters
fn order_region(mut corners: Vec<(f64, usize)>, unbounded: bool) -> Vec<RegionVertex> {
    corners.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

    let mut region: Vec<RegionVertex> = Vec::with_capacity(corners.len() + 1);
    for (_, index) in corners {
        let vertex = RegionVertex::Finite(index);
        if region.last() != Some(&vertex) {
            region.push(vertex);
        }
    }
    while region.len() > 1 && region.first() == region.last() {
        region.pop();
    }

    if unbounded {
        region.push(RegionVertex::Unbounded);
    }
    region
}

/// Circumcenter of a triangle, or `None` when the points are collinear
fn circumcenter(a: DVec2, b: DVec2, c: DVec2) -> Option<DVec2> {
    let d = 2.0 * (a.x * (b.y - c.y) + b.x * (c.y - a.y) + c.x * (a.y - b.y));
    if d.abs() < 1e-12 {
        return None;
    }

    let a2 = a.length_squared();
    let b2 = b.length_squared();
    let c2 = c.length_squared();

    let ux = (a2 * (b.y - c.y) + b2 * (c.y - a.y) + c2 * (a.y - b.y)) / d;
    let uy = (a2 * (c.x - b.x) + b2 * (a.x - c.x) + c2 * (b.x - a.x)) / d;

    Some(DVec2::new(ux, uy))
}
