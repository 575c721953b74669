//! Removal of unbounded and oversized regions
//!
//! Grid-edge seeds of a Voronoi tessellation own regions that run off to
//! infinity, or that close through a vertex placed far outside the tissue.
//! Neither describes a real cell, so both are dropped before meshing.

use glam::DVec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{LatticeError, Result};
use crate::generation::{RegionVertex, Tessellation};

/// Default longest accepted boundary segment
pub const DEFAULT_MAX_EDGE_LENGTH: f64 = 50.0;

/// A region that survived filtering: finite, non-empty, no long segments
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundedRegion {
    /// Index of the seed (and raw region) this region came from
    pub seed: usize,
    /// Ordered raw vertex indices, unchanged from the tessellation
    pub vertices: Vec<usize>,
}

/// Filter the regions of a tessellation
///
/// A region is discarded when it is empty, contains the unbounded sentinel, or
/// has a consecutive boundary segment longer than `max_edge_length`. Only
/// `vertices[i] → vertices[i + 1]` segments are measured; the closing segment
/// from the last vertex back to the first is not checked.
///
/// Surviving regions keep their input order.
///
/// # Errors
///
/// Returns `InvalidRegion` if a region references a raw vertex that does not
/// exist, and `NonFiniteVertex` if it references a NaN or infinite one.
pub fn filter_regions(
    tessellation: &Tessellation,
    max_edge_length: f64,
) -> Result<Vec<BoundedRegion>> {
    let raw = &tessellation.raw_vertices;
    let mut kept = Vec::new();

    for (seed, region) in tessellation.regions.iter().enumerate() {
        let Some(vertices) = finite_indices(region) else {
            continue;
        };

        if let Some(&index) = vertices.iter().find(|&&i| i >= raw.len()) {
            return Err(LatticeError::InvalidRegion {
                region: seed,
                index,
                available: raw.len(),
            });
        }

        if let Some(p) = vertices.iter().map(|&i| raw[i]).find(|p| !p.is_finite()) {
            return Err(LatticeError::NonFiniteVertex { x: p.x, y: p.y });
        }

        if has_long_segment(&vertices, raw, max_edge_length) {
            log::debug!("dropping region {}: segment longer than {}", seed, max_edge_length);
            continue;
        }

        kept.push(BoundedRegion { seed, vertices });
    }

    log::debug!(
        "kept {} of {} regions (max edge length {})",
        kept.len(),
        tessellation.regions.len(),
        max_edge_length
    );

    Ok(kept)
}

/// Raw indices of a non-empty, fully finite region
fn finite_indices(region: &[RegionVertex]) -> Option<Vec<usize>> {
    if region.is_empty() {
        return None;
    }
    region.iter().map(|v| v.index()).collect()
}

fn has_long_segment(vertices: &[usize], raw: &[DVec2], max_edge_length: f64) -> bool {
    vertices
        .windows(2)
        .any(|pair| raw[pair[0]].distance(raw[pair[1]]) > max_edge_length)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finite(indices: &[usize]) -> Vec<RegionVertex> {
        indices.iter().map(|&i| RegionVertex::Finite(i)).collect()
    }

    fn square_vertices() -> Vec<DVec2> {
        vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(10.0, 0.0),
            DVec2::new(10.0, 10.0),
            DVec2::new(0.0, 10.0),
            DVec2::new(70.0, 0.0),
        ]
    }

    #[test]
    fn test_sentinel_region_excluded() {
        let mut open = finite(&[0, 1, 2]);
        open.insert(1, RegionVertex::Unbounded);
        let tessellation = Tessellation::new(square_vertices(), vec![open, finite(&[0, 1, 2, 3])]);

        let kept = filter_regions(&tessellation, DEFAULT_MAX_EDGE_LENGTH).unwrap();
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].seed, 1);
    }

    #[test]
    fn test_empty_region_excluded() {
        let tessellation = Tessellation::new(square_vertices(), vec![vec![], finite(&[0, 1, 2])]);
        let kept = filter_regions(&tessellation, DEFAULT_MAX_EDGE_LENGTH).unwrap();
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].seed, 1);
    }

    #[test]
    fn test_long_segment_excludes_whole_region() {
        // 1 → 4 is 60 long, everything else is short
        let tessellation = Tessellation::new(square_vertices(), vec![finite(&[0, 1, 4, 2])]);
        let kept = filter_regions(&tessellation, 50.0).unwrap();
        assert!(kept.is_empty());
    }

    #[test]
    fn test_short_region_retained_unchanged() {
        let tessellation = Tessellation::new(square_vertices(), vec![finite(&[3, 2, 1, 0])]);
        let kept = filter_regions(&tessellation, 50.0).unwrap();
        assert_eq!(
            kept,
            vec![BoundedRegion {
                seed: 0,
                vertices: vec![3, 2, 1, 0]
            }]
        );
    }

    #[test]
    fn test_closing_segment_not_checked() {
        // Only the implicit 4 → 0 closing segment (length 70) is long
        let tessellation = Tessellation::new(square_vertices(), vec![finite(&[0, 1, 2, 4])]);
        let kept = filter_regions(&tessellation, 62.0).unwrap();
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let tessellation = Tessellation::new(square_vertices(), vec![finite(&[0, 1, 2, 3])]);
        assert_eq!(filter_regions(&tessellation, 10.0).unwrap().len(), 1);
        assert!(filter_regions(&tessellation, 9.99).unwrap().is_empty());
    }

    #[test]
    fn test_order_preserved() {
        let tessellation = Tessellation::new(
            square_vertices(),
            vec![finite(&[2, 3, 0]), vec![RegionVertex::Unbounded], finite(&[0, 1, 2])],
        );
        let kept = filter_regions(&tessellation, 50.0).unwrap();
        let seeds: Vec<usize> = kept.iter().map(|r| r.seed).collect();
        assert_eq!(seeds, vec![0, 2]);
    }

    #[test]
    fn test_out_of_range_index_is_error() {
        let tessellation = Tessellation::new(square_vertices(), vec![finite(&[0, 1, 9])]);
        let result = filter_regions(&tessellation, 50.0);
        assert!(matches!(
            result,
            Err(LatticeError::InvalidRegion { region: 0, index: 9, available: 5 })
        ));
    }

    #[test]
    fn test_non_finite_vertex_is_error() {
        // NaN segment lengths never exceed the threshold
        let mut raw = square_vertices();
        raw[2] = DVec2::new(f64::NAN, 10.0);
        let tessellation = Tessellation::new(raw, vec![finite(&[0, 1, 2, 3])]);
        assert!(matches!(
            filter_regions(&tessellation, 50.0),
            Err(LatticeError::NonFiniteVertex { y, .. }) if y == 10.0
        ));

        // Unreferenced non-finite vertices are harmless
        let mut raw = square_vertices();
        raw[4] = DVec2::new(f64::INFINITY, 0.0);
        let tessellation = Tessellation::new(raw, vec![finite(&[0, 1, 2, 3])]);
        assert_eq!(filter_regions(&tessellation, 50.0).unwrap().len(), 1);
    }
}
