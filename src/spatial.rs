//! Spatial indexing for fast position-to-seed lookups
//!
//! This module is only available with the `spatial-index` feature.

use glam::DVec2;
use kiddo::immutable::float::kdtree::ImmutableKdTree;
use kiddo::SquaredEuclidean;

/// Wrapper around a 2D KD-tree over the lattice seeds
///
/// A point lies in the Voronoi region of its nearest seed, so a nearest-seed
/// query answers "which cell is this position in" in O(log n).
#[derive(Clone)]
pub struct SpatialIndex {
    tree: ImmutableKdTree<f64, usize, 2, 32>,
}

impl SpatialIndex {
    /// Build the index from seed positions
    ///
    /// # Example
    ///
    /// ```
    /// use tissue_lattice::*;
    ///
    /// let seeds = vec![
    ///     DVec2::new(0.0, 0.0),
    ///     DVec2::new(10.0, 0.0),
    ///     DVec2::new(0.0, 10.0),
    /// ];
    ///
    /// let index = SpatialIndex::new(&seeds);
    /// assert_eq!(index.find_nearest(DVec2::new(9.0, 1.0)), 1);
    /// ```
    pub fn new(seeds: &[DVec2]) -> Self {
        let points: Vec<[f64; 2]> = seeds.iter().map(|s| [s.x, s.y]).collect();

        Self {
            tree: ImmutableKdTree::new_from_slice(&points),
        }
    }

    /// Index of the seed nearest to `position`
    pub fn find_nearest(&self, position: DVec2) -> usize {
        let query = [position.x, position.y];
        let result = self.tree.nearest_one::<SquaredEuclidean>(&query);
        result.item as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spatial_index_basic() {
        let seeds = vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(20.0, 0.0),
            DVec2::new(0.0, 20.0),
            DVec2::new(20.0, 20.0),
        ];

        let index = SpatialIndex::new(&seeds);

        assert_eq!(index.find_nearest(DVec2::new(1.0, -2.0)), 0);
        assert_eq!(index.find_nearest(DVec2::new(18.0, 3.0)), 1);
        assert_eq!(index.find_nearest(DVec2::new(4.0, 15.0)), 2);
        assert_eq!(index.find_nearest(DVec2::new(30.0, 30.0)), 3);
    }

    #[test]
    fn test_spatial_index_exact_match() {
        let seeds = vec![DVec2::new(5.0, 5.0), DVec2::new(-5.0, 5.0)];
        let index = SpatialIndex::new(&seeds);

        assert_eq!(index.find_nearest(seeds[0]), 0);
        assert_eq!(index.find_nearest(seeds[1]), 1);
    }
}
