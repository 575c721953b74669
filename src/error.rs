//! Error types for lattice construction and script generation

use thiserror::Error;

/// A segment whose endpoints share an x-coordinate, so `y(x)` has no slope
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("degenerate edge: endpoints ({x}, {y0}) and ({x}, {y1}) are vertical")]
pub struct DegenerateEdgeError {
    /// The shared x-coordinate (after rounding)
    pub x: f64,
    /// y-coordinate of the first endpoint
    pub y0: f64,
    /// y-coordinate of the second endpoint
    pub y1: f64,
}

/// Errors that can occur while building a lattice or its evolver script
#[derive(Debug, Error)]
pub enum LatticeError {
    /// Configuration validation failed
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The Voronoi tessellation could not be computed from the seeds
    #[error("tessellation failed: {0}")]
    TessellationFailed(String),

    /// A region references a raw vertex that does not exist
    #[error("region {region} references raw vertex {index}, but only {available} exist")]
    InvalidRegion {
        /// Seed index of the offending region
        region: usize,
        /// Offending raw vertex index
        index: usize,
        /// Number of raw vertices available
        available: usize,
    },

    /// A vertex position is NaN, infinite, or too large to quantize
    #[error("vertex ({x}, {y}) is not finite at the working precision")]
    NonFiniteVertex {
        /// x-coordinate as given
        x: f64,
        /// y-coordinate as given
        y: f64,
    },

    /// Line evaluation hit a vertical segment and no recovery applied
    #[error(transparent)]
    DegenerateEdge(#[from] DegenerateEdgeError),

    /// A cell traced a zero-area polygon and the policy forbids skipping it
    #[error("cell {0} has zero signed area")]
    DegenerateCell(u32),

    /// Requested edge ID does not exist
    #[error("edge not found: {0}")]
    EdgeNotFound(i64),

    /// Requested cell ID does not exist
    #[error("cell not found: {0}")]
    CellNotFound(i64),

    /// A density or volume lookup had no value for an emitted ID
    #[error("missing {kind} value for id {id}")]
    MissingValue {
        /// "density" or "volume"
        kind: &'static str,
        /// Signed ID that had no value
        id: i64,
    },

    /// Writing the script or launching the simulator failed
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for lattice operations
pub type Result<T> = std::result::Result<T, LatticeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degenerate_edge_converts() {
        let err: LatticeError = DegenerateEdgeError { x: 1.5, y0: 0.5, y1: 2.0 }.into();
        assert!(matches!(err, LatticeError::DegenerateEdge(_)));
        assert!(err.to_string().contains("vertical"));
    }

    #[test]
    fn test_display_messages() {
        let err = LatticeError::InvalidRegion { region: 2, index: 9, available: 4 };
        assert_eq!(
            err.to_string(),
            "region 2 references raw vertex 9, but only 4 exist"
        );
        assert_eq!(LatticeError::DegenerateCell(3).to_string(), "cell 3 has zero signed area");
    }
}
