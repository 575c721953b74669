//! Identifiers of canonical vertices, edges and cells
//!
//! Direction and winding are carried as explicit tags. They only collapse to
//! signed integers at the export boundary (`to_signed`), which is the form the
//! Surface Evolver script expects.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::geometry::Orientation;

/// Canonical vertex identifier, 1-based in first-seen order
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VertexId(pub u32);

/// Canonical edge identifier (the magnitude of a signed edge ID)
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeId(pub u32);

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Traversal direction of an edge relative to its stored orientation
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Walk the edge from its stored start to its stored end
    Forward,
    /// Walk the edge from its stored end to its stored start
    Reverse,
}

impl Direction {
    /// The opposite direction
    #[inline]
    pub fn reversed(self) -> Self {
        match self {
            Direction::Forward => Direction::Reverse,
            Direction::Reverse => Direction::Forward,
        }
    }
}

/// An edge reference with a traversal direction
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SignedEdge {
    pub id: EdgeId,
    pub direction: Direction,
}

impl SignedEdge {
    /// Forward traversal of `id`
    #[inline]
    pub fn forward(id: EdgeId) -> Self {
        Self {
            id,
            direction: Direction::Forward,
        }
    }

    /// Reverse traversal of `id`
    #[inline]
    pub fn reverse(id: EdgeId) -> Self {
        Self {
            id,
            direction: Direction::Reverse,
        }
    }

    /// The same edge walked the other way
    #[inline]
    pub fn reversed(self) -> Self {
        Self {
            id: self.id,
            direction: self.direction.reversed(),
        }
    }

    /// Signed integer form: `+id` forward, `-id` reverse
    #[inline]
    pub fn to_signed(self) -> i64 {
        match self.direction {
            Direction::Forward => self.id.0 as i64,
            Direction::Reverse => -(self.id.0 as i64),
        }
    }

    /// Parse a signed integer edge ID; zero is not a valid edge
    pub fn from_signed(value: i64) -> Option<Self> {
        let magnitude = u32::try_from(value.unsigned_abs()).ok()?;
        match value {
            0 => None,
            v if v > 0 => Some(Self::forward(EdgeId(magnitude))),
            _ => Some(Self::reverse(EdgeId(magnitude))),
        }
    }
}

/// Cell identifier: a 1-based counter plus the winding of its boundary
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellId {
    /// Position of the region among accepted regions, starting at 1
    pub index: u32,
    /// Winding of the traced boundary
    pub orientation: Orientation,
}

impl CellId {
    /// Signed integer form: `-index * sign(area)`
    ///
    /// Counter-clockwise cells are positive, clockwise cells negative.
    /// Degenerate cells would map to `0`, which is why the builder never emits
    /// them.
    #[inline]
    pub fn to_signed(self) -> i64 {
        -(self.index as i64) * self.orientation.sign()
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_signed())
    }
}
