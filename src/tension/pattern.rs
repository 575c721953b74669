//! Tissue archetypes: spatial patterns of membrane tension

use glam::DVec2;
use rand::seq::SliceRandom;
use rand::Rng;
use rand_distr::Distribution;
use std::f64::consts::PI;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{normal, Densities};
use crate::error::{LatticeError, Result};
use crate::mesh::{EdgeId, Mesh};

/// Coordinate axis a furrow runs across
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Axis {
    #[default]
    X,
    Y,
}

impl Axis {
    #[inline]
    fn of(self, p: DVec2) -> f64 {
        match self {
            Axis::X => p.x,
            Axis::Y => p.y,
        }
    }
}

/// How membrane tensions vary across the tissue
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub enum TissuePattern {
    /// A band of raised tension centred on the tissue along one axis
    ///
    /// Each edge gets `base + mean * pdf(c) / peak`, where `c` is the edge
    /// midpoint along `axis`, the pdf is `N(tissue center, std_dev)` and
    /// `peak` is the largest pdf value over whole-unit steps across the tissue.
    NormalFurrow {
        axis: Axis,
        mean: f64,
        std_dev: f64,
    },

    /// A ring of tension that falls off with distance from the tissue center
    ///
    /// Each edge gets `exp(-d² / 2σ²)` for its midpoint distance `d`, and the
    /// result is rescaled to average 1. Base densities are ignored.
    CircularFurrow { std_dev: f64 },

    /// Each edge independently picks one of `tensions` and draws around it
    ///
    /// The draw is `N(t, relative_std * t)`. Base densities are ignored.
    RandomCellTypes { tensions: Vec<f64>, relative_std: f64 },
}

impl TissuePattern {
    /// Compute patterned densities for every edge of `mesh`
    ///
    /// # Errors
    ///
    /// Returns `MissingValue` if `NormalFurrow` finds an edge without a base
    /// density, and `InvalidConfig` for unusable parameters.
    pub fn apply<R: Rng + ?Sized>(
        &self,
        mesh: &Mesh,
        base: &Densities,
        rng: &mut R,
    ) -> Result<Densities> {
        let (Some(center), Some((min, max))) = (mesh.center(), mesh.bounds()) else {
            return Ok(Densities::new());
        };

        match self {
            TissuePattern::NormalFurrow {
                axis,
                mean,
                std_dev,
            } => {
                check_std_dev(*std_dev)?;
                let mu = axis.of(center);
                let peak = furrow_peak(axis.of(min), axis.of(max), mu, *std_dev);

                mesh.edges()
                    .iter()
                    .map(|edge| {
                        let base = base.get(&edge.id).copied().ok_or(LatticeError::MissingValue {
                            kind: "density",
                            id: edge.id.0 as i64,
                        })?;
                        let c = centroid(mesh, edge.id)?;
                        let value = normal_pdf(axis.of(c), mu, *std_dev) / peak;
                        Ok((edge.id, base + mean * value))
                    })
                    .collect()
            }

            TissuePattern::CircularFurrow { std_dev } => {
                check_std_dev(*std_dev)?;
                let peak = normal_pdf(0.0, 0.0, *std_dev);

                let mut densities = mesh
                    .edges()
                    .iter()
                    .map(|edge| {
                        let distance = centroid(mesh, edge.id)?.distance(center);
                        Ok((edge.id, normal_pdf(distance, 0.0, *std_dev) / peak))
                    })
                    .collect::<Result<Densities>>()?;

                let mean = densities.values().sum::<f64>() / densities.len() as f64;
                if mean > 0.0 {
                    densities.values_mut().for_each(|d| *d /= mean);
                } else {
                    log::warn!("circular furrow (std {}) vanishes on every edge", std_dev);
                }
                Ok(densities)
            }

            TissuePattern::RandomCellTypes {
                tensions,
                relative_std,
            } => {
                if tensions.is_empty() {
                    return Err(LatticeError::InvalidConfig(
                        "RandomCellTypes needs at least one tension".to_string(),
                    ));
                }

                let mut densities = Densities::new();
                for edge in mesh.edges() {
                    let Some(&chosen) = tensions.choose(rng) else {
                        continue;
                    };
                    let value = normal(chosen, relative_std * chosen)?.sample(rng);
                    densities.insert(edge.id, value);
                }
                Ok(densities)
            }
        }
    }
}

fn check_std_dev(std_dev: f64) -> Result<()> {
    if std_dev.is_finite() && std_dev > 0.0 {
        Ok(())
    } else {
        Err(LatticeError::InvalidConfig(format!(
            "Furrow width must be positive (got {})",
            std_dev
        )))
    }
}

fn centroid(mesh: &Mesh, id: EdgeId) -> Result<DVec2> {
    mesh.edge_centroid(id)
        .ok_or(LatticeError::EdgeNotFound(id.0 as i64))
}

/// Density of `N(mu, sigma)` at `x`
fn normal_pdf(x: f64, mu: f64, sigma: f64) -> f64 {
    let z = (x - mu) / sigma;
    (-0.5 * z * z).exp() / (sigma * (2.0 * PI).sqrt())
}

/// Largest pdf value over `min, min + 1, …` below `max`
///
/// Falls back to the true peak at `mu` when the range holds no sample.
fn furrow_peak(min: f64, max: f64, mu: f64, sigma: f64) -> f64 {
    let steps = (max - min).ceil().max(0.0) as usize;
    let peak = (0..steps)
        .map(|k| normal_pdf(min + k as f64, mu, sigma))
        .fold(0.0, f64::max);

    if peak > 0.0 {
        peak
    } else {
        normal_pdf(mu, mu, sigma)
    }
}
