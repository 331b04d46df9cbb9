//! Pairwise force laws and the grid-local force pipeline
//!
//! Defines the `ForceLaw` trait with a plain Newtonian law and the
//! relativistically corrected law, and `ForcePipeline`, which sums
//! forces over each body's 3×3 grid neighborhood in parallel.

use rayon::prelude::*;

use crate::simulation::grid::SpatialGrid;
use crate::simulation::params::{Parameters, C, G};
use crate::simulation::states::{Body, NVec3};
use crate::simulation::vector::VectorExt;

/// Force exerted on `b1` by `b2` (pointing from b1 toward b2 for attraction)
pub trait ForceLaw {
    fn force(&self, b1: &Body, b2: &Body) -> NVec3;
}

/// Newtonian gravity with a minimum-separation clamp
pub struct NewtonianGravity {
    pub G: f64,
    pub min_separation: f64,
}

impl ForceLaw for NewtonianGravity {
    fn force(&self, b1: &Body, b2: &Body) -> NVec3 {
        let r = b2.x - b1.x;
        let d2 = r.norm_squared().max(self.min_separation * self.min_separation);
        let magnitude = self.G * b1.m * b2.m / d2;
        r.normalize_or_zero() * magnitude
    }
}

/// Newtonian gravity scaled by stylized relativistic factors
///
/// All three factors reference the mass of `b2` only, so the law is not
/// symmetric: `force(a, b) != -force(b, a)` when the masses differ. The
/// operation order below is kept fixed for reproducible trajectories.
pub struct RelativisticGravity {
    pub G: f64,
    pub c: f64,
    pub min_separation: f64,
}

impl ForceLaw for RelativisticGravity {
    fn force(&self, b1: &Body, b2: &Body) -> NVec3 {
        let separation = b2.x - b1.x;
        let min = self.min_separation;
        let d2 = separation.norm_squared().max(min * min);
        let d = separation.norm().max(min);
        let c2 = self.c * self.c;

        let mut magnitude = self.G * b1.m * b2.m / d2;

        // Schwarzschild radius of b2
        let rs = 2.0 * self.G * b2.m / c2;
        magnitude *= 1.0 - rs / d;

        let precession = 1.0 + (3.0 * self.G * b2.m) / (c2 * d);
        let dilation = 1.0 - (2.0 * self.G * b2.m) / (c2 * d);
        magnitude *= precession * dilation;

        separation.normalize_or_zero() * magnitude
    }
}

/// Grid-restricted net force evaluation
pub struct ForcePipeline {
    law: Box<dyn ForceLaw + Send + Sync>,
}

impl ForcePipeline {
    pub fn new(law: impl ForceLaw + Send + Sync + 'static) -> Self {
        Self { law: Box::new(law) }
    }

    /// Pick the pair law from the runtime parameters
    pub fn from_params(params: &Parameters) -> Self {
        if params.relativistic {
            Self::new(RelativisticGravity { G, c: C, min_separation: params.min_separation })
        } else {
            Self::new(NewtonianGravity { G, min_separation: params.min_separation })
        }
    }

    /// Compute the net force on every gridded body
    /// - `out[i]` is overwritten with the force on body `i` (zero for moons)
    /// - returns the number of pair interactions evaluated
    ///
    /// One parallel task per occupied cell. Each body sits in exactly one
    /// cell, so the per-cell results scatter into `out` without conflicts.
    /// Runs on whatever rayon pool the caller installed.
    pub fn accumulate_forces(&self, bodies: &[Body], grid: &SpatialGrid, out: &mut [NVec3]) -> usize {
        for f in out.iter_mut() {
            *f = NVec3::zeros();
        }

        let per_cell: Vec<(Vec<(usize, NVec3)>, usize)> = grid
            .occupied_cells()
            .into_par_iter()
            .map(|(coord, cell)| {
                let neighbors = grid.neighborhood(coord);
                let mut pairs = 0;
                let forces: Vec<(usize, NVec3)> = cell
                    .iter()
                    .map(|&i| {
                        let b1 = &bodies[i];
                        let mut total = NVec3::zeros();
                        for &j in neighbors.iter().flat_map(|c| c.iter()) {
                            if i != j {
                                total += self.law.force(b1, &bodies[j]);
                                pairs += 1;
                            }
                        }
                        (i, total)
                    })
                    .collect();
                (forces, pairs)
            })
            .collect();

        let mut pairs = 0;
        for (forces, count) in per_cell {
            pairs += count;
            for (i, f) in forces {
                out[i] = f;
            }
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn point(m: f64, x: f64) -> Body {
        Body::asteroid(m, NVec3::new(x, 0.0, 0.0), NVec3::zeros(), 0.0).unwrap()
    }

    #[test]
    fn relativistic_law_matches_closed_form() {
        let law = RelativisticGravity { G, c: C, min_separation: 1.0 };
        let (m1, m2, d) = (5.97237e24, 1.989e30, 1.496e11);
        let f = law.force(&point(m1, d), &point(m2, 0.0));

        let c2 = C * C;
        let mut expected = G * m1 * m2 / (d * d);
        expected *= 1.0 - (2.0 * G * m2 / c2) / d;
        expected *= (1.0 + 3.0 * G * m2 / (c2 * d)) * (1.0 - 2.0 * G * m2 / (c2 * d));

        assert_eq!(f.x, -expected);
        assert_eq!(f.y, 0.0);
    }

    #[test]
    fn relativistic_law_is_asymmetric_in_mass() {
        let law = RelativisticGravity { G, c: C, min_separation: 1.0 };
        let light = point(1.0, 0.0);
        let heavy = point(1.0e30, 1.0e4);
        let on_light = law.force(&light, &heavy);
        let on_heavy = law.force(&heavy, &light);
        assert!(on_light.x > 0.0 && on_heavy.x < 0.0);
        assert!(on_light.x.abs() < on_heavy.x.abs());
    }

    #[test]
    fn coincident_bodies_stay_finite() {
        let law = RelativisticGravity { G, c: C, min_separation: 1.0 };
        let f = law.force(&point(1.0e20, 5.0), &point(1.0e20, 5.0));
        assert!(f.all_finite());
        assert_eq!(f, NVec3::zeros());

        let newton = NewtonianGravity { G, min_separation: 1.0 };
        let f = newton.force(&point(1.0e20, 0.0), &point(1.0e20, 1e-9));
        assert!(f.all_finite());
        assert_relative_eq!(f.x, G * 1.0e40, max_relative = 1e-12);
    }

    #[test]
    fn pipeline_ignores_bodies_outside_neighborhood() {
        let mut grid = SpatialGrid::new(100.0, 10);
        let bodies = vec![point(1.0e10, -45.0), point(1.0e10, -35.0), point(1.0e10, 45.0)];
        grid.rebuild(&bodies);

        let pipeline = ForcePipeline::new(NewtonianGravity { G, min_separation: 1e-3 });
        let mut out = vec![NVec3::zeros(); bodies.len()];
        let pairs = pipeline.accumulate_forces(&bodies, &grid, &mut out);

        assert_eq!(pairs, 2);
        assert!(out[0].x > 0.0);
        assert_relative_eq!(out[0], -out[1], epsilon = 1e-12);
        assert_eq!(out[2], NVec3::zeros());
    }
}
