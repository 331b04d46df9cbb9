//! Planet-only correction passes run after integration
//!
//! 1. Mutual perturbation: every unordered planet pair exchanges a
//!    Newtonian velocity kick.
//! 2. Eccentricity clamp: a planet whose osculating orbit around the star
//!    has `e` above the threshold gets its velocity turned perpendicular to
//!    the radius vector, inside its current orbital plane.

use crate::simulation::forces::{ForceLaw, NewtonianGravity};
use crate::simulation::params::{Parameters, G};
use crate::simulation::states::{Body, NVec3};
use crate::simulation::vector::VectorExt;

/// Apply the pairwise planetary kick
///
/// The kick is `v += F/m` with no time step unless `params.perturbation_dt`
/// is set, in which case it becomes `v += F/m * dt`.
pub fn perturb_planets(bodies: &mut [Body], params: &Parameters, dt: f64) {
    let planets: Vec<usize> = (0..bodies.len()).filter(|&i| bodies[i].is_planet()).collect();
    let law = NewtonianGravity { G, min_separation: params.min_separation };
    let scale = if params.perturbation_dt { dt } else { 1.0 };

    for (k, &i) in planets.iter().enumerate() {
        for &j in &planets[k + 1..] {
            let force = law.force(&bodies[i], &bodies[j]);
            let (mi, mj) = (bodies[i].m, bodies[j].m);
            bodies[i].v += force / mi * scale;
            bodies[j].v -= force / mj * scale;
        }
    }
}

/// Semi-major axis and eccentricity of the two-body orbit with
/// gravitational parameter `mu = G·M`, relative position `r` and velocity `v`
pub fn orbital_elements(r: &NVec3, v: &NVec3, mu: f64) -> (f64, f64) {
    let a = 1.0 / (2.0 / r.norm() - v.norm_squared() / mu);
    let e = (v.cross(&r.cross(v)) / mu - r.normalize_or_zero()).norm();
    (a, e)
}

/// Circularize planets whose eccentricity exceeds the threshold.
/// Returns how many planets were corrected.
///
/// The new velocity is perpendicular to the radius inside the orbital plane.
/// Its magnitude is the vis-viva speed for the current semi-major axis, which
/// equals the old speed, so the result is `e = |r·v²/mu - 1|` and only stays
/// under the threshold for near-circular speeds. `params.circular_clamp`
/// uses the circular speed `sqrt(mu/r)` instead, which always lands at `e ≈ 0`.
pub fn correct_eccentricity(bodies: &mut [Body], params: &Parameters) -> usize {
    let Some(star) = bodies.iter().position(Body::is_star) else {
        return 0;
    };
    let (star_mass, star_position) = (bodies[star].m, bodies[star].x);
    let mu = G * star_mass;
    let mut corrected = 0;

    for planet in bodies.iter_mut().filter(|b| b.is_planet()) {
        let r = planet.x - star_position;
        let v = planet.v;
        let (a, e) = orbital_elements(&r, &v, mu);
        if e <= params.eccentricity_threshold {
            continue;
        }

        let direction = r.cross(&v).normalize_or_zero().cross(&r.normalize_or_zero());
        if direction.norm_squared() == 0.0 {
            // purely radial motion has no orbital plane to circularize in
            tracing::warn!(planet = ?planet.name, e, "eccentricity clamp skipped, degenerate orbital plane");
            continue;
        }
        let speed = if params.circular_clamp {
            (mu / r.norm()).sqrt()
        } else {
            (mu * (2.0 / r.norm() - 1.0 / a)).max(0.0).sqrt()
        };
        planet.v = direction * speed;
        corrected += 1;
        tracing::debug!(planet = ?planet.name, e, "eccentricity clamp applied");
    }
    corrected
}
