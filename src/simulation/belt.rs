//! Seeded asteroid-belt generation
//!
//! Bodies are placed uniformly in an annulus around the origin with a small
//! vertical jitter and given the circular-orbit speed for their radius.
//! The RNG is passed in so identical seeds give identical belts.

use std::f64::consts::{PI, TAU};

use rand::Rng;

use crate::error::{SimError, SimResult};
use crate::simulation::params::{AU, G};
use crate::simulation::states::{Body, NVec3};

/// Vertical jitter band (m)
pub const Z_JITTER: f64 = 1e10;

/// Asteroid mass range (kg)
pub const MASS_RANGE: (f64, f64) = (1e13, 1e17);

/// Generate `count` asteroids between `inner_au` and `outer_au`
///
/// For each body, in draw order:
/// - orbital radius uniform in `[inner, outer)` AU, converted to meters
/// - angle uniform in `[0, 2π)`
/// - z uniform in `[-Z_JITTER, Z_JITTER)`
/// - mass uniform in `MASS_RANGE`
///
/// Velocity is the tangential circular speed `sqrt(G·M/r)` in the x/y
/// plane; radius assumes a sphere of uniform `density` (kg/m³).
pub fn generate_belt<R: Rng + ?Sized>(
    rng: &mut R,
    inner_au: f64,
    outer_au: f64,
    count: usize,
    central_mass: f64,
    density: f64,
) -> SimResult<Vec<Body>> {
    if !(inner_au.is_finite() && outer_au.is_finite() && inner_au > 0.0 && outer_au >= inner_au) {
        return Err(SimError::config(format!("belt radii must satisfy 0 < inner <= outer, got {inner_au}..{outer_au}")));
    }
    if !(central_mass.is_finite() && central_mass > 0.0) {
        return Err(SimError::invalid_body(None, format!("central mass must be finite and positive, got {central_mass}")));
    }
    if !(density.is_finite() && density > 0.0) {
        return Err(SimError::invalid_body(None, format!("belt density must be finite and positive, got {density}")));
    }

    let mut belt = Vec::with_capacity(count);
    for _ in 0..count {
        let radius_au = inner_au + (outer_au - inner_au) * rng.gen::<f64>();
        let angle = rng.gen::<f64>() * TAU;
        let (sin, cos) = angle.sin_cos();
        let r = radius_au * AU;
        let x = NVec3::new(r * cos, r * sin, rng.gen_range(-Z_JITTER..Z_JITTER));

        let speed = (G * central_mass / r).sqrt();
        let v = NVec3::new(-speed * sin, speed * cos, 0.0);

        let m = rng.gen_range(MASS_RANGE.0..MASS_RANGE.1);
        let radius = sphere_radius(m, density);

        belt.push(Body::asteroid(m, x, v, radius)?);
    }
    Ok(belt)
}

/// Radius of a uniform sphere with mass `m` and density `density`
pub fn sphere_radius(m: f64, density: f64) -> f64 {
    (m / (4.0 / 3.0 * PI * density)).powf(1.0 / 3.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaChaRng;

    #[test]
    fn rejects_bad_inputs() {
        let mut rng = ChaChaRng::seed_from_u64(1);
        assert!(generate_belt(&mut rng, 3.0, 2.0, 10, 1.989e30, 3000.0).is_err());
        assert!(generate_belt(&mut rng, 2.0, 3.0, 10, 0.0, 3000.0).is_err());
        assert!(generate_belt(&mut rng, 2.0, 3.0, 10, 1.989e30, f64::NAN).is_err());
    }

    #[test]
    fn empty_belt_is_fine() {
        let mut rng = ChaChaRng::seed_from_u64(1);
        assert!(generate_belt(&mut rng, 2.0, 3.0, 0, 1.989e30, 3000.0).unwrap().is_empty());
    }

    #[test]
    fn thin_annulus_puts_everything_on_one_radius() {
        let mut rng = ChaChaRng::seed_from_u64(9);
        let belt = generate_belt(&mut rng, 5.0, 5.0, 50, 1.989e30, 2000.0).unwrap();
        for b in &belt {
            let r = (b.x.x * b.x.x + b.x.y * b.x.y).sqrt();
            assert!((r - 5.0 * AU).abs() / (5.0 * AU) < 1e-12);
        }
    }
}
