//! Per-variant time integration
//!
//! - Star: never moves
//! - Planet / Asteroid: semi-implicit Euler on the net force
//! - Moon: analytic circular orbit around the cached parent state, plus a
//!   perturbing Euler sub-step
//!
//! A planet's moons are advanced after the planet itself, then pinned back
//! onto the flat circular parametrization around the planet.

use std::f64::consts::TAU;

use rayon::prelude::*;

use crate::error::{SimError, SimResult};
use crate::simulation::params::G;
use crate::simulation::states::{Body, BodyKind, MoonOrbit, NVec3};
use crate::simulation::vector::VectorExt;

impl MoonOrbit {
    /// Period of a circular orbit of `orbit_radius` around `parent_mass`
    pub fn calculate_orbital_period(&self) -> f64 {
        TAU * (self.orbit_radius.powi(3) / (G * self.parent_mass)).sqrt()
    }

    /// Point on the orbit at the current angle, in the parent's x/y plane
    pub fn flat_position(&self) -> NVec3 {
        self.parent_position
            + NVec3::new(
                self.orbit_radius * self.orbit_angle.cos(),
                self.orbit_radius * self.orbit_angle.sin(),
                0.0,
            )
    }
}

impl Body {
    /// Advance this body by `dt` seconds under `force`
    pub fn integrate(&mut self, force: NVec3, dt: f64) {
        match &mut self.kind {
            BodyKind::Star => {}
            BodyKind::Planet { .. } | BodyKind::Asteroid => {
                newtonian_step(&mut self.x, &mut self.v, self.m, force, dt);
            }
            BodyKind::Moon(orbit) => {
                moon_step(orbit, &mut self.x, &mut self.v, self.m, force, dt);
            }
        }
    }
}

/// a = F/m; v += a·dt; x += v·dt
fn newtonian_step(x: &mut NVec3, v: &mut NVec3, m: f64, force: NVec3, dt: f64) {
    let a = force / m;
    *v += a * dt;
    *x += *v * dt;
}

fn moon_step(orbit: &mut MoonOrbit, x: &mut NVec3, v: &mut NVec3, m: f64, force: NVec3, dt: f64) {
    let period = orbit.calculate_orbital_period();
    let angular_velocity = TAU / period;
    orbit.orbit_angle = (orbit.orbit_angle + angular_velocity * dt).rem_euclid(TAU);

    let (sin, cos) = orbit.orbit_angle.sin_cos();
    *x = NVec3::new(
        orbit.parent_position.x + orbit.orbit_radius * cos,
        orbit.parent_position.y + orbit.orbit_radius * sin,
        orbit.parent_position.z,
    );

    let speed = (G * orbit.parent_mass / orbit.orbit_radius).sqrt();
    *v = NVec3::new(-speed * sin, speed * cos, 0.0);

    *v += force / m * dt;
    *x += *v * dt;
}

/// Integration barrier: one task per body
///
/// Moons are skipped here; their planet drives them in [`carry_moons`].
/// Fails on the first body whose new state is not finite.
pub fn integrate_bodies(bodies: &mut [Body], forces: &[NVec3], dt: f64) -> SimResult<()> {
    bodies
        .par_iter_mut()
        .zip(forces.par_iter())
        .enumerate()
        .try_for_each(|(i, (body, &force))| {
            if body.is_moon() {
                return Ok(());
            }
            body.integrate(force, dt);
            check_finite(i, body, "integrate")
        })
}

/// Second half of a planet's integrate: advance each owned moon with zero
/// force around the planet's new position, then pin it to the flat orbit
pub fn carry_moons(bodies: &mut [Body], dt: f64) -> SimResult<()> {
    let anchors: Vec<(f64, NVec3)> = bodies.iter().map(|b| (b.m, b.x)).collect();

    bodies
        .par_iter_mut()
        .enumerate()
        .try_for_each(|(i, body)| {
            let m = body.m;
            let BodyKind::Moon(orbit) = &mut body.kind else {
                return Ok(());
            };
            let (parent_mass, parent_position) = anchors[orbit.parent];
            orbit.parent_mass = parent_mass;
            orbit.parent_position = parent_position;

            moon_step(orbit, &mut body.x, &mut body.v, m, NVec3::zeros(), dt);
            body.x = orbit.flat_position();
            check_finite(i, body, "integrate")
        })
}

/// Planet-to-moon Newtonian nudge applied once per tick after integration
pub fn couple_moons(bodies: &mut [Body], dt: f64) {
    for p in 0..bodies.len() {
        if !bodies[p].is_planet() {
            continue;
        }
        let (planet_mass, planet_position) = (bodies[p].m, bodies[p].x);
        let moons = bodies[p].moons().to_vec();

        for i in moons {
            let moon = &mut bodies[i];
            // toward the planet
            let dr = planet_position - moon.x;
            let force = G * planet_mass * moon.m / dr.norm_squared();
            let acceleration = dr.normalize_or_zero() * force / moon.m;
            moon.v += acceleration * dt;
            moon.x += moon.v * dt;
        }
    }
}

pub(crate) fn check_finite(index: usize, body: &Body, phase: &'static str) -> SimResult<()> {
    if !body.x.all_finite() {
        return Err(SimError::NonFiniteState { index, quantity: "position", phase });
    }
    if !body.v.all_finite() {
        return Err(SimError::NonFiniteState { index, quantity: "velocity", phase });
    }
    Ok(())
}
