//! Core state types for the simulation.
//!
//! A `Body` is one shared kinematic record plus a `BodyKind` tag. Bodies
//! live in a flat arena (`Vec<Body>`) owned by the `System`; planets refer
//! to their moons by arena index and moons keep their parent's index plus a
//! cached copy of the parent's mass and position.

use nalgebra::Vector3;
use serde::Serialize;

use crate::error::{SimError, SimResult};
use crate::simulation::vector::VectorExt;

pub type NVec3 = Vector3<f64>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Body {
    pub name: Option<String>, // display name, None for generated asteroids
    pub x: NVec3, // position
    pub v: NVec3, // velocity
    pub m: f64, // mass
    pub radius: f64, // physical radius
    pub kind: BodyKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum BodyKind {
    /// Immobile anchor, ignores its net force
    Star,
    /// Owns its moons by arena index
    Planet { moons: Vec<usize> },
    Moon(MoonOrbit),
    Asteroid,
}

/// Circular-orbit state of a moon around its parent planet
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoonOrbit {
    pub parent: usize, // arena index of the owning planet
    pub orbit_radius: f64,
    pub orbit_angle: f64, // [0, 2π)
    pub parent_mass: f64, // refreshed every tick
    pub parent_position: NVec3, // refreshed every tick
}

impl Body {
    pub fn star(name: &str, m: f64, x: NVec3, radius: f64) -> SimResult<Self> {
        Self::validated(Some(name.to_owned()), x, NVec3::zeros(), m, radius, BodyKind::Star)
    }

    pub fn planet(name: &str, m: f64, x: NVec3, v: NVec3, radius: f64) -> SimResult<Self> {
        Self::validated(Some(name.to_owned()), x, v, m, radius, BodyKind::Planet { moons: Vec::new() })
    }

    /// A moon not yet attached to a planet. `System::add_moon` fills in the
    /// parent link and places it on its orbit.
    pub fn moon(name: &str, m: f64, v: NVec3, radius: f64, orbit_radius: f64, orbit_angle: f64) -> SimResult<Self> {
        if !(orbit_radius.is_finite() && orbit_radius > 0.0) {
            return Err(SimError::invalid_body(Some(name), format!("orbit radius must be finite and positive, got {orbit_radius}")));
        }
        if !orbit_angle.is_finite() {
            return Err(SimError::invalid_body(Some(name), "orbit angle is not finite"));
        }
        let orbit = MoonOrbit {
            parent: usize::MAX,
            orbit_radius,
            orbit_angle: orbit_angle.rem_euclid(std::f64::consts::TAU),
            parent_mass: 0.0,
            parent_position: NVec3::zeros(),
        };
        Self::validated(Some(name.to_owned()), NVec3::zeros(), v, m, radius, BodyKind::Moon(orbit))
    }

    pub fn asteroid(m: f64, x: NVec3, v: NVec3, radius: f64) -> SimResult<Self> {
        Self::validated(None, x, v, m, radius, BodyKind::Asteroid)
    }

    fn validated(name: Option<String>, x: NVec3, v: NVec3, m: f64, radius: f64, kind: BodyKind) -> SimResult<Self> {
        let body = Body { name, x, v, m, radius, kind };
        body.validate()?;
        Ok(body)
    }

    /// Reject non-finite or non-physical state
    pub fn validate(&self) -> SimResult<()> {
        let name = self.name.as_deref();
        if !(self.m.is_finite() && self.m > 0.0) {
            return Err(SimError::invalid_body(name, format!("mass must be finite and positive, got {}", self.m)));
        }
        if !(self.radius.is_finite() && self.radius >= 0.0) {
            return Err(SimError::invalid_body(name, format!("radius must be finite and non-negative, got {}", self.radius)));
        }
        if !self.x.all_finite() {
            return Err(SimError::invalid_body(name, "position is not finite"));
        }
        if !self.v.all_finite() {
            return Err(SimError::invalid_body(name, "velocity is not finite"));
        }
        Ok(())
    }

    pub fn is_star(&self) -> bool {
        matches!(self.kind, BodyKind::Star)
    }

    pub fn is_planet(&self) -> bool {
        matches!(self.kind, BodyKind::Planet { .. })
    }

    pub fn is_moon(&self) -> bool {
        matches!(self.kind, BodyKind::Moon(_))
    }

    pub fn moon_orbit(&self) -> Option<&MoonOrbit> {
        match &self.kind {
            BodyKind::Moon(orbit) => Some(orbit),
            _ => None,
        }
    }

    pub fn moons(&self) -> &[usize] {
        match &self.kind {
            BodyKind::Planet { moons } => moons,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_positive_mass() {
        let err = Body::asteroid(0.0, NVec3::zeros(), NVec3::zeros(), 1.0).unwrap_err();
        assert!(matches!(err, SimError::InvalidBody { .. }));

        let err = Body::planet("Nowhere", -1.0, NVec3::zeros(), NVec3::zeros(), 1.0).unwrap_err();
        assert!(err.to_string().contains("Nowhere"));
    }

    #[test]
    fn rejects_non_finite_state() {
        assert!(Body::asteroid(1.0, NVec3::new(f64::NAN, 0.0, 0.0), NVec3::zeros(), 1.0).is_err());
        assert!(Body::asteroid(1.0, NVec3::zeros(), NVec3::new(0.0, f64::INFINITY, 0.0), 1.0).is_err());
        assert!(Body::asteroid(1.0, NVec3::zeros(), NVec3::zeros(), f64::NAN).is_err());
        assert!(Body::asteroid(1.0, NVec3::zeros(), NVec3::zeros(), -2.0).is_err());
    }

    #[test]
    fn moon_needs_positive_orbit_radius() {
        assert!(Body::moon("Moon", 7.342e22, NVec3::zeros(), 1737.1e3, 0.0, 0.0).is_err());
        let moon = Body::moon("Moon", 7.342e22, NVec3::zeros(), 1737.1e3, 384400e3, -0.5).unwrap();
        let orbit = moon.moon_orbit().unwrap();
        assert!(orbit.orbit_angle >= 0.0 && orbit.orbit_angle < std::f64::consts::TAU);
    }

    #[test]
    fn star_starts_at_rest() {
        let sun = Body::star("Sun", 1.989e30, NVec3::zeros(), 696340e3).unwrap();
        assert!(sun.is_star());
        assert_eq!(sun.v, NVec3::zeros());
        assert!(sun.moons().is_empty());
    }
}
