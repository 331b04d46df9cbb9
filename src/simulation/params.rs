//! Physical constants and numerical parameters for the simulation
//!
//! `Parameters` holds the runtime tunables:
//! - minimum separation used to keep `1/d²` finite,
//! - eccentricity threshold for the orbit clamp,
//! - whether the pairwise law carries the relativistic factors,
//! - whether the planetary perturbation kick is scaled by `dt`,
//! - whether the eccentricity clamp uses the circular speed

/// Gravitational constant (m³ kg⁻¹ s⁻²)
pub const G: f64 = 6.67430e-11;

/// Speed of light (m/s)
pub const C: f64 = 299792458.0;

/// Astronomical unit (m)
pub const AU: f64 = 1.496e11;

#[derive(Debug, Clone)]
pub struct Parameters {
    pub min_separation: f64, // clamp for coincident bodies (m)
    pub eccentricity_threshold: f64, // clamp fires above this
    pub relativistic: bool, // false = plain Newtonian pair law
    pub perturbation_dt: bool, // true = v += F/m * dt instead of v += F/m
    pub circular_clamp: bool, // true = clamp sets sqrt(mu/r) instead of the vis-viva speed
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            min_separation: 1.0,
            eccentricity_threshold: 0.2,
            relativistic: true,
            perturbation_dt: false,
            circular_clamp: false,
        }
    }
}
