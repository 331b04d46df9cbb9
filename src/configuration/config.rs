//! Configuration types for loading scenarios from YAML.
//!
//! A scenario consists of:
//!
//! - [`EngineConfig`]     – grid geometry and worker-pool size
//! - [`ParametersConfig`] – numerical tunables (all optional)
//! - [`RunConfig`]        – frame count, frame step and time scale for the CLI
//! - [`StarConfig`], [`PlanetConfig`], [`MoonConfig`] – the explicit bodies
//! - [`BeltConfig`]       – generated asteroid belts
//!
//! # YAML format
//!
//! ```yaml
//! seed: 42
//! engine:
//!   grid_size: 1.0e12       # side of the grid extent (m)
//!   cell_count: 10
//!   threads: 4              # optional, defaults to the CPU count
//! parameters:
//!   eccentricity_threshold: 0.2
//!   perturbation_dt: false
//!   circular_clamp: false
//! run:
//!   frames: 600
//!   frame_dt: 0.016
//!   time_scale: 86400.0
//! star:
//!   name: Sun
//!   m: 1.989e30
//!   radius: 696340.0e3
//! planets:
//!   - name: Earth
//!     m: 5.97237e24
//!     radius: 6371.0e3
//!     x: [149.6e9, 0.0, 0.0]
//!     v: [0.0, 29.78e3, 0.0]
//!     moons:
//!       - name: Moon
//!         m: 7.342e22
//!         radius: 1737.1e3
//!         orbit_radius: 384400.0e3
//! belts:
//!   - inner_au: 2.2
//!     outer_au: 3.2
//!     count: 1000
//! ```

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;

use crate::error::SimResult;

/// Grid and worker-pool configuration
#[derive(Deserialize, Debug, Clone)]
pub struct EngineConfig {
    pub grid_size: f64, // side of the square grid extent, centered at the origin
    pub cell_count: usize, // cells per side
    pub threads: Option<usize>, // worker pool size, CPU count when absent
}

/// Numerical tunables, each falling back to its default when absent
#[derive(Deserialize, Debug, Clone, Default)]
pub struct ParametersConfig {
    pub min_separation: Option<f64>, // clamp for coincident bodies (m)
    pub eccentricity_threshold: Option<f64>,
    pub relativistic: Option<bool>, // false drops the relativistic factors
    pub perturbation_dt: Option<bool>, // true scales the planetary kick by dt
    pub circular_clamp: Option<bool>, // true clamps to the circular speed
}

/// Frame driver settings used by the binary
#[derive(Deserialize, Debug, Clone)]
pub struct RunConfig {
    pub frames: u64, // number of ticks to run
    pub frame_dt: f64, // wall-clock seconds per frame
    #[serde(default = "default_time_scale")]
    pub time_scale: f64, // simulated seconds per wall-clock second
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            frames: 600,
            frame_dt: 1.0 / 60.0,
            time_scale: default_time_scale(),
        }
    }
}

fn default_time_scale() -> f64 {
    86400.0
}

#[derive(Deserialize, Debug, Clone)]
pub struct StarConfig {
    pub name: String,
    pub m: f64,
    pub radius: f64,
    #[serde(default = "origin")]
    pub x: Vec<f64>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct PlanetConfig {
    pub name: String,
    pub m: f64,
    pub radius: f64,
    pub x: Vec<f64>, // initial position (m)
    pub v: Vec<f64>, // initial velocity (m/s)
    #[serde(default)]
    pub inclination: f64, // degrees, rotates x and v about the +X axis
    #[serde(default)]
    pub moons: Vec<MoonConfig>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct MoonConfig {
    pub name: String,
    pub m: f64,
    pub radius: f64,
    pub orbit_radius: f64, // distance from the parent planet (m)
    #[serde(default)]
    pub orbit_angle: f64, // starting angle (rad)
    #[serde(default = "origin")]
    pub v: Vec<f64>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct BeltConfig {
    pub inner_au: f64,
    pub outer_au: f64,
    pub count: usize,
    #[serde(default = "default_density")]
    pub density: f64, // kg/m³
}

fn default_density() -> f64 {
    3000.0
}

fn origin() -> Vec<f64> {
    vec![0.0, 0.0, 0.0]
}

/// Top-level scenario configuration loaded from YAML
#[derive(Deserialize, Debug, Clone)]
pub struct ScenarioConfig {
    #[serde(default)]
    pub seed: u64, // seeds belt generation
    pub engine: EngineConfig,
    #[serde(default)]
    pub parameters: ParametersConfig,
    #[serde(default)]
    pub run: RunConfig,
    pub star: StarConfig,
    #[serde(default)]
    pub planets: Vec<PlanetConfig>,
    #[serde(default)]
    pub belts: Vec<BeltConfig>,
}

impl ScenarioConfig {
    pub fn from_yaml_str(s: &str) -> SimResult<Self> {
        Ok(serde_yaml::from_str(s)?)
    }

    pub fn from_file(path: &Path) -> SimResult<Self> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        Ok(serde_yaml::from_reader(reader)?)
    }
}
