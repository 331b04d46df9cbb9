//! Build a fully-initialized simulation from configuration
//!
//! Takes a `ScenarioConfig` (YAML-facing) and produces a `Scenario`
//! containing:
//! - engine settings (`Engine`)
//! - the constructed `System` (star, planets with moons, belts)
//! - the frame driver settings (`TimeScale`, frame count, frame step)

use rand::SeedableRng;
use rand_chacha::ChaChaRng;

use crate::configuration::config::{PlanetConfig, RunConfig, ScenarioConfig};
use crate::error::{SimError, SimResult};
use crate::simulation::belt::generate_belt;
use crate::simulation::engine::Engine;
use crate::simulation::params::Parameters;
use crate::simulation::states::{Body, NVec3};
use crate::simulation::system::System;
use crate::simulation::time_scale::TimeScale;
use crate::simulation::vector::VectorExt;

pub struct Scenario {
    pub engine: Engine,
    pub system: System,
    pub time_scale: TimeScale,
    pub frames: u64,
    pub frame_dt: f64, // wall-clock seconds per frame
}

impl Scenario {
    pub fn build_scenario(cfg: ScenarioConfig) -> SimResult<Self> {
        // Engine (runtime) from EngineConfig
        let defaults = Engine::default();
        let engine = Engine {
            grid_size: cfg.engine.grid_size,
            cell_count: cfg.engine.cell_count,
            threads: cfg.engine.threads.unwrap_or(defaults.threads),
        };

        // Parameters (runtime) from ParametersConfig
        let p_defaults = Parameters::default();
        let p_cfg = cfg.parameters;
        let parameters = Parameters {
            min_separation: p_cfg.min_separation.unwrap_or(p_defaults.min_separation),
            eccentricity_threshold: p_cfg.eccentricity_threshold.unwrap_or(p_defaults.eccentricity_threshold),
            relativistic: p_cfg.relativistic.unwrap_or(p_defaults.relativistic),
            perturbation_dt: p_cfg.perturbation_dt.unwrap_or(p_defaults.perturbation_dt),
            circular_clamp: p_cfg.circular_clamp.unwrap_or(p_defaults.circular_clamp),
        };

        let star = Body::star(&cfg.star.name, cfg.star.m, to_vec3("star.x", &cfg.star.x)?, cfg.star.radius)?;
        let star_mass = star.m;
        let mut system = System::construct(vec![star], &engine, parameters)?;

        for planet_cfg in &cfg.planets {
            add_planet(&mut system, planet_cfg)?;
        }

        // one seeded stream for every belt, in file order
        let mut rng = ChaChaRng::seed_from_u64(cfg.seed);
        for belt in &cfg.belts {
            let asteroids = generate_belt(&mut rng, belt.inner_au, belt.outer_au, belt.count, star_mass, belt.density)?;
            for asteroid in asteroids {
                system.add_body(asteroid)?;
            }
        }

        let RunConfig { frames, frame_dt, time_scale } = cfg.run;
        if !(frame_dt.is_finite() && frame_dt > 0.0) {
            return Err(SimError::config(format!("frame_dt must be positive, got {frame_dt}")));
        }

        tracing::info!(
            planets = cfg.planets.len(),
            belts = cfg.belts.len(),
            bodies = system.len(),
            seed = cfg.seed,
            "scenario built"
        );

        Ok(Self {
            engine,
            system,
            time_scale: TimeScale::new(time_scale),
            frames,
            frame_dt,
        })
    }
}

fn add_planet(system: &mut System, cfg: &PlanetConfig) -> SimResult<usize> {
    let tilt = cfg.inclination.to_radians();
    let x = to_vec3(&format!("{}.x", cfg.name), &cfg.x)?.rotate_x(tilt);
    let v = to_vec3(&format!("{}.v", cfg.name), &cfg.v)?.rotate_x(tilt);

    let planet = system.add_body(Body::planet(&cfg.name, cfg.m, x, v, cfg.radius)?)?;
    for moon in &cfg.moons {
        let v = to_vec3(&format!("{}.v", moon.name), &moon.v)?;
        let body = Body::moon(&moon.name, moon.m, v, moon.radius, moon.orbit_radius, moon.orbit_angle)?;
        system.add_moon(planet, body)?;
    }
    Ok(planet)
}

fn to_vec3(field: &str, v: &[f64]) -> SimResult<NVec3> {
    match v {
        [x, y, z] => Ok(NVec3::new(*x, *y, *z)),
        _ => Err(SimError::config(format!("{field} needs 3 components, got {}", v.len()))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const YAML: &str = r#"
seed: 3
engine:
  grid_size: 1.0e12
  cell_count: 10
  threads: 2
star:
  name: Sun
  m: 1.989e30
  radius: 696340.0e3
planets:
  - name: Tilted
    m: 5.97237e24
    radius: 6371.0e3
    x: [0.0, 149.6e9, 0.0]
    v: [-29.78e3, 0.0, 0.0]
    inclination: 90.0
    moons:
      - name: Moon
        m: 7.342e22
        radius: 1737.1e3
        orbit_radius: 384400.0e3
belts:
  - inner_au: 2.2
    outer_au: 3.2
    count: 25
"#;

    #[test]
    fn builds_planets_moons_and_belts() {
        let cfg = ScenarioConfig::from_yaml_str(YAML).unwrap();
        let scenario = Scenario::build_scenario(cfg).unwrap();
        let bodies = scenario.system.snapshot();

        assert_eq!(bodies.len(), 1 + 1 + 1 + 25);
        assert!(bodies[0].is_star());
        assert!(bodies[1].is_planet());
        assert_eq!(bodies[1].moons(), &[2]);
        assert!(bodies[2].is_moon());
        assert_eq!(scenario.engine.threads, 2);
    }

    #[test]
    fn inclination_rotates_about_x() {
        let cfg = ScenarioConfig::from_yaml_str(YAML).unwrap();
        let scenario = Scenario::build_scenario(cfg).unwrap();
        let planet = &scenario.system.snapshot()[1];
        // +y rotated 90° about x lands on +z; velocity along x is untouched
        assert_relative_eq!(planet.x.z, 149.6e9, max_relative = 1e-12);
        assert!(planet.x.y.abs() < 1.0);
        assert_eq!(planet.v, NVec3::new(-29.78e3, 0.0, 0.0));
    }

    #[test]
    fn wrong_vector_length_is_a_config_error() {
        let yaml = YAML.replace("x: [0.0, 149.6e9, 0.0]", "x: [0.0, 149.6e9]");
        let cfg = ScenarioConfig::from_yaml_str(&yaml).unwrap();
        assert!(matches!(Scenario::build_scenario(cfg), Err(SimError::Config(_))));
    }
}
