pub mod simulation;
pub mod configuration;
pub mod benchmark;
pub mod error;

pub use simulation::states::{Body, BodyKind, MoonOrbit, NVec3};
pub use simulation::vector::VectorExt;
pub use simulation::params::{Parameters, AU, C, G};
pub use simulation::engine::Engine;
pub use simulation::grid::SpatialGrid;
pub use simulation::forces::{ForceLaw, ForcePipeline, NewtonianGravity, RelativisticGravity};
pub use simulation::corrector::{correct_eccentricity, orbital_elements, perturb_planets};
pub use simulation::belt::generate_belt;
pub use simulation::system::{System, TickStats};
pub use simulation::time_scale::TimeScale;
pub use simulation::scenario::Scenario;

pub use configuration::config::{EngineConfig, ParametersConfig, RunConfig, ScenarioConfig};

pub use benchmark::benchmark::bench_tick;

pub use error::{SimError, SimResult};
