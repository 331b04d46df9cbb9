pub mod states;
pub mod vector;
pub mod params;
pub mod engine;
pub mod grid;
pub mod forces;
pub mod integrator;
pub mod corrector;
pub mod belt;
pub mod system;
pub mod time_scale;
pub mod scenario;
