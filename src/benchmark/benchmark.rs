use std::time::Instant;

use rand::SeedableRng;
use rand_chacha::ChaChaRng;

use crate::error::SimResult;
use crate::simulation::belt::generate_belt;
use crate::simulation::engine::Engine;
use crate::simulation::params::Parameters;
use crate::simulation::states::{Body, NVec3};
use crate::simulation::system::System;

const SUN_MASS: f64 = 1.989e30;

/// Helper to build a Sun plus an `n`-body main belt
fn make_system(n: usize, cell_count: usize) -> SimResult<System> {
    let mut rng = ChaChaRng::seed_from_u64(42);
    let mut bodies = vec![Body::star("Sun", SUN_MASS, NVec3::zeros(), 696340e3)?];
    bodies.extend(generate_belt(&mut rng, 2.2, 3.2, n, SUN_MASS, 3000.0)?);

    let engine = Engine {
        grid_size: 1e12,
        cell_count,
        ..Engine::default()
    };
    System::construct(bodies, &engine, Parameters::default())
}

/// Time one-day ticks for growing belts at two grid resolutions
/// Paste output directly into a spreadsheet to graph
pub fn bench_tick() -> SimResult<()> {
    println!("N,cells,ms_per_tick,pairs_per_tick");

    for n in [500, 1000, 2000, 4000, 8000, 16000] {
        // coarse grid sees more neighbors, fine grid drops more of the field
        for cells in [10, 40] {
            let mut sys = make_system(n, cells)?;
            // small N: average over a few ticks to smooth noise
            let steps = if n <= 2000 { 5 } else { 2 };

            // warm-up
            sys.tick(86400.0)?;

            let t0 = Instant::now();
            let mut pairs = 0;
            for _ in 0..steps {
                pairs += sys.tick(86400.0)?.pairs;
            }
            let ms = t0.elapsed().as_secs_f64() * 1000.0 / steps as f64;

            println!("{},{},{:.6},{}", n, cells, ms, pairs / steps);
        }
    }
    Ok(())
}
