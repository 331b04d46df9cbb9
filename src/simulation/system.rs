//! The simulated population and its per-tick pipeline
//!
//! A tick runs, always in this order:
//! force evaluation → integration → moon coupling → planetary perturbation
//! → eccentricity clamp → grid rebuild.
//!
//! Force evaluation and integration are fan-out/fan-in barriers on the
//! system's rayon pool; the rest is sequential. Everything up to the clamp
//! works on a staged copy of the bodies, which is committed only if no
//! phase faulted, so observers never see half a tick.

use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::error::{SimError, SimResult};
use crate::simulation::corrector::{correct_eccentricity, perturb_planets};
use crate::simulation::engine::Engine;
use crate::simulation::forces::ForcePipeline;
use crate::simulation::grid::SpatialGrid;
use crate::simulation::integrator::{carry_moons, check_finite, couple_moons, integrate_bodies};
use crate::simulation::params::Parameters;
use crate::simulation::states::{Body, BodyKind, NVec3};
use crate::simulation::vector::VectorExt;

/// Counters from one completed tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickStats {
    pub pairs: usize, // pair interactions evaluated
    pub clamped: usize, // bodies outside the grid extent after rebuild
    pub corrected: usize, // planets circularized by the eccentricity clamp
}

pub struct System {
    bodies: Vec<Body>,
    grid: SpatialGrid,
    params: Parameters,
    pipeline: ForcePipeline,
    pool: ThreadPool,
    t: f64, // simulated seconds elapsed
    ticks: u64,
}

impl System {
    /// Build a system from an initial population
    ///
    /// Moons in `bodies` must already point at a planet that lists them;
    /// use [`System::add_moon`] to attach moons incrementally instead.
    pub fn construct(bodies: Vec<Body>, engine: &Engine, params: Parameters) -> SimResult<Self> {
        if !(engine.grid_size.is_finite() && engine.grid_size > 0.0) {
            return Err(SimError::config(format!("grid size must be positive, got {}", engine.grid_size)));
        }
        if engine.cell_count == 0 {
            return Err(SimError::config("cell count must be at least 1"));
        }
        for body in &bodies {
            body.validate()?;
        }
        check_moon_links(&bodies)?;

        let pool = ThreadPoolBuilder::new()
            .num_threads(engine.threads)
            .thread_name(|i| format!("orrery-worker-{i}"))
            .build()?;

        let mut grid = SpatialGrid::new(engine.grid_size, engine.cell_count);
        let clamped = grid.rebuild(&bodies);
        if clamped > 0 {
            tracing::warn!(clamped, grid_size = engine.grid_size, "bodies start outside the grid extent and will be clamped into boundary cells");
        }
        tracing::info!(bodies = bodies.len(), threads = pool.current_num_threads(), cells = engine.cell_count, "system constructed");

        Ok(Self {
            pipeline: ForcePipeline::from_params(&params),
            bodies,
            grid,
            params,
            pool,
            t: 0.0,
            ticks: 0,
        })
    }

    /// Append a body and bucket it immediately. Returns its arena index.
    pub fn add_body(&mut self, body: Body) -> SimResult<usize> {
        body.validate()?;
        if body.is_moon() {
            return Err(SimError::invalid_body(body.name.as_deref(), "moons must be attached with add_moon"));
        }
        let index = self.bodies.len();
        self.grid.insert(index, &body);
        self.bodies.push(body);
        Ok(index)
    }

    /// Attach `moon` to the planet at `planet`, placing it on its orbit
    pub fn add_moon(&mut self, planet: usize, mut moon: Body) -> SimResult<usize> {
        moon.validate()?;
        match self.bodies.get(planet) {
            Some(p) if p.is_planet() => {}
            _ => return Err(SimError::UnknownPlanet(planet)),
        }
        let (parent_mass, parent_position) = (self.bodies[planet].m, self.bodies[planet].x);

        let BodyKind::Moon(orbit) = &mut moon.kind else {
            return Err(SimError::invalid_body(moon.name.as_deref(), "add_moon needs a moon"));
        };
        orbit.parent = planet;
        orbit.parent_mass = parent_mass;
        orbit.parent_position = parent_position;
        moon.x = orbit.flat_position();

        let index = self.bodies.len();
        self.bodies.push(moon);
        if let BodyKind::Planet { moons } = &mut self.bodies[planet].kind {
            moons.push(index);
        }
        Ok(index)
    }

    /// Advance the whole system by `dt` simulated seconds
    ///
    /// On error the system is left exactly as it was before the call.
    pub fn tick(&mut self, dt: f64) -> SimResult<TickStats> {
        if !dt.is_finite() {
            return Err(SimError::config(format!("time step must be finite, got {dt}")));
        }
        let _span = tracing::trace_span!("tick", n = self.ticks).entered();

        // force barrier
        let mut forces = vec![NVec3::zeros(); self.bodies.len()];
        let pairs = {
            let (pipeline, bodies, grid) = (&self.pipeline, &self.bodies, &self.grid);
            self.pool.install(|| pipeline.accumulate_forces(bodies, grid, &mut forces))
        };
        if let Some(index) = forces.iter().position(|f| !f.all_finite()) {
            return Err(SimError::NonFiniteState { index, quantity: "force", phase: "force evaluation" });
        }

        // integration barrier on a staged copy
        let mut next = self.bodies.clone();
        self.pool.install(|| -> SimResult<()> {
            integrate_bodies(&mut next, &forces, dt)?;
            carry_moons(&mut next, dt)
        })?;

        couple_moons(&mut next, dt);
        perturb_planets(&mut next, &self.params, dt);
        let corrected = correct_eccentricity(&mut next, &self.params);

        for (i, body) in next.iter().enumerate() {
            check_finite(i, body, "correction")?;
        }

        self.bodies = next;
        let clamped = self.grid.rebuild(&self.bodies);
        self.t += dt;
        self.ticks += 1;

        let stats = TickStats { pairs, clamped, corrected };
        tracing::trace!(?stats, t = self.t, "tick complete");
        Ok(stats)
    }

    /// Read-only view of every body in insertion order
    pub fn snapshot(&self) -> &[Body] {
        &self.bodies
    }

    pub fn body(&self, index: usize) -> Option<&Body> {
        self.bodies.get(index)
    }

    /// Bodies whose x/y position falls inside the viewport rectangle
    ///
    /// The rectangle starts at `((cx - w/2)/scale, (cy - h/2)/scale)` and
    /// spans `(w/scale, h/scale)`; edges are inclusive.
    pub fn visible_subset(&self, center: (f64, f64), size: (f64, f64), scale: f64) -> Vec<&Body> {
        let (cx, cy) = center;
        let (w, h) = size;
        let left = (cx - w / 2.0) / scale;
        let top = (cy - h / 2.0) / scale;
        let (width, height) = (w / scale, h / scale);

        self.bodies
            .iter()
            .filter(|b| b.x.x >= left && b.x.x <= left + width && b.x.y >= top && b.x.y <= top + height)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Simulated seconds elapsed
    pub fn time(&self) -> f64 {
        self.t
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn grid(&self) -> &SpatialGrid {
        &self.grid
    }

    pub fn params(&self) -> &Parameters {
        &self.params
    }
}

fn check_moon_links(bodies: &[Body]) -> SimResult<()> {
    for (i, body) in bodies.iter().enumerate() {
        if let Some(orbit) = body.moon_orbit() {
            let owned = bodies
                .get(orbit.parent)
                .is_some_and(|p| p.is_planet() && p.moons().contains(&i));
            if !owned {
                return Err(SimError::UnknownPlanet(orbit.parent));
            }
        }
        for &m in body.moons() {
            if !bodies.get(m).is_some_and(Body::is_moon) {
                return Err(SimError::invalid_body(body.name.as_deref(), format!("moon index {m} is not a moon")));
            }
        }
    }
    Ok(())
}
