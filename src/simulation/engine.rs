//! Runtime engine settings
//!
//! Grid geometry and worker-pool size used when building a `System`

#[derive(Debug, Clone)]
pub struct Engine {
    pub grid_size: f64, // side of the square grid extent (m), centered at the origin
    pub cell_count: usize, // cells per side
    pub threads: usize, // worker pool size
}

impl Default for Engine {
    fn default() -> Self {
        Self {
            grid_size: 1e12,
            cell_count: 10,
            threads: num_cpus::get(),
        }
    }
}
