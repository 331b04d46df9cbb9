//! Error types for the simulation core
//!
//! Every fallible operation in the library returns `SimResult<T>`.
//! The binary wraps these in `anyhow` at the top level.

use thiserror::Error;

/// Result alias used throughout the crate
pub type SimResult<T> = Result<T, SimError>;

#[derive(Debug, Error)]
pub enum SimError {
    /// A body failed validation at construction or generation time
    #[error("invalid body{}: {reason}", name_suffix(.name))]
    InvalidBody {
        name: Option<String>,
        reason: String,
    },

    /// A parallel phase produced a NaN or infinite value; the tick was aborted
    #[error("non-finite {quantity} for body {index} during {phase}")]
    NonFiniteState {
        index: usize,
        quantity: &'static str,
        phase: &'static str,
    },

    /// Moon attached to an index that is not a planet
    #[error("body {0} is not a planet")]
    UnknownPlanet(usize),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("worker pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl SimError {
    pub fn invalid_body(name: Option<&str>, reason: impl Into<String>) -> Self {
        Self::InvalidBody {
            name: name.map(str::to_owned),
            reason: reason.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

fn name_suffix(name: &Option<String>) -> String {
    match name {
        Some(n) => format!(" '{n}'"),
        None => String::new(),
    }
}
