use orrery::{bench_tick, Scenario, ScenarioConfig};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

#[derive(Parser, Debug)]
struct Args {
    /// Scenario file under scenarios/
    #[arg(short, default_value = "solar_system.yaml")]
    file_name: String,

    /// Override the number of frames from the scenario
    #[arg(long)]
    frames: Option<u64>,

    /// Write the final snapshot as YAML
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Run the tick timing harness instead of a scenario
    #[arg(long)]
    bench: bool,
}

// load here to keep main clean
fn load_scenario_from_yaml(file_name: &str) -> Result<ScenarioConfig> {
    let config_path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios").join(file_name);
    ScenarioConfig::from_file(&config_path).with_context(|| format!("failed to load scenario {}", config_path.display()))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    if args.bench {
        bench_tick()?;
        return Ok(());
    }

    let scenario_cfg = load_scenario_from_yaml(&args.file_name)?;
    let mut scenario = Scenario::build_scenario(scenario_cfg)?;
    let frames = args.frames.unwrap_or(scenario.frames);
    let dt = scenario.time_scale.scaled(scenario.frame_dt);
    let report_every = (frames / 10).max(1);

    tracing::info!(frames, dt, time_scale = scenario.time_scale.multiplier(), "running");

    for frame in 0..frames {
        // a faulted tick leaves the last good state in place; stop advancing time
        let stats = match scenario.system.tick(dt) {
            Ok(stats) => stats,
            Err(e) => {
                tracing::error!(frame, error = %e, "tick aborted, halting");
                break;
            }
        };
        if (frame + 1) % report_every == 0 {
            tracing::info!(
                frame = frame + 1,
                days = scenario.system.time() / 86400.0,
                pairs = stats.pairs,
                clamped = stats.clamped,
                corrected = stats.corrected,
                "progress"
            );
        }
    }

    if let Some(path) = args.output {
        let writer = BufWriter::new(File::create(&path)?);
        serde_yaml::to_writer(writer, scenario.system.snapshot())?;
        tracing::info!(path = %path.display(), "snapshot written");
    }

    Ok(())
}
