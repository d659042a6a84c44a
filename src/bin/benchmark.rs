//! Benchmark Binary
//!
//! Compares ε-scaling against the plain Sinkhorn loop, on dense and lazy
//! costs, between a sphere and a random cloud.
//!
//! Options: --source, --target, --blur, --maxtime, --decimation, --seed, --output

use anyhow::Context;
use clap::Parser;
use otbench::benchmark::Suite;
use otbench::transport::Measure;
use rand::SeedableRng;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(author, version, about = "Time-vs-accuracy benchmark of entropic OT solvers", long_about = None)]
struct Args {
    #[arg(long, default_value_t = 1000, help = "Points sampled on the unit sphere")]
    source: usize,
    #[arg(long, default_value_t = 1000, help = "Random weighted points in the [-1, 1]³ cube")]
    target: usize,
    #[arg(long, default_value_t = otbench::SINKHORN_BLUR, help = "Blur scale σ, with ε = σ²")]
    blur: f64,
    #[arg(long, default_value_t = otbench::BENCHMARK_MAXTIME, help = "Seconds per solver family")]
    maxtime: f64,
    #[arg(long, default_value_t = 1, help = "Keep every k-th point of each cloud")]
    decimation: usize,
    #[arg(long, default_value_t = 0)]
    seed: u64,
    #[arg(long, help = "Write the JSON report to this path")]
    output: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    otbench::log()?;
    let args = Args::parse();
    let ref mut rng = rand::rngs::SmallRng::seed_from_u64(args.seed);
    let x = Measure::sphere(args.source)
        .and_then(|m| m.subsample(args.decimation))
        .context("build source measure")?;
    let y = Measure::scatter(args.target, otbench::ARBITRARY_DIMENSION, rng)
        .and_then(|m| m.subsample(args.decimation))
        .context("build target measure")?;
    let maxtime = Duration::try_from_secs_f64(args.maxtime).context("invalid --maxtime")?;
    let report = Suite::new(args.blur, Some(maxtime))
        .run(&x, &y)
        .context("run benchmark suite")?;
    log::info!("\n{}", report);
    if let Some(path) = args.output {
        let json = report.to_json().context("serialize report")?;
        std::fs::write(&path, json).with_context(|| format!("write {}", path.display()))?;
        log::info!("{:<32}{}", "report written to", path.display());
    }
    Ok(())
}
