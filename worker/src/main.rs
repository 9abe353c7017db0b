//! PetriWorld Worker Demo
//!
//! Drives a full protocol session against a spawned worker: initialize,
//! a batch run with progress reporting, then terminate.

use anyhow::Result;
use serde_json::json;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use worker::{Envelope, ResponseBody};

fn main() -> Result<()> {
    // Initialize tracing
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("PetriWorld worker starting...");
    let handle = worker::spawn();

    // The worker announces itself before serving anything.
    match handle.recv().map(|r| r.body) {
        Some(ResponseBody::WorkerReady { timestamp }) => info!(timestamp, "worker ready"),
        other => anyhow::bail!("expected WORKER_READY, got {:?}", other),
    }

    let seed: u64 = rand::random();
    info!(seed, "seeding session");

    let parameters = json!({
        "initialPopulation": 1000,
        "petriDishSize": 600.0,
        "growthRate": 0.3,
        "antibioticConcentration": 0.4,
        "mutationRate": 0.02,
        "duration": 100,
        "rngSeed": seed,
    });

    handle.send(Envelope::new(
        "init-1",
        "INITIALIZE",
        json!({ "parameters": parameters }),
    ));
    let bacteria = match handle.recv().map(|r| r.body) {
        Some(ResponseBody::InitializeComplete {
            bacteria,
            statistics,
        }) => {
            info!(
                population = statistics.total_population,
                resistant = statistics.resistant_count,
                "population initialized"
            );
            bacteria
        }
        other => anyhow::bail!("expected INITIALIZE_COMPLETE, got {:?}", other),
    };

    let steps = 100u32;
    info!(steps, "running batch...");
    let started = std::time::Instant::now();
    handle.send(Envelope::new(
        "batch-1",
        "BATCH_STEP",
        json!({
            "bacteria": bacteria,
            "parameters": parameters,
            "steps": steps,
            "reportProgress": true,
        }),
    ));

    loop {
        match handle.recv().map(|r| r.body) {
            Some(ResponseBody::BatchStepProgress {
                current_step,
                total_steps,
                statistics,
                ..
            }) => info!(
                current_step,
                total_steps,
                population = statistics.total_population,
                resistant = statistics.resistant_count,
                avg_fitness = statistics.average_fitness,
                "progress"
            ),
            Some(ResponseBody::BatchStepComplete { statistics, .. }) => {
                let elapsed = started.elapsed();
                info!(
                    population = statistics.total_population,
                    resistant = statistics.resistant_count,
                    "Batch complete: {:?} total, {:?} per generation",
                    elapsed,
                    elapsed / steps
                );
                break;
            }
            other => anyhow::bail!("unexpected response during batch: {:?}", other),
        }
    }

    handle.send(Envelope::new("term-1", "TERMINATE", json!({})));
    match handle.recv().map(|r| r.body) {
        Some(ResponseBody::TerminateComplete {
            performance_history,
        }) => info!(
            records = performance_history.len(),
            "terminated with performance history"
        ),
        other => anyhow::bail!("expected TERMINATE_COMPLETE, got {:?}", other),
    }

    if let Some(stats) = memory_stats::memory_stats() {
        info!(physical_mem = stats.physical_mem, "final memory footprint");
    }
    handle.join();

    Ok(())
}
