use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{error, info};
use std::path::PathBuf;
use system_orchestrator::process::topology;
use system_orchestrator::{ProcessManager, SupervisionEnd, SystemConfig};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Settings file; missing is fine
    #[arg(long, default_value = "orchestrator.toml")]
    config: PathBuf,
}

async fn run(manager: &mut ProcessManager) -> Result<SupervisionEnd> {
    manager.start_all().await?;
    Ok(manager.supervise_until_exit().await?)
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    info!("=== System Orchestrator Starting ===");

    let args = Args::parse();
    let config = SystemConfig::load(&args.config)
        .with_context(|| format!("failed to load {}", args.config.display()))?;
    info!(
        "Tickers {:?}, ports {}..={}",
        config.tickers, config.initial_port, config.max_port
    );

    let mut manager = ProcessManager::new(&config)?;
    topology::plan_default(&mut manager, &config).context("failed to plan workers")?;

    let outcome = run(&mut manager).await;
    // Runs whatever supervision returned.
    manager.terminate_all().await;

    match outcome {
        Ok(end) if end.is_failure() => bail!("worker failure ended the run: {:?}", end),
        Ok(end) => {
            info!("Run ended: {:?}", end);
            Ok(())
        }
        Err(e) => {
            error!("Orchestration failed: {:#}", e);
            Err(e)
        }
    }
}
