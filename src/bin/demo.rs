//! End-to-end cluster demo
//!
//! Spins up a master, a handful of chunkservers with heartbeat senders
//! and a liveness monitor, then runs the canonical create/append/read
//! scenario and shuts everything down cleanly.

use clap::Parser;
use minigfs::{Chunkserver, Client, Config, Master};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "minigfs-demo")]
#[command(about = "minigfs in-process cluster demo")]
struct Cli {
    /// Number of chunkservers to start
    #[arg(long, default_value = "3")]
    chunkservers: usize,

    /// Replication factor
    #[arg(long, default_value = "3")]
    replicas: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config = Config {
        replication_factor: cli.replicas,
        ..Config::load().unwrap_or_default()
    };
    config.validate()?;

    tracing::info!(version = minigfs::VERSION, "starting minigfs demo cluster");

    let master = Arc::new(Master::new(config.clone()));
    let monitor = master.spawn_liveness_monitor();

    let mut servers = Vec::new();
    let mut heartbeats = Vec::new();
    for i in 1..=cli.chunkservers {
        let cs = Chunkserver::new(format!("chunkserver-{}", i), master.clone(), &config);
        heartbeats.push(cs.spawn_heartbeat());
        servers.push(cs);
    }

    let client = Client::new(master.clone(), servers.iter().cloned());

    let filename = "/data/logs.txt";
    client.create(filename)?;
    client.append(filename, b"First log entry\n")?;
    client.append(filename, b"Second log entry\n")?;
    client.append(filename, b"Third log entry\n")?;

    let data = client.read(filename)?;
    println!("File contents:\n{}", String::from_utf8_lossy(&data));

    let info = master.get_file_info(filename)?;
    println!("File info: {}", serde_json::to_string_pretty(&info)?);

    for heartbeat in heartbeats {
        heartbeat.shutdown().await;
    }
    monitor.shutdown().await;

    tracing::info!("demo complete");
    Ok(())
}
