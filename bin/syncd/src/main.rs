//! Sync Worker Daemon
//!
//! Polls the durable sync queue and delivers completed hand records to the
//! external backend. Connects to Postgres via DB_URL, applies migrations on
//! boot, then loops until interrupted.

use clap::Parser;
use pkt_store::Postgres;
use pkt_sync::Devnull;
use pkt_sync::Worker;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "syncd", about = "Hand record sync worker")]
struct Args {
    /// Seconds between queue polls
    #[arg(long, default_value_t = pkt_core::POLL_SECS)]
    interval: u64,
    /// Items claimed per poll
    #[arg(long, default_value_t = pkt_core::CLAIM_BATCH)]
    batch: usize,
    /// Attempts before an item is dead-lettered
    #[arg(long, default_value_t = pkt_core::MAX_RETRIES)]
    max_retries: u32,
    /// Seconds before an in-flight claim is presumed abandoned
    #[arg(long, default_value_t = pkt_core::LIVENESS_SECS)]
    liveness: u64,
    /// Seconds allowed per delivery attempt
    #[arg(long, default_value_t = pkt_core::ATTEMPT_SECS)]
    attempt: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    pkt_core::log();
    pkt_core::trap();
    let client = pkt_pg::db().await;
    pkt_store::migrate(&client).await?;
    log::info!("[syncd] polling every {}s", args.interval);
    Worker::new(Postgres::new(client), Devnull)
        .batch(args.batch)
        .max_retries(args.max_retries)
        .attempt(Duration::from_secs(args.attempt))
        .liveness(Duration::from_secs(args.liveness))
        .run(Duration::from_secs(args.interval))
        .await;
    Ok(())
}
