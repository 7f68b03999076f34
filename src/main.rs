mod config;
mod discovery;
mod error;
mod lister;

use std::time::Instant;

use clap::Parser;
use kube::api::ListParams;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use lister::Lister;

#[derive(Parser)]
#[command(name = "kubels", about = "List every object the cluster will admit to having", author, version)]
struct Cli {
    /// Label selector applied to every list call (e.g. -l "app=web,tier!=db")
    #[arg(short = 'l', long)]
    selector: Option<String>,
    /// Keep only standalone objects, dropping anything with an owner reference
    #[arg(short, long, default_value_t = false)]
    standalone: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = config::load_config().await?;
    let client = config::build_client(config)?;
    let lister = Lister::new(client);

    let mut opts = ListParams::default();
    if let Some(selector) = &cli.selector {
        opts = opts.labels(selector);
    }

    let start = Instant::now();
    let agg = lister.list_all_resources(&opts, !cli.standalone).await?;
    let elapsed = start.elapsed();

    for obj in &agg.objects {
        let kind = obj.types.as_ref().map(|t| t.kind.as_str()).unwrap_or("");
        info!(
            "{} {} {}",
            kind,
            obj.metadata.namespace.as_deref().unwrap_or(""),
            obj.metadata.name.as_deref().unwrap_or("")
        );
    }
    for skipped in &agg.skipped {
        warn!("skipped {}: {}", skipped.resource, skipped.error);
    }
    info!("{} total objects in {:.2?}", agg.objects.len(), elapsed);
    Ok(())
}
