//! Pagelens service entry point.

use anyhow::Result;
use clap::Parser;
use pagelens::server::{self, AppState};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "pagelens", version, about = "Text extraction and IP blacklist checking API")]
struct Args {
    /// Port to listen on.
    #[arg(long, env = "PORT", default_value_t = 5000)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("pagelens=info".parse()?),
        )
        .init();

    let args = Args::parse();
    info!("starting pagelens v{}", env!("CARGO_PKG_VERSION"));

    server::serve(AppState::default(), args.port).await
}
