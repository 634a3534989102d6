use anyhow::Context as _;
use clap::Parser;
use dev_proxy::config::{self, Overrides};
use std::{net::SocketAddr, path::PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// TOML configuration file. Defaults to `dev-proxy.toml` when present.
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Address to listen on.
    #[arg(short, long)]
    listen: Option<SocketAddr>,
    /// Directory with the built web UI, may start with an alias such as `@`.
    #[arg(long)]
    static_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let args = Args::parse();
    let overrides = Overrides {
        listen: args.listen,
        static_dir: args.static_dir,
    };
    let config = config::load(args.config.as_deref(), &overrides)
        .context("cannot load the dev-server configuration")?;
    dev_proxy::server::serve(config).await
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
