use accord_daemon::Daemon;
use std::path::PathBuf;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = std::env::args_os().nth(1).map(PathBuf::from);

    Daemon::builder().config_path(config_path).build()?.run().await
}
