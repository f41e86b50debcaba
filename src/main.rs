use anyhow::Result;
use codemap_bridge::cli;

#[tokio::main]
async fn main() -> Result<()> {
    cli::run_cli().await
}
