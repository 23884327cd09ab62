use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    codeman::cli::run_cli().await
}
