mod app;
mod cli;
mod configuration;
mod provider;
mod rest;
mod storage;
mod tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    app::run().await
}
