use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    regionwatch_lib::run(regionwatch_lib::Cli::parse()).await
}
