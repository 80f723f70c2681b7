//! EVA CLI - explore EV sales, charging stations and incentives by state.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "eva-cli",
    version,
    about = "EV adoption atlas: sales, charging stations and incentives by state"
)]
struct Cli {
    #[command(subcommand)]
    command: eva_cmd::Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    log::debug!("[EVA Debug] cli: starting");
    eva_cmd::run(cli.command).await
}
