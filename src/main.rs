use std::env;
use std::process;

use hotel_ledger::{run, Command, Config, Error, HotelLedger};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() {
    // Logs go to stderr so stdout stays machine-readable CSV
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "hotel_ledger=info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(err) = run_app().await {
        eprintln!("Error: {}", err);
        process::exit(1);
    }
}

async fn run_app() -> Result<(), Error> {
    let args: Vec<String> = env::args().skip(1).collect();
    let command = Command::parse(&args)?;
    let config = Config::from_env()?;
    let ledger = HotelLedger::open(&config).await?;
    run(&ledger, command, std::io::stdout()).await
}
