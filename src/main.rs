mod cli;
mod commands;
mod constants;
mod error;
mod indicators;
mod models;
mod screens;
mod services;
mod utils;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = cli::run() {
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }
}
