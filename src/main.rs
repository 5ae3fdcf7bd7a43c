#![allow(clippy::doc_markdown)]
#![doc = include_str!("../README.md")]

mod cli;
mod core;
mod loader;
mod prelude;
mod protocol;
mod quantity;
mod server;
mod tables;

use clap::{Parser, crate_version};
use tokio::net::TcpListener;

use crate::{
    cli::{Args, Command, SensorArgs},
    core::SampleStore,
    prelude::*,
    server::serve,
    tables::build_store_table,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().without_time().compact().init();
    info!(version = crate_version!(), "starting…");

    let args = Args::parse();
    let store = load_store(&args.sensors)?;

    match args.command {
        Command::Serve(args) => {
            let listener = TcpListener::bind(&args.bind_address)
                .await
                .context("failed to bind to the address")?;
            tokio::select! {
                result = serve(listener, &store, args.receive_buffer_size) => result?,
                result = shutdown_signal() => {
                    result?;
                    info!("shutting down…");
                }
            }
        }
        Command::Query(args) => {
            let result = store.get_energy(args.start, args.end);
            if let Err(error) = &result {
                warn!(kind = ?error, "query failed: {error}");
            }
            println!("{}", protocol::render(result)?);
        }
        Command::Inspect => {
            println!("{}", build_store_table(&store));
        }
    }

    info!("done!");
    Ok(())
}

#[instrument(skip_all)]
fn load_store(args: &SensorArgs) -> Result<SampleStore> {
    let store = loader::load_file(&args.path, args.load_options())
        .context("failed to load the sensor data")?;
    if let Some((first, last)) = store.coverage() {
        info!(n_samples = store.len(), ?first, ?last, "loaded the sensor data");
    }
    if store.is_empty() {
        warn!("the sensor data holds no samples, every query will fail");
    } else if store.len() < 2 {
        warn!(n_samples = store.len(), "not enough samples, every query will fail");
    }
    Ok(store)
}

/// Per <https://github.com/tokio-rs/axum/blob/main/examples/graceful-shutdown/src/main.rs>.
async fn shutdown_signal() -> Result {
    #[cfg(unix)]
    {
        let mut terminate = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .context("failed to install the signal handler")?;
        tokio::select! {
            result = tokio::signal::ctrl_c() => result.context("failed to listen for Ctrl+C")?,
            _ = terminate.recv() => {},
        }
    }

    #[cfg(not(unix))]
    tokio::signal::ctrl_c().await.context("failed to listen for Ctrl+C")?;

    Ok(())
}
