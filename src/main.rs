//! Binary entry point: wires the composition root and runs the selected
//! transport to completion.

use std::process::ExitCode;
use std::sync::Arc;

use log::error;
use scout::context::AppContext;
use scout::transport::{self, TransportMode};

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let ctx = match AppContext::bootstrap() {
        Ok(ctx) => Arc::new(ctx),
        Err(e) => {
            error!("fatal configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mode = TransportMode::from_env();
    let result = transport::run(ctx, mode).await;

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("scout exited with error: {e}");
            ExitCode::FAILURE
        }
    }
}
