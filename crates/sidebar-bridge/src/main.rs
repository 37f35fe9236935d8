use std::io;
use std::process::ExitCode;

use sidebar_bridge::{SystemConfigLoader, bootstrap_with};

fn main() -> ExitCode {
    let mut bridge = match bootstrap_with(&SystemConfigLoader) {
        Ok(bridge) => bridge,
        Err(error) => {
            eprintln!("sidebar-bridge: {error}");
            return ExitCode::FAILURE;
        }
    };

    match bridge.serve(io::stdin().lock(), io::stdout().lock()) {
        Ok(_) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!(%error, "transport failed");
            ExitCode::FAILURE
        }
    }
}
