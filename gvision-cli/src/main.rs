use std::process::ExitCode;

use clap::Parser;
use gvision_cli::{Cli, Config};
use gvision_telemetry::TelemetryConfig;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() { ExitCode::FAILURE } else { ExitCode::SUCCESS };
        }
    };

    let mut telemetry = TelemetryConfig::from_env("gvision");
    if telemetry.default_level.is_none() {
        telemetry = telemetry.with_log_level("warn");
    }
    if let Err(err) = gvision_telemetry::init_with_config(telemetry) {
        eprintln!("warning: logging disabled: {err}");
    }

    let config = Config::from_env();
    let mut stdout = std::io::stdout().lock();

    match gvision_cli::run(&cli, &config, &mut stdout).await {
        Ok(()) => ExitCode::SUCCESS,
        // Written directly so log filters cannot hide it.
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
