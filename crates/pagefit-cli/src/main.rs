// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// pagefit — batch image-to-PDF converter.
//
// Entry point. Initialises logging, resolves the configuration and runs one
// conversion batch. The converter logs every outcome and the final summary.
// Setup failures exit with status 1; per-file failures are reported but do not
// change the exit status.

mod cli;

use std::process::ExitCode;

use clap::Parser;
use pagefit_document::convert_images_to_pdf;

use cli::Cli;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = match cli.resolve_config() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "cannot load configuration");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!("=== pagefit: image to PDF conversion ===");

    match convert_images_to_pdf(&config) {
        Ok(_) => ExitCode::SUCCESS,
        // The converter has already logged the cause.
        Err(_) => ExitCode::FAILURE,
    }
}
