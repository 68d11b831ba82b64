// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command-line arguments and configuration resolution.

use std::path::PathBuf;

use clap::Parser;
use pagefit_core::ConversionConfig;
use pagefit_core::error::Result;

/// Convert every PNG, JPEG and BMP in a folder into its own PDF, with the page
/// sized to the image's physical dimensions.
#[derive(Debug, Parser)]
#[command(name = "pagefit", version, about)]
pub struct Cli {
    /// Folder containing the images [default: ./src_img]
    pub source: Option<PathBuf>,

    /// Folder receiving the PDFs, created if missing [default: ./dst_img]
    pub output: Option<PathBuf>,

    /// JSON file with `source_dir` / `output_dir`; positional arguments win
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Built-in defaults, overridden by the config file, overridden by the
    /// positional arguments.
    pub fn resolve_config(&self) -> Result<ConversionConfig> {
        let mut config = match &self.config {
            Some(path) => ConversionConfig::load(path)?,
            None => ConversionConfig::default(),
        };
        if let Some(source) = &self.source {
            config = config.with_source_dir(source);
        }
        if let Some(output) = &self.output {
            config = config.with_output_dir(output);
        }
        config.validate()?;
        Ok(config)
    }
}
