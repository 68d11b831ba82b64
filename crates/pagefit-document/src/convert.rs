// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Batch conversion — every eligible image directly inside the source directory
// becomes `<stem>.pdf` in the output directory, one page sized to the image.
//
// Setup problems (missing source, unusable output directory) abort the run
// before any file is touched. Per-file problems are logged, recorded in the
// report and the sweep carries on.

use std::fs;
use std::path::{Path, PathBuf};

use pagefit_core::error::{PagefitError, Result};
use pagefit_core::types::{ELIGIBLE_EXTENSIONS, is_eligible_image, pdf_file_name};
use pagefit_core::{BatchReport, ConversionConfig, ConversionResult, PageSize};
use tracing::{debug, error, info, instrument, warn};

use crate::image::probe;
use crate::pdf::{PdfEncoder, PdfWriter};

/// Convert the images of `config.source_dir` with the default [`PdfWriter`].
pub fn convert_images_to_pdf(config: &ConversionConfig) -> Result<BatchReport> {
    BatchConverter::new(PdfWriter::default()).run(config)
}

/// Sequential image-to-PDF batch converter.
pub struct BatchConverter<E = PdfWriter> {
    encoder: E,
}

impl<E: PdfEncoder> BatchConverter<E> {
    pub fn new(encoder: E) -> Self {
        Self { encoder }
    }

    /// Run one batch. Only configuration and setup failures are returned as
    /// errors, and each is logged before it is returned.
    #[instrument(skip_all, fields(
        source = %config.source_dir.display(),
        output = %config.output_dir.display(),
    ))]
    pub fn run(&self, config: &ConversionConfig) -> Result<BatchReport> {
        config.validate().inspect_err(|err| error!("{}", err))?;
        check_source(&config.source_dir).inspect_err(|err| error!("{}", err))?;
        prepare_output(&config.output_dir).inspect_err(|err| error!("{}", err))?;
        let images = collect_images(&config.source_dir).inspect_err(|err| error!("{}", err))?;
        let output_dir = std::path::absolute(&config.output_dir)
            .map_err(|source| PagefitError::OutputDir {
                path: config.output_dir.clone(),
                source,
            })
            .inspect_err(|err| error!("{}", err))?;

        let mut report = BatchReport {
            output_dir,
            results: Vec::with_capacity(images.len()),
        };

        if images.is_empty() {
            info!(
                "No image files found in '{}' ({})",
                config.source_dir.display(),
                ELIGIBLE_EXTENSIONS.join(", ")
            );
            return Ok(report);
        }

        info!(
            count = images.len(),
            "Found {} images in '{}', starting conversion",
            images.len(),
            config.source_dir.display()
        );

        for source in images {
            let result = match self.convert_file(&source, &config.output_dir) {
                Ok((output, page)) => {
                    info!(
                        width_pt = page.width_pt,
                        height_pt = page.height_pt,
                        "{} -> {}",
                        display_name(&source),
                        display_name(&output)
                    );
                    ConversionResult::Success {
                        source,
                        output,
                        page,
                    }
                }
                Err(err) => {
                    error!("Failed to convert {}: {}", source.display(), err);
                    ConversionResult::Failure {
                        source,
                        reason: err.to_string(),
                    }
                }
            };
            report.results.push(result);
        }

        info!(
            converted = report.converted(),
            failed = report.failed(),
            "Conversion finished: {} of {} images converted",
            report.converted(),
            report.found()
        );
        info!("PDF files saved to {}", report.output_dir.display());

        Ok(report)
    }

    /// Convert a single image into `output_dir`, returning the PDF path and
    /// the page size used.
    pub fn convert_file(&self, source: &Path, output_dir: &Path) -> Result<(PathBuf, PageSize)> {
        let pdf_name = pdf_file_name(source).ok_or_else(|| {
            PagefitError::Image(format!("{} has no file name", source.display()))
        })?;
        let output = output_dir.join(pdf_name);

        let data = fs::read(source)?;
        let info = probe(&data)?;
        let page = info.page_size();
        debug!(?info, ?page, "Computed page size");

        let pdf = self.encoder.encode(&data, page)?;
        fs::write(&output, pdf)?;

        Ok((output, page))
    }
}

fn check_source(source_dir: &Path) -> Result<()> {
    if !source_dir.exists() {
        return Err(PagefitError::SourceNotFound(source_dir.to_path_buf()));
    }
    if !source_dir.is_dir() {
        return Err(PagefitError::SourceNotDirectory(source_dir.to_path_buf()));
    }
    Ok(())
}

/// Create the output directory (with parents) if it is missing.
fn prepare_output(output_dir: &Path) -> Result<()> {
    if output_dir.exists() {
        if !output_dir.is_dir() {
            return Err(PagefitError::OutputNotDirectory(output_dir.to_path_buf()));
        }
        return Ok(());
    }

    fs::create_dir_all(output_dir).map_err(|source| PagefitError::OutputDir {
        path: output_dir.to_path_buf(),
        source,
    })?;
    info!("Created output directory: {}", output_dir.display());
    Ok(())
}

/// Eligible regular files directly inside `source_dir`, sorted by name.
fn collect_images(source_dir: &Path) -> Result<Vec<PathBuf>> {
    let list_error = |source| PagefitError::ListSource {
        path: source_dir.to_path_buf(),
        source,
    };

    let mut images = Vec::new();
    for entry in fs::read_dir(source_dir).map_err(list_error)? {
        let path = match entry {
            Ok(entry) => entry.path(),
            Err(err) => {
                warn!("Skipping unreadable directory entry: {}", err);
                continue;
            }
        };
        if !is_eligible_image(&path) {
            continue;
        }
        if !path.is_file() {
            warn!("Skipping {}: not a regular file", path.display());
            continue;
        }
        images.push(path);
    }

    images.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(images)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
