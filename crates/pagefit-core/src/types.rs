// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for pagefit.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// PDF points per inch.
pub const POINTS_PER_INCH: f64 = 72.0;

/// File name suffixes accepted by the batch converter (compared lowercased).
pub const ELIGIBLE_EXTENSIONS: [&str; 4] = [".png", ".jpg", ".jpeg", ".bmp"];

/// Whether `path` names an image the converter picks up. The whole lowercased
/// file name must end in one of [`ELIGIBLE_EXTENSIONS`], so a file literally
/// called `.png` counts.
pub fn is_eligible_image(path: &Path) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().to_lowercase())
        .is_some_and(|name| ELIGIBLE_EXTENSIONS.iter().any(|suffix| name.ends_with(suffix)))
}

/// Name of the PDF produced for `source`: the stem with a `.pdf` suffix.
pub fn pdf_file_name(source: &Path) -> Option<OsString> {
    let mut name = source.file_stem()?.to_os_string();
    name.push(".pdf");
    Some(name)
}

/// Horizontal and vertical resolution in dots per inch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    pub x_dpi: f64,
    pub y_dpi: f64,
}

impl Resolution {
    /// Returns `None` unless both axes are finite and strictly positive.
    pub fn new(x_dpi: f64, y_dpi: f64) -> Option<Self> {
        let usable = |v: f64| v.is_finite() && v > 0.0;
        (usable(x_dpi) && usable(y_dpi)).then_some(Self { x_dpi, y_dpi })
    }
}

/// Physical page size in PDF points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub width_pt: f64,
    pub height_pt: f64,
}

impl PageSize {
    pub fn new(width_pt: f64, height_pt: f64) -> Self {
        Self {
            width_pt,
            height_pt,
        }
    }

    /// Size of an image on paper. Without a resolution one pixel maps to one
    /// point (an implicit 72 DPI).
    pub fn from_pixels(width_px: u32, height_px: u32, resolution: Option<Resolution>) -> Self {
        match resolution {
            Some(res) => Self {
                width_pt: f64::from(width_px) * POINTS_PER_INCH / res.x_dpi,
                height_pt: f64::from(height_px) * POINTS_PER_INCH / res.y_dpi,
            },
            None => Self {
                width_pt: f64::from(width_px),
                height_pt: f64::from(height_px),
            },
        }
    }

    /// True when both sides can be used as a PDF media box.
    pub fn is_valid(&self) -> bool {
        self.width_pt.is_finite()
            && self.height_pt.is_finite()
            && self.width_pt > 0.0
            && self.height_pt > 0.0
    }
}

/// Outcome of converting one image file.
#[derive(Debug, Clone, PartialEq)]
pub enum ConversionResult {
    Success {
        source: PathBuf,
        output: PathBuf,
        page: PageSize,
    },
    Failure {
        source: PathBuf,
        reason: String,
    },
}

impl ConversionResult {
    pub fn source(&self) -> &Path {
        match self {
            Self::Success { source, .. } | Self::Failure { source, .. } => source,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// Summary of a whole batch run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchReport {
    /// Absolute path of the output directory.
    pub output_dir: PathBuf,
    /// One entry per eligible file, in processing order.
    pub results: Vec<ConversionResult>,
}

impl BatchReport {
    /// Number of eligible image files found.
    pub fn found(&self) -> usize {
        self.results.len()
    }

    /// Number of files that produced a PDF.
    pub fn converted(&self) -> usize {
        self.results.iter().filter(|r| r.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.failures().count()
    }

    pub fn failures(&self) -> impl Iterator<Item = &ConversionResult> {
        self.results.iter().filter(|r| !r.is_success())
    }
}
