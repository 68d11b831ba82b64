// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image metadata reader — pixel dimensions and optional resolution, without
// decoding the pixel data.

use std::io::Cursor;

use ::image::{ImageFormat, ImageReader};
use pagefit_core::error::PagefitError;
use pagefit_core::{PageSize, Resolution};
use tracing::{debug, instrument};

use super::header::{self, JpegHeader};

/// What the converter needs to know about an image before encoding it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageInfo {
    /// Format detected from the content (not the file extension).
    pub format: ImageFormat,
    pub width: u32,
    pub height: u32,
    pub resolution: Option<Resolution>,
}

impl ImageInfo {
    /// Physical page size for this image.
    pub fn page_size(&self) -> PageSize {
        PageSize::from_pixels(self.width, self.height, self.resolution)
    }
}

/// Read dimensions and resolution from encoded image bytes.
#[instrument(skip_all, fields(data_len = data.len()))]
pub fn probe(data: &[u8]) -> Result<ImageInfo, PagefitError> {
    let format = ::image::guess_format(data)
        .map_err(|err| PagefitError::Image(format!("unrecognised image data: {}", err)))?;

    let (width, height) = ImageReader::with_format(Cursor::new(data), format)
        .into_dimensions()
        .map_err(|err| PagefitError::Image(format!("failed to read image header: {}", err)))?;

    let resolution = match format {
        ImageFormat::Png => header::png_resolution(data),
        ImageFormat::Jpeg => JpegHeader::parse(data).and_then(|h| h.resolution),
        ImageFormat::Bmp => header::bmp_resolution(data),
        _ => None,
    };

    debug!(?format, width, height, ?resolution, "Image probed");

    Ok(ImageInfo {
        format,
        width,
        height,
        resolution,
    })
}
