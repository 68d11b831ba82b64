// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// pagefit-document — Image-to-PDF conversion for pagefit.
//
// Provides image metadata probing (dimensions and DPI), single-image PDF
// encoding and reading, and the batch pipeline that ties them together.

pub mod convert;
pub mod image;
pub mod pdf;

#[cfg(test)]
mod testutil;

// Re-export the primary items so callers can use `pagefit_document::PdfWriter` etc.
pub use self::convert::{BatchConverter, convert_images_to_pdf};
pub use self::image::{ImageInfo, probe};
pub use self::pdf::{PdfEncoder, PdfReader, PdfWriter};
