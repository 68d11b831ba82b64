// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image module — dimensions and resolution metadata of source images.

pub mod header;
pub mod probe;

pub use header::JpegHeader;
pub use probe::{ImageInfo, probe};
