// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Header readers for the resolution metadata the `image` crate does not expose:
// PNG `pHYs`, JPEG JFIF/EXIF density and BMP pixels-per-metre.
//
// All readers work on untrusted bytes. Anything truncated or malformed yields
// `None` (no resolution) rather than an error; decoding failures are reported
// later by the image decoder itself.

use pagefit_core::Resolution;

/// Metres per inch, as used by PNG `pHYs`.
const METRES_PER_INCH: f64 = 0.0254;

/// Pixels-per-metre to DPI divisor used for BMP headers.
const BMP_PPM_PER_DPI: f64 = 39.3701;

const CM_PER_INCH: f64 = 2.54;

// -- PNG ----------------------------------------------------------------------

const PNG_SIGNATURE: &[u8; 8] = b"\x89PNG\r\n\x1a\n";

/// Resolution from the PNG `pHYs` chunk. Only the metre unit describes a
/// physical size; unit `0` is a bare aspect ratio.
pub fn png_resolution(data: &[u8]) -> Option<Resolution> {
    if !data.starts_with(PNG_SIGNATURE) {
        return None;
    }

    let mut offset = PNG_SIGNATURE.len();
    loop {
        let length = read_u32_be(data, offset)? as usize;
        let kind = data.get(offset + 4..offset + 8)?;
        let body_start = offset + 8;

        match kind {
            b"pHYs" => {
                let body = data.get(body_start..body_start.checked_add(length)?)?;
                if body.len() < 9 || body[8] != 1 {
                    return None;
                }
                let x_ppm = f64::from(read_u32_be(body, 0)?);
                let y_ppm = f64::from(read_u32_be(body, 4)?);
                return Resolution::new(x_ppm * METRES_PER_INCH, y_ppm * METRES_PER_INCH);
            }
            // pHYs must precede the image data.
            b"IDAT" | b"IEND" => return None,
            _ => {}
        }

        offset = body_start.checked_add(length)?.checked_add(4)?;
    }
}

// -- BMP ----------------------------------------------------------------------

/// Resolution from a BMP info header (`BITMAPINFOHEADER` or later). The older
/// 12-byte OS/2 core header carries no resolution.
pub fn bmp_resolution(data: &[u8]) -> Option<Resolution> {
    if !data.starts_with(b"BM") {
        return None;
    }
    let header_size = read_u32_le(data, 14)?;
    if header_size < 40 {
        return None;
    }
    let x_ppm = f64::from(read_i32_le(data, 38)?);
    let y_ppm = f64::from(read_i32_le(data, 42)?);
    Resolution::new(x_ppm / BMP_PPM_PER_DPI, y_ppm / BMP_PPM_PER_DPI)
}

// -- JPEG ---------------------------------------------------------------------

/// Facts gathered from the JPEG marker segments up to the first scan.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JpegHeader {
    /// Physical resolution from JFIF, falling back to EXIF.
    pub resolution: Option<Resolution>,
    /// Colour components declared by the frame header.
    pub components: u8,
    /// Sample precision declared by the frame header.
    pub bits_per_component: u8,
    /// An Adobe `APP14` segment was present (CMYK data is stored inverted).
    pub adobe: bool,
}

impl JpegHeader {
    /// Walk the marker segments of a JPEG stream. Returns `None` if the data is
    /// not JPEG or no frame header is found before the first scan.
    pub fn parse(data: &[u8]) -> Option<Self> {
        if !data.starts_with(&[0xFF, 0xD8]) {
            return None;
        }

        let mut header = Self::default();
        let mut jfif = None;
        let mut exif = None;
        let mut seen_frame = false;
        let mut pos = 2;

        while pos < data.len() {
            if data[pos] != 0xFF {
                return None;
            }
            // Skip fill bytes.
            while data.get(pos) == Some(&0xFF) {
                pos += 1;
            }
            let marker = *data.get(pos)?;
            pos += 1;

            match marker {
                0x01 | 0xD0..=0xD7 => continue,
                0xD9 | 0xDA => break,
                _ => {}
            }

            let length = usize::from(read_u16_be(data, pos)?);
            if length < 2 {
                return None;
            }
            let segment = data.get(pos + 2..pos + length)?;

            match marker {
                0xE0 if segment.starts_with(b"JFIF\0") => jfif = jfif_resolution(segment),
                0xE1 if segment.starts_with(b"Exif\0\0") => exif = exif_resolution(&segment[6..]),
                0xEE if segment.starts_with(b"Adobe") => header.adobe = true,
                // SOF0..SOF15 except DHT (C4), JPG (C8) and DAC (CC).
                0xC0..=0xCF if !matches!(marker, 0xC4 | 0xC8 | 0xCC) => {
                    header.bits_per_component = *segment.first()?;
                    header.components = *segment.get(5)?;
                    seen_frame = true;
                }
                _ => {}
            }

            pos += length;
        }

        if !seen_frame {
            return None;
        }
        header.resolution = jfif.or(exif);
        Some(header)
    }
}

/// Resolution from a JFIF `APP0` body. Unit 1 is dots per inch, unit 2 dots
/// per centimetre; unit 0 only gives an aspect ratio.
fn jfif_resolution(segment: &[u8]) -> Option<Resolution> {
    let unit = *segment.get(7)?;
    let x = f64::from(read_u16_be(segment, 8)?);
    let y = f64::from(read_u16_be(segment, 10)?);
    match unit {
        1 => Resolution::new(x, y),
        2 => Resolution::new(x * CM_PER_INCH, y * CM_PER_INCH),
        _ => None,
    }
}

const TAG_X_RESOLUTION: u16 = 0x011A;
const TAG_RESOLUTION_UNIT: u16 = 0x0128;
const TIFF_SHORT: u16 = 3;
const TIFF_RATIONAL: u16 = 5;

/// Resolution from the first IFD of an EXIF TIFF block. `ResolutionUnit` must
/// be present; 3 means centimetres, anything else is read as inches.
/// `XResolution` applies to both axes; `YResolution` is ignored.
fn exif_resolution(tiff: &[u8]) -> Option<Resolution> {
    let order = match tiff.get(0..2)? {
        b"II" => ByteOrder::Little,
        b"MM" => ByteOrder::Big,
        _ => return None,
    };
    if order.u16(tiff, 2)? != 42 {
        return None;
    }

    let ifd = order.u32(tiff, 4)? as usize;
    let count = usize::from(order.u16(tiff, ifd)?);

    let mut x = None;
    let mut unit = None;
    for index in 0..count {
        let entry = ifd + 2 + index * 12;
        let tag = order.u16(tiff, entry)?;
        let kind = order.u16(tiff, entry + 2)?;
        match (tag, kind) {
            (TAG_X_RESOLUTION, TIFF_RATIONAL) => x = order.rational(tiff, entry + 8),
            (TAG_RESOLUTION_UNIT, TIFF_SHORT) => unit = order.u16(tiff, entry + 8),
            _ => {}
        }
    }

    let scale = if unit? == 3 { CM_PER_INCH } else { 1.0 };
    let dpi = x? * scale;
    Resolution::new(dpi, dpi)
}

#[derive(Debug, Clone, Copy)]
enum ByteOrder {
    Little,
    Big,
}

impl ByteOrder {
    fn u16(self, data: &[u8], offset: usize) -> Option<u16> {
        let bytes: [u8; 2] = data.get(offset..offset + 2)?.try_into().ok()?;
        Some(match self {
            Self::Little => u16::from_le_bytes(bytes),
            Self::Big => u16::from_be_bytes(bytes),
        })
    }

    fn u32(self, data: &[u8], offset: usize) -> Option<u32> {
        let bytes: [u8; 4] = data.get(offset..offset + 4)?.try_into().ok()?;
        Some(match self {
            Self::Little => u32::from_le_bytes(bytes),
            Self::Big => u32::from_be_bytes(bytes),
        })
    }

    /// Read the RATIONAL pointed to by the value field at `field`.
    fn rational(self, tiff: &[u8], field: usize) -> Option<f64> {
        let at = self.u32(tiff, field)? as usize;
        let numerator = self.u32(tiff, at)?;
        let denominator = self.u32(tiff, at + 4)?;
        (denominator != 0).then(|| f64::from(numerator) / f64::from(denominator))
    }
}

// -- Byte helpers -------------------------------------------------------------

fn read_u16_be(data: &[u8], offset: usize) -> Option<u16> {
    let bytes: [u8; 2] = data.get(offset..offset + 2)?.try_into().ok()?;
    Some(u16::from_be_bytes(bytes))
}

fn read_u32_be(data: &[u8], offset: usize) -> Option<u32> {
    let bytes: [u8; 4] = data.get(offset..offset + 4)?.try_into().ok()?;
    Some(u32::from_be_bytes(bytes))
}

fn read_u32_le(data: &[u8], offset: usize) -> Option<u32> {
    let bytes: [u8; 4] = data.get(offset..offset + 4)?.try_into().ok()?;
    Some(u32::from_le_bytes(bytes))
}

fn read_i32_le(data: &[u8], offset: usize) -> Option<i32> {
    let bytes: [u8; 4] = data.get(offset..offset + 4)?.try_into().ok()?;
    Some(i32::from_le_bytes(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil;

    const TAG_Y_RESOLUTION: u16 = 0x011B;

    fn assert_dpi(res: Option<Resolution>, x: f64, y: f64) {
        let res = res.expect("resolution expected");
        assert!((res.x_dpi - x).abs() < 0.05, "x_dpi {} != {}", res.x_dpi, x);
        assert!((res.y_dpi - y).abs() < 0.05, "y_dpi {} != {}", res.y_dpi, y);
    }

    /// Minimal marker stream: SOI, the given segments, an 8-bit 3-component
    /// SOF0 and SOS. No entropy-coded data is needed for header parsing.
    fn jpeg_with_segments(segments: &[(u8, Vec<u8>)]) -> Vec<u8> {
        let mut out = vec![0xFF, 0xD8];
        for (marker, body) in segments {
            out.extend_from_slice(&[0xFF, *marker]);
            out.extend_from_slice(&((body.len() + 2) as u16).to_be_bytes());
            out.extend_from_slice(body);
        }
        let sof = [8, 0, 16, 0, 32, 3, 1, 0x11, 0, 2, 0x11, 1, 3, 0x11, 1];
        out.extend_from_slice(&[0xFF, 0xC0, 0, (sof.len() + 2) as u8]);
        out.extend_from_slice(&sof);
        out.extend_from_slice(&[0xFF, 0xDA, 0, 2, 0xFF, 0xD9]);
        out
    }

    fn jfif_body(unit: u8, x: u16, y: u16) -> Vec<u8> {
        let mut body = b"JFIF\0\x01\x02".to_vec();
        body.push(unit);
        body.extend_from_slice(&x.to_be_bytes());
        body.extend_from_slice(&y.to_be_bytes());
        body.extend_from_slice(&[0, 0]);
        body
    }

    /// Little-endian EXIF block with X/Y resolution rationals and a unit.
    fn exif_body(x: u32, y: u32, unit: u16) -> Vec<u8> {
        let mut tiff = b"II".to_vec();
        tiff.extend_from_slice(&42u16.to_le_bytes());
        tiff.extend_from_slice(&8u32.to_le_bytes());
        tiff.extend_from_slice(&3u16.to_le_bytes());
        let values_at: u32 = 8 + 2 + 3 * 12 + 4;
        for (tag, kind, value) in [
            (TAG_X_RESOLUTION, TIFF_RATIONAL, values_at),
            (TAG_Y_RESOLUTION, TIFF_RATIONAL, values_at + 8),
            (TAG_RESOLUTION_UNIT, TIFF_SHORT, u32::from(unit)),
        ] {
            tiff.extend_from_slice(&tag.to_le_bytes());
            tiff.extend_from_slice(&kind.to_le_bytes());
            tiff.extend_from_slice(&1u32.to_le_bytes());
            tiff.extend_from_slice(&value.to_le_bytes());
        }
        tiff.extend_from_slice(&0u32.to_le_bytes());
        for numerator in [x, y] {
            tiff.extend_from_slice(&numerator.to_le_bytes());
            tiff.extend_from_slice(&1u32.to_le_bytes());
        }
        let mut body = b"Exif\0\0".to_vec();
        body.extend_from_slice(&tiff);
        body
    }

    #[test]
    fn png_phys_in_metres() {
        let png = testutil::png_bytes(8, 8, Some(150.0));
        assert_dpi(png_resolution(&png), 150.0, 150.0);
    }

    #[test]
    fn png_without_phys_has_no_resolution() {
        assert_eq!(png_resolution(&testutil::png_bytes(8, 8, None)), None);
    }

    #[test]
    fn png_phys_with_unknown_unit_is_ignored() {
        let mut png = testutil::png_bytes(8, 8, Some(300.0));
        let chunk = png.windows(4).position(|w| w == b"pHYs").expect("pHYs chunk");
        // Type, x and y precede the unit byte.
        png[chunk + 4 + 8] = 0;
        assert_eq!(png_resolution(&png), None);
    }

    #[test]
    fn png_truncated_does_not_panic() {
        let png = testutil::png_bytes(8, 8, Some(300.0));
        for len in [0, 8, 20, 40, 45] {
            let _ = png_resolution(&png[..len]);
        }
    }

    #[test]
    fn jfif_dots_per_inch() {
        let jpeg = jpeg_with_segments(&[(0xE0, jfif_body(1, 300, 200))]);
        let header = JpegHeader::parse(&jpeg).expect("header");
        assert_dpi(header.resolution, 300.0, 200.0);
        assert_eq!(header.components, 3);
        assert_eq!(header.bits_per_component, 8);
        assert!(!header.adobe);
    }

    #[test]
    fn jfif_dots_per_centimetre() {
        let jpeg = jpeg_with_segments(&[(0xE0, jfif_body(2, 100, 100))]);
        let header = JpegHeader::parse(&jpeg).expect("header");
        assert_dpi(header.resolution, 254.0, 254.0);
    }

    #[test]
    fn jfif_aspect_ratio_falls_back_to_exif() {
        let jpeg = jpeg_with_segments(&[
            (0xE0, jfif_body(0, 1, 1)),
            (0xE1, exif_body(72, 72, 2)),
        ]);
        let header = JpegHeader::parse(&jpeg).expect("header");
        assert_dpi(header.resolution, 72.0, 72.0);
    }

    #[test]
    fn exif_x_resolution_applies_to_both_axes() {
        let jpeg = jpeg_with_segments(&[(0xE1, exif_body(300, 150, 2))]);
        let header = JpegHeader::parse(&jpeg).expect("header");
        assert_dpi(header.resolution, 300.0, 300.0);
    }

    #[test]
    fn exif_centimetre_unit_is_converted() {
        let jpeg = jpeg_with_segments(&[(0xE1, exif_body(100, 100, 3))]);
        let header = JpegHeader::parse(&jpeg).expect("header");
        assert_dpi(header.resolution, 254.0, 254.0);
    }

    #[test]
    fn jfif_aspect_ratio_alone_has_no_resolution() {
        let jpeg = jpeg_with_segments(&[(0xE0, jfif_body(0, 1, 1))]);
        let header = JpegHeader::parse(&jpeg).expect("header");
        assert_eq!(header.resolution, None);
    }

    #[test]
    fn adobe_segment_is_detected() {
        let jpeg = jpeg_with_segments(&[(0xEE, b"Adobe\0\x64\0\0\0\0\x02".to_vec())]);
        assert!(JpegHeader::parse(&jpeg).expect("header").adobe);
    }

    #[test]
    fn jpeg_without_frame_is_rejected() {
        assert_eq!(JpegHeader::parse(&[0xFF, 0xD8, 0xFF, 0xD9]), None);
        assert_eq!(JpegHeader::parse(b"not a jpeg"), None);
    }

    #[test]
    fn bmp_pixels_per_metre() {
        let bmp = testutil::bmp_bytes(4, 4, Some(96.0));
        assert_dpi(bmp_resolution(&bmp), 96.0, 96.0);
    }

    #[test]
    fn bmp_zero_resolution_is_none() {
        let bmp = testutil::bmp_bytes(4, 4, None);
        assert_eq!(bmp_resolution(&bmp), None);
    }
}
