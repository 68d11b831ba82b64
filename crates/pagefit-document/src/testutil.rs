// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Fixture builders shared by the unit tests. PNGs with a resolution are written
// through the `png` encoder; JPEG and BMP fixtures come from the `image` crate
// and get their density fields patched in place.

use std::io::Cursor;

use ::image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};

fn encode(image: &DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut buffer = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut buffer), format)
        .expect("encode fixture");
    buffer
}

fn gradient(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    }))
}

/// RGB PNG, optionally carrying a `pHYs` chunk for `dpi` on both axes.
pub fn png_bytes(width: u32, height: u32, dpi: Option<f64>) -> Vec<u8> {
    let Some(dpi) = dpi else {
        return encode(&gradient(width, height), ImageFormat::Png);
    };

    let ppm = (dpi / 0.0254).round() as u32;
    let mut buffer = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut buffer, width, height);
        encoder.set_color(png::ColorType::Rgb);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_pixel_dims(Some(png::PixelDimensions {
            xppu: ppm,
            yppu: ppm,
            unit: png::Unit::Meter,
        }));
        let mut writer = encoder.write_header().expect("png header");
        writer
            .write_image_data(gradient(width, height).as_bytes())
            .expect("png data");
        writer.finish().expect("png finish");
    }
    buffer
}

/// RGBA PNG with a horizontal alpha ramp.
pub fn rgba_png_bytes(width: u32, height: u32) -> Vec<u8> {
    let image = RgbaImage::from_fn(width, height, |x, _| Rgba([10, 20, 30, (x % 256) as u8]));
    encode(&DynamicImage::ImageRgba8(image), ImageFormat::Png)
}

/// Baseline JPEG; `dpi` is written into the JFIF density fields.
pub fn jpeg_bytes(width: u32, height: u32, dpi: Option<u16>) -> Vec<u8> {
    let mut jpeg = encode(&gradient(width, height), ImageFormat::Jpeg);
    assert_eq!(&jpeg[2..4], &[0xFF, 0xE0], "encoder must emit JFIF APP0 first");
    assert_eq!(&jpeg[6..11], b"JFIF\0");
    let (unit, density) = match dpi {
        Some(dpi) => (1, dpi),
        None => (0, 1),
    };
    jpeg[13] = unit;
    jpeg[14..16].copy_from_slice(&density.to_be_bytes());
    jpeg[16..18].copy_from_slice(&density.to_be_bytes());
    jpeg
}

/// 24-bit BMP with pixels-per-metre set from `dpi` (zero when `None`).
pub fn bmp_bytes(width: u32, height: u32, dpi: Option<f64>) -> Vec<u8> {
    let mut bmp = encode(&gradient(width, height), ImageFormat::Bmp);
    let ppm = dpi.map(|dpi| (dpi * 39.3701).round() as i32).unwrap_or(0);
    bmp[38..42].copy_from_slice(&ppm.to_le_bytes());
    bmp[42..46].copy_from_slice(&ppm.to_le_bytes());
    bmp
}
