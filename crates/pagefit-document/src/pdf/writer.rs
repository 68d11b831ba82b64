// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF writer — wrap a single image in a one-page PDF whose page is exactly the
// requested size, using `lopdf`.
//
// JPEG data is embedded untouched (DCTDecode). Everything else is decoded with
// the `image` crate and stored as Flate-compressed 8-bit samples, with any
// alpha channel split into a soft mask. Output carries no timestamps or
// document IDs, so the same input always produces the same bytes.

use std::io::Cursor;

use ::image::{DynamicImage, ImageFormat, ImageReader};
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, ObjectId, Stream, dictionary};
use pagefit_core::PageSize;
use pagefit_core::error::PagefitError;
use tracing::{debug, instrument};

use crate::image::JpegHeader;

/// Name of the image XObject in the page resources.
const IMAGE_NAME: &str = "Im0";

/// Turns encoded image bytes into a single-page PDF of a given size.
pub trait PdfEncoder {
    /// Produce PDF bytes with one page of exactly `page` points, fully covered
    /// by the image.
    fn encode(&self, image: &[u8], page: PageSize) -> Result<Vec<u8>, PagefitError>;
}

/// Default [`PdfEncoder`] built on `lopdf`.
#[derive(Debug, Clone)]
pub struct PdfWriter {
    /// Producer string written to the /Info dictionary.
    producer: String,
}

impl Default for PdfWriter {
    fn default() -> Self {
        Self::new(concat!("pagefit ", env!("CARGO_PKG_VERSION")))
    }
}

impl PdfWriter {
    pub fn new(producer: impl Into<String>) -> Self {
        Self {
            producer: producer.into(),
        }
    }
}

impl PdfEncoder for PdfWriter {
    #[instrument(skip(self, image), fields(bytes_len = image.len()))]
    fn encode(&self, image: &[u8], page: PageSize) -> Result<Vec<u8>, PagefitError> {
        if !page.is_valid() {
            return Err(PagefitError::Pdf(format!(
                "invalid page size {} x {} pt",
                page.width_pt, page.height_pt
            )));
        }

        let mut doc = Document::with_version("1.5");
        let image_id = add_image(&mut doc, image)?;

        let width = page.width_pt as f32;
        let height = page.height_pt as f32;

        // Scale the unit-square image space onto the whole page.
        let content = Content {
            operations: vec![
                Operation::new("q", vec![]),
                Operation::new(
                    "cm",
                    vec![
                        Object::Real(width),
                        Object::Integer(0),
                        Object::Integer(0),
                        Object::Real(height),
                        Object::Integer(0),
                        Object::Integer(0),
                    ],
                ),
                Operation::new("Do", vec![Object::Name(IMAGE_NAME.as_bytes().to_vec())]),
                Operation::new("Q", vec![]),
            ],
        };
        let content_bytes = content.encode().map_err(|err| {
            PagefitError::Pdf(format!("failed to encode page content: {}", err))
        })?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, content_bytes));

        let pages_id = doc.new_object_id();
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Real(width),
                Object::Real(height),
            ],
            "Resources" => dictionary! {
                "XObject" => dictionary! {
                    IMAGE_NAME => image_id,
                },
            },
            "Contents" => content_id,
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        let info_id = doc.add_object(dictionary! {
            "Producer" => Object::string_literal(self.producer.as_str()),
        });
        doc.trailer.set("Root", catalog_id);
        doc.trailer.set("Info", info_id);
        doc.compress();

        let mut output = Vec::new();
        doc.save_to(&mut output).map_err(|err| {
            PagefitError::Pdf(format!("failed to serialise PDF: {}", err))
        })?;

        debug!(width, height, output_bytes = output.len(), "Image PDF created");
        Ok(output)
    }
}

/// Add the image XObject (and its soft mask, if any) to `doc`.
fn add_image(doc: &mut Document, data: &[u8]) -> Result<ObjectId, PagefitError> {
    let format = ::image::guess_format(data)
        .map_err(|err| PagefitError::Image(format!("unrecognised image data: {}", err)))?;

    if format == ImageFormat::Jpeg {
        if let Some(stream) = jpeg_stream(data)? {
            return Ok(doc.add_object(stream));
        }
    }

    let decoded = ::image::load_from_memory_with_format(data, format).map_err(|err| {
        PagefitError::Image(format!("failed to decode image for PDF: {}", err))
    })?;
    let width = i64::from(decoded.width());
    let height = i64::from(decoded.height());

    let (colour_space, samples) = colour_samples(&decoded);
    let mut dict = dictionary! {
        "Type" => "XObject",
        "Subtype" => "Image",
        "Width" => width,
        "Height" => height,
        "ColorSpace" => colour_space,
        "BitsPerComponent" => 8,
    };

    if decoded.color().has_alpha() {
        let alpha: Vec<u8> = decoded
            .to_rgba8()
            .into_raw()
            .chunks_exact(4)
            .map(|pixel| pixel[3])
            .collect();
        let mask_id = doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => width,
                "Height" => height,
                "ColorSpace" => "DeviceGray",
                "BitsPerComponent" => 8,
            },
            alpha,
        ));
        dict.set("SMask", mask_id);
    }

    debug!(?format, width, height, colour_space, "Image decoded for embedding");
    Ok(doc.add_object(Stream::new(dict, samples)))
}

/// Pick the smallest 8-bit colour space that holds the image.
fn colour_samples(image: &DynamicImage) -> (&'static str, Vec<u8>) {
    if image.color().has_color() {
        ("DeviceRGB", image.to_rgb8().into_raw())
    } else {
        ("DeviceGray", image.to_luma8().into_raw())
    }
}

/// Embed JPEG bytes as-is. Returns `None` for streams PDF readers cannot take
/// directly (non 8-bit samples), which are then decoded instead.
fn jpeg_stream(data: &[u8]) -> Result<Option<Stream>, PagefitError> {
    let header = JpegHeader::parse(data)
        .ok_or_else(|| PagefitError::Image("malformed JPEG header".into()))?;
    if header.bits_per_component != 8 {
        return Ok(None);
    }

    let (width, height) = ImageReader::with_format(Cursor::new(data), ImageFormat::Jpeg)
        .into_dimensions()
        .map_err(|err| PagefitError::Image(format!("failed to read JPEG header: {}", err)))?;

    let colour_space = match header.components {
        1 => "DeviceGray",
        3 => "DeviceRGB",
        4 => "DeviceCMYK",
        n => {
            return Err(PagefitError::Image(format!(
                "unsupported JPEG component count {}",
                n
            )));
        }
    };

    let mut dict = dictionary! {
        "Type" => "XObject",
        "Subtype" => "Image",
        "Width" => i64::from(width),
        "Height" => i64::from(height),
        "ColorSpace" => colour_space,
        "BitsPerComponent" => 8,
        "Filter" => "DCTDecode",
    };
    if header.components == 4 && header.adobe {
        let decode: Vec<Object> = [1, 0, 1, 0, 1, 0, 1, 0]
            .into_iter()
            .map(Object::Integer)
            .collect();
        dict.set("Decode", decode);
    }

    Ok(Some(Stream::new(dict, data.to_vec()).with_compression(false)))
}
