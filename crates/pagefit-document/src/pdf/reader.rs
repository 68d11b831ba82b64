// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF reader — open existing PDF documents and inspect their page geometry
// using the `lopdf` crate.

use std::path::Path;

use lopdf::{Dictionary, Document, Object, ObjectId};
use pagefit_core::PageSize;
use pagefit_core::error::PagefitError;
use tracing::{debug, instrument};

/// Inheritance chains deeper than this are treated as malformed.
const MAX_PARENT_DEPTH: usize = 32;

/// Page geometry of an existing PDF, used to inspect converter output.
pub struct PdfReader {
    document: Document,
}

impl PdfReader {
    /// Load a PDF file.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self, PagefitError> {
        let path = path.as_ref();
        Document::load(path)
            .map(Self::wrap)
            .map_err(|err| PagefitError::Pdf(format!("cannot load {}: {}", path.display(), err)))
    }

    /// Load a PDF held in memory.
    #[instrument(skip_all, fields(bytes_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self, PagefitError> {
        Document::load_mem(data)
            .map(Self::wrap)
            .map_err(|err| PagefitError::Pdf(format!("cannot load PDF bytes: {}", err)))
    }

    fn wrap(document: Document) -> Self {
        debug!(pages = document.get_pages().len(), "PDF loaded");
        Self { document }
    }

    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    /// Size of a page (1-indexed) from its `/MediaBox`, following the page
    /// tree upwards when the box is inherited.
    pub fn page_size(&self, page_number: u32) -> Result<PageSize, PagefitError> {
        let pages = self.document.get_pages();
        let page_id: ObjectId = *pages.get(&page_number).ok_or_else(|| {
            PagefitError::Pdf(format!(
                "page {} out of range (document has {} pages)",
                page_number,
                pages.len()
            ))
        })?;

        let media_box = self.inherited_media_box(page_id)?;
        let coords = media_box
            .iter()
            .map(|obj| self.resolve(obj).as_float().map(f64::from))
            .collect::<Result<Vec<f64>, _>>()
            .map_err(|err| PagefitError::Pdf(format!("malformed MediaBox: {}", err)))?;

        match coords.as_slice() {
            [llx, lly, urx, ury] => Ok(PageSize::new((urx - llx).abs(), (ury - lly).abs())),
            _ => Err(PagefitError::Pdf(format!(
                "MediaBox must have 4 numbers, found {}",
                coords.len()
            ))),
        }
    }

    fn inherited_media_box(&self, page_id: ObjectId) -> Result<&Vec<Object>, PagefitError> {
        let mut node = self.dictionary(page_id)?;
        for _ in 0..MAX_PARENT_DEPTH {
            if let Ok(media_box) = node.get(b"MediaBox") {
                return self.resolve(media_box).as_array().map_err(|err| {
                    PagefitError::Pdf(format!("MediaBox is not an array: {}", err))
                });
            }
            let parent = node
                .get(b"Parent")
                .and_then(Object::as_reference)
                .map_err(|_| PagefitError::Pdf("page has no MediaBox".into()))?;
            node = self.dictionary(parent)?;
        }
        Err(PagefitError::Pdf("page tree too deep".into()))
    }

    fn dictionary(&self, id: ObjectId) -> Result<&Dictionary, PagefitError> {
        self.document.get_dictionary(id).map_err(|err| {
            PagefitError::Pdf(format!("cannot read object {:?}: {}", id, err))
        })
    }

    /// Follow a single indirect reference, leaving direct objects untouched.
    fn resolve<'a>(&'a self, obj: &'a Object) -> &'a Object {
        match obj {
            Object::Reference(id) => self.document.get_object(*id).unwrap_or(obj),
            _ => obj,
        }
    }
}
