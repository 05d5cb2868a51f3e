// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF reader — load an input document with `lopdf` and measure its pages.

use lopdf::{Document, Object, ObjectId};
use letterhead_core::PageSize;
use letterhead_core::error::{LetterheadError, Result};
use tracing::{debug, instrument, warn};

/// Limit on /Parent hops when resolving inherited page attributes, so a
/// cyclic page tree cannot loop forever.
const MAX_TREE_DEPTH: usize = 32;

/// Where a page sits in user space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    /// Page object in the document.
    pub id: ObjectId,
    /// 1-based position in page order.
    pub number: u32,
    /// Media box width and height.
    pub size: PageSize,
    /// Lower-left corner of the media box.
    pub origin: (f32, f32),
}

/// Parse `bytes` into a document the compositor can mutate.
///
/// Anything lopdf cannot parse, a document without a catalog, and encrypted
/// documents are all reported as `MalformedInputDocument`.
#[instrument(skip_all, fields(bytes_len = bytes.len()))]
pub fn load(bytes: &[u8]) -> Result<Document> {
    if bytes.is_empty() {
        return Err(LetterheadError::MalformedInputDocument(
            "input is empty".into(),
        ));
    }

    let document = Document::load_mem(bytes).map_err(|err| {
        LetterheadError::MalformedInputDocument(format!("failed to parse PDF: {err}"))
    })?;

    if document.is_encrypted() {
        return Err(LetterheadError::MalformedInputDocument(
            "document is encrypted".into(),
        ));
    }

    document.catalog().map_err(|err| {
        LetterheadError::MalformedInputDocument(format!("document has no catalog: {err}"))
    })?;

    debug!(pages = document.get_pages().len(), "PDF loaded from bytes");
    Ok(document)
}

/// Geometry of every page, in page order.
pub fn pages(document: &Document) -> Vec<PageGeometry> {
    document
        .get_pages()
        .into_iter()
        .map(|(number, page_id)| page_geometry(document, number, page_id))
        .collect()
}

/// Measure one page from its (possibly inherited) /MediaBox.
///
/// Pages without a usable media box are treated as US Letter.
pub fn page_geometry(document: &Document, number: u32, page_id: ObjectId) -> PageGeometry {
    let corners = inherited(document, page_id, b"MediaBox").and_then(|obj| rectangle(document, obj));

    match corners {
        Some([x0, y0, x1, y1]) if (x1 - x0).abs() > 0.0 && (y1 - y0).abs() > 0.0 => PageGeometry {
            id: page_id,
            number,
            size: PageSize::new((x1 - x0).abs(), (y1 - y0).abs()),
            origin: (x0.min(x1), y0.min(y1)),
        },
        _ => {
            warn!(page = number, "Page has no usable /MediaBox, assuming US Letter");
            PageGeometry {
                id: page_id,
                number,
                size: PageSize::letter(),
                origin: (0.0, 0.0),
            }
        }
    }
}

/// Look up `key` on the page dictionary, walking up /Parent links until it
/// is found. Indirect values are resolved.
pub(crate) fn inherited<'a>(
    document: &'a Document,
    page_id: ObjectId,
    key: &[u8],
) -> Option<&'a Object> {
    let mut node = document.get_dictionary(page_id).ok()?;
    for _ in 0..MAX_TREE_DEPTH {
        if let Ok(value) = node.get(key) {
            return resolve(document, value);
        }
        let parent = node.get(b"Parent").ok()?.as_reference().ok()?;
        node = document.get_dictionary(parent).ok()?;
    }
    None
}

/// Follow a reference to its target; direct objects are returned as-is.
pub(crate) fn resolve<'a>(document: &'a Document, object: &'a Object) -> Option<&'a Object> {
    match object {
        Object::Reference(id) => document.get_object(*id).ok(),
        other => Some(other),
    }
}

fn rectangle(document: &Document, object: &Object) -> Option<[f32; 4]> {
    let items = object.as_array().ok()?;
    if items.len() != 4 {
        return None;
    }
    let mut corners = [0.0f32; 4];
    for (slot, item) in corners.iter_mut().zip(items) {
        *slot = resolve(document, item)?.as_float().ok()?;
    }
    Some(corners)
}
