// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page compositor — draw embedded images on top of existing page content.
//
// Original content streams are never rewritten. Before the first overlay on a
// page, the existing streams are bracketed by a `q` stream and a `Q` stream so
// graphics state they leave behind cannot leak into the overlay; each draw is
// then appended as its own small content stream.

use std::collections::BTreeSet;

use letterhead_core::PlacementRect;
use letterhead_core::error::{LetterheadError, Result};
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use tracing::{debug, trace};

use super::embed::EmbeddedImage;
use super::reader::{PageGeometry, inherited};

/// Appends image draws to pages of one document.
#[derive(Debug, Default)]
pub struct PageCompositor {
    /// Pages whose original content is already wrapped in `q … Q`.
    isolated: BTreeSet<ObjectId>,
    draws: usize,
}

impl PageCompositor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total draw operations appended so far.
    pub fn draws(&self) -> usize {
        self.draws
    }

    /// Draw `image` on `page` at `rect` (page-relative; shifted by the media
    /// box origin here).
    pub fn composite(
        &mut self,
        document: &mut Document,
        page: &PageGeometry,
        image: &EmbeddedImage,
        rect: PlacementRect,
    ) -> Result<()> {
        if self.isolated.insert(page.id) {
            isolate_existing_content(document, page.id)?;
        }

        let name = register_xobject(document, page.id, image)?;
        let rect = rect.translate(page.origin.0, page.origin.1);

        let content = Content {
            operations: vec![
                Operation::new("q", vec![]),
                Operation::new(
                    "cm",
                    vec![
                        Object::Real(rect.width),
                        Object::Integer(0),
                        Object::Integer(0),
                        Object::Real(rect.height),
                        Object::Real(rect.x),
                        Object::Real(rect.y),
                    ],
                ),
                Operation::new("Do", vec![Object::Name(name.clone())]),
                Operation::new("Q", vec![]),
            ],
        };
        let mut bytes = b"\n".to_vec();
        bytes.extend(content.encode().map_err(|err| {
            LetterheadError::SerializationFailure(format!("failed to encode draw operation: {err}"))
        })?);
        append_stream(document, page.id, bytes)?;

        self.draws += 1;
        debug!(
            page = page.number,
            role = %image.role,
            name = %String::from_utf8_lossy(&name),
            x = rect.x,
            y = rect.y,
            width = rect.width,
            height = rect.height,
            "Overlay drawn"
        );
        Ok(())
    }
}

fn malformed(page_id: ObjectId, what: &str, err: impl std::fmt::Display) -> LetterheadError {
    LetterheadError::MalformedInputDocument(format!("page {page_id:?}: {what}: {err}"))
}

/// The page's content streams as a flat list of references.
fn content_refs(document: &Document, page_id: ObjectId) -> Result<Vec<Object>> {
    let page = document
        .get_dictionary(page_id)
        .map_err(|err| malformed(page_id, "cannot read page", err))?;

    Ok(match page.get(b"Contents") {
        Ok(Object::Reference(id)) => match document.get_object(*id) {
            Ok(Object::Array(items)) => items.clone(),
            _ => vec![Object::Reference(*id)],
        },
        Ok(Object::Array(items)) => items.clone(),
        _ => Vec::new(),
    })
}

fn set_contents(document: &mut Document, page_id: ObjectId, refs: Vec<Object>) -> Result<()> {
    document
        .get_dictionary_mut(page_id)
        .map_err(|err| malformed(page_id, "cannot update page", err))?
        .set("Contents", Object::Array(refs));
    Ok(())
}

fn isolate_existing_content(document: &mut Document, page_id: ObjectId) -> Result<()> {
    let existing = content_refs(document, page_id)?;
    if existing.is_empty() {
        return Ok(());
    }

    let push = document.add_object(Stream::new(Dictionary::new(), b"q\n".to_vec()));
    let pop = document.add_object(Stream::new(Dictionary::new(), b"\nQ\n".to_vec()));

    let mut refs = Vec::with_capacity(existing.len() + 2);
    refs.push(Object::Reference(push));
    refs.extend(existing);
    refs.push(Object::Reference(pop));

    trace!(?page_id, "Original content wrapped in q/Q");
    set_contents(document, page_id, refs)
}

fn append_stream(document: &mut Document, page_id: ObjectId, bytes: Vec<u8>) -> Result<()> {
    let mut refs = content_refs(document, page_id)?;
    let stream_id = document.add_object(Stream::new(Dictionary::new(), bytes));
    refs.push(Object::Reference(stream_id));
    set_contents(document, page_id, refs)
}

/// Make `image` reachable from the page's /Resources /XObject dictionary and
/// return the name it is registered under.
///
/// The base name comes from the asset role; a numeric suffix is added when the
/// name is already taken by a different object. Resource dictionaries shared
/// between pages are updated in place, so later pages find and reuse the
/// existing entry.
fn register_xobject(
    document: &mut Document,
    page_id: ObjectId,
    image: &EmbeddedImage,
) -> Result<Vec<u8>> {
    let resources_id = own_resources(document, page_id)?;

    let xobjects_id = match resources_mut(document, page_id, resources_id)?.get(b"XObject") {
        Ok(Object::Reference(id)) => Some(*id),
        _ => None,
    };

    let xobjects: &mut Dictionary = match xobjects_id {
        Some(id) => document
            .get_dictionary_mut(id)
            .map_err(|err| malformed(page_id, "cannot read /XObject dictionary", err))?,
        None => {
            let resources = resources_mut(document, page_id, resources_id)?;
            if !matches!(resources.get(b"XObject"), Ok(Object::Dictionary(_))) {
                resources.set("XObject", Object::Dictionary(Dictionary::new()));
            }
            resources
                .get_mut(b"XObject")
                .and_then(|obj| obj.as_dict_mut())
                .map_err(|err| malformed(page_id, "cannot read /XObject dictionary", err))?
        }
    };

    let existing = xobjects
        .iter()
        .find(|(_, value)| matches!(value, Object::Reference(id) if *id == image.id));
    if let Some((name, _)) = existing {
        return Ok(name.clone());
    }

    let base = image.role.resource_name();
    let mut name = base.as_bytes().to_vec();
    let mut suffix = 1u32;
    while xobjects.has(&name) {
        name = format!("{base}{suffix}").into_bytes();
        suffix += 1;
    }
    xobjects.set(name.clone(), Object::Reference(image.id));
    Ok(name)
}

/// Ensure the page has its own /Resources entry. Returns the id of the
/// resources dictionary when it is indirect, `None` when it is inline.
///
/// A page that only inherits resources gets an inline copy of the inherited
/// dictionary, so adding an image does not hide inherited fonts.
fn own_resources(document: &mut Document, page_id: ObjectId) -> Result<Option<ObjectId>> {
    let page = document
        .get_dictionary(page_id)
        .map_err(|err| malformed(page_id, "cannot read page", err))?;

    match page.get(b"Resources") {
        Ok(Object::Reference(id)) => return Ok(Some(*id)),
        Ok(Object::Dictionary(_)) => return Ok(None),
        _ => {}
    }

    let copy = inherited(document, page_id, b"Resources")
        .and_then(|obj| obj.as_dict().ok())
        .cloned()
        .unwrap_or_default();

    document
        .get_dictionary_mut(page_id)
        .map_err(|err| malformed(page_id, "cannot update page", err))?
        .set("Resources", Object::Dictionary(copy));
    Ok(None)
}

fn resources_mut(
    document: &mut Document,
    page_id: ObjectId,
    resources_id: Option<ObjectId>,
) -> Result<&mut Dictionary> {
    let resources = match resources_id {
        Some(id) => document.get_dictionary_mut(id),
        None => document
            .get_dictionary_mut(page_id)
            .and_then(|page| page.get_mut(b"Resources"))
            .and_then(|obj| obj.as_dict_mut()),
    };
    resources.map_err(|err| malformed(page_id, "cannot read /Resources", err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::detect::detect;
    use crate::fixtures;
    use crate::pdf::embed::embed;
    use crate::pdf::reader;
    use letterhead_core::AssetRole;

    fn save(mut doc: Document) -> Vec<u8> {
        let mut out = Vec::new();
        doc.save_to(&mut out).unwrap();
        out
    }

    #[test]
    fn draw_is_appended_after_original_content() {
        let mut doc = reader::load(&fixtures::pdf(&[(612.0, 792.0)])).unwrap();
        let page = reader::pages(&doc)[0];
        let image = embed(&mut doc, AssetRole::Logo, &detect(&fixtures::png(600, 200)).unwrap()).unwrap();

        let mut compositor = PageCompositor::new();
        compositor
            .composite(&mut doc, &page, &image, PlacementRect::new(311.0, 672.0, 300.0, 100.0))
            .unwrap();
        assert_eq!(compositor.draws(), 1);

        let ops = &fixtures::page_operations(&save(doc))[0];
        let operators: Vec<&str> = ops.iter().map(|op| op.operator.as_str()).collect();
        // q [original: cm BT Tf Td Tj ET] Q q cm Do Q
        assert_eq!(
            operators,
            vec!["q", "cm", "BT", "Tf", "Td", "Tj", "ET", "Q", "q", "cm", "Do", "Q"]
        );
        assert_eq!(
            fixtures::image_draws(ops),
            vec![("LhLogo".to_string(), 311.0, 672.0, 300.0, 100.0)]
        );
    }

    #[test]
    fn page_is_isolated_only_once() {
        let mut doc = reader::load(&fixtures::pdf(&[(612.0, 792.0)])).unwrap();
        let page = reader::pages(&doc)[0];
        let logo = embed(&mut doc, AssetRole::Logo, &detect(&fixtures::png(10, 10)).unwrap()).unwrap();
        let qr = embed(&mut doc, AssetRole::Qr, &detect(&fixtures::png(10, 10)).unwrap()).unwrap();

        let mut compositor = PageCompositor::new();
        let rect = PlacementRect::new(1.0, 2.0, 3.0, 4.0);
        compositor.composite(&mut doc, &page, &logo, rect).unwrap();
        compositor.composite(&mut doc, &page, &qr, rect).unwrap();

        let ops = &fixtures::page_operations(&save(doc))[0];
        let pushes = ops.iter().filter(|op| op.operator == "q").count();
        assert_eq!(pushes, 3);
        let names: Vec<_> = fixtures::image_draws(ops).into_iter().map(|d| d.0).collect();
        assert_eq!(names, vec!["LhLogo", "LhQr"]);
    }

    #[test]
    fn existing_names_are_not_overwritten_and_shared_dict_is_reused() {
        let mut doc = reader::load(&fixtures::pdf_with_inherited_attributes(2)).unwrap();
        let pages = reader::pages(&doc);
        let image = embed(&mut doc, AssetRole::Logo, &detect(&fixtures::png(10, 10)).unwrap()).unwrap();

        let mut compositor = PageCompositor::new();
        for page in &pages {
            compositor
                .composite(&mut doc, page, &image, PlacementRect::new(0.0, 0.0, 10.0, 10.0))
                .unwrap();
        }

        for page in &pages {
            let resources = doc
                .get_dictionary(page.id)
                .unwrap()
                .get(b"Resources")
                .unwrap()
                .as_dict()
                .unwrap();
            // Inherited font survives the copy.
            assert!(resources.get(b"Font").is_ok());
        }

        let output = save(doc);
        for ops in fixtures::page_operations(&output) {
            let names: Vec<_> = fixtures::image_draws(&ops).into_iter().map(|d| d.0).collect();
            assert_eq!(names, vec!["LhLogo1"]);
        }
    }

    #[test]
    fn offset_media_box_shifts_the_draw() {
        let mut doc = reader::load(&fixtures::pdf_with_offset_media_box()).unwrap();
        let page = reader::pages(&doc)[0];
        let image = embed(&mut doc, AssetRole::Qr, &detect(&fixtures::png(10, 10)).unwrap()).unwrap();

        let mut compositor = PageCompositor::new();
        compositor
            .composite(&mut doc, &page, &image, PlacementRect::new(20.0, 682.0, 70.0, 70.0))
            .unwrap();

        let ops = &fixtures::page_operations(&save(doc))[0];
        assert_eq!(
            fixtures::image_draws(ops),
            vec![("LhQr".to_string(), 120.0, 732.0, 70.0, 70.0)]
        );
    }
}
