// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// In-memory test fixtures: small PDFs built with lopdf and raster images
// encoded with the image crate.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, Luma, Rgb, RgbImage, Rgba, RgbaImage};
use lopdf::content::{Content, Operation};
use lopdf::{
    Dictionary, Document, EncryptionState, EncryptionVersion, Object, ObjectId, Permissions,
    Stream, StringFormat,
};

fn encode(image: DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut buffer = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut buffer), format)
        .expect("fixture encoding");
    buffer
}

/// Opaque RGB PNG.
pub fn png(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_pixel(width, height, Rgb([200, 30, 40]));
    encode(DynamicImage::ImageRgb8(img), ImageFormat::Png)
}

/// RGBA PNG whose left half is transparent.
pub fn translucent_png(width: u32, height: u32) -> Vec<u8> {
    let img = RgbaImage::from_fn(width, height, |x, _| {
        if x < width / 2 {
            Rgba([0, 0, 0, 0])
        } else {
            Rgba([10, 120, 220, 255])
        }
    });
    encode(DynamicImage::ImageRgba8(img), ImageFormat::Png)
}

/// Baseline RGB JPEG.
pub fn jpeg(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_pixel(width, height, Rgb([20, 140, 60]));
    encode(DynamicImage::ImageRgb8(img), ImageFormat::Jpeg)
}

/// Grayscale JPEG.
pub fn gray_jpeg(width: u32, height: u32) -> Vec<u8> {
    let img = image::GrayImage::from_pixel(width, height, Luma([90]));
    encode(DynamicImage::ImageLuma8(img), ImageFormat::Jpeg)
}

/// 8x8 Adobe-style CMYK baseline JPEG. The image crate cannot encode CMYK,
/// so the segments are written by hand: every block is DC-only with a zero
/// coefficient, one 1-bit Huffman code per table.
pub fn cmyk_jpeg() -> Vec<u8> {
    let mut jpeg = vec![0xFF, 0xD8];
    // APP14 "Adobe", version 100, no flags, transform 0 (no colour transform).
    jpeg.extend([0xFF, 0xEE, 0x00, 0x0E]);
    jpeg.extend(b"Adobe");
    jpeg.extend([0x00, 0x64, 0x00, 0x00, 0x00, 0x00, 0x00]);
    // DQT: one table of ones.
    jpeg.extend([0xFF, 0xDB, 0x00, 0x43, 0x00]);
    jpeg.extend([1u8; 64]);
    // SOF0: 8 bit, 8x8, four components sampled 1x1 on table 0.
    jpeg.extend([0xFF, 0xC0, 0x00, 0x14, 0x08, 0x00, 0x08, 0x00, 0x08, 0x04]);
    for component in 1..=4u8 {
        jpeg.extend([component, 0x11, 0x00]);
    }
    // DHT: DC table 0 and AC table 0, each holding symbol 0x00 only.
    for class in [0x00u8, 0x10] {
        jpeg.extend([0xFF, 0xC4, 0x00, 0x14, class, 0x01]);
        jpeg.extend([0u8; 15]);
        jpeg.push(0x00);
    }
    // SOS: all four components interleaved.
    jpeg.extend([0xFF, 0xDA, 0x00, 0x0E, 0x04]);
    for component in 1..=4u8 {
        jpeg.extend([component, 0x00]);
    }
    jpeg.extend([0x00, 0x3F, 0x00]);
    // Four blocks of (DC diff 0, EOB) fill exactly one zero byte.
    jpeg.push(0x00);
    jpeg.extend([0xFF, 0xD9]);
    jpeg
}

fn text_content(label: &str) -> Vec<u8> {
    Content {
        operations: vec![
            // Leaves a scaled CTM behind on purpose: overlays must not inherit it.
            Operation::new(
                "cm",
                vec![
                    Object::Real(0.5),
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Real(0.5),
                    Object::Integer(0),
                    Object::Integer(0),
                ],
            ),
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec![Object::Name(b"F1".to_vec()), Object::Integer(24)]),
            Operation::new("Td", vec![Object::Integer(100), Object::Integer(700)]),
            Operation::new("Tj", vec![Object::string_literal(label)]),
            Operation::new("ET", vec![]),
        ],
    }
    .encode()
    .expect("fixture content")
}

fn media_box(width: f32, height: f32) -> Object {
    Object::Array(vec![
        Object::Integer(0),
        Object::Integer(0),
        Object::Real(width),
        Object::Real(height),
    ])
}

fn font_resources(doc: &mut Document) -> Dictionary {
    let font_id = doc.add_object(Dictionary::from_iter([
        ("Type", Object::Name(b"Font".to_vec())),
        ("Subtype", Object::Name(b"Type1".to_vec())),
        ("BaseFont", Object::Name(b"Helvetica".to_vec())),
    ]));
    Dictionary::from_iter([(
        "Font",
        Object::Dictionary(Dictionary::from_iter([("F1", Object::Reference(font_id))])),
    )])
}

fn finish(
    mut doc: Document,
    pages_id: ObjectId,
    kids: Vec<ObjectId>,
    mut pages_dict: Dictionary,
) -> Vec<u8> {
    pages_dict.set("Type", Object::Name(b"Pages".to_vec()));
    pages_dict.set("Count", Object::Integer(kids.len() as i64));
    pages_dict.set(
        "Kids",
        Object::Array(kids.into_iter().map(Object::Reference).collect()),
    );
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(Dictionary::from_iter([
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut output = Vec::new();
    doc.save_to(&mut output).expect("fixture save");
    output
}

/// A PDF with one page per entry in `sizes`, each page carrying its own
/// media box, inline resources, and a single text content stream.
pub fn pdf(sizes: &[(f32, f32)]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let resources = font_resources(&mut doc);

    let mut kids = Vec::new();
    for (index, (width, height)) in sizes.iter().enumerate() {
        let content_id = doc.add_object(Stream::new(
            Dictionary::new(),
            text_content(&format!("Page {}", index + 1)),
        ));
        let page_id = doc.add_object(Dictionary::from_iter([
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            ("Contents", Object::Reference(content_id)),
            ("Resources", Object::Dictionary(resources.clone())),
            ("MediaBox", media_box(*width, *height)),
        ]));
        kids.push(page_id);
    }

    finish(doc, pages_id, kids, Dictionary::new())
}

/// A PDF whose pages inherit /MediaBox and /Resources from the page tree
/// root and share a single indirect /XObject dictionary that already holds
/// an entry named `LhLogo`.
pub fn pdf_with_inherited_attributes(page_count: usize) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let mut resources = font_resources(&mut doc);

    let existing_image = doc.add_object(Stream::new(
        Dictionary::from_iter([
            ("Type", Object::Name(b"XObject".to_vec())),
            ("Subtype", Object::Name(b"Image".to_vec())),
            ("Width", Object::Integer(1)),
            ("Height", Object::Integer(1)),
            ("ColorSpace", Object::Name(b"DeviceGray".to_vec())),
            ("BitsPerComponent", Object::Integer(8)),
        ]),
        vec![0],
    ));
    let xobjects_id = doc.add_object(Dictionary::from_iter([(
        "LhLogo",
        Object::Reference(existing_image),
    )]));
    resources.set("XObject", Object::Reference(xobjects_id));

    let mut kids = Vec::new();
    for index in 0..page_count {
        let content_id = doc.add_object(Stream::new(
            Dictionary::new(),
            text_content(&format!("Inherited {}", index + 1)),
        ));
        let page_id = doc.add_object(Dictionary::from_iter([
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            ("Contents", Object::Reference(content_id)),
        ]));
        kids.push(page_id);
    }

    let root = Dictionary::from_iter([
        ("MediaBox", media_box(595.0, 842.0)),
        ("Resources", Object::Dictionary(resources)),
    ]);
    finish(doc, pages_id, kids, root)
}

/// A single page whose media box does not start at the origin.
pub fn pdf_with_offset_media_box() -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let resources = font_resources(&mut doc);
    let content_id = doc.add_object(Stream::new(Dictionary::new(), text_content("Offset")));
    let page_id = doc.add_object(Dictionary::from_iter([
        ("Type", Object::Name(b"Page".to_vec())),
        ("Parent", Object::Reference(pages_id)),
        ("Contents", Object::Reference(content_id)),
        ("Resources", Object::Dictionary(resources)),
        (
            "MediaBox",
            Object::Array(vec![
                Object::Integer(100),
                Object::Integer(50),
                Object::Integer(712),
                Object::Integer(842),
            ]),
        ),
    ]));
    finish(doc, pages_id, vec![page_id], Dictionary::new())
}

/// Two pages with no /MediaBox anywhere in the page tree.
pub fn pdf_without_media_box() -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let resources = font_resources(&mut doc);

    let mut kids = Vec::new();
    for index in 0..2 {
        let content_id = doc.add_object(Stream::new(
            Dictionary::new(),
            text_content(&format!("Unsized {}", index + 1)),
        ));
        let page_id = doc.add_object(Dictionary::from_iter([
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            ("Contents", Object::Reference(content_id)),
            ("Resources", Object::Dictionary(resources.clone())),
        ]));
        kids.push(page_id);
    }
    finish(doc, pages_id, kids, Dictionary::new())
}

/// A one-page Letter PDF encrypted (RC4, 128-bit) with a user password, so
/// it cannot be opened without one.
pub fn encrypted_pdf() -> Vec<u8> {
    let mut doc = Document::load_mem(&pdf(&[(612.0, 792.0)])).expect("reload fixture");
    doc.trailer.set(
        "ID",
        Object::Array(vec![
            Object::String(b"letterhead-fixture-id".to_vec(), StringFormat::Literal),
            Object::String(b"letterhead-fixture-id".to_vec(), StringFormat::Literal),
        ]),
    );
    let state = EncryptionState::try_from(EncryptionVersion::V2 {
        document: &doc,
        owner_password: "owner",
        user_password: "reader",
        key_length: 128,
        permissions: Permissions::all(),
    })
    .expect("encryption state");
    doc.encrypt(&state).expect("encrypt fixture");

    let mut output = Vec::new();
    doc.save_to(&mut output).expect("fixture save");
    output
}

/// Operators of the fully concatenated content of every page, in page order.
pub fn page_operations(bytes: &[u8]) -> Vec<Vec<Operation>> {
    let doc = Document::load_mem(bytes).expect("reload output");
    doc.get_pages()
        .values()
        .map(|page_id| {
            let content = doc.get_page_content(*page_id).expect("page content");
            Content::decode(&content).expect("decode content").operations
        })
        .collect()
}

/// Media box width/height of every page, in page order.
pub fn page_sizes(bytes: &[u8]) -> Vec<(f32, f32)> {
    let doc = Document::load_mem(bytes).expect("reload output");
    doc.get_pages()
        .into_iter()
        .map(|(number, page_id)| {
            let geometry = crate::pdf::reader::page_geometry(&doc, number, page_id);
            (geometry.size.width, geometry.size.height)
        })
        .collect()
}

/// Extract every `cm` rectangle that is immediately followed by a `Do`,
/// as `(name, x, y, width, height)`.
pub fn image_draws(operations: &[Operation]) -> Vec<(String, f32, f32, f32, f32)> {
    operations
        .windows(2)
        .filter(|pair| pair[0].operator == "cm" && pair[1].operator == "Do")
        .map(|pair| {
            let nums: Vec<f32> = pair[0]
                .operands
                .iter()
                .map(|o| o.as_float().expect("numeric operand"))
                .collect();
            let name = match &pair[1].operands[0] {
                Object::Name(name) => String::from_utf8_lossy(name).into_owned(),
                other => panic!("unexpected Do operand {other:?}"),
            };
            (name, nums[4], nums[5], nums[0], nums[3])
        })
        .collect()
}
