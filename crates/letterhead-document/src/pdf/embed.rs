// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image embedding — register an asset once per document as an image XObject.
//
// JPEG assets are embedded as their original DCT-compressed bytes. PNG assets
// are re-encoded as Flate-compressed 8-bit samples, with any alpha channel
// moved into a separate soft mask.

use std::io::Write;

use flate2::Compression;
use flate2::write::ZlibEncoder;
use image::DynamicImage;
use letterhead_core::error::{LetterheadError, Result};
use letterhead_core::{AssetRole, ImageFormat};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use tracing::{debug, instrument};

use crate::asset::detect::{Asset, ColorModel};

/// Handle to an image XObject owned by the document being branded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmbeddedImage {
    pub id: ObjectId,
    pub role: AssetRole,
    /// Intrinsic pixel width of the source asset.
    pub width: u32,
    /// Intrinsic pixel height of the source asset.
    pub height: u32,
}

/// Add `asset` to `document` as an image XObject and return its handle.
#[instrument(skip(document, asset), fields(format = %asset.format(), width = asset.width(), height = asset.height()))]
pub fn embed(document: &mut Document, role: AssetRole, asset: &Asset) -> Result<EmbeddedImage> {
    let stream = match asset.format() {
        ImageFormat::Jpeg => jpeg_stream(asset),
        ImageFormat::Png => png_stream(document, asset)?,
    };
    let id = document.add_object(stream);

    debug!(?id, %role, "Image XObject registered");
    Ok(EmbeddedImage {
        id,
        role,
        width: asset.width(),
        height: asset.height(),
    })
}

fn image_dict(width: u32, height: u32, color_space: &[u8]) -> Dictionary {
    Dictionary::from_iter([
        ("Type", Object::Name(b"XObject".to_vec())),
        ("Subtype", Object::Name(b"Image".to_vec())),
        ("Width", Object::Integer(i64::from(width))),
        ("Height", Object::Integer(i64::from(height))),
        ("ColorSpace", Object::Name(color_space.to_vec())),
        ("BitsPerComponent", Object::Integer(8)),
    ])
}

fn jpeg_stream(asset: &Asset) -> Stream {
    let color = asset.color_model();
    let mut dict = image_dict(asset.width(), asset.height(), color.pdf_color_space());
    dict.set("Filter", Object::Name(b"DCTDecode".to_vec()));
    if color == ColorModel::Cmyk {
        // Adobe-style CMYK JPEGs store inverted samples.
        let decode = [1, 0].repeat(color.components());
        dict.set(
            "Decode",
            Object::Array(decode.into_iter().map(Object::Integer).collect()),
        );
    }
    Stream::new(dict, asset.bytes().to_vec()).with_compression(false)
}

fn png_stream(document: &mut Document, asset: &Asset) -> Result<Stream> {
    let (samples, alpha) = split_samples(asset.pixels(), asset.color_model(), asset.has_alpha());

    let mut dict = image_dict(
        asset.width(),
        asset.height(),
        asset.color_model().pdf_color_space(),
    );
    dict.set("Filter", Object::Name(b"FlateDecode".to_vec()));

    if let Some(alpha) = alpha {
        let mut mask = image_dict(asset.width(), asset.height(), b"DeviceGray");
        mask.set("Filter", Object::Name(b"FlateDecode".to_vec()));
        let mask_id = document.add_object(Stream::new(mask, deflate(&alpha)?).with_compression(false));
        dict.set("SMask", Object::Reference(mask_id));
    }

    Ok(Stream::new(dict, deflate(&samples)?).with_compression(false))
}

/// Flatten decoded pixels to 8-bit colour samples plus an optional alpha
/// plane. The alpha plane is dropped when every pixel is fully opaque.
fn split_samples(
    pixels: &DynamicImage,
    color: ColorModel,
    has_alpha: bool,
) -> (Vec<u8>, Option<Vec<u8>>) {
    match (color, has_alpha) {
        (ColorModel::Gray, false) => (pixels.to_luma8().into_raw(), None),
        (ColorModel::Gray, true) => {
            let raw = pixels.to_luma_alpha8().into_raw();
            separate_alpha(&raw, 1)
        }
        (_, false) => (pixels.to_rgb8().into_raw(), None),
        (_, true) => {
            let raw = pixels.to_rgba8().into_raw();
            separate_alpha(&raw, 3)
        }
    }
}

fn separate_alpha(raw: &[u8], color_channels: usize) -> (Vec<u8>, Option<Vec<u8>>) {
    let stride = color_channels + 1;
    let pixel_count = raw.len() / stride;
    let mut samples = Vec::with_capacity(pixel_count * color_channels);
    let mut alpha = Vec::with_capacity(pixel_count);

    for pixel in raw.chunks_exact(stride) {
        samples.extend_from_slice(&pixel[..color_channels]);
        alpha.push(pixel[color_channels]);
    }

    if alpha.iter().all(|&a| a == u8::MAX) {
        (samples, None)
    } else {
        (samples, Some(alpha))
    }
}

fn deflate(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::with_capacity(data.len() / 2), Compression::default());
    encoder
        .write_all(data)
        .and_then(|_| encoder.finish())
        .map_err(|err| LetterheadError::SerializationFailure(format!("image compression failed: {err}")))
}
