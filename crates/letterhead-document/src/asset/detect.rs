// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Format detection by trial decode. PNG is always attempted first; only when
// the PNG decoder rejects the bytes is a JPEG decode attempted. A buffer that
// neither decoder accepts is an unsupported asset.

use std::io::Cursor;

use image::codecs::jpeg::JpegDecoder;
use image::{ColorType, DynamicImage, ImageDecoder, ImageError};
use letterhead_core::ImageFormat;
use letterhead_core::error::{LetterheadError, Result};
use tracing::{debug, instrument};

/// Colour space of the samples an asset will be embedded with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorModel {
    Gray,
    Rgb,
    /// Only produced by JPEG streams; PNG has no CMYK mode.
    Cmyk,
}

impl ColorModel {
    /// PDF colour space name.
    pub fn pdf_color_space(&self) -> &'static [u8] {
        match self {
            Self::Gray => b"DeviceGray",
            Self::Rgb => b"DeviceRGB",
            Self::Cmyk => b"DeviceCMYK",
        }
    }

    /// Number of colour components per sample.
    pub fn components(&self) -> usize {
        match self {
            Self::Gray => 1,
            Self::Rgb => 3,
            Self::Cmyk => 4,
        }
    }
}

/// A decoded raster asset. Immutable once detected.
///
/// Holds the original encoded bytes (embedded verbatim for JPEG) alongside
/// the decoded pixels (re-encoded for PNG), so no asset is decoded twice.
#[derive(Debug, Clone)]
pub struct Asset {
    bytes: Vec<u8>,
    format: ImageFormat,
    color: ColorModel,
    has_alpha: bool,
    pixels: DynamicImage,
}

impl Asset {
    /// The encoded bytes the asset was detected from.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    /// Intrinsic width in pixels.
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    /// Intrinsic height in pixels.
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn color_model(&self) -> ColorModel {
        self.color
    }

    /// Whether the source image carries an alpha channel.
    pub fn has_alpha(&self) -> bool {
        self.has_alpha
    }

    /// Decoded pixel data.
    pub fn pixels(&self) -> &DynamicImage {
        &self.pixels
    }
}

/// Classify `bytes` as PNG or JPEG by attempting to decode them.
///
/// Returns `UnsupportedImageFormat` when both decoders fail, or when the
/// image decodes to zero width or height.
#[instrument(skip(bytes), fields(bytes_len = bytes.len()))]
pub fn detect(bytes: &[u8]) -> Result<Asset> {
    let asset = match decode_png(bytes) {
        Ok(asset) => asset,
        Err(png_err) => {
            debug!(%png_err, "PNG decode failed, trying JPEG");
            decode_jpeg(bytes).map_err(|jpeg_err| {
                LetterheadError::UnsupportedImageFormat(format!(
                    "bytes decode as neither PNG ({png_err}) nor JPEG ({jpeg_err})"
                ))
            })?
        }
    };

    if asset.width() == 0 || asset.height() == 0 {
        return Err(LetterheadError::UnsupportedImageFormat(format!(
            "{} image has zero size ({}x{})",
            asset.format,
            asset.width(),
            asset.height()
        )));
    }

    debug!(
        format = %asset.format,
        width = asset.width(),
        height = asset.height(),
        color = ?asset.color,
        has_alpha = asset.has_alpha,
        "Asset detected"
    );
    Ok(asset)
}

fn decode_png(bytes: &[u8]) -> std::result::Result<Asset, ImageError> {
    let pixels = image::load_from_memory_with_format(bytes, image::ImageFormat::Png)?;
    let color_type = pixels.color();
    let color = if color_type.has_color() {
        ColorModel::Rgb
    } else {
        ColorModel::Gray
    };

    Ok(Asset {
        bytes: bytes.to_vec(),
        format: ImageFormat::Png,
        color,
        has_alpha: color_type.has_alpha(),
        pixels,
    })
}

fn decode_jpeg(bytes: &[u8]) -> std::result::Result<Asset, ImageError> {
    let decoder = JpegDecoder::new(Cursor::new(bytes))?;
    // The decoder reports RGB for CMYK sources. The compressed bytes go in
    // verbatim, so the colour space comes from the frame header instead.
    let color = match frame_components(bytes) {
        Some(4) => ColorModel::Cmyk,
        Some(1) => ColorModel::Gray,
        _ => match decoder.color_type() {
            ColorType::L8 | ColorType::L16 => ColorModel::Gray,
            _ => ColorModel::Rgb,
        },
    };
    let pixels = DynamicImage::from_decoder(decoder)?;

    Ok(Asset {
        bytes: bytes.to_vec(),
        format: ImageFormat::Jpeg,
        color,
        has_alpha: false,
        pixels,
    })
}

/// Component count from the first start-of-frame segment, walking the
/// marker segments that precede it.
fn frame_components(bytes: &[u8]) -> Option<u8> {
    if !bytes.starts_with(&[0xFF, 0xD8]) {
        return None;
    }
    let mut pos = 2;
    loop {
        if *bytes.get(pos)? != 0xFF {
            return None;
        }
        let marker = *bytes.get(pos + 1)?;
        match marker {
            // Fill bytes before a marker.
            0xFF => {
                pos += 1;
                continue;
            }
            // Standalone markers carry no length.
            0x01 | 0xD0..=0xD7 => {
                pos += 2;
                continue;
            }
            // End of image or start of scan before any frame.
            0xD9 | 0xDA => return None,
            _ => {}
        }
        let length = usize::from(u16::from_be_bytes([*bytes.get(pos + 2)?, *bytes.get(pos + 3)?]));
        // SOF0..SOF15, minus DHT (C4), JPG (C8) and DAC (CC).
        if matches!(marker, 0xC0..=0xCF) && !matches!(marker, 0xC4 | 0xC8 | 0xCC) {
            // length(2) precision(1) height(2) width(2) components(1)
            return bytes.get(pos + 9).copied();
        }
        pos += 2 + length;
    }
}
