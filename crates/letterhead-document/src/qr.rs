// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// QR generator — renders a payload (typically a verification URL) as a square
// grayscale PNG and feeds it back through format detection, so a generated
// QR code is embedded exactly like a user-supplied asset.

use std::io::Cursor;

use image::{DynamicImage, GrayImage, Luma};
use letterhead_core::config::{QrErrorCorrection, QrRenderConfig};
use letterhead_core::error::{LetterheadError, Result};
use qrcode::{Color, EcLevel, QrCode};
use tracing::{debug, instrument};

use crate::asset::detect::{Asset, detect};

/// Largest raster side the generator will allocate.
const MAX_SIDE_PIXELS: u32 = 16_384;

const DARK: Luma<u8> = Luma([0]);
const LIGHT: Luma<u8> = Luma([255]);

/// Deterministic QR code rasteriser.
#[derive(Debug, Clone, Default)]
pub struct QrGenerator {
    config: QrRenderConfig,
}

impl QrGenerator {
    pub fn new(config: QrRenderConfig) -> Self {
        Self { config }
    }

    /// Encode `payload` and return it as a PNG asset.
    ///
    /// Fails with `QrEncoding` when the payload is empty or does not fit in
    /// the largest QR symbol at the configured error-correction level.
    #[instrument(skip(self, payload), fields(payload_len = payload.len()))]
    pub fn generate(&self, payload: &str) -> Result<Asset> {
        if payload.is_empty() {
            return Err(LetterheadError::QrEncoding("payload is empty".into()));
        }

        let code = QrCode::with_error_correction_level(
            payload.as_bytes(),
            ec_level(self.config.error_correction),
        )
        .map_err(|err| {
            LetterheadError::QrEncoding(format!(
                "cannot encode {} byte payload: {err}",
                payload.len()
            ))
        })?;

        let png = self.rasterise(&code)?;
        debug!(
            modules = code.width(),
            png_bytes = png.len(),
            "QR symbol rendered"
        );
        detect(&png)
    }

    /// Draw the symbol with square modules and a white quiet zone, then
    /// encode it as PNG.
    fn rasterise(&self, code: &QrCode) -> Result<Vec<u8>> {
        let modules = code.width() as u32;
        let colors = code.to_colors();
        let scale = self.config.module_pixels.max(1);
        let quiet = self.config.quiet_zone;
        let side = quiet
            .checked_mul(2)
            .and_then(|border| border.checked_add(modules))
            .and_then(|span| span.checked_mul(scale))
            .filter(|side| *side <= MAX_SIDE_PIXELS)
            .ok_or_else(|| {
                LetterheadError::QrEncoding(format!(
                    "{modules} modules with a {quiet}-module quiet zone at {scale}px per module \
                     exceeds {MAX_SIDE_PIXELS}px"
                ))
            })?;

        let image = GrayImage::from_fn(side, side, |x, y| {
            let mx = (x / scale).checked_sub(quiet);
            let my = (y / scale).checked_sub(quiet);
            match (mx, my) {
                (Some(mx), Some(my)) if mx < modules && my < modules => {
                    let idx = (my * modules + mx) as usize;
                    if matches!(colors.get(idx), Some(Color::Dark)) {
                        DARK
                    } else {
                        LIGHT
                    }
                }
                _ => LIGHT,
            }
        });

        let mut buffer = Vec::new();
        DynamicImage::ImageLuma8(image)
            .write_to(&mut Cursor::new(&mut buffer), image::ImageFormat::Png)
            .map_err(|err| LetterheadError::QrEncoding(format!("PNG encoding failed: {err}")))?;
        Ok(buffer)
    }
}

fn ec_level(level: QrErrorCorrection) -> EcLevel {
    match level {
        QrErrorCorrection::L => EcLevel::L,
        QrErrorCorrection::M => EcLevel::M,
        QrErrorCorrection::Q => EcLevel::Q,
        QrErrorCorrection::H => EcLevel::H,
    }
}
