// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Branding engine — one synchronous, all-or-nothing pass over a document.
//
// Pipeline: detect every supplied asset (and render the QR code), load the
// input PDF, embed each asset once, draw every asset on every page at its
// page-relative placement, then serialise. Any failure aborts the whole call
// and no output bytes are produced.

use letterhead_core::config::EngineConfig;
use letterhead_core::error::{LetterheadError, Result};
use letterhead_core::{AssetRole, ImageFormat};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::asset::detect::{Asset, detect};
use crate::integrity::hash_bytes;
use crate::pdf::{DocumentSerializer, PageCompositor, embed, reader};
use crate::placement::PlacementCalculator;
use crate::qr::QrGenerator;

/// The optional branding inputs for one call. Bytes are borrowed; the engine
/// never performs I/O.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrandAssets<'a> {
    pub logo: Option<&'a [u8]>,
    pub footer: Option<&'a [u8]>,
    pub qr_payload: Option<&'a str>,
}

impl<'a> BrandAssets<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_logo(mut self, bytes: &'a [u8]) -> Self {
        self.logo = Some(bytes);
        self
    }

    pub fn with_footer(mut self, bytes: &'a [u8]) -> Self {
        self.footer = Some(bytes);
        self
    }

    pub fn with_qr(mut self, payload: &'a str) -> Self {
        self.qr_payload = Some(payload);
        self
    }

    /// `true` when no asset at all was supplied.
    pub fn is_empty(&self) -> bool {
        self.logo.is_none() && self.footer.is_none() && self.qr_payload.is_none()
    }
}

/// Fingerprint of one asset that was drawn.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetSummary {
    pub role: AssetRole,
    pub format: ImageFormat,
    pub mime_type: &'static str,
    pub width: u32,
    pub height: u32,
    pub sha256: String,
}

/// What a branding pass did.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrandingReport {
    pub page_count: usize,
    pub overlays_drawn: usize,
    pub assets: Vec<AssetSummary>,
    pub input_sha256: String,
    pub output_sha256: String,
}

/// Output of [`BrandingEngine::brand`].
#[derive(Debug, Clone)]
pub struct BrandedDocument {
    pub bytes: Vec<u8>,
    pub report: BrandingReport,
}

/// Configured branding engine. Holds no per-document state, so one engine
/// can brand any number of documents.
#[derive(Debug, Clone)]
pub struct BrandingEngine {
    config: EngineConfig,
    placement: PlacementCalculator,
    qr: QrGenerator,
}

impl BrandingEngine {
    /// Build an engine, rejecting invalid configuration up front.
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            placement: PlacementCalculator::new(config.layout.clone()),
            qr: QrGenerator::new(config.qr_render.clone()),
            config,
        })
    }

    /// Overlay `assets` on every page of `input`.
    #[instrument(
        skip_all,
        fields(
            input_len = input.len(),
            logo = assets.logo.is_some(),
            footer = assets.footer.is_some(),
            qr = assets.qr_payload.is_some()
        )
    )]
    pub fn brand(&self, input: &[u8], assets: &BrandAssets<'_>) -> Result<BrandedDocument> {
        let prepared = self.prepare_assets(assets)?;

        let mut document = reader::load(input)?;
        let pages = reader::pages(&document);

        let mut embedded = Vec::with_capacity(prepared.len());
        for (role, asset) in &prepared {
            embedded.push(embed(&mut document, *role, asset)?);
        }

        let mut compositor = PageCompositor::new();
        for page in &pages {
            for image in &embedded {
                let rect = self
                    .placement
                    .place(image.role, page.size, image.width, image.height);
                if !rect.fits_within(page.size) {
                    debug!(page = page.number, role = %image.role, "Overlay extends past the page edge");
                }
                compositor.composite(&mut document, page, image, rect)?;
            }
        }

        let serializer = if self.config.update_metadata {
            DocumentSerializer::with_metadata(self.config.producer.clone())
        } else {
            DocumentSerializer::plain()
        };
        let bytes = serializer.save(&mut document)?;

        let report = BrandingReport {
            page_count: pages.len(),
            overlays_drawn: compositor.draws(),
            assets: prepared
                .iter()
                .map(|(role, asset)| AssetSummary {
                    role: *role,
                    format: asset.format(),
                    mime_type: asset.format().mime_type(),
                    width: asset.width(),
                    height: asset.height(),
                    sha256: hash_bytes(asset.bytes()),
                })
                .collect(),
            input_sha256: hash_bytes(input),
            output_sha256: hash_bytes(&bytes),
        };

        info!(
            pages = report.page_count,
            overlays = report.overlays_drawn,
            output_bytes = bytes.len(),
            "Document branded"
        );
        Ok(BrandedDocument { bytes, report })
    }

    /// Decode the supplied assets in draw order: logo, footer, QR code.
    fn prepare_assets(&self, assets: &BrandAssets<'_>) -> Result<Vec<(AssetRole, Asset)>> {
        let mut prepared = Vec::with_capacity(AssetRole::ALL.len());

        for role in AssetRole::ALL {
            let asset = match role {
                AssetRole::Logo => assets.logo.map(|bytes| detect_role(role, bytes)),
                AssetRole::Footer => assets.footer.map(|bytes| detect_role(role, bytes)),
                AssetRole::Qr => assets.qr_payload.map(|payload| self.qr.generate(payload)),
            };
            if let Some(asset) = asset {
                let asset = asset?;
                debug!(
                    %role,
                    format = %asset.format(),
                    width = asset.width(),
                    height = asset.height(),
                    "Asset ready"
                );
                prepared.push((role, asset));
            }
        }

        if prepared.is_empty() {
            warn!("No branding assets supplied, document will only be re-serialised");
        }
        Ok(prepared)
    }
}

/// Run format detection, naming the asset's role in any failure.
fn detect_role(role: AssetRole, bytes: &[u8]) -> Result<Asset> {
    detect(bytes).map_err(|err| match err {
        LetterheadError::UnsupportedImageFormat(detail) => {
            LetterheadError::UnsupportedImageFormat(format!("{role}: {detail}"))
        }
        other => other,
    })
}

/// Brand `input` with default configuration and return the new PDF bytes.
///
/// Absent assets are simply not drawn. Fails with `MalformedInputDocument`,
/// `UnsupportedImageFormat`, `QrEncoding`, or `SerializationFailure`.
pub fn process(
    input: &[u8],
    logo: Option<&[u8]>,
    footer: Option<&[u8]>,
    qr_payload: Option<&str>,
) -> Result<Vec<u8>> {
    let engine = BrandingEngine::new(EngineConfig::default())?;
    let assets = BrandAssets {
        logo,
        footer,
        qr_payload,
    };
    Ok(engine.brand(input, &assets)?.bytes)
}
