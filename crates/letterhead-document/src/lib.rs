// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// letterhead-document — the branding overlay engine.
//
// Decodes an input PDF and up to three raster assets (logo, footer, generated
// QR code), computes per-page placement geometry, embeds each asset once as an
// image XObject, draws it on every page, and re-serialises the document.

pub mod asset;
pub mod engine;
pub mod integrity;
pub mod pdf;
pub mod placement;
pub mod qr;

#[cfg(test)]
pub(crate) mod fixtures;

// Re-export the primary items so callers can use `letterhead_document::process` etc.
pub use asset::detect::{Asset, ColorModel, detect};
pub use engine::{BrandAssets, BrandedDocument, BrandingEngine, BrandingReport, process};
pub use placement::PlacementCalculator;
pub use qr::QrGenerator;
