// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Engine configuration. The defaults are the placement policy values the
// overlay layout was designed around; a JSON file may override any subset.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{LetterheadError, Result};

/// Top-level engine settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Page-relative geometry for every asset role.
    pub layout: LayoutConfig,
    /// How generated QR codes are rasterised.
    pub qr_render: QrRenderConfig,
    /// Stamp /Producer and /ModDate into the document info dictionary.
    pub update_metadata: bool,
    /// Value written to /Producer when `update_metadata` is set.
    pub producer: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            qr_render: QrRenderConfig::default(),
            update_metadata: true,
            producer: "letterhead".to_string(),
        }
    }
}

impl EngineConfig {
    /// Parse a configuration from JSON. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&text)
    }

    /// Reject values that would produce NaN, infinite, or inverted geometry.
    pub fn validate(&self) -> Result<()> {
        let layout = &self.layout;
        positive("header_height", layout.header_height)?;
        positive("logo.max_width", layout.logo.max_width)?;
        positive("logo.max_height", layout.logo.max_height)?;
        non_negative("logo.right_margin", layout.logo.right_margin)?;
        finite("logo.top_padding", layout.logo.top_padding)?;
        positive("footer.draw_height", layout.footer.draw_height)?;
        non_negative("footer.bottom_margin", layout.footer.bottom_margin)?;
        positive("qr.size", layout.qr.size)?;
        non_negative("qr.left_margin", layout.qr.left_margin)?;

        let qr = &self.qr_render;
        if !(1..=MAX_QR_MODULE_PIXELS).contains(&qr.module_pixels) {
            return Err(LetterheadError::InvalidConfig(format!(
                "qr_render.module_pixels must be between 1 and {MAX_QR_MODULE_PIXELS}, got {}",
                qr.module_pixels
            )));
        }
        if qr.quiet_zone > MAX_QR_QUIET_ZONE {
            return Err(LetterheadError::InvalidConfig(format!(
                "qr_render.quiet_zone must be at most {MAX_QR_QUIET_ZONE}, got {}",
                qr.quiet_zone
            )));
        }
        Ok(())
    }
}

/// Upper bound on QR module size in pixels. A version 40 symbol at this
/// scale with the widest quiet zone is 13 376 pixels square.
pub const MAX_QR_MODULE_PIXELS: u32 = 64;

/// Upper bound on the QR quiet zone, in modules.
pub const MAX_QR_QUIET_ZONE: u32 = 16;

fn finite(name: &str, value: f32) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(LetterheadError::InvalidConfig(format!(
            "{name} must be a finite number, got {value}"
        )))
    }
}

fn positive(name: &str, value: f32) -> Result<()> {
    finite(name, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(LetterheadError::InvalidConfig(format!(
            "{name} must be greater than zero, got {value}"
        )))
    }
}

fn non_negative(name: &str, value: f32) -> Result<()> {
    finite(name, value)?;
    if value >= 0.0 {
        Ok(())
    } else {
        Err(LetterheadError::InvalidConfig(format!(
            "{name} must not be negative, got {value}"
        )))
    }
}

/// Geometry shared by all placement policies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Height of the band at the top of each page reserved for logo and QR.
    pub header_height: f32,
    pub logo: LogoPolicy,
    pub footer: FooterPolicy,
    pub qr: QrPolicy,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            header_height: 150.0,
            logo: LogoPolicy::default(),
            footer: FooterPolicy::default(),
            qr: QrPolicy::default(),
        }
    }
}

/// Top-right logo, scaled to fit `max_width` x `max_height`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogoPolicy {
    pub max_width: f32,
    pub max_height: f32,
    /// Gap between the logo and the right page edge.
    pub right_margin: f32,
    /// Added to the vertically centred position inside the header band.
    pub top_padding: f32,
}

impl Default for LogoPolicy {
    fn default() -> Self {
        Self {
            max_width: 300.0,
            max_height: 240.0,
            right_margin: 1.0,
            top_padding: 5.0,
        }
    }
}

/// Bottom-centre footer, scaled so its drawn height is exactly `draw_height`.
///
/// The draw height does not depend on the page height: on pages shorter than
/// `draw_height + bottom_margin` the footer extends past the visible area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FooterPolicy {
    pub draw_height: f32,
    pub bottom_margin: f32,
}

impl Default for FooterPolicy {
    fn default() -> Self {
        Self {
            draw_height: 850.0,
            bottom_margin: 20.0,
        }
    }
}

/// Fixed-size square QR code on the left of the header band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QrPolicy {
    pub size: f32,
    pub left_margin: f32,
}

impl Default for QrPolicy {
    fn default() -> Self {
        Self {
            size: 70.0,
            left_margin: 20.0,
        }
    }
}

/// QR error-correction level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QrErrorCorrection {
    /// ~7% recovery.
    L,
    /// ~15% recovery.
    M,
    /// ~25% recovery.
    Q,
    /// ~30% recovery.
    H,
}

/// Rasterisation settings for generated QR codes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QrRenderConfig {
    pub error_correction: QrErrorCorrection,
    /// Edge length of one QR module in pixels.
    pub module_pixels: u32,
    /// White border width, in modules, on every side of the symbol.
    pub quiet_zone: u32,
}

impl Default for QrRenderConfig {
    fn default() -> Self {
        Self {
            error_correction: QrErrorCorrection::M,
            module_pixels: 8,
            quiet_zone: 4,
        }
    }
}
