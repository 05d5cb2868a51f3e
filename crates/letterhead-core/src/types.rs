// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Letterhead overlay engine.

use serde::{Deserialize, Serialize};

/// Raster formats the engine can embed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImageFormat {
    Png,
    Jpeg,
}

impl ImageFormat {
    /// MIME type string, as listed per asset in the branding report.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
        }
    }
}

impl std::fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Png => write!(f, "PNG"),
            Self::Jpeg => write!(f, "JPEG"),
        }
    }
}

/// Which slot an asset fills. Selects both the placement policy and the
/// resource name the image is registered under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetRole {
    /// Top-right of the header band, scaled to fit a bounding box.
    Logo,
    /// Bottom-centre, scaled to a fixed draw height.
    Footer,
    /// Left side of the header band, fixed square size.
    Qr,
}

impl AssetRole {
    /// All roles in the order they are drawn on a page.
    pub const ALL: [AssetRole; 3] = [AssetRole::Logo, AssetRole::Footer, AssetRole::Qr];

    /// Base name for the image XObject in a page's resource dictionary.
    pub fn resource_name(&self) -> &'static str {
        match self {
            Self::Logo => "LhLogo",
            Self::Footer => "LhFooter",
            Self::Qr => "LhQr",
        }
    }
}

impl std::fmt::Display for AssetRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Logo => write!(f, "logo"),
            Self::Footer => write!(f, "footer"),
            Self::Qr => write!(f, "QR code"),
        }
    }
}

/// Page dimensions in PDF user-space units (1/72 inch).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSize {
    pub width: f32,
    pub height: f32,
}

impl PageSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// US Letter, used when a page carries no usable media box.
    pub fn letter() -> Self {
        Self::new(612.0, 792.0)
    }
}

/// A draw rectangle in page user space, origin bottom-left.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlacementRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl PlacementRect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Width divided by height.
    pub fn aspect_ratio(&self) -> f32 {
        self.width / self.height
    }

    /// X coordinate of the right edge.
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Y coordinate of the top edge.
    pub fn top(&self) -> f32 {
        self.y + self.height
    }

    /// Shift the rectangle by `(dx, dy)`.
    pub fn translate(self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
    }

    /// Whether the rectangle lies entirely inside a page of the given size.
    pub fn fits_within(&self, page: PageSize) -> bool {
        self.x >= 0.0 && self.y >= 0.0 && self.right() <= page.width && self.top() <= page.height
    }
}
