// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Placement calculator — page-relative draw rectangles for each asset role.
//
// Every policy is a pure function of the page size and the asset's intrinsic
// pixel size. Nothing is cached: pages in one document may differ in size and
// each one is measured on its own.

use letterhead_core::config::LayoutConfig;
use letterhead_core::{AssetRole, PageSize, PlacementRect};

/// Computes draw rectangles from a [`LayoutConfig`].
#[derive(Debug, Clone, Default)]
pub struct PlacementCalculator {
    layout: LayoutConfig,
}

impl PlacementCalculator {
    pub fn new(layout: LayoutConfig) -> Self {
        Self { layout }
    }

    /// Dispatch to the policy for `role`.
    pub fn place(&self, role: AssetRole, page: PageSize, asset_w: u32, asset_h: u32) -> PlacementRect {
        match role {
            AssetRole::Logo => self.logo(page, asset_w, asset_h),
            AssetRole::Footer => self.footer(page, asset_w, asset_h),
            AssetRole::Qr => self.qr(page),
        }
    }

    /// Top-right logo: uniformly scaled to fit the logo box (upscaling small
    /// logos too), right-aligned, vertically centred in the header band and
    /// nudged up by the top padding.
    pub fn logo(&self, page: PageSize, asset_w: u32, asset_h: u32) -> PlacementRect {
        let policy = &self.layout.logo;
        let band = self.layout.header_height;
        let (asset_w, asset_h) = (asset_w as f32, asset_h as f32);

        let scale = (policy.max_width / asset_w).min(policy.max_height / asset_h);
        let width = asset_w * scale;
        let height = asset_h * scale;

        let band_bottom = page.height - band;
        PlacementRect::new(
            page.width - width - policy.right_margin,
            band_bottom + (band - height) / 2.0 + policy.top_padding,
            width,
            height,
        )
    }

    /// Bottom-centre footer scaled to a fixed draw height.
    ///
    /// The draw height ignores the page height, so on short pages the footer
    /// runs past the top of the page. It is drawn as computed, never clipped.
    pub fn footer(&self, page: PageSize, asset_w: u32, asset_h: u32) -> PlacementRect {
        let policy = &self.layout.footer;
        let scale = policy.draw_height / asset_h as f32;
        let width = asset_w as f32 * scale;

        PlacementRect::new(
            (page.width - width) / 2.0,
            policy.bottom_margin,
            width,
            policy.draw_height,
        )
    }

    /// Fixed-size square QR code, left-aligned and vertically centred in the
    /// header band. The symbol's pixel size plays no part.
    pub fn qr(&self, page: PageSize) -> PlacementRect {
        let policy = &self.layout.qr;
        let band = self.layout.header_height;

        PlacementRect::new(
            policy.left_margin,
            (page.height - band) + (band - policy.size) / 2.0,
            policy.size,
            policy.size,
        )
    }
}
