// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Asset module — trial-decode format detection for raster branding assets.

pub mod detect;

pub use detect::{Asset, ColorModel, detect};
