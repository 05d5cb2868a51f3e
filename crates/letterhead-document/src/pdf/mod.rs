// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF module — loading, image embedding, page compositing, and serialisation.

pub mod compositor;
pub mod embed;
pub mod reader;
pub mod writer;

pub use compositor::PageCompositor;
pub use embed::{EmbeddedImage, embed};
pub use reader::PageGeometry;
pub use writer::DocumentSerializer;
