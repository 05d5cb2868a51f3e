// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Asset loader — fetch the raw bytes the engine works on. Runs before the
// engine call; the engine itself never touches the filesystem or network.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use letterhead_core::error::{LetterheadError, Result};
use tracing::debug;

use crate::import;

/// Logo looked up in an assets directory when no explicit file is given.
pub const DEFAULT_LOGO: &str = "Logo.png";
/// Footer looked up in an assets directory when no explicit file is given.
pub const DEFAULT_FOOTER: &str = "Footer.png";

/// Where the input document comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    File(PathBuf),
    Url(String),
}

/// Read the input document from disk or import it from a URL.
pub async fn load_input(source: &InputSource) -> Result<Vec<u8>> {
    match source {
        InputSource::File(path) => read_file(path).await,
        InputSource::Url(url) => import::fetch_document(url).await,
    }
}

/// Read an optional asset.
///
/// An explicit path must exist. Without one, `default_name` is looked up in
/// `assets_dir`, and a missing default file just means no asset.
pub async fn read_asset(
    explicit: Option<&Path>,
    assets_dir: Option<&Path>,
    default_name: &str,
) -> Result<Option<Vec<u8>>> {
    match (explicit, assets_dir) {
        (Some(path), _) => read_file(path).await.map(Some),
        (None, Some(dir)) => read_if_present(&dir.join(default_name)).await,
        (None, None) => Ok(None),
    }
}

async fn read_if_present(path: &Path) -> Result<Option<Vec<u8>>> {
    match read_file(path).await {
        Ok(bytes) => Ok(Some(bytes)),
        Err(LetterheadError::Io(err)) if err.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "Default asset not present, skipping");
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

async fn read_file(path: &Path) -> Result<Vec<u8>> {
    let bytes = tokio::fs::read(path).await?;
    debug!(path = %path.display(), bytes = bytes.len(), "File loaded");
    Ok(bytes)
}
