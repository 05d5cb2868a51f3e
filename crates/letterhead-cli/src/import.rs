// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Remote document importer.
//
// Google Drive share links (`…/file/d/{id}/view…`) point at an HTML preview
// page, not the file. They are rewritten to the direct-download endpoint
// before fetching; every other URL is fetched as given.

use std::time::Duration;

use letterhead_core::error::{LetterheadError, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

const SHARE_LINK_MARKER: &str = "/file/d/";
const DRIVE_DOWNLOAD_PREFIX: &str = "https://drive.google.com/uc?export=download&id=";

/// Timeout for the whole download.
const FETCH_TIMEOUT_SECS: u64 = 60;

/// Machine-readable import failure, printed to stderr as `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportFailure {
    pub error: String,
}

impl ImportFailure {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| r#"{"error":"import failed"}"#.to_string())
    }
}

/// Rewrite a Drive share link to its direct-download form. The first
/// `/file/d/` followed by a non-empty id (`[A-Za-z0-9_-]+`) wins; other URLs
/// are returned unchanged.
pub fn rewrite_share_link(url: &str) -> String {
    for (start, _) in url.match_indices(SHARE_LINK_MARKER) {
        let rest = &url[start + SHARE_LINK_MARKER.len()..];
        let id_len = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == '-'))
            .unwrap_or(rest.len());
        if id_len > 0 {
            return format!("{DRIVE_DOWNLOAD_PREFIX}{}", &rest[..id_len]);
        }
    }
    url.to_string()
}

/// Download the document behind `url`.
///
/// An empty URL, a transport failure, and any non-2xx status are all
/// reported as `LetterheadError::Import`.
#[instrument(skip_all, fields(url = %url))]
pub async fn fetch_document(url: &str) -> Result<Vec<u8>> {
    let url = url.trim();
    if url.is_empty() {
        return Err(LetterheadError::Import("URL is required".into()));
    }

    let target = rewrite_share_link(url);
    if target != url {
        debug!(target = %target, "Share link rewritten to direct download");
    }

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
        .build()
        .map_err(|err| LetterheadError::Import(format!("cannot build HTTP client: {err}")))?;

    let response = client
        .get(&target)
        .send()
        .await
        .map_err(|err| LetterheadError::Import(format!("Failed to fetch PDF: {err}")))?;

    let status = response.status();
    if !status.is_success() {
        return Err(LetterheadError::Import(format!(
            "Failed to fetch PDF: {status}"
        )));
    }

    let body = response
        .bytes()
        .await
        .map_err(|err| LetterheadError::Import(format!("Failed to fetch PDF: {err}")))?;

    info!(bytes = body.len(), "Remote document downloaded");
    Ok(body.to_vec())
}
