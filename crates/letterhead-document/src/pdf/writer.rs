// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document serializer — write the mutated document back out as PDF bytes.
//
// The whole document is re-serialised by lopdf; original objects keep their
// content and page order, and every overlay stream was appended after the
// original content by the compositor.

use chrono::{DateTime, Utc};
use letterhead_core::error::{LetterheadError, Result};
use lopdf::{Dictionary, Document, Object, ObjectId};
use tracing::{debug, instrument};

/// Serialises branded documents.
#[derive(Debug, Clone)]
pub struct DocumentSerializer {
    /// When set, /Producer and /ModDate are stamped into the info dictionary.
    producer: Option<String>,
}

impl DocumentSerializer {
    /// Serializer that stamps `producer` and the current time.
    pub fn with_metadata(producer: impl Into<String>) -> Self {
        Self {
            producer: Some(producer.into()),
        }
    }

    /// Serializer that leaves the info dictionary untouched.
    pub fn plain() -> Self {
        Self { producer: None }
    }

    /// Encode `document` to bytes.
    #[instrument(skip_all, fields(objects = document.objects.len()))]
    pub fn save(&self, document: &mut Document) -> Result<Vec<u8>> {
        if let Some(producer) = &self.producer {
            stamp_metadata(document, producer, Utc::now())?;
        }

        let mut output = Vec::new();
        document.save_to(&mut output).map_err(|err| {
            LetterheadError::SerializationFailure(format!("failed to write PDF: {err}"))
        })?;

        debug!(output_bytes = output.len(), "Document serialised");
        Ok(output)
    }
}

/// PDF date string (`D:YYYYMMDDHHmmSS+00'00'`).
fn pdf_date(when: DateTime<Utc>) -> String {
    when.format("D:%Y%m%d%H%M%S+00'00'").to_string()
}

/// Where the trailer keeps the document information dictionary.
enum InfoSlot {
    Indirect(ObjectId),
    Inline,
    Missing,
}

fn stamp_metadata(document: &mut Document, producer: &str, when: DateTime<Utc>) -> Result<()> {
    let slot = match document.trailer.get(b"Info") {
        Ok(Object::Reference(id)) if document.get_dictionary(*id).is_ok() => InfoSlot::Indirect(*id),
        Ok(Object::Dictionary(_)) => InfoSlot::Inline,
        // Absent or dangling.
        _ => InfoSlot::Missing,
    };

    let info_id = match slot {
        InfoSlot::Indirect(id) => Some(id),
        InfoSlot::Inline => None,
        InfoSlot::Missing => {
            let fresh = document.add_object(Dictionary::new());
            document.trailer.set("Info", Object::Reference(fresh));
            Some(fresh)
        }
    };

    let info = match info_id {
        Some(id) => document.get_dictionary_mut(id),
        None => document.trailer.get_mut(b"Info").and_then(|obj| obj.as_dict_mut()),
    }
    .map_err(|err| LetterheadError::SerializationFailure(format!("cannot update /Info: {err}")))?;

    info.set("Producer", Object::string_literal(producer));
    info.set("ModDate", Object::string_literal(pdf_date(when)));
    Ok(())
}
