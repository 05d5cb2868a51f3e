// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for the people who hand Letterhead a report
// and expect a branded copy back.
//
// Every technical error is mapped to plain English with a clear suggestion.

use crate::error::LetterheadError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Network blip or timeout; trying again may work.
    Transient,
    /// The user must supply a different file or setting.
    ActionRequired,
    /// Cannot be fixed by retrying or by the user (internal failure).
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary.
    pub message: String,
    /// What the user should try.
    pub suggestion: String,
    /// Whether running the same command again could succeed.
    pub retriable: bool,
    pub severity: Severity,
}

/// Convert a `LetterheadError` into a `HumanError`.
pub fn humanize_error(err: &LetterheadError) -> HumanError {
    match err {
        LetterheadError::MalformedInputDocument(detail) => {
            if detail.contains("encrypted") {
                HumanError {
                    message: "The PDF is password protected.".into(),
                    suggestion: "Remove the password from the document, then try again.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            } else {
                HumanError {
                    message: "The file you chose doesn't look like a PDF we can open.".into(),
                    suggestion: "Check that the file is a complete PDF (not a link page or a partial download).".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            }
        }

        LetterheadError::UnsupportedImageFormat(detail) => HumanError {
            message: "One of the branding images can't be used.".into(),
            suggestion: format!("Logo and footer images must be PNG or JPEG files. (Detail: {detail})"),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        LetterheadError::QrEncoding(detail) => HumanError {
            message: "We couldn't make a QR code from that text.".into(),
            suggestion: format!("Use a shorter, non-empty link for the QR code. (Detail: {detail})"),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        LetterheadError::SerializationFailure(_) => HumanError {
            message: "Something went wrong while saving the branded PDF.".into(),
            suggestion: "Nothing was written. Please report this problem together with the input file.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        LetterheadError::InvalidConfig(detail) => HumanError {
            message: "The layout settings file has a mistake.".into(),
            suggestion: format!("Fix the setting and run again. (Detail: {detail})"),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        LetterheadError::Json(detail) => HumanError {
            message: "The layout settings file isn't valid JSON.".into(),
            suggestion: format!("Check the file for typos such as missing commas or quotes. (Detail: {detail})"),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        LetterheadError::Import(detail) => humanize_import_error(detail),

        LetterheadError::Io(io_err) => match io_err.kind() {
            std::io::ErrorKind::NotFound => HumanError {
                message: "A file you named couldn't be found.".into(),
                suggestion: "Check the file paths and try again.".into(),
                retriable: false,
                severity: Severity::ActionRequired,
            },
            std::io::ErrorKind::PermissionDenied => HumanError {
                message: "We aren't allowed to read or write one of the files.".into(),
                suggestion: "Check the file permissions, or choose a different output folder.".into(),
                retriable: false,
                severity: Severity::ActionRequired,
            },
            _ => HumanError {
                message: "There was a problem reading or writing a file.".into(),
                suggestion: format!("Try again. (Detail: {io_err})"),
                retriable: true,
                severity: Severity::Transient,
            },
        },
    }
}

/// Humanize remote import failures by inspecting the detail string.
fn humanize_import_error(detail: &str) -> HumanError {
    let lower = detail.to_ascii_lowercase();

    if lower.contains("404") || lower.contains("403") || lower.contains("401") {
        HumanError {
            message: "The link doesn't lead to a file we're allowed to download.".into(),
            suggestion: "Make sure the document is shared publicly (\"Anyone with the link\").".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        }
    } else if lower.contains("url") && lower.contains("required") {
        HumanError {
            message: "No link was given.".into(),
            suggestion: "Paste a Google Drive share link or a direct PDF link.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        }
    } else {
        HumanError {
            message: "We couldn't download the document.".into(),
            suggestion: format!("Check your internet connection and try again. (Detail: {detail})"),
            retriable: true,
            severity: Severity::Transient,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encrypted_pdf_is_action_required() {
        let err = LetterheadError::MalformedInputDocument("document is encrypted".into());
        let human = humanize_error(&err);
        assert_eq!(human.severity, Severity::ActionRequired);
        assert!(human.message.contains("password"));
    }

    #[test]
    fn serialization_failure_is_permanent() {
        let human = humanize_error(&LetterheadError::SerializationFailure("disk".into()));
        assert_eq!(human.severity, Severity::Permanent);
        assert!(!human.retriable);
    }

    #[test]
    fn unsupported_image_mentions_formats() {
        let err = LetterheadError::UnsupportedImageFormat("logo: not PNG or JPEG".into());
        let human = humanize_error(&err);
        assert!(human.suggestion.contains("PNG or JPEG"));
    }

    #[test]
    fn network_failure_is_transient() {
        let err = LetterheadError::Import("connection reset by peer".into());
        let human = humanize_error(&err);
        assert_eq!(human.severity, Severity::Transient);
        assert!(human.retriable);
    }

    #[test]
    fn forbidden_link_is_action_required() {
        let err = LetterheadError::Import("server answered 403 Forbidden".into());
        let human = humanize_error(&err);
        assert_eq!(human.severity, Severity::ActionRequired);
    }

    #[test]
    fn missing_file_is_action_required() {
        let err = LetterheadError::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        let human = humanize_error(&err);
        assert_eq!(human.severity, Severity::ActionRequired);
    }
}
