//! Delimited-block extraction engine.
//!
//! The interview assistant emits the finished resume between two literal
//! marker tokens somewhere inside its free-form replies. This module finds
//! that block in an arbitrary (possibly still-growing) text and exposes it
//! as an [`ArtifactState`]. The engine knows nothing about resumes, sessions
//! or HTTP; it is a pair of substring searches over a string, so the same
//! code serves any delimiter-bounded-block use case.
//!
//! There is deliberately no error path here: any input, however partial
//! or garbled, maps to a well-formed state.

use thiserror::Error;

/// Preview text shown while no artifact has been extracted yet.
pub const UNAVAILABLE_PLACEHOLDER: &str =
    "Your resume preview will appear here once the assistant generates it.";

/// The literal start/end tokens bounding an artifact inside free-form text.
///
/// Configured once per session; the markers must be distinct and non-empty,
/// which [`DelimiterPair::new`] enforces so a bad deployment fails at
/// startup instead of silently never extracting anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelimiterPair {
    start: String,
    end: String,
}

/// Rejected marker configurations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidDelimiterPair {
    #[error("start marker must not be empty")]
    EmptyStart,

    #[error("end marker must not be empty")]
    EmptyEnd,

    #[error("start and end markers must differ")]
    IdenticalMarkers,
}

impl DelimiterPair {
    pub fn new(
        start: impl Into<String>,
        end: impl Into<String>,
    ) -> Result<Self, InvalidDelimiterPair> {
        let start = start.into();
        let end = end.into();

        if start.is_empty() {
            return Err(InvalidDelimiterPair::EmptyStart);
        }
        if end.is_empty() {
            return Err(InvalidDelimiterPair::EmptyEnd);
        }
        if start == end {
            return Err(InvalidDelimiterPair::IdenticalMarkers);
        }

        Ok(Self { start, end })
    }

    pub fn start(&self) -> &str {
        &self.start
    }

    pub fn end(&self) -> &str {
        &self.end
    }
}

/// The latest extraction outcome for a session.
///
/// `Unavailable` is a first-class, expected state (incomplete transcript,
/// markers not emitted yet, markers in the wrong order), not an error.
/// An empty string between adjacent markers is a valid `Available` artifact.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ArtifactState {
    #[default]
    Unavailable,
    Available(String),
}

impl ArtifactState {
    pub fn is_available(&self) -> bool {
        matches!(self, ArtifactState::Available(_))
    }

    /// Text for the preview pane: the artifact when available, otherwise the
    /// fixed placeholder.
    pub fn display_text(&self) -> &str {
        match self {
            ArtifactState::Unavailable => UNAVAILABLE_PLACEHOLDER,
            ArtifactState::Available(text) => text,
        }
    }

    /// The raw artifact text, absent while unavailable. An empty artifact
    /// (adjacent markers) yields `Some("")`: availability and
    /// export-worthiness are separate questions, and the export boundary
    /// additionally refuses empty text.
    pub fn artifact_text(&self) -> Option<&str> {
        match self {
            ArtifactState::Unavailable => None,
            ArtifactState::Available(text) => Some(text),
        }
    }
}

/// Locates the first delimited block in `text`.
///
/// Two-phase search, not a regex: find the first occurrence of the start
/// marker; from the position immediately after it, find the first occurrence
/// of the end marker. Both found → the text strictly between them, trimmed
/// of leading/trailing whitespace, as `Available`. Anything else →
/// `Unavailable`.
///
/// Consequences of the two phases, pinned by tests below:
/// - an end marker occurring *before* the start marker is ignored;
/// - only the first start marker counts, later blocks are never consulted;
/// - adjacent markers produce `Available("")`.
pub fn extract(text: &str, delimiters: &DelimiterPair) -> ArtifactState {
    let Some(start_index) = text.find(delimiters.start()) else {
        return ArtifactState::Unavailable;
    };
    let body_start = start_index + delimiters.start().len();

    let Some(end_offset) = text[body_start..].find(delimiters.end()) else {
        return ArtifactState::Unavailable;
    };

    let body = &text[body_start..body_start + end_offset];
    ArtifactState::Available(body.trim().to_string())
}
