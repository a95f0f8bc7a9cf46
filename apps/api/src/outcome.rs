//! Stage outcomes: a produced value plus an optional user-visible notice.
//!
//! Every stage of the pipeline returns a `Staged<T>`: when something went
//! wrong the value is the stage's safe default and `notice` says why.

use serde::Serialize;

/// Classification of a reported stage failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    UnsupportedFormat,
    ExtractionFailure,
    EmptyExtraction,
    EmptyLlmResponse,
    ServiceError,
    MalformedResponse,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn new(kind: NoticeKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Staged<T> {
    pub value: T,
    pub notice: Option<Notice>,
}

impl<T> Staged<T> {
    pub fn ok(value: T) -> Self {
        Self {
            value,
            notice: None,
        }
    }

    /// A fallback value, reported to the user through `notice`.
    pub fn degraded(value: T, notice: Notice) -> Self {
        Self {
            value,
            notice: Some(notice),
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.notice.is_some()
    }
}
