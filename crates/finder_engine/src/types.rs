use std::collections::BTreeSet;
use std::fmt;

use finder_core::{Offer, RequestId, Source, SourceId};

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    SourcesLoaded(Result<Vec<Source>, StoreError>),
    SelectionLoaded(BTreeSet<SourceId>),
    SearchCompleted {
        request_id: RequestId,
        result: Result<Vec<Offer>, StoreError>,
    },
    SelectionSaved {
        error: Option<String>,
    },
}

/// A failed call to the offer store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("RemoteFetchError ({kind}): {message}")]
pub struct StoreError {
    pub kind: FailureKind,
    pub message: String,
}

impl StoreError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    Decode,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::Decode => write!(f, "malformed response body"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}
