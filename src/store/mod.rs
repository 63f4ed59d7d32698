//! Remote store client for the `note` table.
//!
//! The shell only talks to [`NoteStore`]; [`RestStore`] is the PostgREST
//! implementation used in the browser.

#[cfg(test)]
pub(crate) mod memory;
mod rest;

pub(crate) use rest::RestStore;

use crate::models::{NewNote, Note, NoteId, NotePatch};

pub(crate) const NOTE_TABLE: &str = "note";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub(crate) enum StoreError {
    #[error("network error: {0}")]
    Network(String),

    #[error("{context} ({status}): {body}")]
    Http {
        context: &'static str,
        status: u16,
        body: String,
    },

    #[error("failed to decode response: {0}")]
    Parse(String),

    #[error("realtime channel error: {0}")]
    Realtime(String),
}

impl From<reqwest::Error> for StoreError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            StoreError::Parse(e.to_string())
        } else {
            StoreError::Network(e.to_string())
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Parse(e.to_string())
    }
}

pub(crate) type StoreResult<T> = Result<T, StoreError>;

/// Row-level operations the shell needs from the backend.
///
/// Futures are not `Send`: everything runs on the browser event loop.
#[allow(async_fn_in_trait)]
pub(crate) trait NoteStore {
    /// All rows, newest id first.
    async fn select_all(&self) -> StoreResult<Vec<Note>>;

    async fn insert(&self, note: &NewNote) -> StoreResult<()>;

    async fn update(&self, id: NoteId, patch: &NotePatch) -> StoreResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error_message_includes_status_and_body() {
        let e = StoreError::Http {
            context: "update note",
            status: 404,
            body: "{}".to_string(),
        };
        assert_eq!(e.to_string(), "update note (404): {}");
    }

    #[test]
    fn test_json_error_maps_to_parse() {
        let err = serde_json::from_str::<Vec<Note>>("nope").expect_err("invalid json");
        assert!(matches!(StoreError::from(err), StoreError::Parse(_)));
    }
}
