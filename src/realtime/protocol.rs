use super::ChangeKind;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::str::FromStr;

pub(crate) const HEARTBEAT_INTERVAL_MS: u64 = 25_000;
/// Fixed wait before reopening a socket the server dropped.
pub(crate) const RECONNECT_DELAY_MS: u64 = 5_000;
const NORMAL_CLOSURE: u16 = 1000;

/// Whether a socket closed with `code` should be reopened.
pub(crate) fn should_reconnect(code: u16) -> bool {
    code != NORMAL_CLOSURE
}
const PHOENIX_TOPIC: &str = "phoenix";
const DB_SCHEMA: &str = "public";

/// One Phoenix channel frame (JSON serializer v1.0.0).
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub(crate) struct Frame {
    pub topic: String,
    pub event: String,
    #[serde(default)]
    pub payload: serde_json::Value,
    #[serde(rename = "ref", default)]
    pub reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub join_ref: Option<String>,
}

impl Frame {
    pub fn encode(&self) -> String {
        // A struct of strings and a `Value` always serializes.
        serde_json::to_string(self).unwrap_or_default()
    }
}

pub(crate) fn topic_for(table: &str) -> String {
    format!("realtime:{table}")
}

pub(crate) fn join(table: &str, kinds: &[ChangeKind], access_token: &str, reference: &str) -> Frame {
    let changes: Vec<serde_json::Value> = kinds
        .iter()
        .map(|k| json!({ "event": k, "schema": DB_SCHEMA, "table": table }))
        .collect();

    Frame {
        topic: topic_for(table),
        event: "phx_join".to_string(),
        payload: json!({
            "config": {
                "broadcast": { "ack": false, "self": false },
                "presence": { "key": "" },
                "postgres_changes": changes,
                "private": false,
            },
            "access_token": access_token,
        }),
        reference: Some(reference.to_string()),
        join_ref: Some(reference.to_string()),
    }
}

pub(crate) fn heartbeat(reference: &str) -> Frame {
    Frame {
        topic: PHOENIX_TOPIC.to_string(),
        event: "heartbeat".to_string(),
        payload: json!({}),
        reference: Some(reference.to_string()),
        join_ref: None,
    }
}

pub(crate) fn leave(table: &str, reference: &str) -> Frame {
    Frame {
        topic: topic_for(table),
        event: "phx_leave".to_string(),
        payload: json!({}),
        reference: Some(reference.to_string()),
        join_ref: None,
    }
}

/// What an incoming frame means to the subscriber.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Incoming {
    Change(ChangeKind),
    JoinFailed(String),
    Ignored,
}

pub(crate) fn decode(text: &str, table: &str) -> Result<Incoming, serde_json::Error> {
    let frame: Frame = serde_json::from_str(text)?;
    if frame.topic != topic_for(table) {
        return Ok(Incoming::Ignored);
    }

    let incoming = match frame.event.as_str() {
        "postgres_changes" => frame
            .payload
            .pointer("/data/type")
            .and_then(|t| t.as_str())
            .and_then(|t| ChangeKind::from_str(t).ok())
            .map(Incoming::Change)
            .unwrap_or(Incoming::Ignored),
        "phx_reply" if frame.payload.get("status").and_then(|s| s.as_str()) == Some("error") => {
            Incoming::JoinFailed(frame.payload["response"].to_string())
        }
        "phx_error" => Incoming::JoinFailed(frame.payload.to_string()),
        _ => Incoming::Ignored,
    };
    Ok(incoming)
}
