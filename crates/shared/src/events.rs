//! Push-event protocol for the `/events` server-push channel.
//!
//! The pub/sub bridge emits newline-delimited JSON objects shaped
//! `{"type": ..., ...}`. Decoding never fails: valid JSON of an unknown
//! shape becomes [`PushEvent::Other`] and text that is not JSON at all
//! becomes [`PushEvent::Raw`], so the listener can hand every inbound
//! message to its consumer instead of dropping it.

use serde::Deserialize;
use serde_json::Value;

/// A decoded server-push event.
#[derive(Debug, Clone, PartialEq)]
pub enum PushEvent {
    /// The bridge (re)connected to the broker. `rc` is the broker result
    /// code; only `Some(0)` means the connection is usable.
    Connect { rc: Option<i64> },
    /// The bridge lost its broker connection.
    Disconnect,
    /// A broker message for a subscribed topic.
    Message { topic: String, payload: Value },
    /// Transport-level failure on the push channel itself. Synthesized
    /// locally by the listener, never decoded from the wire.
    StreamError,
    /// Valid JSON that matches no known shape.
    Other(Value),
    /// Inbound text that is not JSON; kept verbatim.
    Raw(String),
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum WireEvent {
    Mqtt(BridgeEvent),
}

#[derive(Deserialize)]
#[serde(tag = "event", rename_all = "lowercase")]
enum BridgeEvent {
    Connect {
        #[serde(default)]
        rc: Option<i64>,
    },
    Disconnect,
    Message { topic: String, payload: Value },
}

impl PushEvent {
    /// Decode one line received on the push channel.
    pub fn decode(text: &str) -> Self {
        if let Ok(event) = serde_json::from_str::<WireEvent>(text) {
            return match event {
                WireEvent::Mqtt(BridgeEvent::Connect { rc }) => PushEvent::Connect { rc },
                WireEvent::Mqtt(BridgeEvent::Disconnect) => PushEvent::Disconnect,
                WireEvent::Mqtt(BridgeEvent::Message { topic, payload }) => {
                    PushEvent::Message { topic, payload }
                }
            };
        }
        match serde_json::from_str::<Value>(text) {
            Ok(value) => PushEvent::Other(value),
            Err(_) => PushEvent::Raw(text.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_connect_with_result_code() {
        let event = PushEvent::decode(r#"{"type":"mqtt","event":"connect","rc":0}"#);
        assert_eq!(event, PushEvent::Connect { rc: Some(0) });
    }

    #[test]
    fn decodes_connect_without_result_code() {
        let event = PushEvent::decode(r#"{"type":"mqtt","event":"connect"}"#);
        assert_eq!(event, PushEvent::Connect { rc: None });
    }

    #[test]
    fn decodes_disconnect() {
        let event = PushEvent::decode(r#"{"type":"mqtt","event":"disconnect"}"#);
        assert_eq!(event, PushEvent::Disconnect);
    }

    #[test]
    fn decodes_broker_message() {
        let event = PushEvent::decode(
            r#"{"type":"mqtt","event":"message","topic":"carrera/car_ing_sis/materia/mat_bd2","payload":{"aula":"B3"}}"#,
        );
        match event {
            PushEvent::Message { topic, payload } => {
                assert_eq!(topic, "carrera/car_ing_sis/materia/mat_bd2");
                assert_eq!(payload, json!({"aula": "B3"}));
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn unknown_json_shape_is_other() {
        let event = PushEvent::decode(r#"{"type":"log","line":"broker started"}"#);
        assert_eq!(
            event,
            PushEvent::Other(json!({"type": "log", "line": "broker started"}))
        );
    }

    #[test]
    fn non_json_text_is_kept_verbatim() {
        let event = PushEvent::decode("not json at all");
        assert_eq!(event, PushEvent::Raw("not json at all".to_string()));
    }
}
