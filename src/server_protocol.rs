use serde_json::Value;

use crate::types::Direction;

#[derive(Debug)]
pub enum ParsedClientMessage {
    /// Directions currently held down. An empty list releases every key.
    Input {
        keys: Vec<Direction>,
    },
    Restart,
    Ping {
        t: f64,
    },
}

pub fn parse_client_message(raw: &str) -> Option<ParsedClientMessage> {
    let value: Value = serde_json::from_str(raw).ok()?;
    let object = value.as_object()?;
    let message_type = object.get("type")?.as_str()?;

    match message_type {
        "input" => {
            let keys = match object.get("keys") {
                None => Vec::new(),
                Some(value) => parse_keys(value)?,
            };
            Some(ParsedClientMessage::Input { keys })
        }
        "restart" => Some(ParsedClientMessage::Restart),
        "ping" => {
            let t = object.get("t")?.as_f64()?;
            if !t.is_finite() {
                return None;
            }
            Some(ParsedClientMessage::Ping { t })
        }
        _ => None,
    }
}

fn parse_keys(value: &Value) -> Option<Vec<Direction>> {
    value
        .as_array()?
        .iter()
        .map(|key| Direction::parse(key.as_str()?))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_input_message() {
        let parsed = parse_client_message(r#"{"type":"input","keys":["up","left"]}"#)
            .expect("input message should parse");
        match parsed {
            ParsedClientMessage::Input { keys } => {
                assert_eq!(keys, vec![Direction::Up, Direction::Left]);
            }
            _ => panic!("expected input message"),
        }
    }

    #[test]
    fn parse_input_without_keys_releases_all() {
        let parsed = parse_client_message(r#"{"type":"input"}"#);
        assert!(matches!(
            parsed,
            Some(ParsedClientMessage::Input { keys }) if keys.is_empty()
        ));
    }

    #[test]
    fn parse_input_rejects_invalid_direction() {
        assert!(parse_client_message(r#"{"type":"input","keys":["up","jump"]}"#).is_none());
        assert!(parse_client_message(r#"{"type":"input","keys":"up"}"#).is_none());
        assert!(parse_client_message(r#"{"type":"input","keys":[3]}"#).is_none());
    }

    #[test]
    fn parse_restart_message() {
        let parsed = parse_client_message(r#"{"type":"restart"}"#);
        assert!(matches!(parsed, Some(ParsedClientMessage::Restart)));
    }

    #[test]
    fn parse_ping_requires_finite_number() {
        let parsed = parse_client_message(r#"{"type":"ping","t":12.5}"#);
        assert!(matches!(parsed, Some(ParsedClientMessage::Ping { .. })));
        assert!(parse_client_message(r#"{"type":"ping","t":"soon"}"#).is_none());
    }

    #[test]
    fn unknown_or_malformed_messages_are_ignored() {
        assert!(parse_client_message(r#"{"type":"hello"}"#).is_none());
        assert!(parse_client_message(r#"["input"]"#).is_none());
        assert!(parse_client_message("not json").is_none());
    }
}
