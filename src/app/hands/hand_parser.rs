//! Parsing of the detector's landmark packets.

use super::*;

use lazy_static::lazy_static;
use nannou_osc::Message;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

const DETECTION_SCHEMA: &str =
    include_str!("../../../assets/json/detection_schema.json");

lazy_static! {
    static ref DETECTION_SCHEMA_VALIDATOR: jsonschema::Validator = {
        let schema: Value = serde_json::from_str(DETECTION_SCHEMA)
            .expect("failed to parse detection schema to JSON");
        jsonschema::Validator::new(&schema)
            .expect("failed to create detection schema validator")
    };
}

#[derive(Error, Debug)]
pub enum PacketError {
    #[error("landmark message has no string argument")]
    MissingPayload,
    #[error("landmark payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("landmark payload does not match the detection schema")]
    Schema,
}

#[derive(Deserialize)]
struct HandPayload {
    handedness: String,
    landmarks: Vec<[f64; 3]>,
}

#[derive(Deserialize)]
struct DetectionPayload {
    hands: Vec<HandPayload>,
    #[serde(default)]
    face: Option<Vec<[f64; 3]>>,
}

fn to_points(raw: Vec<[f64; 3]>) -> Vec<DVec3> {
    raw.into_iter().map(DVec3::from).collect()
}

/// Parses the JSON payload of a landmark message.
///
/// # Errors
///
/// Returns an error if the payload is not JSON or does not match the
/// detection schema.
pub fn parse_payload(json: &str) -> Result<RawDetection, PacketError> {
    let value: Value = serde_json::from_str(json)?;

    if !DETECTION_SCHEMA_VALIDATOR.is_valid(&value) {
        return Err(PacketError::Schema);
    }

    let payload: DetectionPayload = serde_json::from_value(value)?;

    Ok(RawDetection {
        hands: payload
            .hands
            .into_iter()
            .map(|h| RawHand {
                label: h.handedness,
                landmarks: to_points(h.landmarks),
            })
            .collect(),
        face: payload.face.map(to_points),
    })
}

/// Parses a landmark message, whose first string argument is the JSON
/// payload.
///
/// # Errors
///
/// Returns an error if the landmark message is malformed.
pub fn parse_message(msg: Message) -> Result<RawDetection, PacketError> {
    let payload = msg
        .args
        .into_iter()
        .find_map(|a| a.string())
        .ok_or(PacketError::MissingPayload)?;

    parse_payload(&payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nannou_osc::Type;

    fn hand_json(label: &str) -> String {
        let points = vec!["[0.5, 0.5, 0.0]"; NUM_HAND_LANDMARKS].join(", ");
        format!(r#"{{"handedness": "{label}", "landmarks": [{points}]}}"#)
    }

    #[test]
    fn test_parses_hands_and_face() {
        let json = format!(
            r#"{{"hands": [{}, {}], "face": [[0.1, 0.2, 0.3]]}}"#,
            hand_json("Left"),
            hand_json("Right"),
        );

        let detection = parse_payload(&json).unwrap();

        assert_eq!(detection.hands.len(), 2);
        assert_eq!(detection.hands[0].label, "Left");
        assert_eq!(detection.hands[1].landmarks.len(), NUM_HAND_LANDMARKS);
        assert_eq!(detection.face, Some(vec![DVec3::new(0.1, 0.2, 0.3)]));
    }

    #[test]
    fn test_face_is_optional() {
        let no_face = parse_payload(r#"{"hands": []}"#).unwrap();
        let null_face = parse_payload(r#"{"hands": [], "face": null}"#).unwrap();

        assert!(no_face.face.is_none());
        assert!(null_face.face.is_none());
    }

    #[test]
    fn test_rejects_bad_payloads() {
        assert!(matches!(parse_payload("{nope"), Err(PacketError::Json(_))));
        assert!(matches!(
            parse_payload(r#"{"face": null}"#),
            Err(PacketError::Schema)
        ));
        assert!(matches!(
            parse_payload(
                r#"{"hands": [{"handedness": "Left", "landmarks": [[0.1, 0.2]]}]}"#
            ),
            Err(PacketError::Schema)
        ));
    }

    #[test]
    fn test_landmark_message_without_payload() {
        let msg = Message {
            addr: String::from(DETECTION_OSC_ADDRESS),
            args: vec![Type::Int(4)],
        };

        assert!(matches!(parse_message(msg), Err(PacketError::MissingPayload)));
    }

    #[test]
    fn test_payload_is_the_first_string_argument() {
        let msg = Message {
            addr: String::from(DETECTION_OSC_ADDRESS),
            args: vec![Type::Int(4), Type::String(format!(
                r#"{{"hands": [{}]}}"#,
                hand_json("Left")
            ))],
        };

        let raw = parse_message(msg).unwrap();
        assert_eq!(raw.hands.len(), 1);
    }
}
