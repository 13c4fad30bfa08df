use serde_json::Value;
use stt_session::protocol::{
    decode_event, decode_recognize_response, no_op_message, start_message, stop_message,
    InboundMessage,
};
use stt_session::SessionConfig;

#[test]
fn test_start_message_carries_all_recognition_options() {
    let config = SessionConfig {
        max_alternatives: 3,
        continuous: false,
        interim_results: true,
        word_confidence: true,
        timestamps: true,
        speaker_labels: true,
        smart_formatting: true,
        profanity_filter: false,
        ..SessionConfig::default()
    };

    let json: Value = serde_json::from_str(&start_message(&config, 22050)).unwrap();
    assert_eq!(json["action"], "start");
    assert_eq!(json["content-type"], "audio/l16;rate=22050;channels=1");
    assert_eq!(json["continuous"], false);
    assert_eq!(json["max_alternatives"], 3);
    assert_eq!(json["interim_results"], true);
    assert_eq!(json["word_confidence"], true);
    assert_eq!(json["timestamps"], true);
    assert_eq!(json["speaker_labels"], true);
    assert_eq!(json["smart_formatting"], true);
    assert_eq!(json["profanity_filter"], false);
}

#[test]
fn test_start_message_keyword_spotting_fields() {
    let config = SessionConfig {
        keywords: vec!["hello".to_string(), "goodbye".to_string()],
        keywords_threshold: Some(0.6),
        word_alternatives_threshold: Some(0.4),
        ..SessionConfig::default()
    };

    let json: Value = serde_json::from_str(&start_message(&config, 16000)).unwrap();
    assert_eq!(json["keywords"], serde_json::json!(["hello", "goodbye"]));
    assert!((json["keywords_threshold"].as_f64().unwrap() - 0.6).abs() < 1e-6);
    assert!((json["word_alternatives_threshold"].as_f64().unwrap() - 0.4).abs() < 1e-6);
}

#[test]
fn test_start_message_omits_unset_keyword_fields() {
    let json: Value = serde_json::from_str(&start_message(&SessionConfig::default(), 16000)).unwrap();
    assert!(json.get("keywords").is_none());
    assert!(json.get("keywords_threshold").is_none());
    assert!(json.get("word_alternatives_threshold").is_none());
}

#[test]
fn test_stop_and_no_op_are_bare_actions() {
    assert_eq!(stop_message(), r#"{"action":"stop"}"#);
    assert_eq!(no_op_message(), r#"{"action":"no-op"}"#);
}

#[test]
fn test_decode_listening_state() {
    match decode_event(r#"{"state": "listening"}"#).unwrap() {
        InboundMessage::Listening => {}
        other => panic!("expected Listening, got {:?}", other),
    }
}

#[test]
fn test_decode_other_state_is_informational() {
    match decode_event(r#"{"state": "processing"}"#).unwrap() {
        InboundMessage::State(state) => assert_eq!(state, "processing"),
        other => panic!("expected State, got {:?}", other),
    }
}

#[test]
fn test_decode_results_with_word_decorations() {
    let payload = r#"{
        "results": [{
            "final": true,
            "alternatives": [{
                "transcript": "hello world",
                "confidence": 0.93,
                "timestamps": [["hello", 0.0, 0.4], ["world", 0.5, 1.0]],
                "word_confidence": [["hello", 0.95], ["world", 0.91]]
            }]
        }]
    }"#;

    let event = match decode_event(payload).unwrap() {
        InboundMessage::Results(event) => event,
        other => panic!("expected Results, got {:?}", other),
    };

    assert!(event.has_final());
    let result = &event.results[0];
    assert!(result.is_final);
    let alt = &result.alternatives[0];
    assert_eq!(alt.transcript, "hello world");
    assert_eq!(alt.confidence, Some(0.93));
    let stamps = alt.timestamps.as_ref().unwrap();
    assert_eq!(stamps[1], ("world".to_string(), 0.5, 1.0));
    let confs = alt.word_confidence.as_ref().unwrap();
    assert_eq!(confs[0], ("hello".to_string(), 0.95));
}

#[test]
fn test_decode_interim_result() {
    let payload = r#"{"results": [{"final": false, "alternatives": [{"transcript": "hel"}]}]}"#;
    let event = match decode_event(payload).unwrap() {
        InboundMessage::Results(event) => event,
        other => panic!("expected Results, got {:?}", other),
    };
    assert!(!event.has_final());
    assert_eq!(event.results[0].alternatives[0].transcript, "hel");
    assert_eq!(event.results[0].alternatives[0].confidence, None);
}

#[test]
fn test_decode_keyword_spots() {
    let payload = r#"{
        "results": [{
            "final": true,
            "alternatives": [{"transcript": "hey assistant play music"}],
            "keywords_result": {
                "assistant": [
                    {"normalized_text": "assistant", "start_time": 0.3, "end_time": 0.9, "confidence": 0.97}
                ]
            }
        }]
    }"#;

    let event = match decode_event(payload).unwrap() {
        InboundMessage::Results(event) => event,
        other => panic!("expected Results, got {:?}", other),
    };
    let spots = event.results[0].keywords_result.as_ref().unwrap();
    let hits = &spots["assistant"];
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].normalized_text.as_deref(), Some("assistant"));
    assert!((hits[0].confidence - 0.97).abs() < 1e-6);
}

#[test]
fn test_decode_server_error() {
    match decode_event(r#"{"error": "bad-request"}"#).unwrap() {
        InboundMessage::Error(message) => assert_eq!(message, "bad-request"),
        other => panic!("expected Error, got {:?}", other),
    }
}

#[test]
fn test_decode_rejects_malformed_payloads() {
    assert!(decode_event("not json at all").is_err());
    assert!(decode_event(r#"{"results": "not-an-array"}"#).is_err());
    assert!(decode_event(r#"{"unrelated": 1}"#).is_err());
}

#[test]
fn test_single_shot_response_shares_result_shape() {
    let body = r#"{
        "result_index": 0,
        "results": [{
            "final": true,
            "alternatives": [{"transcript": "one shot", "confidence": 0.88}]
        }]
    }"#;

    let event = decode_recognize_response(body).unwrap();
    assert!(event.has_final());
    assert_eq!(event.results[0].alternatives[0].transcript, "one shot");

    assert!(decode_recognize_response(r#"{"result_index": 0}"#).is_err());
}
