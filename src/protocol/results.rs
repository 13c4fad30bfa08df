//! Inbound payload decoding.
//!
//! Classifies each server message into state / results / error and maps the
//! results shape onto [`RecognitionEvent`]. The single-shot (REST) response
//! decoder shares the same result structures so streaming and one-shot
//! recognition report identical shapes to callers.

use serde::Deserialize;
use std::collections::HashMap;
use thiserror::Error;

/// A word with its start and end time in seconds (`[word, start, end]` on
/// the wire).
pub type WordTiming = (String, f64, f64);

/// A word with its confidence (`[word, confidence]` on the wire).
pub type WordConfidence = (String, f64);

/// One candidate transcription of an utterance.
#[derive(Debug, Clone, Deserialize)]
pub struct Alternative {
    pub transcript: String,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub timestamps: Option<Vec<WordTiming>>,
    #[serde(default)]
    pub word_confidence: Option<Vec<WordConfidence>>,
}

/// One occurrence of a spotted keyword.
#[derive(Debug, Clone, Deserialize)]
pub struct KeywordSpot {
    #[serde(default)]
    pub normalized_text: Option<String>,
    pub start_time: f64,
    pub end_time: f64,
    pub confidence: f64,
}

/// One interim or final result for an utterance.
#[derive(Debug, Clone, Deserialize)]
pub struct RecognitionResult {
    #[serde(rename = "final", default)]
    pub is_final: bool,
    pub alternatives: Vec<Alternative>,
    #[serde(default)]
    pub keywords_result: Option<HashMap<String, Vec<KeywordSpot>>>,
}

/// An ordered batch of results from one inbound message.
#[derive(Debug, Clone)]
pub struct RecognitionEvent {
    pub results: Vec<RecognitionResult>,
}

impl RecognitionEvent {
    /// Whether any result in this event is final.
    pub fn has_final(&self) -> bool {
        self.results.iter().any(|r| r.is_final)
    }
}

/// A malformed inbound payload. Never fatal to the session; the offending
/// message is dropped.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct DecodeError(pub String);

/// An inbound server message, classified.
#[derive(Debug, Clone)]
pub enum InboundMessage {
    /// `{"state": "listening"}` — the server is ready for audio
    Listening,
    /// Any other state value; informational only
    State(String),
    /// A results payload
    Results(RecognitionEvent),
    /// `{"error": "..."}` — the server rejected the session
    Error(String),
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    results: Option<Vec<RecognitionResult>>,
    #[serde(default)]
    error: Option<String>,
}

/// Decode one streaming message into its classification.
pub fn decode_event(payload: &str) -> Result<InboundMessage, DecodeError> {
    let envelope: Envelope =
        serde_json::from_str(payload).map_err(|e| DecodeError(e.to_string()))?;

    if let Some(message) = envelope.error {
        return Ok(InboundMessage::Error(message));
    }
    if let Some(results) = envelope.results {
        return Ok(InboundMessage::Results(RecognitionEvent { results }));
    }
    match envelope.state {
        Some(state) if state == "listening" => Ok(InboundMessage::Listening),
        Some(state) => Ok(InboundMessage::State(state)),
        None => Err(DecodeError(
            "message carries none of state/results/error".to_string(),
        )),
    }
}

#[derive(Deserialize)]
struct RecognizeResponse {
    results: Vec<RecognitionResult>,
}

/// Decode a full single-shot response body into the same event shape the
/// streaming path produces.
pub fn decode_recognize_response(body: &str) -> Result<RecognitionEvent, DecodeError> {
    let response: RecognizeResponse =
        serde_json::from_str(body).map_err(|e| DecodeError(e.to_string()))?;
    Ok(RecognitionEvent {
        results: response.results,
    })
}
