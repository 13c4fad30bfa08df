//! Outbound control message construction.
//!
//! Pure functions from a [`SessionConfig`] (plus the sample rate bound to the
//! connection) to wire-ready JSON payloads. Field names are the external
//! contract and must not change.

use crate::config::SessionConfig;
use serde::Serialize;

#[derive(Serialize)]
struct StartMessage<'a> {
    action: &'static str,
    #[serde(rename = "content-type")]
    content_type: String,
    continuous: bool,
    max_alternatives: u32,
    interim_results: bool,
    word_confidence: bool,
    timestamps: bool,
    speaker_labels: bool,
    smart_formatting: bool,
    profanity_filter: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    word_alternatives_threshold: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    keywords_threshold: Option<f32>,
    #[serde(skip_serializing_if = "<[String]>::is_empty")]
    keywords: &'a [String],
}

#[derive(Serialize)]
struct ActionOnly {
    action: &'static str,
}

/// The content-type header value for raw PCM at the given rate.
pub fn content_type(sample_rate: u32, channels: u16) -> String {
    format!("audio/l16;rate={};channels={}", sample_rate, channels)
}

/// Build the start message carrying all recognition options.
pub fn start_message(config: &SessionConfig, sample_rate: u32) -> String {
    let msg = StartMessage {
        action: "start",
        content_type: content_type(sample_rate, config.channels),
        continuous: config.continuous,
        max_alternatives: config.max_alternatives,
        interim_results: config.interim_results,
        word_confidence: config.word_confidence,
        timestamps: config.timestamps,
        speaker_labels: config.speaker_labels,
        smart_formatting: config.smart_formatting,
        profanity_filter: config.profanity_filter,
        word_alternatives_threshold: config.word_alternatives_threshold,
        keywords_threshold: config.keywords_threshold,
        keywords: &config.keywords,
    };

    // A struct of primitives and strings cannot fail to serialize
    serde_json::to_string(&msg).unwrap_or_default()
}

/// Build the stop message closing the current utterance.
pub fn stop_message() -> String {
    serde_json::to_string(&ActionOnly { action: "stop" }).unwrap_or_default()
}

/// Build the keepalive no-op message.
pub fn no_op_message() -> String {
    serde_json::to_string(&ActionOnly { action: "no-op" }).unwrap_or_default()
}
