use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Recognition options for one streaming session.
///
/// Immutable once the session starts; changing any option requires ending the
/// session and beginning a new one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Recognition model identifier (sent as a connection parameter)
    pub model: String,

    /// Declared capture sample rate in Hz. The rate actually bound to the
    /// connection is read from the first submitted frame.
    pub sample_rate: u32,

    /// Number of audio channels (1 = mono, 2 = stereo)
    pub channels: u16,

    /// Maximum number of alternative transcripts per result
    pub max_alternatives: u32,

    /// Keep recognizing across final results instead of one utterance per start
    pub continuous: bool,

    /// Deliver provisional (non-final) transcription updates
    pub interim_results: bool,

    /// Request per-word confidence scores
    pub word_confidence: bool,

    /// Request per-word start/end timestamps
    pub timestamps: bool,

    /// Request speaker labels
    pub speaker_labels: bool,

    /// Request smart formatting of dates, numbers, etc.
    pub smart_formatting: bool,

    /// Mask profanity in transcripts
    pub profanity_filter: bool,

    /// Suppress sending frames whose peak level is below `silence_threshold`
    pub silence_detection: bool,

    /// Peak level in [0, 1] below which a frame counts as silence
    pub silence_threshold: f32,

    /// Keywords to spot in the audio (empty = spotting disabled)
    pub keywords: Vec<String>,

    /// Minimum confidence for a keyword spot to be reported
    pub keywords_threshold: Option<f32>,

    /// Minimum confidence for a word alternative to be reported
    pub word_alternatives_threshold: Option<f32>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            model: "en-US_BroadbandModel".to_string(),
            sample_rate: 16000,
            channels: 1,
            max_alternatives: 1,
            continuous: true,
            interim_results: true,
            word_confidence: false,
            timestamps: false,
            speaker_labels: false,
            smart_formatting: false,
            profanity_filter: true,
            silence_detection: true,
            silence_threshold: 0.03,
            keywords: Vec::new(),
            keywords_threshold: None,
            word_alternatives_threshold: None,
        }
    }
}

/// Tuning knobs for the session runtime, independent of recognition options.
#[derive(Debug, Clone)]
pub struct SessionLimits {
    /// Maximum frames buffered while awaiting server readiness; exceeding
    /// this bound is a hard session failure
    pub queue_capacity: usize,

    /// How long to wait for the server's "listening" acknowledgment after
    /// the start message is sent
    pub ready_timeout: Duration,

    /// Idle interval after which a no-op keepalive is sent; values below
    /// one millisecond are raised to one millisecond
    pub keepalive_interval: Duration,
}

impl Default for SessionLimits {
    fn default() -> Self {
        Self {
            queue_capacity: 30,
            ready_timeout: Duration::from_secs(10),
            keepalive_interval: Duration::from_secs(10),
        }
    }
}
