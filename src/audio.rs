/// Audio sample data (16-bit PCM, interleaved)
#[derive(Debug, Clone)]
pub struct AudioFrame {
    /// Raw audio samples (i16 PCM, interleaved)
    pub samples: Vec<i16>,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Number of channels
    pub channels: u16,
    /// Peak amplitude of this frame, normalized to [0, 1]
    pub peak: f32,
}

impl AudioFrame {
    /// Create a frame, measuring the peak level from the samples.
    pub fn new(samples: Vec<i16>, sample_rate: u32, channels: u16) -> Self {
        let peak = samples
            .iter()
            .map(|&s| (s as i32).unsigned_abs())
            .max()
            .unwrap_or(0) as f32
            / i16::MAX as f32;

        Self {
            samples,
            sample_rate,
            channels,
            peak: peak.min(1.0),
        }
    }

    /// Create a frame with a peak level already measured by the audio source.
    pub fn with_peak(samples: Vec<i16>, sample_rate: u32, channels: u16, peak: f32) -> Self {
        Self {
            samples,
            sample_rate,
            channels,
            peak: peak.clamp(0.0, 1.0),
        }
    }

    /// Convert samples to wire bytes (i16 little-endian PCM).
    pub fn to_wire_bytes(&self) -> Vec<u8> {
        self.samples.iter().flat_map(|s| s.to_le_bytes()).collect()
    }
}
