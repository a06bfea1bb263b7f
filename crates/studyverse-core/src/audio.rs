//! Narration audio payloads.
//!
//! The speech backend returns base64-encoded raw PCM: signed 16-bit
//! little-endian samples, mono, 24 kHz.

use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::errors::StudyError;

/// Sample rate of synthesized narration.
pub const PCM_SAMPLE_RATE: u32 = 24_000;

/// Channel count of synthesized narration.
pub const PCM_CHANNELS: u16 = 1;

/// Decoded 16-bit PCM audio.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PcmAudio {
    samples: Vec<i16>,
    sample_rate: u32,
    channels: u16,
}

impl PcmAudio {
    /// Wrap already-decoded samples.
    #[must_use]
    pub fn new(samples: Vec<i16>, sample_rate: u32, channels: u16) -> Self {
        Self {
            samples,
            sample_rate,
            channels: channels.max(1),
        }
    }

    /// Decode little-endian 16-bit bytes. A trailing odd byte is dropped.
    #[must_use]
    pub fn from_le_bytes(bytes: &[u8], sample_rate: u32, channels: u16) -> Self {
        let samples = bytes
            .chunks_exact(2)
            .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
            .collect();
        Self::new(samples, sample_rate, channels)
    }

    /// Interleaved samples.
    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    /// Samples per second.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Channel count.
    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Whether there are no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Playback length.
    pub fn duration(&self) -> Duration {
        if self.sample_rate == 0 {
            return Duration::ZERO;
        }
        let frames = self.samples.len() as u64 / u64::from(self.channels);
        Duration::from_micros(frames * 1_000_000 / u64::from(self.sample_rate))
    }

    /// Samples normalized to `[-1.0, 1.0)`.
    pub fn to_f32(&self) -> Vec<f32> {
        self.samples
            .iter()
            .map(|&s| f32::from(s) / 32_768.0)
            .collect()
    }

    /// Re-encode as little-endian bytes.
    pub fn to_le_bytes(&self) -> Vec<u8> {
        self.samples.iter().flat_map(|s| s.to_le_bytes()).collect()
    }
}

/// Decode a base64 narration payload into 24 kHz mono PCM.
pub fn decode_pcm_base64(data: &str) -> Result<PcmAudio, StudyError> {
    let bytes = STANDARD
        .decode(data.trim())
        .map_err(|e| StudyError::audio(format!("invalid audio payload: {e}")))?;
    if bytes.len() < 2 {
        return Err(StudyError::audio("audio payload is empty"));
    }
    Ok(PcmAudio::from_le_bytes(
        &bytes,
        PCM_SAMPLE_RATE,
        PCM_CHANNELS,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;

    fn encode(samples: &[i16]) -> String {
        let bytes: Vec<u8> = samples.iter().flat_map(|s| s.to_le_bytes()).collect();
        STANDARD.encode(bytes)
    }

    #[test]
    fn decodes_little_endian_samples() {
        let audio = decode_pcm_base64(&encode(&[0, 1, -1, i16::MAX, i16::MIN])).unwrap();
        assert_eq!(audio.samples(), &[0, 1, -1, i16::MAX, i16::MIN]);
        assert_eq!(audio.sample_rate(), PCM_SAMPLE_RATE);
        assert_eq!(audio.channels(), PCM_CHANNELS);
    }

    #[test]
    fn odd_trailing_byte_is_dropped() {
        let audio = PcmAudio::from_le_bytes(&[0x01, 0x00, 0xff], PCM_SAMPLE_RATE, 1);
        assert_eq!(audio.samples(), &[1]);
    }

    #[test]
    fn one_second_of_audio() {
        let audio = PcmAudio::new(vec![0; 24_000], PCM_SAMPLE_RATE, 1);
        assert_eq!(audio.duration(), Duration::from_secs(1));
    }

    #[test]
    fn normalizes_to_unit_range() {
        let audio = PcmAudio::new(vec![i16::MIN, 0, 16_384], PCM_SAMPLE_RATE, 1);
        assert_eq!(audio.to_f32(), vec![-1.0, 0.0, 0.5]);
    }

    #[test]
    fn invalid_base64_is_audio_error() {
        let err = decode_pcm_base64("not base64!!").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Audio);
    }

    #[test]
    fn empty_payload_is_audio_error() {
        let err = decode_pcm_base64("").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Audio);
    }

    #[test]
    fn byte_round_trip() {
        let audio = PcmAudio::new(vec![5, -5], PCM_SAMPLE_RATE, 1);
        assert_eq!(audio.to_le_bytes(), vec![5, 0, 0xfb, 0xff]);
    }
}
