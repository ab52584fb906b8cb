//! Pronunciation audio
//!
//! Speech arrives as raw little-endian signed 16-bit PCM, mono, 24 kHz.

/// Sample rate of generated speech
pub const SAMPLE_RATE: u32 = 24_000;

/// Mono
pub const CHANNELS: u16 = 1;

const BITS_PER_SAMPLE: u16 = 16;

/// Raw PCM bytes as returned by the speech service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PcmAudio {
    bytes: Vec<u8>,
}

impl PcmAudio {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Number of whole samples; a trailing odd byte is ignored
    pub fn frame_count(&self) -> usize {
        self.bytes.len() / 2
    }

    pub fn duration_secs(&self) -> f64 {
        self.frame_count() as f64 / f64::from(SAMPLE_RATE)
    }

    /// Samples normalized to `[-1, 1]` for a playback device
    pub fn samples(&self) -> Vec<f32> {
        self.bytes
            .chunks_exact(2)
            .map(|pair| f32::from(i16::from_le_bytes([pair[0], pair[1]])) / 32768.0)
            .collect()
    }

    /// Wrap the samples in a RIFF/WAVE container
    pub fn to_wav_bytes(&self) -> Vec<u8> {
        let data_len = (self.frame_count() * 2) as u32;
        let byte_rate = SAMPLE_RATE * u32::from(CHANNELS) * u32::from(BITS_PER_SAMPLE / 8);
        let block_align = CHANNELS * (BITS_PER_SAMPLE / 8);

        let mut out = Vec::with_capacity(44 + data_len as usize);
        out.extend_from_slice(b"RIFF");
        out.extend_from_slice(&(36 + data_len).to_le_bytes());
        out.extend_from_slice(b"WAVE");
        out.extend_from_slice(b"fmt ");
        out.extend_from_slice(&16u32.to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes()); // PCM
        out.extend_from_slice(&CHANNELS.to_le_bytes());
        out.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
        out.extend_from_slice(&byte_rate.to_le_bytes());
        out.extend_from_slice(&block_align.to_le_bytes());
        out.extend_from_slice(&BITS_PER_SAMPLE.to_le_bytes());
        out.extend_from_slice(b"data");
        out.extend_from_slice(&data_len.to_le_bytes());
        out.extend_from_slice(&self.bytes[..data_len as usize]);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_samples_are_normalized() {
        let mut bytes = Vec::new();
        for sample in [0i16, i16::MIN, i16::MAX, 16384, -16384] {
            bytes.extend_from_slice(&sample.to_le_bytes());
        }
        let samples = PcmAudio::new(bytes).samples();

        assert_eq!(samples[0], 0.0);
        assert_eq!(samples[1], -1.0);
        assert!(samples[2] < 1.0 && samples[2] > 0.9999);
        assert_eq!(samples[3], 0.5);
        assert_eq!(samples[4], -0.5);
    }

    #[test]
    fn test_trailing_byte_ignored() {
        let audio = PcmAudio::new(vec![0x00, 0x40, 0x7f]);
        assert_eq!(audio.frame_count(), 1);
        assert_eq!(audio.samples(), vec![0.5]);
    }

    #[test]
    fn test_duration() {
        let audio = PcmAudio::new(vec![0; 48_000]);
        assert!((audio.duration_secs() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_wav_header() {
        let audio = PcmAudio::new(vec![1, 2, 3, 4, 5]);
        let wav = audio.to_wav_bytes();

        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(&wav[8..12], b"WAVE");
        assert_eq!(u32::from_le_bytes([wav[24], wav[25], wav[26], wav[27]]), 24_000);
        assert_eq!(u32::from_le_bytes([wav[40], wav[41], wav[42], wav[43]]), 4);
        assert_eq!(wav.len(), 48);
    }
}
