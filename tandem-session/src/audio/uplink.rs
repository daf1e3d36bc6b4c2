use crate::audio::audio_io::{
    AudioSource, CAPTURE_CHANNELS, EncoderSettings, FRAME_SAMPLES, MAX_OPUS_PACKET, OpusEncode,
};
use crate::engine::PeerEngine;
use anyhow::{Context, Result};
use tracing::{debug, warn};

/// Microphone -> Opus -> publisher connection.
pub struct AudioUplink {
    source: Box<dyn AudioSource>,
    encoder: Box<dyn OpusEncode>,
    pcm: Vec<i16>,
    packet: Vec<u8>,
    frames_sent: u64,
}

impl AudioUplink {
    pub fn new(
        source: Box<dyn AudioSource>,
        mut encoder: Box<dyn OpusEncode>,
        settings: &EncoderSettings,
    ) -> Result<Self> {
        encoder
            .configure(settings)
            .context("Failed to configure Opus encoder")?;

        Ok(Self {
            source,
            encoder,
            pcm: vec![0; FRAME_SAMPLES * CAPTURE_CHANNELS],
            packet: vec![0; MAX_OPUS_PACKET],
            frames_sent: 0,
        })
    }

    pub fn frames_sent(&self) -> u64 {
        self.frames_sent
    }

    /// Move at most one frame. Returns the encoded size when a packet was
    /// handed to the publisher.
    pub async fn pump(&mut self, publisher: &dyn PeerEngine) -> Option<usize> {
        let samples = match self.source.read(&mut self.pcm) {
            Ok(0) => return None,
            Ok(samples) => samples.min(self.pcm.len()),
            Err(e) => {
                warn!("Microphone read failed: {:?}", e);
                return None;
            }
        };

        let encoded = match self.encoder.encode(&self.pcm[..samples], &mut self.packet) {
            Ok(encoded) if encoded <= self.packet.len() => encoded,
            Ok(encoded) => {
                warn!("Opus encoder reported {} bytes, dropping frame", encoded);
                return None;
            }
            Err(e) => {
                warn!("Opus encode failed: {:?}", e);
                return None;
            }
        };

        if let Err(e) = publisher.send_audio(&self.packet[..encoded]).await {
            debug!("Publisher rejected audio frame: {:?}", e);
            return None;
        }

        self.frames_sent += 1;
        Some(encoded)
    }
}
