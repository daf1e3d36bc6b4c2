use crate::audio::audio_io::{AudioSink, FRAME_SAMPLES, OpusDecode, PLAYBACK_CHANNELS};
use tracing::warn;

/// Subscriber audio track -> Opus -> speaker.
pub struct AudioDownlink {
    decoder: Box<dyn OpusDecode>,
    sink: Box<dyn AudioSink>,
    pcm: Vec<i16>,
}

impl AudioDownlink {
    pub fn new(decoder: Box<dyn OpusDecode>, sink: Box<dyn AudioSink>) -> Self {
        Self {
            decoder,
            sink,
            pcm: vec![0; FRAME_SAMPLES * PLAYBACK_CHANNELS],
        }
    }

    /// Decode and play one packet, returning the PCM bytes written.
    pub fn play(&mut self, packet: &[u8]) -> Option<usize> {
        let samples = match self.decoder.decode(packet, &mut self.pcm) {
            Ok(0) => return None,
            Ok(samples) => samples,
            Err(e) => {
                warn!("Opus decode failed: {:?}", e);
                return None;
            }
        };

        let len = (samples * PLAYBACK_CHANNELS).min(self.pcm.len());
        if let Err(e) = self.sink.write(&self.pcm[..len]) {
            warn!("Speaker write failed: {:?}", e);
            return None;
        }
        Some(len * std::mem::size_of::<i16>())
    }
}
