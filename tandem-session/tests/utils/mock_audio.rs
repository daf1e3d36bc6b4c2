#![allow(dead_code)]

use anyhow::{Result, bail};
use std::sync::{Arc, Mutex};
use tandem_session::audio::{
    AudioSink, AudioSource, EncoderSettings, FRAME_SAMPLES, OpusDecode, OpusEncode,
};

/// Microphone that always has a full frame ready.
pub struct ToneSource;

impl AudioSource for ToneSource {
    fn read(&mut self, pcm: &mut [i16]) -> Result<usize> {
        let samples = pcm.len().min(FRAME_SAMPLES);
        for (i, sample) in pcm.iter_mut().take(samples).enumerate() {
            *sample = (i % 64) as i16;
        }
        Ok(samples)
    }
}

/// "Encodes" every frame into a fixed-size packet.
pub struct FixedEncoder {
    pub packet_len: usize,
    pub fail_configure: bool,
    pub settings: Arc<Mutex<Option<EncoderSettings>>>,
}

impl FixedEncoder {
    pub fn new(packet_len: usize) -> Self {
        Self {
            packet_len,
            fail_configure: false,
            settings: Arc::new(Mutex::new(None)),
        }
    }
}

impl OpusEncode for FixedEncoder {
    fn configure(&mut self, settings: &EncoderSettings) -> Result<()> {
        if self.fail_configure {
            bail!("encoder allocation failed");
        }
        *self.settings.lock().unwrap() = Some(*settings);
        Ok(())
    }

    fn encode(&mut self, _pcm: &[i16], packet: &mut [u8]) -> Result<usize> {
        let len = self.packet_len.min(packet.len());
        packet[..len].fill(0xAB);
        Ok(len)
    }
}

/// Decodes every packet into a full 20 ms stereo frame.
pub struct FullFrameDecoder;

impl OpusDecode for FullFrameDecoder {
    fn decode(&mut self, _packet: &[u8], pcm: &mut [i16]) -> Result<usize> {
        pcm.fill(1);
        Ok(FRAME_SAMPLES)
    }
}

#[derive(Clone, Default)]
pub struct RecordingSink {
    writes: Arc<Mutex<Vec<usize>>>,
}

impl RecordingSink {
    pub fn writes(&self) -> Vec<usize> {
        self.writes.lock().unwrap().clone()
    }
}

impl AudioSink for RecordingSink {
    fn write(&mut self, pcm: &[i16]) -> Result<()> {
        self.writes.lock().unwrap().push(pcm.len());
        Ok(())
    }
}
