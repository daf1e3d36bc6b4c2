use anyhow::Result;

pub const SAMPLE_RATE: u32 = 48_000;

/// Samples per channel in one 20 ms frame.
pub const FRAME_SAMPLES: usize = 960;

/// Upper bound for one encoded Opus packet.
pub const MAX_OPUS_PACKET: usize = 1276;

pub const CAPTURE_CHANNELS: usize = 1;
pub const PLAYBACK_CHANNELS: usize = 2;

/// Bytes of 16-bit PCM in one 20 ms stereo frame.
pub const MAX_PLAYBACK_FRAME_BYTES: usize =
    FRAME_SAMPLES * PLAYBACK_CHANNELS * std::mem::size_of::<i16>();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpusApplication {
    Voip,
    Audio,
    LowDelay,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpusSignal {
    Auto,
    Voice,
    Music,
}

/// Encoder tuning for the microphone uplink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncoderSettings {
    pub sample_rate: u32,
    pub channels: usize,
    pub bitrate: u32,
    pub complexity: u8,
    pub application: OpusApplication,
    pub signal: OpusSignal,
}

impl Default for EncoderSettings {
    fn default() -> Self {
        Self {
            sample_rate: SAMPLE_RATE,
            channels: CAPTURE_CHANNELS,
            bitrate: 30_000,
            complexity: 0,
            application: OpusApplication::Voip,
            signal: OpusSignal::Voice,
        }
    }
}

/// Microphone driver. Returns the number of samples read; 0 means no frame
/// is ready yet.
pub trait AudioSource: Send {
    fn read(&mut self, pcm: &mut [i16]) -> Result<usize>;
}

/// Speaker driver, interleaved stereo.
pub trait AudioSink: Send {
    fn write(&mut self, pcm: &[i16]) -> Result<()>;
}

pub trait OpusEncode: Send {
    fn configure(&mut self, settings: &EncoderSettings) -> Result<()>;

    /// Encode one mono frame into `packet`, returning the packet length.
    fn encode(&mut self, pcm: &[i16], packet: &mut [u8]) -> Result<usize>;
}

pub trait OpusDecode: Send {
    /// Decode one packet into interleaved stereo `pcm`, returning samples
    /// per channel.
    fn decode(&mut self, packet: &[u8], pcm: &mut [i16]) -> Result<usize>;
}
