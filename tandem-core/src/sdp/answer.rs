use crate::sdp::credentials::AnswerCredentials;
use crate::sdp::error::SdpError;

/// Buffer size the device reserves for a rendered answer.
pub const ANSWER_CAPACITY: usize = 1024;

const CRLF: &str = "\r\n";

const SESSION_HEADER: &str = "v=0\r\n\
    o=- 8611954123959290783 2 IN IP4 127.0.0.1\r\n\
    s=-\r\n\
    t=0 0\r\n\
    a=msid-semantic:  iot\r\n";

const BUNDLE_DATA_ONLY: &str = "a=group:BUNDLE datachannel\r\n";
const BUNDLE_DATA_AND_AUDIO: &str = "a=group:BUNDLE datachannel audio\r\n";

const DATA_SECTION_HEAD: &str = "m=application 9 UDP/DTLS/SCTP webrtc-datachannel\r\n\
    c=IN IP4 0.0.0.0\r\n\
    a=setup:passive\r\n\
    a=mid:datachannel\r\n";
const DATA_SECTION_TAIL: &str = "a=sctp-port:5000\r\n";

const AUDIO_SECTION_HEAD: &str = "m=audio 9 UDP/TLS/RTP/SAVP 111\r\n\
    c=IN IP4 0.0.0.0\r\n\
    a=rtpmap:111 opus/48000/2\r\n\
    a=rtcp:9 IN IP4 0.0.0.0\r\n\
    a=setup:passive\r\n\
    a=mid:audio\r\n";
const AUDIO_SECTION_TAIL: &str = "a=recvonly\r\n";

/// Fixed-template local answer: passive DTLS, no candidates, a data channel
/// section and optionally a receive-only Opus section.
#[derive(Debug, Clone, Copy)]
pub struct SdpAnswer<'a> {
    credentials: &'a AnswerCredentials,
    include_audio: bool,
}

#[derive(Debug, Default)]
pub struct AnswerBuilder<'a> {
    credentials: Option<&'a AnswerCredentials>,
    include_audio: bool,
}

impl<'a> AnswerBuilder<'a> {
    pub fn credentials(mut self, credentials: &'a AnswerCredentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn include_audio(mut self, include_audio: bool) -> Self {
        self.include_audio = include_audio;
        self
    }

    pub fn build(self) -> Result<SdpAnswer<'a>, SdpError> {
        let credentials = self.credentials.ok_or(SdpError::MissingCredentials)?;
        Ok(SdpAnswer {
            credentials,
            include_audio: self.include_audio,
        })
    }
}

impl<'a> SdpAnswer<'a> {
    pub fn builder() -> AnswerBuilder<'a> {
        AnswerBuilder::default()
    }

    pub fn includes_audio(&self) -> bool {
        self.include_audio
    }

    /// Exact byte length of the rendered answer.
    pub fn len(&self) -> usize {
        self.pieces().iter().map(|piece| piece.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Render into `out`, returning the number of bytes written.
    ///
    /// Nothing is written when the answer does not fit.
    pub fn write_into(&self, out: &mut [u8]) -> Result<usize, SdpError> {
        let required = self.len();
        if required > out.len() {
            return Err(SdpError::Truncated {
                required,
                capacity: out.len(),
            });
        }

        let mut offset = 0;
        for piece in self.pieces() {
            out[offset..offset + piece.len()].copy_from_slice(piece.as_bytes());
            offset += piece.len();
        }
        Ok(offset)
    }

    /// Render into a fixed-capacity string.
    pub fn render<const N: usize>(&self) -> Result<heapless::String<N>, SdpError> {
        let required = self.len();
        if required > N {
            return Err(SdpError::Truncated {
                required,
                capacity: N,
            });
        }

        let mut rendered = heapless::String::<N>::new();
        for piece in self.pieces() {
            rendered.push_str(piece).map_err(|_| SdpError::Truncated {
                required,
                capacity: N,
            })?;
        }
        Ok(rendered)
    }

    fn pieces(&self) -> Vec<&'a str> {
        let credentials = self.credentials.lines();
        let mut pieces = Vec::with_capacity(if self.include_audio { 18 } else { 10 });

        pieces.push(SESSION_HEADER);
        pieces.push(if self.include_audio {
            BUNDLE_DATA_AND_AUDIO
        } else {
            BUNDLE_DATA_ONLY
        });

        pieces.push(DATA_SECTION_HEAD);
        push_credentials(&mut pieces, credentials);
        pieces.push(DATA_SECTION_TAIL);

        if self.include_audio {
            pieces.push(AUDIO_SECTION_HEAD);
            push_credentials(&mut pieces, credentials);
            pieces.push(AUDIO_SECTION_TAIL);
        }

        pieces
    }
}

fn push_credentials<'a>(pieces: &mut Vec<&'a str>, credentials: [&'a str; 3]) {
    for line in credentials {
        pieces.push(line);
        pieces.push(CRLF);
    }
}
