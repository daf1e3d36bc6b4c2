use crate::engine::engine_config::EngineConfig;
use crate::engine::engine_event::EngineEvent;
use crate::engine::peer_engine::PeerEngine;
use anyhow::{Context, Result};
use async_trait::async_trait;
use bytes::Bytes;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tandem_core::{ConnectionState, Role};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use webrtc::api::APIBuilder;
use webrtc::api::interceptor_registry::register_default_interceptors;
use webrtc::api::media_engine::{MIME_TYPE_OPUS, MediaEngine};
use webrtc::api::setting_engine::SettingEngine;
use webrtc::data_channel::RTCDataChannel;
use webrtc::data_channel::data_channel_message::DataChannelMessage;
use webrtc::dtls_transport::dtls_role::DTLSRole;
use webrtc::ice_transport::ice_candidate::RTCIceCandidateInit;
use webrtc::ice_transport::ice_server::RTCIceServer;
use webrtc::interceptor::registry::Registry;
use webrtc::media::Sample;
use webrtc::peer_connection::RTCPeerConnection;
use webrtc::peer_connection::configuration::RTCConfiguration;
use webrtc::peer_connection::peer_connection_state::RTCPeerConnectionState;
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;
use webrtc::rtp_transceiver::RTCRtpTransceiver;
use webrtc::rtp_transceiver::rtp_codec::{
    RTCRtpCodecCapability, RTCRtpCodecParameters, RTPCodecType,
};
use webrtc::rtp_transceiver::rtp_receiver::RTCRtpReceiver;
use webrtc::track::track_local::TrackLocal;
use webrtc::track::track_local::track_local_static_sample::TrackLocalStaticSample;
use webrtc::track::track_remote::TrackRemote;

const OPUS_PAYLOAD_TYPE: u8 = 111;
const OPUS_FRAME_DURATION: Duration = Duration::from_millis(20);

/// [`PeerEngine`] backed by a webrtc-rs peer connection.
///
/// Callbacks registered on the connection only push [`EngineEvent`]s into a
/// queue; [`PeerEngine::advance`] drains it on the session task.
pub struct RtcEngine {
    role: Role,
    peer_connection: Arc<RTCPeerConnection>,
    audio_track: Option<Arc<TrackLocalStaticSample>>,
    /// Remote candidates that arrived before the remote description.
    early_candidates: Mutex<Vec<RTCIceCandidateInit>>,
    events_tx: mpsc::UnboundedSender<EngineEvent>,
    events_rx: mpsc::UnboundedReceiver<EngineEvent>,
}

impl RtcEngine {
    /// Create the connection for `role`: Opus audio only, no video; the
    /// subscriber accepts a string data channel, the publisher has none.
    pub async fn new(role: Role, config: &EngineConfig) -> Result<Self> {
        let mut media = MediaEngine::default();
        media.register_codec(
            RTCRtpCodecParameters {
                capability: RTCRtpCodecCapability {
                    mime_type: MIME_TYPE_OPUS.to_owned(),
                    clock_rate: 48000,
                    channels: 2,
                    sdp_fmtp_line: "minptime=10;useinbandfec=1".to_owned(),
                    rtcp_feedback: vec![],
                },
                payload_type: OPUS_PAYLOAD_TYPE,
                ..Default::default()
            },
            RTPCodecType::Audio,
        )?;
        let registry = register_default_interceptors(Registry::new(), &mut media)?;

        // The subscriber answers as the passive DTLS side, matching the
        // `a=setup:passive` lines of the synthesized answer.
        let mut settings = SettingEngine::default();
        if role == Role::Subscriber {
            settings.set_answering_dtls_role(DTLSRole::Server)?;
        }

        let api = APIBuilder::new()
            .with_media_engine(media)
            .with_interceptor_registry(registry)
            .with_setting_engine(settings)
            .build();

        let rtc_config = RTCConfiguration {
            ice_servers: config
                .ice_servers
                .iter()
                .map(|server| RTCIceServer {
                    urls: server.urls.clone(),
                    username: server.username.clone().unwrap_or_default(),
                    credential: server.credential.clone().unwrap_or_default(),
                    ..Default::default()
                })
                .collect(),
            ..Default::default()
        };

        let peer_connection = Arc::new(api.new_peer_connection(rtc_config).await?);
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        let state_tx = events_tx.clone();
        peer_connection.on_peer_connection_state_change(Box::new(
            move |s: RTCPeerConnectionState| {
                let tx = state_tx.clone();

                Box::pin(async move {
                    info!("{} peer connection state: {:?}", role, s);
                    let _ = tx.send(EngineEvent::StateChanged(map_state(s)));
                })
            },
        ));

        let audio_track = match role {
            Role::Publisher => Some(Self::attach_microphone_track(&peer_connection).await?),
            Role::Subscriber => {
                Self::forward_remote_audio(&peer_connection, events_tx.clone());
                Self::forward_data_channel(&peer_connection, events_tx.clone());
                None
            }
        };

        Ok(Self {
            role,
            peer_connection,
            audio_track,
            early_candidates: Mutex::new(Vec::new()),
            events_tx,
            events_rx,
        })
    }

    async fn attach_microphone_track(
        peer_connection: &Arc<RTCPeerConnection>,
    ) -> Result<Arc<TrackLocalStaticSample>> {
        let track = Arc::new(TrackLocalStaticSample::new(
            RTCRtpCodecCapability {
                mime_type: MIME_TYPE_OPUS.to_owned(),
                ..Default::default()
            },
            "microphone".to_owned(),
            "tandem".to_owned(),
        ));

        let rtp_sender = peer_connection
            .add_track(Arc::clone(&track) as Arc<dyn TrackLocal + Send + Sync>)
            .await?;

        // RTCP has to be read for the interceptors to run.
        tokio::spawn(async move {
            let mut rtcp_buf = vec![0u8; 1500];
            while rtp_sender.read(&mut rtcp_buf).await.is_ok() {}
        });

        Ok(track)
    }

    fn forward_remote_audio(
        peer_connection: &Arc<RTCPeerConnection>,
        events_tx: mpsc::UnboundedSender<EngineEvent>,
    ) {
        peer_connection.on_track(Box::new(
            move |track: Arc<TrackRemote>,
                  _receiver: Arc<RTCRtpReceiver>,
                  _transceiver: Arc<RTCRtpTransceiver>| {
                let tx = events_tx.clone();

                Box::pin(async move {
                    debug!("Remote audio track attached");
                    tokio::spawn(async move {
                        while let Ok((packet, _)) = track.read_rtp().await {
                            if tx.send(EngineEvent::AudioFrame(packet.payload)).is_err() {
                                break;
                            }
                        }
                    });
                })
            },
        ));
    }

    fn forward_data_channel(
        peer_connection: &Arc<RTCPeerConnection>,
        events_tx: mpsc::UnboundedSender<EngineEvent>,
    ) {
        peer_connection.on_data_channel(Box::new(move |dc: Arc<RTCDataChannel>| {
            let tx = events_tx.clone();

            Box::pin(async move {
                debug!("Data channel '{}' opened by remote", dc.label());

                dc.on_message(Box::new(move |msg: DataChannelMessage| {
                    let tx = tx.clone();
                    Box::pin(async move {
                        let _ = tx.send(EngineEvent::DataMessage(msg.data));
                    })
                }));
            })
        }));
    }

    fn queue_early_candidate(&self, init: RTCIceCandidateInit) -> Result<()> {
        let mut early = self
            .early_candidates
            .lock()
            .map_err(|_| anyhow::anyhow!("early candidate queue poisoned"))?;
        early.push(init);
        debug!(
            "{} holding ICE candidate until remote description ({} held)",
            self.role,
            early.len()
        );
        Ok(())
    }

    fn take_early_candidates(&self) -> Vec<RTCIceCandidateInit> {
        match self.early_candidates.lock() {
            Ok(mut early) => std::mem::take(&mut *early),
            Err(_) => {
                warn!("{} early candidate queue poisoned, dropping it", self.role);
                Vec::new()
            }
        }
    }

    /// Add candidates held back by [`PeerEngine::add_ice_candidate`].
    async fn flush_early_candidates(&self) {
        for init in self.take_early_candidates() {
            if let Err(e) = self.peer_connection.add_ice_candidate(init).await {
                warn!("Failed to add queued ICE candidate to {}: {:?}", self.role, e);
            }
        }
    }

    /// Report the local description once ICE gathering is done.
    fn emit_when_gathered(&self, mut gather_complete: mpsc::Receiver<()>) {
        let peer_connection = Arc::clone(&self.peer_connection);
        let tx = self.events_tx.clone();
        let role = self.role;

        tokio::spawn(async move {
            let _ = gather_complete.recv().await;
            match peer_connection.local_description().await {
                Some(local) => {
                    let _ = tx.send(EngineEvent::LocalDescription(local.sdp));
                }
                None => warn!("{} finished gathering without a local description", role),
            }
        });
    }
}

#[async_trait]
impl PeerEngine for RtcEngine {
    fn role(&self) -> Role {
        self.role
    }

    fn state(&self) -> ConnectionState {
        map_state(self.peer_connection.connection_state())
    }

    /// Candidates that arrive before the remote description are held and
    /// added right after it is set.
    async fn add_ice_candidate(&self, candidate: &str) -> Result<()> {
        let init = parse_candidate(candidate)?;
        if self.peer_connection.remote_description().await.is_none() {
            return self.queue_early_candidate(init);
        }
        self.peer_connection.add_ice_candidate(init).await?;
        Ok(())
    }

    async fn set_remote_description(&self, sdp: &str) -> Result<()> {
        match self.role {
            Role::Subscriber => {
                let offer = RTCSessionDescription::offer(sdp.to_owned())?;
                self.peer_connection.set_remote_description(offer).await?;
                self.flush_early_candidates().await;

                let answer = self.peer_connection.create_answer(None).await?;
                let gather_complete = self.peer_connection.gathering_complete_promise().await;
                self.peer_connection.set_local_description(answer).await?;
                self.emit_when_gathered(gather_complete);
            }
            Role::Publisher => {
                let answer = RTCSessionDescription::answer(sdp.to_owned())?;
                self.peer_connection.set_remote_description(answer).await?;
                self.flush_early_candidates().await;
            }
        }
        Ok(())
    }

    async fn create_offer(&self) -> Result<()> {
        let offer = self.peer_connection.create_offer(None).await?;
        let gather_complete = self.peer_connection.gathering_complete_promise().await;
        self.peer_connection.set_local_description(offer).await?;
        self.emit_when_gathered(gather_complete);
        Ok(())
    }

    async fn send_audio(&self, frame: &[u8]) -> Result<()> {
        let Some(track) = &self.audio_track else {
            anyhow::bail!("{} connection has no outgoing audio track", self.role);
        };
        track
            .write_sample(&Sample {
                data: Bytes::copy_from_slice(frame),
                duration: OPUS_FRAME_DURATION,
                ..Default::default()
            })
            .await?;
        Ok(())
    }

    async fn advance(&mut self) -> Vec<EngineEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.events_rx.try_recv() {
            events.push(event);
        }
        events
    }

    async fn close(&self) -> Result<()> {
        self.peer_connection.close().await?;
        Ok(())
    }
}

/// Accepts a bare `candidate:` line, an `a=candidate:` attribute, or a JSON
/// `RTCIceCandidateInit`.
fn parse_candidate(candidate: &str) -> Result<RTCIceCandidateInit> {
    let candidate = candidate.trim();
    if candidate.starts_with('{') {
        return serde_json::from_str::<RTCIceCandidateInit>(candidate)
            .context("Failed to parse ICE candidate JSON");
    }
    Ok(RTCIceCandidateInit {
        candidate: candidate.strip_prefix("a=").unwrap_or(candidate).to_owned(),
        ..Default::default()
    })
}

fn map_state(state: RTCPeerConnectionState) -> ConnectionState {
    match state {
        RTCPeerConnectionState::Unspecified | RTCPeerConnectionState::New => ConnectionState::New,
        RTCPeerConnectionState::Connecting => ConnectionState::Checking,
        RTCPeerConnectionState::Connected => ConnectionState::Completed,
        RTCPeerConnectionState::Disconnected => ConnectionState::Disconnected,
        RTCPeerConnectionState::Failed => ConnectionState::Failed,
        RTCPeerConnectionState::Closed => ConnectionState::Closed,
    }
}
