use crate::audio::{AudioDownlink, AudioUplink};
use crate::engine::{EngineEvent, PeerEngine};
use crate::lifecycle::{ConnectionLifecycle, LifecycleAction, Supervisor};
use crate::negotiation::{PublisherFsm, SubscriberDriver};
use crate::session::session_command::SessionCommand;
use crate::session::session_config::SessionConfig;
use crate::session::session_error::SessionError;
use crate::signaling::{SignalingOutput, SignalingStore};
use tandem_core::{AnswerCredentials, PublisherState, Role};
use tokio::sync::{mpsc, watch};
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

/// Device side of one cloud session: a subscriber connection that receives,
/// a publisher connection that sends.
///
/// The session task owns every piece of negotiation state. Signaling arrives
/// as [`SessionCommand`]s and is applied on the next tick.
pub struct Session {
    config: SessionConfig,
    subscriber: Box<dyn PeerEngine>,
    publisher: Box<dyn PeerEngine>,
    store: SignalingStore,
    fsm: PublisherFsm,
    driver: SubscriberDriver,
    lifecycle: ConnectionLifecycle,
    signaling: Box<dyn SignalingOutput>,
    command_rx: mpsc::Receiver<SessionCommand>,
    uplink: Option<AudioUplink>,
    downlink: Option<AudioDownlink>,
}

impl Session {
    pub fn new(
        config: SessionConfig,
        subscriber: Box<dyn PeerEngine>,
        publisher: Box<dyn PeerEngine>,
        supervisor: Box<dyn Supervisor>,
        command_rx: mpsc::Receiver<SessionCommand>,
        signaling: Box<dyn SignalingOutput>,
    ) -> Self {
        if subscriber.role() != Role::Subscriber || publisher.role() != Role::Publisher {
            warn!(
                "Connections passed as {} / {}, expected subscriber / publisher",
                subscriber.role(),
                publisher.role()
            );
        }

        Self {
            fsm: PublisherFsm::new(config.negotiation_timeout),
            config,
            subscriber,
            publisher,
            store: SignalingStore::new(),
            driver: SubscriberDriver::new(),
            lifecycle: ConnectionLifecycle::new(supervisor),
            signaling,
            command_rx,
            uplink: None,
            downlink: None,
        }
    }

    pub fn with_uplink(mut self, uplink: AudioUplink) -> Self {
        self.uplink = Some(uplink);
        self
    }

    pub fn with_downlink(mut self, downlink: AudioDownlink) -> Self {
        self.downlink = Some(downlink);
        self
    }

    pub fn publisher_state(&self) -> PublisherState {
        self.fsm.state()
    }

    pub fn subscribe_publisher_state(&self) -> watch::Receiver<PublisherState> {
        self.fsm.subscribe()
    }

    /// Credentials of the last answer sent for the subscriber.
    pub fn credentials(&self) -> Option<&AnswerCredentials> {
        self.driver.credentials()
    }

    pub fn store(&self) -> &SignalingStore {
        &self.store
    }

    pub async fn run(mut self) -> Result<(), SessionError> {
        info!(
            "Session event loop started (tick {:?})",
            self.config.tick_interval
        );

        let mut ticker = tokio::time::interval(self.config.tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let result = loop {
            tokio::select! {
                cmd = self.command_rx.recv() => {
                    match cmd {
                        Some(c) => self.handle_command(c),
                        None => {
                            info!("Command channel closed. Shutting down session.");
                            break Ok(());
                        }
                    }
                }

                _ = ticker.tick() => {
                    if let Err(e) = self.tick().await {
                        error!("{}", e);
                        break Err(e);
                    }
                }
            }
        };

        self.close().await;
        info!("Session event loop finished");
        result
    }

    /// Queue inbound signaling for the next tick.
    pub fn handle_command(&mut self, cmd: SessionCommand) {
        match cmd {
            SessionCommand::RemoteOffer { sdp } => {
                self.driver.note_offer(&sdp);
                self.store.set_offer(sdp);
            }

            SessionCommand::RemoteAnswer { sdp } => {
                self.store.set_answer(sdp);
                self.fsm.answer_received();
            }

            SessionCommand::IceCandidate { target, candidate } => {
                let role = target.unwrap_or_else(|| self.negotiating_role());
                debug!("Queued ICE candidate for {}", role);
                self.store.set_ice_candidate(role, candidate);
            }

            SessionCommand::TrackPublished => self.fsm.track_published(),
        }
    }

    /// One negotiation step for both connections.
    pub async fn tick(&mut self) -> Result<(), SessionError> {
        self.fsm.drive(&mut self.store, self.publisher.as_ref()).await;
        self.driver
            .drain(&mut self.store, self.subscriber.as_ref())
            .await;

        self.check_deadline().await?;

        for event in self.subscriber.advance().await {
            self.handle_subscriber_event(event).await?;
        }
        for event in self.publisher.advance().await {
            self.handle_publisher_event(event).await?;
        }

        if self.subscriber.state().is_completed() {
            if let Some(uplink) = self.uplink.as_mut() {
                uplink.pump(self.publisher.as_ref()).await;
            }
        }

        Ok(())
    }

    /// Subscriber negotiates first; once it is up, untargeted candidates
    /// belong to the publisher.
    fn negotiating_role(&self) -> Role {
        if self.subscriber.state().is_completed() {
            Role::Publisher
        } else {
            Role::Subscriber
        }
    }

    async fn check_deadline(&mut self) -> Result<(), SessionError> {
        let Some(stuck) = self.fsm.expired() else {
            return Ok(());
        };
        warn!("Publisher negotiation timed out in {}", stuck);

        match self.lifecycle.on_negotiation_timeout(stuck) {
            LifecycleAction::Restart(failure) => Err(SessionError::Fatal { failure }),
            _ => {
                self.fsm.rearm();
                if stuck == PublisherState::RequestTrackAdd {
                    self.request_track().await;
                }
                Ok(())
            }
        }
    }

    async fn handle_subscriber_event(&mut self, event: EngineEvent) -> Result<(), SessionError> {
        match event {
            EngineEvent::LocalDescription(sdp) => match self.driver.answer_for(&sdp) {
                Ok(answer) => self.signaling.send_answer(answer).await,
                Err(e) => error!("Failed to synthesize subscriber answer: {}", e),
            },

            EngineEvent::StateChanged(state) => {
                let action = self.lifecycle.on_state_change(Role::Subscriber, state);
                self.apply_lifecycle(action).await?;
            }

            EngineEvent::AudioFrame(packet) => match self.downlink.as_mut() {
                Some(downlink) => {
                    downlink.play(&packet);
                }
                None => debug!("No playback configured, dropping {} bytes", packet.len()),
            },

            EngineEvent::DataMessage(data) => {
                info!(
                    "Data channel message: {}",
                    String::from_utf8_lossy(&data)
                );
            }
        }
        Ok(())
    }

    async fn handle_publisher_event(&mut self, event: EngineEvent) -> Result<(), SessionError> {
        match event {
            EngineEvent::LocalDescription(sdp) => {
                if self.fsm.local_offer_ready() {
                    self.signaling.send_offer(sdp).await;
                }
            }

            EngineEvent::StateChanged(state) => {
                let action = self.lifecycle.on_state_change(Role::Publisher, state);
                self.apply_lifecycle(action).await?;
            }

            EngineEvent::AudioFrame(_) | EngineEvent::DataMessage(_) => {
                debug!("Ignoring inbound media on the publisher connection");
            }
        }
        Ok(())
    }

    async fn apply_lifecycle(&mut self, action: LifecycleAction) -> Result<(), SessionError> {
        match action {
            LifecycleAction::None => Ok(()),
            LifecycleAction::ArmPublisher => {
                if self.fsm.request_track_add() {
                    self.request_track().await;
                }
                Ok(())
            }
            LifecycleAction::Tolerate(failure) => {
                warn!("Continuing after {}", failure);
                if failure.role == Role::Publisher {
                    self.restart_publisher().await;
                }
                Ok(())
            }
            LifecycleAction::Restart(failure) => Err(SessionError::Fatal { failure }),
        }
    }

    /// Drop the current publisher cycle and, if the subscriber is still up,
    /// ask for the track again.
    async fn restart_publisher(&mut self) {
        self.fsm.reset();
        if self.subscriber.state().is_completed() && self.fsm.request_track_add() {
            self.request_track().await;
        }
    }

    async fn request_track(&mut self) {
        self.signaling
            .send_add_track(self.config.track_name.clone())
            .await;
    }

    async fn close(&mut self) {
        for connection in [&self.subscriber, &self.publisher] {
            if let Err(e) = connection.close().await {
                warn!("Failed to close {} connection: {:?}", connection.role(), e);
            }
        }
    }
}
