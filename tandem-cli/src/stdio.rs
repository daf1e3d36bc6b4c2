use async_trait::async_trait;
use tandem_core::SignalMessage;
use tandem_session::{SessionCommand, SignalingOutput};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Outgoing signaling as JSON lines on stdout.
#[derive(Clone)]
pub struct StdoutSignaling {
    tx: mpsc::UnboundedSender<String>,
}

impl StdoutSignaling {
    /// Start the writer task. Stdout is written from that task only.
    pub fn spawn() -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<String>();

        tokio::spawn(async move {
            let mut stdout = tokio::io::stdout();
            while let Some(line) = rx.recv().await {
                let written = async {
                    stdout.write_all(line.as_bytes()).await?;
                    stdout.write_all(b"\n").await?;
                    stdout.flush().await
                };
                if let Err(e) = written.await {
                    error!("Failed to write signaling to stdout: {}", e);
                    break;
                }
            }
        });

        Self { tx }
    }

    fn send_signal(&self, msg: SignalMessage) {
        match serde_json::to_string(&msg) {
            Ok(json) => {
                if self.tx.send(json).is_err() {
                    warn!("Stdout writer is gone, dropping signal");
                }
            }
            Err(e) => error!("Failed to serialize signal message: {}", e),
        }
    }
}

#[async_trait]
impl SignalingOutput for StdoutSignaling {
    async fn send_answer(&self, sdp: String) {
        self.send_signal(SignalMessage::Answer { sdp });
    }

    async fn send_offer(&self, sdp: String) {
        self.send_signal(SignalMessage::Offer { sdp });
    }

    async fn send_add_track(&self, name: String) {
        self.send_signal(SignalMessage::AddTrack { name });
    }
}

/// Feed JSON lines from stdin into the session until stdin closes.
pub async fn read_commands(cmd_tx: mpsc::Sender<SessionCommand>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => {
                info!("Signaling input closed");
                break;
            }
            Err(e) => {
                error!("Failed to read signaling input: {}", e);
                break;
            }
        };

        if line.trim().is_empty() {
            continue;
        }

        let msg = match serde_json::from_str::<SignalMessage>(&line) {
            Ok(msg) => msg,
            Err(e) => {
                warn!("Ignoring malformed signaling line: {}", e);
                continue;
            }
        };

        let Some(cmd) = SessionCommand::from_signal(msg) else {
            debug!("Ignoring outbound-only signal on input");
            continue;
        };

        if cmd_tx.send(cmd).await.is_err() {
            debug!("Session is gone, stopping input");
            break;
        }
    }
}
