use std::sync::mpsc::Sender;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::runtime::Handle;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};
use url::Url;

use super::error::{ChannelError, ConnectError, ConnectStage, MalformedFrame, SendError};
use super::protocol::{ConnectResponse, InputBody, OutboundCommand, PingResponse};

pub type EventStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Everything the transport reports back to the UI thread, in the order it
/// was observed.
#[derive(Debug)]
pub enum TransportMessage {
    IdentifierReceived(String),
    ChannelOpened,
    ConnectFailed(ConnectError),
    Frame(String),
    Malformed(MalformedFrame),
    ChannelClosed,
    ChannelFailed(ChannelError),
    SendFailed(SendError),
    PingStatus(String),
    PingFailed(SendError),
}

/// Where the input router hands off outbound work. Implementations must not
/// block the caller on the network.
pub trait CommandSink {
    fn send_input(&mut self, command: OutboundCommand);
    fn ping(&mut self);
}

pub struct EstablishedSession {
    pub connection_id: String,
    pub stream: EventStream,
}

#[derive(Clone, Debug)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: Url,
    connect_timeout: Duration,
    request_timeout: Duration,
}

impl BackendClient {
    pub fn new(
        base_url: Url,
        connect_timeout: Duration,
        request_timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .build()?;
        Ok(Self {
            http,
            base_url,
            connect_timeout,
            request_timeout,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    pub fn stream_url(&self, connection_id: &str) -> Result<Url, ConnectError> {
        let mut url = self.endpoint(&["ws", connection_id]);
        let scheme = match url.scheme() {
            "http" => "ws",
            "https" => "wss",
            other => {
                return Err(ConnectError::InvalidUrl(format!(
                    "unsupported scheme `{other}`"
                )))
            }
        };
        url.set_scheme(scheme)
            .map_err(|()| ConnectError::InvalidUrl(format!("cannot derive {scheme} url")))?;
        Ok(url)
    }

    pub async fn ping(&self) -> Result<String, SendError> {
        let url = self.endpoint(&["api", "v1", "ping"]);
        let request = async {
            let response = self.http.get(url).send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(SendError::Status(status));
            }
            let body: PingResponse = response.json().await?;
            Ok::<_, SendError>(body.status_text())
        };
        timeout(self.request_timeout, request)
            .await
            .map_err(|_| SendError::Timeout(self.request_timeout))?
    }

    pub async fn request_connection_id(&self) -> Result<String, ConnectError> {
        let url = self.endpoint(&["api", "v1", "connect"]);
        let request = async {
            let response = self.http.post(url).send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(ConnectError::Status(status));
            }
            let body: ConnectResponse = response.json().await?;
            body.connection_id
                .filter(|id| !id.trim().is_empty())
                .ok_or(ConnectError::MissingIdentifier)
        };
        timeout(self.connect_timeout, request)
            .await
            .map_err(|_| ConnectError::Timeout {
                stage: ConnectStage::Identifier,
                after: self.connect_timeout,
            })?
    }

    pub async fn open_stream(&self, connection_id: &str) -> Result<EventStream, ConnectError> {
        let url = self.stream_url(connection_id)?;
        debug!(%url, "opening stream");
        let (stream, _response) = timeout(self.connect_timeout, connect_async(url.as_str()))
            .await
            .map_err(|_| ConnectError::Timeout {
                stage: ConnectStage::Handshake,
                after: self.connect_timeout,
            })??;
        Ok(stream)
    }

    /// Acquires an identifier and opens the one stream scoped to it.
    /// `on_identifier` runs between the two steps so the caller can report
    /// progress.
    pub async fn establish(
        &self,
        on_identifier: impl FnOnce(&str),
    ) -> Result<EstablishedSession, ConnectError> {
        let connection_id = self.request_connection_id().await?;
        info!(%connection_id, "connection id received");
        on_identifier(&connection_id);
        let stream = self.open_stream(&connection_id).await?;
        Ok(EstablishedSession {
            connection_id,
            stream,
        })
    }

    pub async fn send_input(&self, command: &OutboundCommand) -> Result<(), SendError> {
        let url = self.endpoint(&["api", "v1", "input", command.connection_id.as_str()]);
        let request = async {
            let response = self
                .http
                .post(url)
                .json(&InputBody {
                    text: &command.text,
                })
                .send()
                .await?;
            let status = response.status();
            if !status.is_success() {
                return Err(SendError::Status(status));
            }
            Ok::<_, SendError>(())
        };
        timeout(self.request_timeout, request)
            .await
            .map_err(|_| SendError::Timeout(self.request_timeout))?
    }
}

enum Outbound {
    Input(OutboundCommand),
    Ping,
}

/// Owns the session's streaming channel and the outbound queue. Work runs on
/// the tokio runtime; results come back through `events`.
pub struct TransportHandle {
    client: BackendClient,
    runtime: Handle,
    events: Sender<TransportMessage>,
    outbound: mpsc::UnboundedSender<Outbound>,
    shutdown: Option<oneshot::Sender<()>>,
    session_task: Option<JoinHandle<()>>,
    established: bool,
}

impl TransportHandle {
    pub fn new(client: BackendClient, runtime: Handle, events: Sender<TransportMessage>) -> Self {
        let (outbound, queue) = mpsc::unbounded_channel();
        runtime.spawn(run_outbound(client.clone(), queue, events.clone()));
        Self {
            client,
            runtime,
            events,
            outbound,
            shutdown: None,
            session_task: None,
            established: false,
        }
    }

    /// Starts establishment. Only the first call does anything.
    pub fn establish(&mut self) -> bool {
        if self.established {
            return false;
        }
        self.established = true;
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        self.shutdown = Some(shutdown_tx);
        let task = self.runtime.spawn(run_session(
            self.client.clone(),
            self.events.clone(),
            shutdown_rx,
        ));
        self.session_task = Some(task);
        true
    }

    /// Closes the streaming channel. Returns the session task so the caller
    /// can wait for the close frame to go out.
    pub fn shutdown(&mut self) -> Option<JoinHandle<()>> {
        let signal = self.shutdown.take()?;
        let _ = signal.send(());
        self.session_task.take()
    }
}

impl CommandSink for TransportHandle {
    fn send_input(&mut self, command: OutboundCommand) {
        if self.outbound.send(Outbound::Input(command)).is_err() {
            warn!("outbound queue is gone; command dropped");
        }
    }

    fn ping(&mut self) {
        if self.outbound.send(Outbound::Ping).is_err() {
            warn!("outbound queue is gone; ping dropped");
        }
    }
}

async fn run_outbound(
    client: BackendClient,
    mut queue: mpsc::UnboundedReceiver<Outbound>,
    events: Sender<TransportMessage>,
) {
    while let Some(request) = queue.recv().await {
        let message = match request {
            Outbound::Input(command) => match client.send_input(&command).await {
                Ok(()) => {
                    debug!(connection_id = %command.connection_id, "command delivered");
                    continue;
                }
                Err(error) => {
                    warn!(%error, "command send failed");
                    TransportMessage::SendFailed(error)
                }
            },
            Outbound::Ping => match client.ping().await {
                Ok(status) => TransportMessage::PingStatus(status),
                Err(error) => TransportMessage::PingFailed(error),
            },
        };
        if events.send(message).is_err() {
            break;
        }
    }
}

async fn run_session(
    client: BackendClient,
    events: Sender<TransportMessage>,
    mut shutdown: oneshot::Receiver<()>,
) {
    let on_identifier = {
        let events = events.clone();
        move |connection_id: &str| {
            let _ = events.send(TransportMessage::IdentifierReceived(
                connection_id.to_string(),
            ));
        }
    };
    let established = tokio::select! {
        _ = &mut shutdown => {
            debug!("shutdown requested before the stream opened");
            return;
        }
        result = client.establish(on_identifier) => result,
    };
    match established {
        Ok(session) => {
            info!(connection_id = %session.connection_id, "stream open");
            if events.send(TransportMessage::ChannelOpened).is_err() {
                return;
            }
            pump_stream(session.stream, &events, shutdown).await;
        }
        Err(error) => {
            warn!(%error, "establish failed");
            let _ = events.send(TransportMessage::ConnectFailed(error));
        }
    }
}

async fn pump_stream(
    stream: EventStream,
    events: &Sender<TransportMessage>,
    mut shutdown: oneshot::Receiver<()>,
) {
    let (mut sink, mut source) = stream.split();
    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!("closing stream");
                if let Err(error) = sink.close().await {
                    debug!(%error, "close frame not delivered");
                }
                return;
            }
            next = source.next() => {
                let message = match next {
                    Some(Ok(Message::Text(text))) => TransportMessage::Frame(text),
                    Some(Ok(Message::Binary(bytes))) => match String::from_utf8(bytes) {
                        Ok(text) => TransportMessage::Frame(text),
                        Err(_) => TransportMessage::Malformed(MalformedFrame::new(
                            "binary frame is not UTF-8",
                        )),
                    },
                    Some(Ok(Message::Close(frame))) => {
                        info!(?frame, "stream closed by backend");
                        let _ = events.send(TransportMessage::ChannelClosed);
                        // The reply close frame is queued by the read; flush it out.
                        if let Err(error) = sink.close().await {
                            debug!(%error, "close reply not delivered");
                        }
                        return;
                    }
                    Some(Ok(_)) => continue,
                    Some(Err(error)) => {
                        warn!(%error, "stream error");
                        let _ = events.send(TransportMessage::ChannelFailed(ChannelError(error)));
                        return;
                    }
                    None => {
                        info!("stream ended");
                        let _ = events.send(TransportMessage::ChannelClosed);
                        return;
                    }
                };
                if events.send(message).is_err() {
                    return;
                }
            }
        }
    }
}
