use crate::app::handlers::confirm::open_diff_confirmation;
use crate::app::runtime::{parse_frame, InboundEvent, MalformedFrame, TransportMessage};
use crate::app::state::{LogEntry, LogKind};
use crate::app::AppState;
use tracing::{debug, warn};

/// Applies one transport report to the session. Reports arrive in the order
/// the transport observed them and are applied in that order.
pub(crate) fn apply_transport_message(app: &mut AppState, message: TransportMessage) {
    let phase = app.session.phase();
    match message {
        TransportMessage::IdentifierReceived(connection_id) => {
            if !app.session.identifier_received(&connection_id) {
                debug!(?phase, %connection_id, "identifier ignored");
            }
        }
        TransportMessage::ChannelOpened => {
            if !app.session.channel_opened() {
                debug!(?phase, "channel open ignored");
            }
        }
        TransportMessage::ConnectFailed(error) => {
            if !app.session.connect_failed(&error) {
                debug!(?phase, %error, "connect failure ignored");
            }
        }
        TransportMessage::Frame(raw) => {
            if !app.session.is_open() {
                debug!(?phase, "frame ignored");
                return;
            }
            match parse_frame(&raw) {
                Ok(event) => {
                    dispatch_event(app, event);
                    debug!(seq = ?app.session.log.last().map(LogEntry::seq), "frame applied");
                }
                Err(error) => report_malformed(app, error),
            }
        }
        TransportMessage::Malformed(error) => {
            if !app.session.is_open() {
                debug!(?phase, %error, "malformed frame ignored");
                return;
            }
            report_malformed(app, error);
        }
        TransportMessage::ChannelClosed => {
            if !app.session.channel_closed() {
                debug!(?phase, "channel close ignored");
            }
        }
        TransportMessage::ChannelFailed(error) => {
            if !app.session.channel_failed(&error) {
                debug!(?phase, %error, "channel error ignored");
            }
        }
        TransportMessage::SendFailed(error) => {
            app.push_line(LogKind::Error, format!("Failed to send input: {error}"));
        }
        TransportMessage::PingStatus(status) => {
            app.push_line(LogKind::System, format!("Backend status: {status}"));
        }
        TransportMessage::PingFailed(error) => {
            app.push_line(
                LogKind::Error,
                format!("Error connecting to backend: {error}"),
            );
        }
    }
}

pub(crate) fn dispatch_event(app: &mut AppState, event: InboundEvent) {
    match event {
        InboundEvent::Diff { file_path, diff } => open_diff_confirmation(app, file_path, diff),
        InboundEvent::Other { kind, payload } => {
            app.push_line(LogKind::from_label(&kind), payload);
        }
    }
}

fn report_malformed(app: &mut AppState, error: MalformedFrame) {
    warn!(%error, "discarding frame");
    app.push_line(LogKind::Error, error.to_string());
}
