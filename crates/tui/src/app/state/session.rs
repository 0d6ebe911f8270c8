use std::fmt;

use super::confirm::DiffConfirmation;
use super::log::{LogKind, ScrollbackLog};

pub const MSG_REQUESTING_ID: &str = "Requesting connection ID...";
pub const MSG_ESTABLISHED: &str = "Connection established. Ready for input.";
pub const MSG_CONNECTION_LOST: &str = "Connection lost.";
pub const MSG_SESSION_CLOSED: &str = "Session closed.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionPhase {
    Uninitialized,
    Connecting,
    Open,
    ClosedClean,
    ClosedError,
}

impl SessionPhase {
    pub fn is_closed(self) -> bool {
        matches!(self, Self::ClosedClean | Self::ClosedError)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Uninitialized => "idle",
            Self::Connecting => "connecting",
            Self::Open => "connected",
            Self::ClosedClean => "closed",
            Self::ClosedError => "disconnected",
        }
    }
}

/// One operator-to-backend conversation. Owns the scrollback and the diff
/// confirmation; the transport only reports into it.
#[derive(Debug)]
pub struct Session {
    phase: SessionPhase,
    connection_id: Option<String>,
    pub log: ScrollbackLog,
    pub confirmation: DiffConfirmation,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            phase: SessionPhase::Uninitialized,
            connection_id: None,
            log: ScrollbackLog::default(),
            confirmation: DiffConfirmation::default(),
        }
    }
}

impl Session {
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_open(&self) -> bool {
        self.phase == SessionPhase::Open
    }

    pub fn connection_id(&self) -> Option<&str> {
        self.connection_id.as_deref()
    }

    pub fn push(&mut self, kind: LogKind, text: impl Into<String>) -> u64 {
        self.log.append(kind, text)
    }

    /// Returns false when establishment already started; a session is only
    /// ever established once.
    pub fn begin_connect(&mut self) -> bool {
        if self.phase != SessionPhase::Uninitialized {
            return false;
        }
        self.phase = SessionPhase::Connecting;
        self.push(LogKind::System, MSG_REQUESTING_ID);
        true
    }

    pub fn identifier_received(&mut self, connection_id: &str) -> bool {
        if self.phase != SessionPhase::Connecting || self.connection_id.is_some() {
            return false;
        }
        self.connection_id = Some(connection_id.to_string());
        self.push(
            LogKind::System,
            format!("Connection ID received: {connection_id}. Opening stream..."),
        );
        true
    }

    pub fn channel_opened(&mut self) -> bool {
        if self.phase != SessionPhase::Connecting || self.connection_id.is_none() {
            return false;
        }
        self.phase = SessionPhase::Open;
        self.push(LogKind::System, MSG_ESTABLISHED);
        true
    }

    pub fn connect_failed(&mut self, reason: impl fmt::Display) -> bool {
        if self.phase != SessionPhase::Connecting {
            return false;
        }
        self.phase = SessionPhase::ClosedError;
        self.push(LogKind::Error, format!("Connection failed: {reason}"));
        true
    }

    pub fn channel_closed(&mut self) -> bool {
        if self.phase != SessionPhase::Open {
            return false;
        }
        self.phase = SessionPhase::ClosedError;
        self.push(LogKind::Error, MSG_CONNECTION_LOST);
        true
    }

    pub fn channel_failed(&mut self, reason: impl fmt::Display) -> bool {
        if self.phase != SessionPhase::Open {
            return false;
        }
        self.phase = SessionPhase::ClosedError;
        self.push(LogKind::Error, format!("Connection error: {reason}"));
        true
    }

    /// Operator-initiated shutdown. Returns true when the session was live and
    /// the streaming channel has to be closed.
    pub fn close(&mut self) -> bool {
        if !matches!(self.phase, SessionPhase::Connecting | SessionPhase::Open) {
            return false;
        }
        self.phase = SessionPhase::ClosedClean;
        self.push(LogKind::System, MSG_SESSION_CLOSED);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(session: &Session) -> Vec<String> {
        session
            .log
            .snapshot()
            .iter()
            .map(|entry| entry.text().to_string())
            .collect()
    }

    #[test]
    fn establish_milestones_are_logged_in_order() {
        let mut session = Session::default();
        assert!(session.begin_connect());
        assert!(session.identifier_received("abc123"));
        assert!(session.channel_opened());

        assert_eq!(session.phase(), SessionPhase::Open);
        assert_eq!(session.connection_id(), Some("abc123"));
        let lines = texts(&session);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "Requesting connection ID...");
        assert!(lines[1].starts_with("Connection ID received"));
        assert!(lines[1].contains("abc123"));
        assert_eq!(lines[2], "Connection established. Ready for input.");
        assert!(session
            .log
            .snapshot()
            .iter()
            .all(|entry| *entry.kind() == LogKind::System));
    }

    #[test]
    fn begin_connect_only_runs_once() {
        let mut session = Session::default();
        assert!(session.begin_connect());
        assert!(!session.begin_connect());
        assert_eq!(session.log.len(), 1);
    }

    #[test]
    fn connect_failure_is_terminal() {
        let mut session = Session::default();
        session.begin_connect();
        assert!(session.connect_failed("refused"));
        assert_eq!(session.phase(), SessionPhase::ClosedError);
        let last = session.log.last().expect("error entry");
        assert_eq!(*last.kind(), LogKind::Error);
        assert_eq!(last.text(), "Connection failed: refused");

        assert!(!session.identifier_received("late"));
        assert!(!session.channel_opened());
        assert!(!session.begin_connect());
        assert_eq!(session.phase(), SessionPhase::ClosedError);
    }

    #[test]
    fn channel_close_after_error_adds_nothing() {
        let mut session = Session::default();
        session.begin_connect();
        session.identifier_received("abc123");
        session.channel_opened();

        assert!(session.channel_failed("reset by peer"));
        let before = session.log.len();
        assert!(!session.channel_closed());
        assert_eq!(session.log.len(), before);
        assert_eq!(session.phase(), SessionPhase::ClosedError);
    }

    #[test]
    fn close_is_clean_and_single_shot() {
        let mut session = Session::default();
        session.begin_connect();
        session.identifier_received("abc123");
        session.channel_opened();

        assert!(session.close());
        assert_eq!(session.phase(), SessionPhase::ClosedClean);
        assert!(!session.close());
        assert!(!session.channel_closed());
        assert_eq!(session.log.last().map(|e| e.text()), Some(MSG_SESSION_CLOSED));
    }

    #[test]
    fn channel_cannot_open_without_identifier() {
        let mut session = Session::default();
        session.begin_connect();
        assert!(!session.channel_opened());
        assert_eq!(session.phase(), SessionPhase::Connecting);
    }
}
