use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LogKind {
    System,
    User,
    Error,
    Diff,
    /// Backend-defined kind, kept as the label the backend sent.
    Other(String),
}

impl LogKind {
    pub fn from_label(label: &str) -> Self {
        match label {
            "system" => Self::System,
            "user" => Self::User,
            "error" => Self::Error,
            "diff" => Self::Diff,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Error => "error",
            Self::Diff => "diff",
            Self::Other(label) => label.as_str(),
        }
    }
}

impl fmt::Display for LogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogEntry {
    seq: u64,
    kind: LogKind,
    text: String,
}

impl LogEntry {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn kind(&self) -> &LogKind {
        &self.kind
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Append-only scrollback. Entries are never reordered, edited or removed, so
/// `seq` always equals the entry's index.
#[derive(Debug, Default)]
pub struct ScrollbackLog {
    entries: Vec<LogEntry>,
    version: u64,
}

impl ScrollbackLog {
    pub fn append(&mut self, kind: LogKind, text: impl Into<String>) -> u64 {
        let seq = self.entries.len() as u64;
        self.entries.push(LogEntry {
            seq,
            kind,
            text: text.into(),
        });
        self.version = self.version.wrapping_add(1);
        seq
    }

    pub fn snapshot(&self) -> &[LogEntry] {
        &self.entries
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.last()
    }

    /// Bumped on every append; the view compares it to decide whether cached
    /// wrapping is stale.
    pub fn version(&self) -> u64 {
        self.version
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_assigns_sequence_in_order() {
        let mut log = ScrollbackLog::default();
        assert_eq!(log.append(LogKind::System, "first"), 0);
        assert_eq!(log.append(LogKind::User, "> second"), 1);
        assert_eq!(log.append(LogKind::Error, "third"), 2);

        let texts: Vec<&str> = log.snapshot().iter().map(LogEntry::text).collect();
        assert_eq!(texts, vec!["first", "> second", "third"]);
        let seqs: Vec<u64> = log.snapshot().iter().map(LogEntry::seq).collect();
        assert_eq!(seqs, vec![0, 1, 2]);
    }

    #[test]
    fn append_bumps_version() {
        let mut log = ScrollbackLog::default();
        let before = log.version();
        log.append(LogKind::System, "hello");
        assert_ne!(log.version(), before);
    }

    #[test]
    fn unknown_labels_round_trip_as_other() {
        let kind = LogKind::from_label("impact_analysis");
        assert_eq!(kind, LogKind::Other("impact_analysis".to_string()));
        assert_eq!(kind.label(), "impact_analysis");
        assert_eq!(LogKind::from_label("error"), LogKind::Error);
        assert_eq!(LogKind::Diff.to_string(), "diff");
    }
}
