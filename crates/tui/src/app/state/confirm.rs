use std::fmt;
use std::str::FromStr;

pub const DIFF_CONFIRM_PROMPT: &str = "Apply this diff? (yes/no)";
const CONFIRM_TITLE: &str = "Confirm";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingConfirmation {
    pub file_path: String,
    pub diff: String,
    pub prompt: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfirmPhase {
    Idle,
    AwaitingConfirmation,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfirmAnswer {
    Accept,
    Reject,
}

/// How operator text is matched while a diff awaits confirmation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AnswerPolicy {
    /// Only `yes` / `no` (case-insensitive) close the confirmation.
    #[default]
    Strict,
    /// Any non-empty text closes it; only `yes` accepts.
    Lenient,
}

impl AnswerPolicy {
    pub fn interpret(self, text: &str) -> Option<ConfirmAnswer> {
        let answer = text.trim();
        if answer.eq_ignore_ascii_case("yes") {
            return Some(ConfirmAnswer::Accept);
        }
        if answer.eq_ignore_ascii_case("no") {
            return Some(ConfirmAnswer::Reject);
        }
        match self {
            Self::Strict => None,
            Self::Lenient if answer.is_empty() => None,
            Self::Lenient => Some(ConfirmAnswer::Reject),
        }
    }
}

impl FromStr for AnswerPolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "lenient" => Ok(Self::Lenient),
            other => Err(other.to_string()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub message: String,
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title, self.message)
    }
}

#[derive(Debug, Default)]
pub struct DiffConfirmation {
    pending: Option<PendingConfirmation>,
}

impl DiffConfirmation {
    pub fn phase(&self) -> ConfirmPhase {
        if self.pending.is_some() {
            ConfirmPhase::AwaitingConfirmation
        } else {
            ConfirmPhase::Idle
        }
    }

    pub fn is_awaiting(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending(&self) -> Option<&PendingConfirmation> {
        self.pending.as_ref()
    }

    /// Opens a confirmation for `file_path`, returning the one it replaced.
    pub fn open(
        &mut self,
        file_path: impl Into<String>,
        diff: impl Into<String>,
    ) -> Option<PendingConfirmation> {
        self.pending.replace(PendingConfirmation {
            file_path: file_path.into(),
            diff: diff.into(),
            prompt: DIFF_CONFIRM_PROMPT.to_string(),
        })
    }

    pub fn resolve(&mut self) -> Option<PendingConfirmation> {
        self.pending.take()
    }

    pub fn notification(&self) -> Option<Notification> {
        self.pending.as_ref().map(|pending| Notification {
            title: CONFIRM_TITLE.to_string(),
            message: pending.prompt.clone(),
        })
    }
}
