pub(crate) mod confirm;
pub(crate) mod input;
pub(crate) mod log;
pub(crate) mod render;
pub(crate) mod session;

pub(crate) use confirm::{AnswerPolicy, ConfirmAnswer, ConfirmPhase, Notification};
pub(crate) use input::InputState;
pub(crate) use log::{LogEntry, LogKind};
pub(crate) use render::{LineTone, WrappedLine, WrappedLogCache};
pub(crate) use session::{Session, SessionPhase};
