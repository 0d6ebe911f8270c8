/// Display class of one wrapped row. Diff bodies are classified per line by
/// their unified-diff prefix.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineTone {
    System,
    User,
    Error,
    Event,
    DiffHeader,
    DiffHunk,
    DiffAdded,
    DiffRemoved,
    DiffContext,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WrappedLine {
    pub tone: LineTone,
    pub text: String,
}

pub struct WrappedLogCache {
    pub width: usize,
    pub log_version: u64,
    pub wrapped: Vec<WrappedLine>,
}
