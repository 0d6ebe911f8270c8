use crate::app::state::{ConfirmAnswer, LogKind};
use crate::app::AppState;
use tracing::{info, warn};

pub(crate) const MSG_ANSWER_YES_OR_NO: &str = "Please answer yes or no.";

/// Logs a proposed change and gates further input on an answer. A diff that
/// arrives while another is pending takes its place.
pub(crate) fn open_diff_confirmation(app: &mut AppState, file_path: String, diff: String) {
    app.push_line(LogKind::System, format!("Proposed change for {file_path}:"));
    app.push_line(LogKind::Diff, diff.clone());
    if let Some(replaced) = app.session.confirmation.open(file_path, diff) {
        warn!(
            replaced = %replaced.file_path,
            "pending diff confirmation replaced by a newer diff"
        );
    }
    app.scroll_from_bottom = 0;
}

/// Returns true when the confirmation closed.
pub(crate) fn answer_confirmation(app: &mut AppState, text: &str) -> bool {
    app.push_line(LogKind::User, format!("> {text}"));
    let Some(answer) = app.confirm_policy.interpret(text) else {
        app.push_line(LogKind::System, MSG_ANSWER_YES_OR_NO);
        return false;
    };
    let Some(pending) = app.session.confirmation.resolve() else {
        return false;
    };
    info!(file_path = %pending.file_path, ?answer, "diff confirmation answered");
    let verdict = match answer {
        ConfirmAnswer::Accept => format!("Accepted diff for {}.", pending.file_path),
        ConfirmAnswer::Reject => format!("Rejected diff for {}.", pending.file_path),
    };
    app.push_line(LogKind::System, verdict);
    true
}
