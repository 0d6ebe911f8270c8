use crate::app::handlers::confirm::answer_confirmation;
use crate::app::runtime::{CommandSink, OutboundCommand};
use crate::app::state::LogKind;
use crate::app::AppState;
use tracing::debug;

const PING_COMMAND: &str = "/ping";
const QUIT_COMMAND: &str = "/quit";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SubmitOutcome {
    Ignored,
    Answered,
    Pinged,
    Forwarded,
    Quit,
}

/// Submits the composer contents. The composer is only cleared when the
/// submission was consumed.
pub(crate) fn handle_enter(app: &mut AppState, sink: &mut impl CommandSink) -> SubmitOutcome {
    let raw_input = app.input.current();
    let outcome = handle_submit(app, sink, &raw_input);
    if outcome != SubmitOutcome::Ignored {
        app.input.record_history(raw_input.trim());
        app.input.clear();
        app.scroll_from_bottom = 0;
    }
    outcome
}

/// Routes one submission: answer to a pending diff, local command, or text
/// forwarded to the backend as typed.
pub(crate) fn handle_submit(
    app: &mut AppState,
    sink: &mut impl CommandSink,
    raw_input: &str,
) -> SubmitOutcome {
    let trimmed = raw_input.trim();
    if trimmed.is_empty() {
        return SubmitOutcome::Ignored;
    }
    if trimmed.eq_ignore_ascii_case(QUIT_COMMAND) {
        app.session.close();
        app.should_exit = true;
        return SubmitOutcome::Quit;
    }
    if !app.session.is_open() {
        debug!(phase = ?app.session.phase(), "submission dropped");
        return SubmitOutcome::Ignored;
    }
    if app.session.confirmation.is_awaiting() {
        answer_confirmation(app, raw_input);
        return SubmitOutcome::Answered;
    }
    if trimmed.eq_ignore_ascii_case(PING_COMMAND) {
        app.push_line(LogKind::User, format!("> {raw_input}"));
        sink.ping();
        return SubmitOutcome::Pinged;
    }
    let Some(connection_id) = app.session.connection_id().map(str::to_string) else {
        return SubmitOutcome::Ignored;
    };
    app.push_line(LogKind::User, format!("> {raw_input}"));
    sink.send_input(OutboundCommand {
        connection_id,
        text: raw_input.to_string(),
    });
    SubmitOutcome::Forwarded
}
