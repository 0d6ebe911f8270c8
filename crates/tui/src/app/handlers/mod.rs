pub(crate) mod command;
pub(crate) mod confirm;
pub(crate) mod dispatch;

pub(crate) use command::handle_enter;
pub(crate) use dispatch::apply_transport_message;
