pub(crate) mod client;
pub(crate) mod error;
pub(crate) mod protocol;

pub(crate) use client::{BackendClient, CommandSink, TransportHandle, TransportMessage};
pub(crate) use error::MalformedFrame;
pub(crate) use protocol::{parse_frame, InboundEvent, OutboundCommand};
