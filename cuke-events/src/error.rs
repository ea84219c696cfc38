// Error types for the event bus

use crate::event::EventError;
use crate::event_id::EventId;
use crate::handler::HandlerError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BusError {
    #[error("Unknown event identifier: {0}")]
    UnknownEventIdentifier(EventId),

    #[error("Event type {0} is not registered on this bus")]
    UnregisteredEventType(EventId),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Event(#[from] EventError),

    #[error("Handler failed while dispatching {event_id}: {source}")]
    HandlerFailed {
        event_id: EventId,
        source: HandlerError,
    },

    #[error("{} handler(s) failed while dispatching {event_id}", .errors.len())]
    HandlersFailed {
        event_id: EventId,
        errors: Vec<HandlerError>,
    },
}

impl BusError {
    /// Short stable label for log lines.
    pub fn as_label(&self) -> &'static str {
        match self {
            BusError::UnknownEventIdentifier(_) => "unknown_event_identifier",
            BusError::UnregisteredEventType(_) => "unregistered_event_type",
            BusError::InvalidArgument(_) => "invalid_argument",
            BusError::Event(EventError::ArityMismatch { .. }) => "arity_mismatch",
            BusError::HandlerFailed { .. } => "handler_failed",
            BusError::HandlersFailed { .. } => "handlers_failed",
        }
    }
}

pub type Result<T> = std::result::Result<T, BusError>;
