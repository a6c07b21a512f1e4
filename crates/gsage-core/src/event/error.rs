//! # Gsage Core Event System Errors
//!
//! Firing and (dis)connecting never fail; errors only come from helpers that
//! interpret an event's payload.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EventSystemError {
    #[error("Event '{event_type}' does not carry a {expected} payload")]
    UnexpectedPayload {
        event_type: String,
        expected: &'static str,
    },
}
