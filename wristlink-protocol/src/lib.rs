//! Wristlink Companion Link Protocol
//!
//! This crate defines the message shape exchanged between the watch
//! application and its paired companion application. Both directions carry
//! the same envelope:
//!
//! ```text
//! ┌─────────┬─────────────────┬────────────────┐
//! │ COMMAND │ PAYLOAD         │ CORRELATION ID │
//! │ u8      │ text, 0–256B    │ u32, nonzero   │
//! └─────────┴─────────────────┴────────────────┘
//! ```
//!
//! The transport carries envelopes as generic key/value messages; the field
//! encoding itself is adapter territory. This crate only fixes the field
//! meanings, the dictionary key identifiers, and the reserved
//! acknowledgement command.

#![no_std]
#![deny(unsafe_code)]

pub mod commands;
pub mod envelope;

pub use commands::{CMD_ACK, KEY_COMMAND, KEY_CORRELATION_ID, KEY_PAYLOAD};
pub use envelope::{Envelope, EnvelopeError, CORRELATION_NONE, MAX_PAYLOAD_LEN};
