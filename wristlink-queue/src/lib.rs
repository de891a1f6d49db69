//! Reliable outbound delivery for the Wristlink companion link
//!
//! The companion transport is lossy, asynchronous, and allows exactly one
//! outbound message in flight at a time. This crate layers at-least-once
//! delivery on top of it:
//!
//! - a FIFO of pending messages, each tagged with a random correlation id
//!   and a bounded retry budget
//! - retry with a fixed pacing delay after every completion, success or
//!   failure
//! - acknowledgement generation and inbound deduplication against a bounded
//!   history of recently seen correlation ids
//!
//! Everything runs on the host environment's single event loop: the
//! environment invokes the `on_*` handlers on [`MessageQueue`] when the
//! transport completes a send, delivers a message, or the armed wakeup
//! fires. None of the handlers block.
//!
//! Delivery is best-effort from the caller's perspective: `enqueue` never
//! reports completion, and a message that exhausts its retry budget is
//! dropped with only a log trace.

#![no_std]
#![deny(unsafe_code)]

#[macro_use]
mod log;

pub mod dedup;
pub mod queue;
pub mod transport;

pub use dedup::{DedupHistory, DEDUP_HISTORY_LEN};
pub use queue::{InboundHandler, MessageQueue, ATTEMPT_COUNT, QUEUE_DEPTH, RESEND_DELAY_MS};
pub use transport::{Transport, TransportError, INBOX_CAPACITY, OUTBOX_CAPACITY};
