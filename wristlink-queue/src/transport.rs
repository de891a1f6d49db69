//! Transport capability provided by the host environment.
//!
//! The queue never talks to the radio directly; the environment hands it an
//! adapter implementing [`Transport`] and routes the adapter's completion
//! events back into the queue's `on_*` handlers.

use wristlink_protocol::Envelope;

/// Inbound transport buffer capacity in bytes.
pub const INBOX_CAPACITY: usize = 512;

/// Outbound transport buffer capacity in bytes.
pub const OUTBOX_CAPACITY: usize = 768;

/// Link-level errors reported by the transport adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransportError {
    /// A transmission is already in progress
    Busy,
    /// No companion device is connected
    NotConnected,
    /// Companion device connected but the peer application is not running
    PeerNotRunning,
    /// The peer did not acknowledge the transmission in time
    SendTimeout,
    /// The peer rejected the transmission
    SendRejected,
    /// Message does not fit the negotiated buffer
    BufferOverflow,
    /// Malformed submission
    InvalidArgs,
    /// Adapter used outside its lifecycle
    InvalidState,
    /// Adapter could not allocate its transmission resources
    OutOfMemory,
    /// Channel has been closed
    Closed,
    /// Unclassified adapter failure
    Internal,
}

impl TransportError {
    /// Stable name for log output
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportError::Busy => "BUSY",
            TransportError::NotConnected => "NOT_CONNECTED",
            TransportError::PeerNotRunning => "PEER_NOT_RUNNING",
            TransportError::SendTimeout => "SEND_TIMEOUT",
            TransportError::SendRejected => "SEND_REJECTED",
            TransportError::BufferOverflow => "BUFFER_OVERFLOW",
            TransportError::InvalidArgs => "INVALID_ARGS",
            TransportError::InvalidState => "INVALID_STATE",
            TransportError::OutOfMemory => "OUT_OF_MEMORY",
            TransportError::Closed => "CLOSED",
            TransportError::Internal => "INTERNAL_ERROR",
        }
    }
}

/// Bidirectional single-slot message channel plus a one-shot wakeup timer.
///
/// Contract for implementors:
///
/// - At most one submission is outstanding at a time; the queue enforces
///   this on its side.
/// - Every call to [`submit`](Transport::submit), including one that
///   returned an immediate `Err`, must be followed by exactly one
///   completion event routed to `MessageQueue::on_sent` or
///   `MessageQueue::on_send_failed`. The synchronous result is used for
///   logging only.
/// - [`schedule_wakeup`](Transport::schedule_wakeup) arms a one-shot timer
///   that later invokes `MessageQueue::on_wakeup`. The queue never arms a
///   second timer while one is outstanding, so no cancel path is needed.
pub trait Transport {
    /// Open the channel with the given buffer capacities
    fn open(&mut self, inbox: usize, outbox: usize) -> Result<(), TransportError>;

    /// Start transmitting an envelope to the peer
    fn submit(&mut self, envelope: &Envelope) -> Result<(), TransportError>;

    /// Arm the one-shot wakeup timer
    fn schedule_wakeup(&mut self, delay_ms: u32);
}
