//! The reliable delivery queue.
//!
//! One instance owns the transport adapter, the pending FIFO, and the
//! inbound deduplication history. The environment's event loop drives it
//! through the `on_*` handlers; every handler is short and non-blocking.

use core::fmt;

use heapless::{Deque, String};
use rand_core::RngCore;

use wristlink_protocol::{Envelope, CMD_ACK, CORRELATION_NONE, MAX_PAYLOAD_LEN};

use crate::dedup::DedupHistory;
use crate::transport::{Transport, TransportError, INBOX_CAPACITY, OUTBOX_CAPACITY};

/// Transmission attempts granted to every message, counted per submission
/// regardless of outcome.
pub const ATTEMPT_COUNT: u8 = 4;

/// Maximum number of queued outbound messages.
pub const QUEUE_DEPTH: usize = 16;

/// Pacing delay between a completed transmission (or a failure) and the
/// next drain. Not a correctness requirement; it keeps the peer from being
/// flooded back-to-back.
pub const RESEND_DELAY_MS: u32 = 500;

/// Cap for the decimal correlation id in an ack payload.
const ACK_PAYLOAD_MAX: usize = 15;

/// Receiver for deduplicated inbound messages.
///
/// Invoked exactly once per correlation id within the retained history
/// window.
pub trait InboundHandler {
    /// Handle a freshly delivered inbound envelope
    fn on_message(&mut self, envelope: &Envelope);
}

// Blanket implementation so plain closures work as handlers
impl<F: FnMut(&Envelope)> InboundHandler for F {
    fn on_message(&mut self, envelope: &Envelope) {
        self(envelope)
    }
}

/// One outbound unit of work, owned by the queue from enqueue until it is
/// either confirmed sent or its retry budget runs out.
struct PendingMessage {
    command: u8,
    payload: String<MAX_PAYLOAD_LEN>,
    correlation_id: u32,
    attempts_left: u8,
}

/// At-least-once outbound queue over a single-slot transport.
///
/// Messages are transmitted in strict FIFO order, one at a time. A failed
/// transmission is retried after [`RESEND_DELAY_MS`] until its budget of
/// [`ATTEMPT_COUNT`] submissions is spent, after which it is dropped with
/// only a log trace. Callers never learn the outcome of an individual
/// message; delivery is best-effort by design.
pub struct MessageQueue<T, R, H> {
    transport: T,
    rng: R,
    handler: H,
    pending: Deque<PendingMessage, QUEUE_DEPTH>,
    history: DedupHistory,
    link_ready: bool,
    in_flight: bool,
}

impl<T: Transport, R: RngCore, H: InboundHandler> MessageQueue<T, R, H> {
    /// Open the transport and construct the queue.
    ///
    /// Must be called exactly once, before any enqueue. The environment is
    /// expected to route the transport's completion and receive events to
    /// [`on_sent`](Self::on_sent), [`on_send_failed`](Self::on_send_failed),
    /// [`on_received`](Self::on_received) and [`on_wakeup`](Self::on_wakeup).
    pub fn new(mut transport: T, rng: R, handler: H) -> Result<Self, TransportError> {
        debug!("initializing message queue");

        transport.open(INBOX_CAPACITY, OUTBOX_CAPACITY)?;

        let mut queue = Self {
            transport,
            rng,
            handler,
            pending: Deque::new(),
            history: DedupHistory::new(),
            link_ready: true,
            in_flight: false,
        };

        // Normally a no-op at this point; kept for parity with re-init
        // after a link drop.
        queue.drain();

        debug!("message queue ready");
        Ok(queue)
    }

    /// Queue a message for delivery to the peer.
    ///
    /// Fire-and-forget: always reports `true`. Payloads longer than
    /// [`MAX_PAYLOAD_LEN`] are truncated at a char boundary. May
    /// synchronously start a transmission if the transport is idle.
    pub fn enqueue(&mut self, command: u8, payload: &str) -> bool {
        let mut text = String::new();
        if text.push_str(payload).is_err() {
            text.clear();
            for ch in payload.chars() {
                if text.push(ch).is_err() {
                    break;
                }
            }
        }
        self.enqueue_message(command, text)
    }

    /// Queue a message with a formatted payload capped at `max_len` bytes.
    ///
    /// Formatting output beyond the cap is silently truncated, never split
    /// inside a char. The cap itself is clamped to [`MAX_PAYLOAD_LEN`].
    pub fn enqueue_fmt(&mut self, command: u8, max_len: usize, args: fmt::Arguments<'_>) -> bool {
        let mut text = String::new();
        let mut writer = BoundedWriter {
            text: &mut text,
            limit: max_len.min(MAX_PAYLOAD_LEN),
            full: false,
        };
        // The writer swallows overflow, so formatting cannot fail
        let _ = fmt::write(&mut writer, args);
        self.enqueue_message(command, text)
    }

    fn enqueue_message(&mut self, command: u8, payload: String<MAX_PAYLOAD_LEN>) -> bool {
        let correlation_id = self.next_correlation_id();

        debug!("ADD: {} {} {}", command, correlation_id, payload.as_str());

        let message = PendingMessage {
            command,
            payload,
            correlation_id,
            attempts_left: ATTEMPT_COUNT,
        };

        if self.pending.push_back(message).is_err() {
            // The depth covers worst-case bursts from the watch
            // application; overflowing it is the fixed-capacity analogue
            // of heap exhaustion and is not a recoverable condition.
            panic!("outbound message queue full");
        }

        self.drain();
        true
    }

    /// Transport completion: the in-flight message reached the peer.
    pub fn on_sent(&mut self) {
        self.in_flight = false;

        // FIFO order guarantees the head is the message just transmitted
        if let Some(sent) = self.pending.pop_front() {
            debug!(
                "SENT: {} {} {}",
                sent.command,
                sent.correlation_id,
                sent.payload.as_str()
            );
        }

        if !self.pending.is_empty() {
            self.transport.schedule_wakeup(RESEND_DELAY_MS);
        }
    }

    /// Transport completion: the in-flight transmission failed.
    ///
    /// The head stays queued; its budget was already consumed at
    /// submission time. The wakeup either retries it or, if the budget is
    /// gone, discards it.
    pub fn on_send_failed(&mut self, reason: TransportError) {
        self.in_flight = false;

        if let Some(head) = self.pending.front() {
            warn!(
                "ERROR: {} {} {} ({})",
                head.command,
                head.correlation_id,
                head.payload.as_str(),
                reason.as_str()
            );
        }

        self.transport.schedule_wakeup(RESEND_DELAY_MS);
    }

    /// The one-shot wakeup armed via the transport has fired.
    pub fn on_wakeup(&mut self) {
        self.drain();
    }

    /// An inbound envelope arrived from the peer.
    ///
    /// An envelope without a correlation id is dropped silently. Otherwise
    /// an ack is queued unconditionally, before the dedup check, so that a
    /// retransmission is re-acknowledged; the envelope is then forwarded to
    /// the handler unless its id is already in the history.
    pub fn on_received(&mut self, envelope: &Envelope) {
        let correlation_id = envelope.correlation_id;
        if correlation_id == CORRELATION_NONE {
            return;
        }

        self.enqueue_fmt(CMD_ACK, ACK_PAYLOAD_MAX, format_args!("{}", correlation_id));

        if self.history.contains(correlation_id) {
            debug!("DUP: {}", correlation_id);
            return;
        }

        self.history.record(correlation_id);
        self.handler.on_message(envelope);
    }

    /// Gate outbound transmissions on link availability.
    ///
    /// The queue is ready as soon as construction opens the transport; an
    /// embedding that tracks connection events can pause draining here.
    pub fn set_link_ready(&mut self, ready: bool) {
        self.link_ready = ready;
        if ready {
            self.drain();
        }
    }

    /// Number of queued outbound messages, including any in flight
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Whether a transmission is currently awaiting completion
    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    /// Access the transport adapter
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Mutable access to the transport adapter
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Submit the head of the FIFO if the queue is ready.
    ///
    /// Discards head messages whose budget is spent before touching the
    /// transport. The in-flight check comes first: an in-flight head must
    /// never be discarded out from under its pending completion callback.
    fn drain(&mut self) {
        if !self.link_ready || self.in_flight {
            return;
        }

        loop {
            let Some(head) = self.pending.front_mut() else {
                return;
            };

            if head.attempts_left == 0 {
                let (command, correlation_id) = (head.command, head.correlation_id);
                warn!("DROP: {} {} (retry budget exhausted)", command, correlation_id);
                self.pending.pop_front();
                continue;
            }

            // Budget is consumed per attempt, before the outcome is known:
            // a submission the adapter rejects synchronously still counts.
            head.attempts_left -= 1;

            let envelope = Envelope {
                command: head.command,
                payload: head.payload.clone(),
                correlation_id: head.correlation_id,
            };

            self.in_flight = true;

            debug!(
                "SENDING: {} {} {}",
                envelope.command,
                envelope.correlation_id,
                envelope.payload.as_str()
            );

            match self.transport.submit(&envelope) {
                Ok(()) => trace!("submit accepted"),
                // Completion still arrives through on_send_failed
                Err(e) => debug!("submit rejected: {}", e.as_str()),
            }

            return;
        }
    }

    fn next_correlation_id(&mut self) -> u32 {
        // 0 marks an empty dedup slot on the peer and an absent field on
        // the wire, so it is never assigned to real traffic.
        loop {
            let id = self.rng.next_u32();
            if id != CORRELATION_NONE {
                return id;
            }
        }
    }
}

/// `fmt::Write` sink that truncates at a byte limit instead of erroring.
struct BoundedWriter<'a> {
    text: &'a mut String<MAX_PAYLOAD_LEN>,
    limit: usize,
    full: bool,
}

impl fmt::Write for BoundedWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if self.full {
            return Ok(());
        }
        for ch in s.chars() {
            if self.text.len() + ch.len_utf8() > self.limit || self.text.push(ch).is_err() {
                self.full = true;
                return Ok(());
            }
        }
        Ok(())
    }
}
