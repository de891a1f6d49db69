//! The message envelope carried in both directions over the link.

use heapless::String;

/// Maximum payload length in bytes.
///
/// The outbound transport buffer is 768 bytes including dictionary
/// overhead, so payloads are capped well below that.
pub const MAX_PAYLOAD_LEN: usize = 256;

/// Reserved correlation id meaning "absent".
///
/// Adapters decoding an inbound message with no correlation field must
/// leave the field at this value, and the queue never assigns it to
/// outbound traffic. The deduplication history relies on 0 marking an
/// empty slot.
pub const CORRELATION_NONE: u32 = 0;

/// Errors that can occur when constructing an envelope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EnvelopeError {
    /// Payload exceeds [`MAX_PAYLOAD_LEN`]
    PayloadTooLarge,
}

/// One message as seen by both peers.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Envelope {
    /// Command code identifying the message's meaning to the remote peer
    pub command: u8,
    /// Opaque text payload, forwarded verbatim
    pub payload: String<MAX_PAYLOAD_LEN>,
    /// Random id assigned by the originating side; 0 means absent
    pub correlation_id: u32,
}

impl Envelope {
    /// Create an envelope with the given command, payload and correlation id
    pub fn new(command: u8, payload: &str, correlation_id: u32) -> Result<Self, EnvelopeError> {
        let mut text = String::new();
        text.push_str(payload)
            .map_err(|_| EnvelopeError::PayloadTooLarge)?;

        Ok(Self {
            command,
            payload: text,
            correlation_id,
        })
    }

    /// Whether the envelope carries a correlation id
    pub fn has_correlation_id(&self) -> bool {
        self.correlation_id != CORRELATION_NONE
    }
}
