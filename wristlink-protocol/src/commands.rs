//! Command codes and dictionary keys shared by both peers.
//!
//! Adapters encode an [`Envelope`](crate::Envelope) onto the transport as a
//! key/value dictionary using the `KEY_*` identifiers below. The keys start
//! at 10 to stay clear of a legacy key enumeration used by earlier firmware.

/// Acknowledgement of a received envelope.
///
/// The payload is the decimal string form of the acknowledged correlation
/// id. Acks are ordinary queued messages and carry their own fresh
/// correlation id; the receiving side does not match them against
/// outstanding sends.
pub const CMD_ACK: u8 = 8;

/// Dictionary key for the command byte.
pub const KEY_COMMAND: u32 = 10;

/// Dictionary key for the text payload.
pub const KEY_PAYLOAD: u32 = 11;

/// Dictionary key for the correlation id.
pub const KEY_CORRELATION_ID: u32 = 12;
