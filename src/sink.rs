//! Output Sink
//!
//! Rendering seam between the decoder and the analyzer front end. Decoders
//! emit ordered field records and the per-PDU summary; the sink owns every
//! rendering decision (colors, layout, hex formatting). A raw hexdump request
//! is the fallback for payloads without a field decoder and for PDUs whose
//! decoding aborted.

use crate::avdtp::{MessageType, PacketKind};

/// A single displayable field value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FieldValue {
    /// Symbolic name paired with the raw code, rendered like `Audio (0x00)`
    NamedCode {
        /// Display name resolved from a symbol table
        name: &'static str,
        /// Raw code byte as captured
        code: u8,
    },
    /// Plain unsigned integer
    Uint(u32),
    /// Fixed display string
    Str(&'static str),
    /// Yes/No flag
    YesNo(bool),
}

/// One-line summary emitted once per decoded signaling PDU
///
/// Every dispatch path emits this record first, regardless of whether the
/// per-signal field decoding that follows succeeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PduSummary {
    /// 6-bit signal identifier as captured
    pub signal_id: u8,
    /// Display name of the signal, `"Reserved"` for unknown identifiers
    pub signal_name: &'static str,
    /// Message type from the signaling header
    pub message_type: MessageType,
    /// 4-bit transaction label correlating a command with its response
    pub transaction_label: u8,
    /// Packet-fragmentation kind the PDU arrived with
    pub packet_kind: PacketKind,
    /// Declared fragment count (NOSP); 0 for unfragmented PDUs
    pub nosp: u8,
}

/// Receiver for decoded output records
///
/// Implementations render the records in order; nesting is expressed through
/// the `indent` level on field records.
pub trait OutputSink {
    /// Receive the per-PDU summary line
    fn summary(&mut self, summary: &PduSummary);

    /// Receive one `(label, value)` field record at the given nesting level
    fn field(&mut self, indent: usize, label: &'static str, value: FieldValue);

    /// Receive a raw-byte dump request for undecoded payload
    fn hexdump(&mut self, bytes: &[u8]);

    /// Receive an explicit malformed-PDU marker
    fn malformed(&mut self, reason: &'static str);
}
