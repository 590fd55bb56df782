//! AVDTP Signaling Decoder
//!
//! Passive decoder for AVDTP (Audio/Video Distribution Transport Protocol)
//! signaling PDUs captured on an L2CAP channel. The decoder classifies the
//! signaling header, reassembles fragmented PDUs, dispatches on the signal
//! identifier and renders per-signal fields into an [`OutputSink`].
//!
//! ## Architecture
//!
//! - **Header classifier** (`header`): transaction label, message type and
//!   fragmentation kind from the header byte
//! - **Reassembler** (`reassembly`): accumulates Start/Continue/End fragments
//!   into one logical PDU before dispatch
//! - **Dispatcher** (`dispatch`): static descriptor table keyed by signal
//!   identifier; signals without a field decoder fall back to a hexdump
//! - **Signal decoders** (`discover`): per-signal field decoding
//! - **Symbol tables** (`tables`): total code-to-name lookups
//!
//! The decoder is a read-only observer. No error is fatal: a PDU that fails
//! to decode is reported through the sink as a malformed marker plus a raw
//! dump of its undecoded remainder, and decoding continues with the next
//! frame.

pub mod dispatch;
pub mod discover;
pub mod header;
pub mod reassembly;
pub mod tables;

use crate::cursor::{FrameCursor, Truncated};
use crate::frame::{CapturedFrame, ChannelKind};
use crate::sink::OutputSink;
use header::{FragmentFields, SignalingHeader};
use reassembly::{Reassembler, ReassemblyKey};

/// Maximum number of fragmented PDUs in flight across all connections
pub const MAX_PENDING_PDUS: usize = 8;

/// Maximum reassembled signaling PDU size in bytes
pub const MAX_PDU_SIZE: usize = 1024;

/// Decoded frames after which an incomplete fragment sequence is discarded
pub const STALE_AFTER_FRAMES: u32 = 64;

/// AVDTP Message Types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum MessageType {
    /// Command message
    Command = 0x00,
    /// General Reject
    GeneralReject = 0x01,
    /// Response Accept
    ResponseAccept = 0x02,
    /// Response Reject
    ResponseReject = 0x03,
}

impl MessageType {
    /// Extract the message type from the low two bits of the header byte
    #[must_use]
    pub fn from_header(hdr: u8) -> Self {
        match hdr & 0x03 {
            0x00 => Self::Command,
            0x01 => Self::GeneralReject,
            0x02 => Self::ResponseAccept,
            _ => Self::ResponseReject,
        }
    }

    /// Raw 2-bit message type code
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }
}

/// Packet-fragmentation kinds encoded in bits 3-2 of the header byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum PacketKind {
    /// Complete PDU in one packet
    Single = 0x00,
    /// First fragment; carries NOSP and the signal identifier
    Start = 0x01,
    /// Middle fragment; payload only
    Continue = 0x02,
    /// Last fragment; payload only
    End = 0x03,
}

impl PacketKind {
    /// Extract the packet kind from bits 3-2 of the header byte
    #[must_use]
    pub fn from_header(hdr: u8) -> Self {
        match (hdr >> 2) & 0x03 {
            0x00 => Self::Single,
            0x01 => Self::Start,
            0x02 => Self::Continue,
            _ => Self::End,
        }
    }
}

/// AVDTP Signal Identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum SignalId {
    /// Discover available stream endpoints
    Discover = 0x01,
    /// Get capabilities of a stream endpoint
    GetCapabilities = 0x02,
    /// Set configuration for a stream endpoint
    SetConfiguration = 0x03,
    /// Get current configuration
    GetConfiguration = 0x04,
    /// Reconfigure stream endpoint
    Reconfigure = 0x05,
    /// Open stream
    Open = 0x06,
    /// Start streaming
    Start = 0x07,
    /// Close stream
    Close = 0x08,
    /// Suspend stream
    Suspend = 0x09,
    /// Abort stream
    Abort = 0x0A,
    /// Security control exchange
    SecurityControl = 0x0B,
    /// Get all capabilities of a stream endpoint
    GetAllCapabilities = 0x0C,
    /// Delay report
    DelayReport = 0x0D,
}

impl SignalId {
    /// Convert from a raw 6-bit signal identifier
    #[must_use]
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0x01 => Some(Self::Discover),
            0x02 => Some(Self::GetCapabilities),
            0x03 => Some(Self::SetConfiguration),
            0x04 => Some(Self::GetConfiguration),
            0x05 => Some(Self::Reconfigure),
            0x06 => Some(Self::Open),
            0x07 => Some(Self::Start),
            0x08 => Some(Self::Close),
            0x09 => Some(Self::Suspend),
            0x0A => Some(Self::Abort),
            0x0B => Some(Self::SecurityControl),
            0x0C => Some(Self::GetAllCapabilities),
            0x0D => Some(Self::DelayReport),
            _ => None,
        }
    }
}

/// Media types carried in stream endpoint records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MediaType {
    /// Audio media
    Audio,
    /// Video media
    Video,
    /// Multimedia media
    Multimedia,
    /// Reserved media type code
    Reserved,
}

impl MediaType {
    /// Convert from a raw 4-bit media type code
    #[must_use]
    pub fn from_code(code: u8) -> Self {
        match code {
            0x00 => Self::Audio,
            0x01 => Self::Video,
            0x02 => Self::Multimedia,
            _ => Self::Reserved,
        }
    }
}

/// Stream endpoint role advertised in a Discover response entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SepType {
    /// Media source
    Source,
    /// Media sink
    Sink,
}

impl SepType {
    /// Display name, matching analyzer output conventions
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Source => "SRC",
            Self::Sink => "SNK",
        }
    }

    /// Raw TSEP bit value (0 = source, 1 = sink)
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Source => 0,
            Self::Sink => 1,
        }
    }
}

/// AVDTP decoding errors
///
/// All variants are non-fatal: the decoder reports them through the sink and
/// continues with the next frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodeError {
    /// Frame ended before an expected field
    Truncated,
    /// Field present but structurally inconsistent
    Malformed,
    /// Continue or End fragment with no matching Start
    UnexpectedContinuation,
    /// Signal decoder invoked with a message type it does not cover
    UnsupportedMessageType,
    /// Payload exceeds the fixed reassembly buffer capacity
    PayloadTooLarge,
}

impl DecodeError {
    /// Stable display name, used for the malformed-marker record
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Truncated => "PDU truncated",
            Self::Malformed => "PDU malformed",
            Self::UnexpectedContinuation => "Unexpected continuation fragment",
            Self::UnsupportedMessageType => "Unsupported message type",
            Self::PayloadTooLarge => "PDU exceeds reassembly capacity",
        }
    }
}

impl core::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Truncated> for DecodeError {
    fn from(_: Truncated) -> Self {
        Self::Truncated
    }
}

/// Passive AVDTP signaling decoder
///
/// Owns the reassembly cache and exposes one synchronous per-frame call.
/// The outer capture loop invokes [`AvdtpDecoder::decode_frame`] once per
/// captured frame; the call returns before the next frame is processed.
#[derive(Debug)]
pub struct AvdtpDecoder {
    reassembler: Reassembler,
}

impl AvdtpDecoder {
    /// Create a new decoder with an empty reassembly cache
    #[must_use]
    pub fn new() -> Self {
        Self {
            reassembler: Reassembler::new(),
        }
    }

    /// Decode one captured frame, emitting records into `sink`
    ///
    /// Never fails: decode errors abort the current PDU only and are
    /// reported through the sink as a malformed marker followed by a raw
    /// dump of the frame's undecoded remainder. Media transport frames are
    /// passed through as a hexdump untouched.
    pub fn decode_frame(&mut self, frame: &CapturedFrame<'_>, sink: &mut dyn OutputSink) {
        if frame.channel != ChannelKind::Signaling {
            sink.hexdump(frame.data);
            return;
        }

        let mut cursor = FrameCursor::new(frame.data);
        if let Err(err) = self.signaling_pdu(frame, &mut cursor, sink) {
            sink.malformed(err.as_str());
            sink.hexdump(cursor.rest());
        }
    }

    /// Number of fragmented PDUs currently awaiting completion
    #[must_use]
    pub fn pending_reassemblies(&self) -> usize {
        self.reassembler.in_flight()
    }

    fn signaling_pdu(
        &mut self,
        frame: &CapturedFrame<'_>,
        cursor: &mut FrameCursor<'_>,
        sink: &mut dyn OutputSink,
    ) -> Result<(), DecodeError> {
        self.reassembler.tick();

        let header = SignalingHeader::parse(cursor)?;
        let key = ReassemblyKey::new(frame.connection, frame.direction, header.transaction_label);

        match header.fragment {
            FragmentFields::Single { signal_id } => dispatch::dispatch(
                signal_id,
                header.message_type,
                header.transaction_label,
                PacketKind::Single,
                0,
                cursor,
                sink,
            ),
            FragmentFields::Start { nosp, signal_id } => {
                self.reassembler
                    .start(key, header.message_type, signal_id, nosp, cursor.rest())
            }
            FragmentFields::Continue => self.reassembler.continuation(key, cursor.rest()),
            FragmentFields::End => {
                let pdu = self.reassembler.end(key, cursor.rest())?;
                let mut pdu_cursor = FrameCursor::new(&pdu.payload);
                // The summary reports the Start fragment's kind and NOSP so
                // one logical PDU yields exactly one summary line.
                dispatch::dispatch(
                    pdu.signal_id,
                    pdu.message_type,
                    header.transaction_label,
                    PacketKind::Start,
                    pdu.nosp,
                    &mut pdu_cursor,
                    sink,
                )
            }
        }
    }
}

impl Default for AvdtpDecoder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::Direction;
    use crate::sink::FieldValue;
    use crate::testutil::{Record, RecordingSink};

    fn signaling_frame(data: &[u8]) -> CapturedFrame<'_> {
        CapturedFrame::new(Direction::Inbound, 0x0040, ChannelKind::Signaling, data)
    }

    #[test]
    fn test_single_discover_command() {
        let mut decoder = AvdtpDecoder::new();
        let mut sink = RecordingSink::default();

        // Label 4, single packet, command, Discover
        decoder.decode_frame(&signaling_frame(&[0x40, 0x01]), &mut sink);

        assert_eq!(sink.records.len(), 1);
        match &sink.records[0] {
            Record::Summary(summary) => {
                assert_eq!(summary.signal_id, 0x01);
                assert_eq!(summary.signal_name, "Discover");
                assert_eq!(summary.message_type, MessageType::Command);
                assert_eq!(summary.transaction_label, 4);
                assert_eq!(summary.packet_kind, PacketKind::Single);
                assert_eq!(summary.nosp, 0);
            }
            other => panic!("expected summary, got {other:?}"),
        }
    }

    #[test]
    fn test_single_discover_response() {
        let mut decoder = AvdtpDecoder::new();
        let mut sink = RecordingSink::default();

        decoder.decode_frame(
            &signaling_frame(&[0x02, 0x01, 0x04, 0x08, 0x08, 0x08]),
            &mut sink,
        );

        // Summary plus four fields per SEID entry
        assert_eq!(sink.records.len(), 9);
        assert_eq!(
            sink.records[1],
            Record::Field {
                indent: 0,
                label: "ACP SEID",
                value: FieldValue::Uint(1),
            }
        );
        assert_eq!(
            sink.records[5],
            Record::Field {
                indent: 0,
                label: "ACP SEID",
                value: FieldValue::Uint(2),
            }
        );
    }

    #[test]
    fn test_general_reject_summary_only() {
        let mut decoder = AvdtpDecoder::new();
        let mut sink = RecordingSink::default();

        // Message type bits 01, trailing payload must not be decoded
        decoder.decode_frame(&signaling_frame(&[0x01, 0x01, 0xFF, 0xFF]), &mut sink);

        assert_eq!(sink.records.len(), 1);
        match &sink.records[0] {
            Record::Summary(summary) => {
                assert_eq!(summary.message_type, MessageType::GeneralReject);
            }
            other => panic!("expected summary, got {other:?}"),
        }
    }

    #[test]
    fn test_response_reject_error_code() {
        let mut decoder = AvdtpDecoder::new();
        let mut sink = RecordingSink::default();

        decoder.decode_frame(&signaling_frame(&[0x03, 0x01, 0x13]), &mut sink);

        assert_eq!(sink.records.len(), 2);
        assert_eq!(
            sink.records[1],
            Record::Field {
                indent: 0,
                label: "Error code",
                value: FieldValue::NamedCode {
                    name: "SEP_IN_USE",
                    code: 0x13,
                },
            }
        );
    }

    #[test]
    fn test_start_end_reassembly_matches_single() {
        let mut fragmented = RecordingSink::default();
        let mut decoder = AvdtpDecoder::new();
        // Label 4, start, response accept, NOSP 2, Discover, first entry half
        decoder.decode_frame(&signaling_frame(&[0x46, 0x02, 0x01, 0x04, 0x08]), &mut fragmented);
        assert_eq!(decoder.pending_reassemblies(), 1);
        // Label 4, end, response accept, rest of the entries
        decoder.decode_frame(&signaling_frame(&[0x4E, 0x08, 0x08]), &mut fragmented);
        assert_eq!(decoder.pending_reassemblies(), 0);

        let mut single = RecordingSink::default();
        let mut reference = AvdtpDecoder::new();
        // Label 4, single, response accept, Discover, both entries
        reference.decode_frame(
            &signaling_frame(&[0x42, 0x01, 0x04, 0x08, 0x08, 0x08]),
            &mut single,
        );

        // Field records are identical; only the summary reflects fragmentation
        let fragmented_fields = fragmented
            .records
            .iter()
            .filter(|r| matches!(r, Record::Field { .. }));
        let single_fields = single
            .records
            .iter()
            .filter(|r| matches!(r, Record::Field { .. }));
        assert!(fragmented_fields.eq(single_fields));
        assert_eq!(
            fragmented
                .records
                .iter()
                .filter(|r| matches!(r, Record::Field { .. }))
                .count(),
            8
        );

        match &fragmented.records[0] {
            Record::Summary(summary) => {
                assert_eq!(summary.packet_kind, PacketKind::Start);
                assert_eq!(summary.nosp, 2);
                assert_eq!(summary.signal_name, "Discover");
            }
            other => panic!("expected summary, got {other:?}"),
        }
    }

    #[test]
    fn test_continuation_without_start() {
        let mut decoder = AvdtpDecoder::new();
        let mut sink = RecordingSink::default();

        // Label 4, continue, command
        decoder.decode_frame(&signaling_frame(&[0x48, 0xAA, 0xBB]), &mut sink);

        assert_eq!(decoder.pending_reassemblies(), 0);
        assert_eq!(sink.records.len(), 2);
        assert_eq!(
            sink.records[0],
            Record::Malformed("Unexpected continuation fragment")
        );
        match &sink.records[1] {
            Record::Hexdump(bytes) => assert_eq!(bytes.as_slice(), &[0xAA, 0xBB]),
            other => panic!("expected hexdump, got {other:?}"),
        }
    }

    #[test]
    fn test_end_without_start() {
        let mut decoder = AvdtpDecoder::new();
        let mut sink = RecordingSink::default();

        decoder.decode_frame(&signaling_frame(&[0x4C, 0xAA]), &mut sink);

        assert_eq!(
            sink.records[0],
            Record::Malformed("Unexpected continuation fragment")
        );
    }

    #[test]
    fn test_truncated_header() {
        let mut decoder = AvdtpDecoder::new();
        let mut sink = RecordingSink::default();

        // Single packet with no signal identifier byte
        decoder.decode_frame(&signaling_frame(&[0x00]), &mut sink);

        assert_eq!(sink.records[0], Record::Malformed("PDU truncated"));
    }

    #[test]
    fn test_empty_frame() {
        let mut decoder = AvdtpDecoder::new();
        let mut sink = RecordingSink::default();

        decoder.decode_frame(&signaling_frame(&[]), &mut sink);

        assert_eq!(sink.records[0], Record::Malformed("PDU truncated"));
    }

    #[test]
    fn test_media_transport_frames_pass_through() {
        let mut decoder = AvdtpDecoder::new();
        let mut sink = RecordingSink::default();

        let frame = CapturedFrame::new(
            Direction::Outbound,
            0x0040,
            ChannelKind::MediaTransport,
            &[0x80, 0x60, 0x00, 0x01],
        );
        decoder.decode_frame(&frame, &mut sink);

        assert_eq!(sink.records.len(), 1);
        match &sink.records[0] {
            Record::Hexdump(bytes) => assert_eq!(bytes.as_slice(), &[0x80, 0x60, 0x00, 0x01]),
            other => panic!("expected hexdump, got {other:?}"),
        }
    }

    #[test]
    fn test_interleaved_transactions_do_not_cross_talk() {
        let mut decoder = AvdtpDecoder::new();
        let mut sink = RecordingSink::default();

        // Start for label 1 and label 2, interleaved, then both Ends
        decoder.decode_frame(&signaling_frame(&[0x16, 0x02, 0x01, 0x04, 0x08]), &mut sink);
        decoder.decode_frame(&signaling_frame(&[0x26, 0x02, 0x01, 0x08, 0x08]), &mut sink);
        assert_eq!(decoder.pending_reassemblies(), 2);

        let mut sink_one = RecordingSink::default();
        decoder.decode_frame(&signaling_frame(&[0x1E]), &mut sink_one);
        let mut sink_two = RecordingSink::default();
        decoder.decode_frame(&signaling_frame(&[0x2E]), &mut sink_two);
        assert_eq!(decoder.pending_reassemblies(), 0);

        assert_eq!(
            sink_one.records[1],
            Record::Field {
                indent: 0,
                label: "ACP SEID",
                value: FieldValue::Uint(1),
            }
        );
        assert_eq!(
            sink_two.records[1],
            Record::Field {
                indent: 0,
                label: "ACP SEID",
                value: FieldValue::Uint(2),
            }
        );
    }

    #[test]
    fn test_unknown_signal_falls_back_to_hexdump() {
        let mut decoder = AvdtpDecoder::new();
        let mut sink = RecordingSink::default();

        // Reserved signal id 0x3F with payload
        decoder.decode_frame(&signaling_frame(&[0x00, 0x3F, 0xDE, 0xAD]), &mut sink);

        assert_eq!(sink.records.len(), 2);
        match &sink.records[0] {
            Record::Summary(summary) => assert_eq!(summary.signal_name, "Reserved"),
            other => panic!("expected summary, got {other:?}"),
        }
        match &sink.records[1] {
            Record::Hexdump(bytes) => assert_eq!(bytes.as_slice(), &[0xDE, 0xAD]),
            other => panic!("expected hexdump, got {other:?}"),
        }
    }

    #[test]
    fn test_reserved_signal_id_bits_masked() {
        let mut decoder = AvdtpDecoder::new();
        let mut sink = RecordingSink::default();

        // Top two bits of the signal id byte are reserved and ignored
        decoder.decode_frame(&signaling_frame(&[0x00, 0xC1]), &mut sink);

        match &sink.records[0] {
            Record::Summary(summary) => {
                assert_eq!(summary.signal_id, 0x01);
                assert_eq!(summary.signal_name, "Discover");
            }
            other => panic!("expected summary, got {other:?}"),
        }
    }
}
