//! Discover Signal Decoder
//!
//! The Discover exchange enumerates a device's stream endpoints. The command
//! carries no fields; the accepting response carries a list of 2-byte stream
//! endpoint entries whose length is implicit in the remaining payload, so an
//! odd trailing byte is malformed rather than a partial entry.

use super::{DecodeError, MediaType, MessageType, SepType, tables};
use crate::cursor::FrameCursor;
use crate::sink::{FieldValue, OutputSink};

/// One stream endpoint entry from a Discover response
///
/// Wire layout: byte 1 carries the ACP SEID in bits 7-2 and the in-use flag
/// in bit 1; byte 2 carries the media type code in bits 7-4 and the SEP type
/// bit, remaining bits reserved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SeedEntry {
    /// Stream endpoint identifier (6-bit, 1-62)
    pub acp_seid: u8,
    /// Whether the endpoint is currently in use
    pub in_use: bool,
    /// Raw 4-bit media type code
    pub media_code: u8,
    /// Endpoint role
    pub sep_type: SepType,
}

impl SeedEntry {
    /// Media type the entry advertises
    #[must_use]
    pub fn media_type(&self) -> MediaType {
        MediaType::from_code(self.media_code)
    }

    /// Parse one 2-byte entry at the cursor position
    ///
    /// # Errors
    /// Returns [`DecodeError::Truncated`] if the entry is absent entirely,
    /// or [`DecodeError::Malformed`] if only its first byte is present
    pub fn parse(cursor: &mut FrameCursor<'_>) -> Result<Self, DecodeError> {
        let seid = cursor.read_u8()?;
        let info = cursor.read_u8().map_err(|_| DecodeError::Malformed)?;

        Ok(Self {
            acp_seid: seid >> 2,
            in_use: seid & 0x02 != 0,
            media_code: info >> 4,
            sep_type: if info & 0x04 != 0 {
                SepType::Sink
            } else {
                SepType::Source
            },
        })
    }
}

/// Decode a Discover PDU
///
/// # Errors
/// Returns [`DecodeError::Malformed`] for an odd trailing byte in a response
/// entry list, or [`DecodeError::UnsupportedMessageType`] for message types
/// the dispatcher should have intercepted
pub fn decode(
    cursor: &mut FrameCursor<'_>,
    message_type: MessageType,
    sink: &mut dyn OutputSink,
) -> Result<(), DecodeError> {
    match message_type {
        // The command carries no fields; trailing bytes are ignored
        MessageType::Command => Ok(()),
        MessageType::ResponseAccept => {
            while !cursor.is_empty() {
                let entry = SeedEntry::parse(cursor)?;
                emit(&entry, sink);
            }
            Ok(())
        }
        MessageType::GeneralReject | MessageType::ResponseReject => {
            Err(DecodeError::UnsupportedMessageType)
        }
    }
}

fn emit(entry: &SeedEntry, sink: &mut dyn OutputSink) {
    sink.field(0, "ACP SEID", FieldValue::Uint(entry.acp_seid.into()));
    sink.field(
        1,
        "Media Type",
        FieldValue::NamedCode {
            name: tables::media_type_name(entry.media_code),
            code: entry.media_code,
        },
    );
    sink.field(
        1,
        "SEP Type",
        FieldValue::NamedCode {
            name: entry.sep_type.name(),
            code: entry.sep_type.code(),
        },
    );
    sink.field(1, "In use", FieldValue::YesNo(entry.in_use));
}
