//! Signal Dispatch
//!
//! Routes a complete signaling PDU to its per-signal field decoder. The 13
//! standard signal identifiers are registered in a static descriptor table;
//! adding a decoder for a signal means filling in its table entry, the
//! dispatcher itself never changes. Signals without a decoder, and reserved
//! identifiers, fall back to a raw hexdump of the payload.
//!
//! Reject handling is message-type driven and signal-independent: a General
//! Reject carries nothing to decode, a Response Reject carries exactly one
//! error-code byte.

use super::{DecodeError, MessageType, PacketKind, SignalId, discover, tables};
use crate::cursor::FrameCursor;
use crate::sink::{FieldValue, OutputSink, PduSummary};

/// Per-signal field decoding routine
///
/// Invoked with the cursor positioned at the first payload byte after the
/// signal identifier.
pub type SignalDecodeFn =
    fn(&mut FrameCursor<'_>, MessageType, &mut dyn OutputSink) -> Result<(), DecodeError>;

/// Immutable pairing of a signal identifier with its display name and
/// optional field decoder
#[derive(Debug, Clone, Copy)]
pub struct SignalDescriptor {
    /// Signal identifier this entry decodes
    pub id: SignalId,
    /// Display name used in the summary line
    pub name: &'static str,
    /// Field decoding routine; `None` falls back to a hexdump
    pub decode: Option<SignalDecodeFn>,
}

/// The 13 standard AVDTP signal identifiers, registered once, read-only
pub static SIGNALS: [SignalDescriptor; 13] = [
    SignalDescriptor {
        id: SignalId::Discover,
        name: "Discover",
        decode: Some(discover::decode),
    },
    SignalDescriptor {
        id: SignalId::GetCapabilities,
        name: "Get Capabilities",
        decode: None,
    },
    SignalDescriptor {
        id: SignalId::SetConfiguration,
        name: "Set Configuration",
        decode: None,
    },
    SignalDescriptor {
        id: SignalId::GetConfiguration,
        name: "Get Configuration",
        decode: None,
    },
    SignalDescriptor {
        id: SignalId::Reconfigure,
        name: "Reconfigure",
        decode: None,
    },
    SignalDescriptor {
        id: SignalId::Open,
        name: "Open",
        decode: None,
    },
    SignalDescriptor {
        id: SignalId::Start,
        name: "Start",
        decode: None,
    },
    SignalDescriptor {
        id: SignalId::Close,
        name: "Close",
        decode: None,
    },
    SignalDescriptor {
        id: SignalId::Suspend,
        name: "Suspend",
        decode: None,
    },
    SignalDescriptor {
        id: SignalId::Abort,
        name: "Abort",
        decode: None,
    },
    SignalDescriptor {
        id: SignalId::SecurityControl,
        name: "Security Control",
        decode: None,
    },
    SignalDescriptor {
        id: SignalId::GetAllCapabilities,
        name: "Get All Capabilities",
        decode: None,
    },
    SignalDescriptor {
        id: SignalId::DelayReport,
        name: "Delay Report",
        decode: None,
    },
];

/// Look up the descriptor registered for a raw signal identifier
#[must_use]
pub fn lookup(signal_id: u8) -> Option<&'static SignalDescriptor> {
    let id = SignalId::from_u8(signal_id)?;
    SIGNALS.iter().find(|descriptor| descriptor.id == id)
}

/// Dispatch one complete signaling PDU
///
/// Emits the summary record first on every path, then decodes per message
/// type and signal identifier.
///
/// # Errors
/// Returns [`DecodeError::Truncated`] if a Response Reject carries no error
/// code, or whatever the per-signal decoder reports
pub fn dispatch(
    signal_id: u8,
    message_type: MessageType,
    transaction_label: u8,
    packet_kind: PacketKind,
    nosp: u8,
    cursor: &mut FrameCursor<'_>,
    sink: &mut dyn OutputSink,
) -> Result<(), DecodeError> {
    sink.summary(&PduSummary {
        signal_id,
        signal_name: tables::signal_name(signal_id),
        message_type,
        transaction_label,
        packet_kind,
        nosp,
    });

    match message_type {
        MessageType::GeneralReject => Ok(()),
        MessageType::ResponseReject => decode_error_code(cursor, sink),
        MessageType::Command | MessageType::ResponseAccept => {
            match lookup(signal_id).and_then(|descriptor| descriptor.decode) {
                Some(decode) => decode(cursor, message_type, sink),
                None => {
                    sink.hexdump(cursor.rest());
                    Ok(())
                }
            }
        }
    }
}

/// Decode the single error-code byte carried by a Response Reject PDU
///
/// # Errors
/// Returns [`DecodeError::Truncated`] if the byte is absent
pub fn decode_error_code(
    cursor: &mut FrameCursor<'_>,
    sink: &mut dyn OutputSink,
) -> Result<(), DecodeError> {
    let error = cursor.read_u8()?;
    sink.field(
        0,
        "Error code",
        FieldValue::NamedCode {
            name: tables::error_name(error),
            code: error,
        },
    );
    Ok(())
}
