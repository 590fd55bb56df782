//! Signaling Header Classification
//!
//! The first byte of every AVDTP signaling packet encodes the transaction
//! label (bits 7-4), the packet-fragmentation kind (bits 3-2) and the message
//! type (bits 1-0). Which bytes follow depends on the fragmentation kind:
//! a Start packet carries NOSP and the signal identifier, a Single packet
//! carries the signal identifier, and Continue/End packets carry payload
//! only (their signal identifier came with the Start fragment).

use super::{DecodeError, MessageType, PacketKind};
use crate::cursor::FrameCursor;

/// Top two bits of the signal identifier byte are reserved
const SIGNAL_ID_MASK: u8 = 0x3F;

/// Header fields that follow the header byte, per fragmentation kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FragmentFields {
    /// Complete PDU; the signal identifier follows the header byte
    Single {
        /// 6-bit signal identifier
        signal_id: u8,
    },
    /// First fragment; NOSP and the signal identifier follow
    Start {
        /// Declared total number of signaling packets for this transaction
        nosp: u8,
        /// 6-bit signal identifier
        signal_id: u8,
    },
    /// Middle fragment; everything after the header byte is payload
    Continue,
    /// Last fragment; everything after the header byte is payload
    End,
}

impl FragmentFields {
    /// Fragmentation kind this variant was classified as
    #[must_use]
    pub fn packet_kind(&self) -> PacketKind {
        match self {
            Self::Single { .. } => PacketKind::Single,
            Self::Start { .. } => PacketKind::Start,
            Self::Continue => PacketKind::Continue,
            Self::End => PacketKind::End,
        }
    }
}

/// Classified AVDTP signaling header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SignalingHeader {
    /// Raw header byte as captured
    pub raw: u8,
    /// 4-bit transaction label
    pub transaction_label: u8,
    /// Message type from bits 1-0
    pub message_type: MessageType,
    /// Fragmentation kind and the header bytes it implies
    pub fragment: FragmentFields,
}

impl SignalingHeader {
    /// Classify the signaling header at the cursor position
    ///
    /// # Errors
    /// Returns [`DecodeError::Truncated`] if the header byte, or a NOSP or
    /// signal-identifier byte the fragmentation kind requires, is absent
    pub fn parse(cursor: &mut FrameCursor<'_>) -> Result<Self, DecodeError> {
        let raw = cursor.read_u8()?;

        let fragment = match PacketKind::from_header(raw) {
            PacketKind::Single => FragmentFields::Single {
                signal_id: cursor.read_u8()? & SIGNAL_ID_MASK,
            },
            PacketKind::Start => {
                let nosp = cursor.read_u8()?;
                FragmentFields::Start {
                    nosp,
                    signal_id: cursor.read_u8()? & SIGNAL_ID_MASK,
                }
            }
            PacketKind::Continue => FragmentFields::Continue,
            PacketKind::End => FragmentFields::End,
        };

        Ok(Self {
            raw,
            transaction_label: raw >> 4,
            message_type: MessageType::from_header(raw),
            fragment,
        })
    }
}
