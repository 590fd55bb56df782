//! Fragment Reassembly
//!
//! Accumulates Start/Continue/End fragments belonging to one logical
//! signaling PDU so the dispatcher only ever sees complete payloads. Buffers
//! are keyed by `(connection, direction, transaction label)`; fragments for
//! independent connections or transactions may interleave freely without
//! cross-talk.
//!
//! A sequence that never sees its End fragment must not pin its buffer
//! forever: a new Start on a live key discards the stale buffer and
//! restarts, and buffers age out after [`STALE_AFTER_FRAMES`] decoded frames.

use super::{DecodeError, MAX_PDU_SIZE, MAX_PENDING_PDUS, MessageType, STALE_AFTER_FRAMES};
use crate::frame::{ConnectionId, Direction};
use heapless::{FnvIndexMap, Vec};

/// Identifies one in-flight fragmented PDU
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReassemblyKey {
    /// Baseband connection the fragments arrive on
    pub connection: ConnectionId,
    /// Observed direction of the fragments
    pub direction: Direction,
    /// 4-bit transaction label shared by all fragments of the PDU
    pub transaction_label: u8,
}

impl ReassemblyKey {
    /// Create a reassembly key
    #[must_use]
    pub fn new(connection: ConnectionId, direction: Direction, transaction_label: u8) -> Self {
        Self {
            connection,
            direction,
            transaction_label,
        }
    }
}

/// Payload accumulated for one fragmented PDU
#[derive(Debug, Clone)]
struct ReassemblyBuffer {
    message_type: MessageType,
    signal_id: u8,
    nosp: u8,
    created_at: u32,
    payload: Vec<u8, MAX_PDU_SIZE>,
}

/// One logical signaling PDU, handed back once its End fragment arrives
#[derive(Debug, Clone)]
pub struct CompletedPdu {
    /// Message type recorded from the Start fragment's header
    pub message_type: MessageType,
    /// Signal identifier read from the Start fragment
    pub signal_id: u8,
    /// Declared fragment count from the Start fragment
    pub nosp: u8,
    /// Concatenated payload of all fragments in arrival order
    pub payload: Vec<u8, MAX_PDU_SIZE>,
}

/// Reassembly cache for fragmented signaling PDUs
#[derive(Debug)]
pub struct Reassembler {
    pending: FnvIndexMap<ReassemblyKey, ReassemblyBuffer, MAX_PENDING_PDUS>,
    frame_counter: u32,
}

impl Reassembler {
    /// Create an empty reassembler
    #[must_use]
    pub fn new() -> Self {
        Self {
            pending: FnvIndexMap::new(),
            frame_counter: 0,
        }
    }

    /// Advance the frame counter and age out incomplete sequences
    ///
    /// Called once per decoded frame; buffers that have not completed within
    /// [`STALE_AFTER_FRAMES`] frames are discarded.
    pub fn tick(&mut self) {
        self.frame_counter = self.frame_counter.wrapping_add(1);
        let now = self.frame_counter;

        let mut stale: Vec<ReassemblyKey, MAX_PENDING_PDUS> = Vec::new();
        for (key, buffer) in &self.pending {
            if now.wrapping_sub(buffer.created_at) >= STALE_AFTER_FRAMES {
                // Capacity matches the map, push cannot fail
                let _ = stale.push(*key);
            }
        }
        for key in &stale {
            self.pending.remove(key);
            #[cfg(feature = "defmt")]
            defmt::debug!(
                "[AVDTP] evicted stale reassembly buffer, label {}",
                key.transaction_label
            );
        }
    }

    /// Open a reassembly buffer for a Start fragment
    ///
    /// A Start reusing a still-open key discards the stale sequence and
    /// restarts it.
    ///
    /// # Errors
    /// Returns [`DecodeError::PayloadTooLarge`] if the fragment payload
    /// exceeds the buffer capacity
    pub fn start(
        &mut self,
        key: ReassemblyKey,
        message_type: MessageType,
        signal_id: u8,
        nosp: u8,
        payload: &[u8],
    ) -> Result<(), DecodeError> {
        if self.pending.remove(&key).is_some() {
            #[cfg(feature = "defmt")]
            defmt::warn!(
                "[AVDTP] start fragment reuses open transaction, label {}",
                key.transaction_label
            );
        }

        let mut buffer = ReassemblyBuffer {
            message_type,
            signal_id,
            nosp,
            created_at: self.frame_counter,
            payload: Vec::new(),
        };
        buffer
            .payload
            .extend_from_slice(payload)
            .map_err(|()| DecodeError::PayloadTooLarge)?;

        if self.pending.len() == MAX_PENDING_PDUS {
            self.evict_oldest();
        }
        if self.pending.insert(key, buffer).is_err() {
            return Err(DecodeError::PayloadTooLarge);
        }
        Ok(())
    }

    /// Append a Continue fragment's payload to its open buffer
    ///
    /// # Errors
    /// Returns [`DecodeError::UnexpectedContinuation`] if no buffer is open
    /// for the key, or [`DecodeError::PayloadTooLarge`] if the accumulated
    /// payload overflows (the broken sequence is dropped)
    pub fn continuation(&mut self, key: ReassemblyKey, payload: &[u8]) -> Result<(), DecodeError> {
        let buffer = self
            .pending
            .get_mut(&key)
            .ok_or(DecodeError::UnexpectedContinuation)?;

        if buffer.payload.extend_from_slice(payload).is_err() {
            self.pending.remove(&key);
            return Err(DecodeError::PayloadTooLarge);
        }
        Ok(())
    }

    /// Close a buffer with an End fragment and hand back the completed PDU
    ///
    /// # Errors
    /// Returns [`DecodeError::UnexpectedContinuation`] if no buffer is open
    /// for the key, or [`DecodeError::PayloadTooLarge`] if the final payload
    /// overflows
    pub fn end(&mut self, key: ReassemblyKey, payload: &[u8]) -> Result<CompletedPdu, DecodeError> {
        let mut buffer = self
            .pending
            .remove(&key)
            .ok_or(DecodeError::UnexpectedContinuation)?;

        buffer
            .payload
            .extend_from_slice(payload)
            .map_err(|()| DecodeError::PayloadTooLarge)?;

        Ok(CompletedPdu {
            message_type: buffer.message_type,
            signal_id: buffer.signal_id,
            nosp: buffer.nosp,
            payload: buffer.payload,
        })
    }

    /// Number of fragmented PDUs currently awaiting completion
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.pending.len()
    }

    fn evict_oldest(&mut self) {
        let now = self.frame_counter;
        let oldest = self
            .pending
            .iter()
            .max_by_key(|(_, buffer)| now.wrapping_sub(buffer.created_at))
            .map(|(key, _)| *key);
        if let Some(key) = oldest {
            self.pending.remove(&key);
            #[cfg(feature = "defmt")]
            defmt::warn!(
                "[AVDTP] reassembly cache full, evicted oldest buffer, label {}",
                key.transaction_label
            );
        }
    }
}

impl Default for Reassembler {
    fn default() -> Self {
        Self::new()
    }
}
