//! Captured Frame Input
//!
//! Input records handed to the decoder by the capture pipeline. The pipeline
//! demultiplexes L2CAP channels and marks each frame with the direction it
//! was observed in, the baseband connection it belongs to, and whether it was
//! carried on the AVDTP signaling channel or a media transport channel.

/// Identity of the baseband connection a captured frame belongs to.
///
/// Frames from independent connections may interleave; the reassembler keys
/// its buffers on this value so concurrent transactions never cross-talk.
pub type ConnectionId = u16;

/// Direction of a captured frame relative to the observed device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Received by the observed device
    Inbound,
    /// Sent by the observed device
    Outbound,
}

/// L2CAP channel class the capture pipeline assigned to the frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChannelKind {
    /// AVDTP signaling channel; frames are decoded
    Signaling,
    /// AVDTP media transport channel; frames pass through as a hexdump
    MediaTransport,
}

/// One captured frame as delivered by the capture pipeline
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CapturedFrame<'a> {
    /// Observed direction
    pub direction: Direction,
    /// Baseband connection the frame was captured on
    pub connection: ConnectionId,
    /// Channel class assigned by the L2CAP demultiplexer
    pub channel: ChannelKind,
    /// Raw frame bytes
    pub data: &'a [u8],
}

impl<'a> CapturedFrame<'a> {
    /// Create a new captured frame record
    #[must_use]
    pub fn new(
        direction: Direction,
        connection: ConnectionId,
        channel: ChannelKind,
        data: &'a [u8],
    ) -> Self {
        Self {
            direction,
            connection,
            channel,
            data,
        }
    }
}
