#![no_std]
#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod avdtp;
pub mod cursor;
pub mod frame;
pub mod sink;

#[cfg(test)]
pub(crate) mod testutil;

pub use avdtp::{AvdtpDecoder, DecodeError, MediaType, MessageType, PacketKind, SepType, SignalId};
pub use cursor::{FrameCursor, Truncated};
pub use frame::{CapturedFrame, ChannelKind, ConnectionId, Direction};
