//! Symbol Tables
//!
//! Pure, total lookups mapping small protocol codes to display names. Every
//! function here returns a name for every possible input; unrecognized codes
//! map to `"Unknown"` or `"Reserved"` rather than failing.

use super::{MessageType, dispatch};

/// Display name for a message type
#[must_use]
pub const fn message_type_name(message_type: MessageType) -> &'static str {
    match message_type {
        MessageType::Command => "Command",
        MessageType::GeneralReject => "General Reject",
        MessageType::ResponseAccept => "Response Accept",
        MessageType::ResponseReject => "Response Reject",
    }
}

/// Display name for a raw 6-bit signal identifier
///
/// Resolved through the dispatch descriptor table so names and decoders are
/// registered in one place; unregistered identifiers are `"Reserved"`.
#[must_use]
pub fn signal_name(signal_id: u8) -> &'static str {
    dispatch::lookup(signal_id).map_or("Reserved", |descriptor| descriptor.name)
}

/// Display name for a raw 4-bit media type code
#[must_use]
pub const fn media_type_name(code: u8) -> &'static str {
    match code {
        0x00 => "Audio",
        0x01 => "Video",
        0x02 => "Multimedia",
        _ => "Reserved",
    }
}

/// Display name for an AVDTP error code
///
/// Total over all byte values; codes without a standard name map to
/// `"Unknown"`.
#[must_use]
pub const fn error_name(error: u8) -> &'static str {
    match error {
        0x01 => "BAD_HEADER_FORMAT",
        0x11 => "BAD_LENGTH",
        0x12 => "BAD_ACP_SEID",
        0x13 => "SEP_IN_USE",
        0x14 => "SEP_NOT_IN_USER",
        0x17 => "BAD_SERV_CATEGORY",
        0x18 => "BAD_PAYLOAD_FORMAT",
        0x19 => "NOT_SUPPORTED_COMMAND",
        0x1A => "INVALID_CAPABILITIES",
        0x22 => "BAD_RECOVERY_TYPE",
        0x23 => "BAD_MEDIA_TRANSPORT_FORMAT",
        0x25 => "BAD_RECOVERY_FORMAT",
        0x26 => "BAD_ROHC_FORMAT",
        0x27 => "BAD_CP_FORMAT",
        0x28 => "BAD_MULTIPLEXING_FORMAT",
        0x29 => "UNSUPPORTED_CONFIGURATION",
        0x31 => "BAD_STATE",
        _ => "Unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_type_names() {
        assert_eq!(message_type_name(MessageType::Command), "Command");
        assert_eq!(message_type_name(MessageType::GeneralReject), "General Reject");
        assert_eq!(
            message_type_name(MessageType::ResponseAccept),
            "Response Accept"
        );
        assert_eq!(
            message_type_name(MessageType::ResponseReject),
            "Response Reject"
        );
    }

    #[test]
    fn test_signal_names() {
        assert_eq!(signal_name(0x01), "Discover");
        assert_eq!(signal_name(0x02), "Get Capabilities");
        assert_eq!(signal_name(0x0C), "Get All Capabilities");
        assert_eq!(signal_name(0x0D), "Delay Report");
        assert_eq!(signal_name(0x00), "Reserved");
        assert_eq!(signal_name(0x0E), "Reserved");
        assert_eq!(signal_name(0x3F), "Reserved");
    }

    #[test]
    fn test_media_type_names() {
        assert_eq!(media_type_name(0x00), "Audio");
        assert_eq!(media_type_name(0x01), "Video");
        assert_eq!(media_type_name(0x02), "Multimedia");
        assert_eq!(media_type_name(0x03), "Reserved");
        assert_eq!(media_type_name(0x0F), "Reserved");
    }

    #[test]
    fn test_error_names() {
        assert_eq!(error_name(0x01), "BAD_HEADER_FORMAT");
        assert_eq!(error_name(0x13), "SEP_IN_USE");
        assert_eq!(error_name(0x29), "UNSUPPORTED_CONFIGURATION");
        assert_eq!(error_name(0x31), "BAD_STATE");
        assert_eq!(error_name(0x00), "Unknown");
        assert_eq!(error_name(0xFF), "Unknown");
    }

    #[test]
    fn test_error_names_are_total() {
        for error in 0x00..=0xFF_u8 {
            assert!(!error_name(error).is_empty());
        }
    }
}
