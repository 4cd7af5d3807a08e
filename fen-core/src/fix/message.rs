//! FIX tag=value frame codec.
//!
//! Wire layout: `8=FIX.4.4␁9=<len>␁35=<type>␁<tags ascending>␁10=<cks>␁`
//! where `␁` is the SOH byte (0x01). The body length counts every byte after
//! the `9=` field up to and excluding the `10=` field; the checksum is the
//! byte sum of everything before the `10=` field, modulo 256, rendered as
//! exactly three zero-padded digits.

use std::collections::BTreeMap;
use std::fmt;

/// Field separator byte.
pub const SOH: char = '\u{0001}';

/// Protocol identifier carried in tag 8.
pub const BEGIN_STRING: &str = "FIX.4.4";

/// FIX message types handled by the session engine.
pub mod msg_type {
    pub const LOGON: &str = "A";
    pub const LOGOUT: &str = "5";
    pub const HEARTBEAT: &str = "0";
    pub const TEST_REQUEST: &str = "1";
    pub const NEW_ORDER_SINGLE: &str = "D";
    pub const ORDER_CANCEL_REQUEST: &str = "F";
    pub const EXECUTION_REPORT: &str = "8";
    pub const MARKET_DATA_REQUEST: &str = "V";
    pub const MARKET_DATA_SNAPSHOT: &str = "W";
    pub const MARKET_DATA_INCREMENTAL_REFRESH: &str = "X";
}

/// Field tags.
pub mod tags {
    pub const BEGIN_STRING: u32 = 8;
    pub const BODY_LENGTH: u32 = 9;
    pub const CHECKSUM: u32 = 10;
    pub const LAST_PX: u32 = 31;
    pub const LAST_SHARES: u32 = 32;
    pub const MSG_SEQ_NUM: u32 = 34;
    pub const MSG_TYPE: u32 = 35;
    pub const ORDER_ID: u32 = 37;
    pub const ORDER_QTY: u32 = 38;
    pub const ORDER_STATUS: u32 = 39;
    pub const PRICE: u32 = 44;
    pub const SENDER_COMP_ID: u32 = 49;
    pub const SENDING_TIME: u32 = 52;
    pub const SIDE: u32 = 54;
    pub const SYMBOL: u32 = 55;
    pub const TARGET_COMP_ID: u32 = 56;
    pub const TEST_REQ_ID: u32 = 112;
    pub const BID_PX: u32 = 132;
    pub const ASK_PX: u32 = 133;
    pub const BID_SIZE: u32 = 134;
    pub const ASK_SIZE: u32 = 135;
    pub const EXEC_TYPE: u32 = 150;
    pub const SUBSCRIPTION_REQUEST_TYPE: u32 = 263;
}

/// Modulo-256 checksum over raw bytes.
#[inline]
pub fn checksum(data: &str) -> u8 {
    data.bytes().fold(0u8, |acc, b| acc.wrapping_add(b))
}

/// A FIX frame: an ordered tag → value mapping.
///
/// Tags 8 (protocol), 9 (body length) and 10 (checksum) are derived fields:
/// attempts to set them are ignored and they are regenerated on every
/// serialization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixMessage {
    fields: BTreeMap<u32, String>,
}

impl FixMessage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a raw frame. Parsing is lenient: a malformed header (missing
    /// `=`, non-numeric tag) terminates the scan and the message keeps the
    /// fields parsed so far. Validity is checked separately via
    /// [`is_valid`](Self::is_valid).
    pub fn parse(raw: &str) -> Self {
        let mut fields = BTreeMap::new();
        let mut rest = raw;

        while !rest.is_empty() {
            let Some(eq) = rest.find('=') else { break };
            let Ok(tag) = rest[..eq].parse::<u32>() else {
                break;
            };

            let value_and_tail = &rest[eq + 1..];
            let (value, tail) = match value_and_tail.find(SOH) {
                Some(soh) => (&value_and_tail[..soh], &value_and_tail[soh + 1..]),
                // Unterminated trailing value: keep it and stop.
                None => (value_and_tail, ""),
            };

            fields.insert(tag, value.to_string());
            rest = tail;
        }

        Self { fields }
    }

    /// Set a string field. Reserved tags (8, 9, 10) are ignored.
    pub fn set_field(&mut self, tag: u32, value: impl Into<String>) {
        if Self::is_reserved(tag) {
            return;
        }
        self.fields.insert(tag, value.into());
    }

    /// Set an integer field.
    pub fn set_int_field(&mut self, tag: u32, value: i64) {
        self.set_field(tag, value.to_string());
    }

    /// Set a price field, formatted fixed-point with two fractional digits.
    pub fn set_price_field(&mut self, tag: u32, value: f64) {
        self.set_field(tag, format!("{:.2}", value));
    }

    pub fn get_field(&self, tag: u32) -> Option<&str> {
        self.fields.get(&tag).map(String::as_str)
    }

    pub fn get_int_field(&self, tag: u32) -> Option<i64> {
        self.get_field(tag)?.parse().ok()
    }

    pub fn get_float_field(&self, tag: u32) -> Option<f64> {
        self.get_field(tag)?.parse().ok()
    }

    pub fn has_field(&self, tag: u32) -> bool {
        self.fields.contains_key(&tag)
    }

    /// Value of the message-type tag (35), if present.
    pub fn message_type(&self) -> Option<&str> {
        self.get_field(tags::MSG_TYPE)
    }

    /// A frame is valid when it carries the protocol identifier, a message
    /// type, and a sequence number.
    pub fn is_valid(&self) -> bool {
        self.has_field(tags::BEGIN_STRING)
            && self.has_field(tags::MSG_TYPE)
            && self.has_field(tags::MSG_SEQ_NUM)
    }

    /// Serialize to the wire form, regenerating protocol identifier, body
    /// length, and checksum.
    ///
    /// Field order is deterministic: 8, 9, then 35, then the remaining tags
    /// in ascending numeric order, then 10.
    pub fn to_wire(&self) -> String {
        let mut body = String::new();

        if let Some(mt) = self.fields.get(&tags::MSG_TYPE) {
            push_field(&mut body, tags::MSG_TYPE, mt);
        }
        for (&tag, value) in &self.fields {
            if Self::is_reserved(tag) || tag == tags::MSG_TYPE {
                continue;
            }
            push_field(&mut body, tag, value);
        }

        let mut wire = String::with_capacity(body.len() + 32);
        push_field(&mut wire, tags::BEGIN_STRING, BEGIN_STRING);
        push_field(&mut wire, tags::BODY_LENGTH, &body.len().to_string());
        wire.push_str(&body);

        let cks = checksum(&wire);
        wire.push_str(&format!("10={:03}{}", cks, SOH));
        wire
    }

    fn is_reserved(tag: u32) -> bool {
        matches!(tag, tags::BEGIN_STRING | tags::BODY_LENGTH | tags::CHECKSUM)
    }
}

fn push_field(out: &mut String, tag: u32, value: &str) {
    out.push_str(&tag.to_string());
    out.push('=');
    out.push_str(value);
    out.push(SOH);
}

impl fmt::Display for FixMessage {
    /// Human-readable rendering with `|` in place of SOH.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_wire().replace(SOH, "|"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_order_message() -> FixMessage {
        let mut msg = FixMessage::new();
        msg.set_field(tags::MSG_TYPE, msg_type::NEW_ORDER_SINGLE);
        msg.set_field(tags::SENDER_COMP_ID, "CLIENT1");
        msg.set_field(tags::TARGET_COMP_ID, "EXCHANGE1");
        msg.set_int_field(tags::MSG_SEQ_NUM, 1);
        msg.set_field(tags::SYMBOL, "AAPL");
        msg.set_field(tags::SIDE, "1");
        msg.set_field(tags::ORDER_QTY, "100");
        msg.set_field(tags::PRICE, "150.50");
        msg
    }

    #[test]
    fn wire_starts_with_header_and_ends_with_checksum() {
        let wire = sample_order_message().to_wire();
        assert!(wire.starts_with("8=FIX.4.4\u{1}9="));

        let trailer_at = wire.rfind("10=").unwrap();
        assert_eq!(wire.len() - trailer_at, "10=XXX\u{1}".len());
        assert!(wire.ends_with(SOH));
    }

    #[test]
    fn message_type_precedes_other_body_tags() {
        let wire = sample_order_message().to_wire();
        let type_at = wire.find("35=").unwrap();
        let seq_at = wire.find("34=").unwrap();
        assert!(type_at < seq_at);
    }

    #[test]
    fn body_length_counts_body_bytes_exactly() {
        let msg = sample_order_message();
        let wire = msg.to_wire();

        let parsed = FixMessage::parse(&wire);
        let body_length = parsed.get_int_field(tags::BODY_LENGTH).unwrap() as usize;

        // Body spans from after the 9= field to the start of the 10= field.
        let after_len_field = wire.find("35=").unwrap();
        let checksum_at = wire.rfind("10=").unwrap();
        assert_eq!(body_length, checksum_at - after_len_field);
    }

    #[test]
    fn checksum_validates() {
        let wire = sample_order_message().to_wire();
        let checksum_at = wire.rfind("10=").unwrap();

        let declared: u32 = wire[checksum_at + 3..checksum_at + 6].parse().unwrap();
        let computed = checksum(&wire[..checksum_at]) as u32;
        assert_eq!(declared, computed);
    }

    #[test]
    fn checksum_is_three_zero_padded_digits() {
        // An empty message still serializes with a well-formed trailer.
        let wire = FixMessage::new().to_wire();
        let checksum_at = wire.rfind("10=").unwrap();
        let digits = &wire[checksum_at + 3..checksum_at + 6];
        assert_eq!(digits.len(), 3);
        assert!(digits.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn roundtrip_is_byte_identical() {
        let wire = sample_order_message().to_wire();
        let reparsed = FixMessage::parse(&wire);
        assert_eq!(reparsed.to_wire(), wire);
    }

    #[test]
    fn parse_extracts_fields() {
        let wire = sample_order_message().to_wire();
        let parsed = FixMessage::parse(&wire);

        assert!(parsed.is_valid());
        assert_eq!(parsed.get_field(tags::BEGIN_STRING), Some("FIX.4.4"));
        assert_eq!(parsed.message_type(), Some("D"));
        assert_eq!(parsed.get_int_field(tags::MSG_SEQ_NUM), Some(1));
        assert_eq!(parsed.get_field(tags::SYMBOL), Some("AAPL"));
        assert_eq!(parsed.get_float_field(tags::PRICE), Some(150.50));
    }

    #[test]
    fn parse_stops_at_malformed_header() {
        let msg = FixMessage::parse("35=D\u{1}garbage\u{1}55=AAPL\u{1}");
        assert_eq!(msg.message_type(), Some("D"));
        // Everything after the malformed field is discarded.
        assert!(!msg.has_field(tags::SYMBOL));
    }

    #[test]
    fn parse_keeps_unterminated_trailing_value() {
        let msg = FixMessage::parse("35=D\u{1}55=AAPL");
        assert_eq!(msg.get_field(tags::SYMBOL), Some("AAPL"));
    }

    #[test]
    fn parse_empty_input() {
        let msg = FixMessage::parse("");
        assert!(!msg.is_valid());
    }

    #[test]
    fn reserved_tags_cannot_be_set() {
        let mut msg = FixMessage::new();
        msg.set_field(tags::BEGIN_STRING, "FIX.9.9");
        msg.set_field(tags::BODY_LENGTH, "9999");
        msg.set_field(tags::CHECKSUM, "123");
        msg.set_field(tags::MSG_TYPE, msg_type::HEARTBEAT);
        msg.set_int_field(tags::MSG_SEQ_NUM, 1);

        let wire = msg.to_wire();
        assert!(wire.starts_with("8=FIX.4.4\u{1}"));
        assert!(!wire.contains("FIX.9.9"));
        assert!(!wire.contains("9=9999\u{1}"));
    }

    #[test]
    fn price_field_formats_two_decimals() {
        let mut msg = FixMessage::new();
        msg.set_price_field(tags::PRICE, 150.5);
        assert_eq!(msg.get_field(tags::PRICE), Some("150.50"));

        msg.set_price_field(tags::PRICE, 0.1 + 0.2);
        assert_eq!(msg.get_field(tags::PRICE), Some("0.30"));
    }

    #[test]
    fn display_uses_pipes() {
        let mut msg = FixMessage::new();
        msg.set_field(tags::MSG_TYPE, msg_type::HEARTBEAT);
        let shown = format!("{}", msg);
        assert!(shown.contains("35=0|"));
        assert!(!shown.contains(SOH));
    }
}
