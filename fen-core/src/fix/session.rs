//! FIX session engine: sequence numbering, logon state, dispatch.

use std::collections::HashMap;
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::core::{Order, OrderId, Side, Symbol};
use crate::fix::message::{msg_type, tags, FixMessage};

/// Handler invoked for an inbound message of a registered type.
pub type MessageHandler = Box<dyn FnMut(&FixMessage) + Send>;

/// Sink receiving serialized outbound frames.
pub type OutboundSink = Box<dyn FnMut(&str) + Send>;

/// Errors surfaced by inbound message processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Frame failed validation (missing protocol id, type, or sequence).
    InvalidMessage,
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::InvalidMessage => f.write_str("invalid FIX message"),
        }
    }
}

impl std::error::Error for SessionError {}

const KNOWN_TYPES: &[&str] = &[
    msg_type::LOGON,
    msg_type::LOGOUT,
    msg_type::HEARTBEAT,
    msg_type::TEST_REQUEST,
    msg_type::NEW_ORDER_SINGLE,
    msg_type::ORDER_CANCEL_REQUEST,
    msg_type::EXECUTION_REPORT,
    msg_type::MARKET_DATA_REQUEST,
    msg_type::MARKET_DATA_SNAPSHOT,
    msg_type::MARKET_DATA_INCREMENTAL_REFRESH,
];

/// One peer session: comp ids, outbound sequence counter, logon flag, and a
/// type-keyed handler table.
///
/// Single-writer: the owning thread drives all calls; handlers run inline.
pub struct FixSession {
    sender_comp_id: String,
    target_comp_id: String,
    next_seq_num: u64,
    logged_on: bool,
    handlers: HashMap<String, MessageHandler>,
    outbound: OutboundSink,
    parse_errors: u64,
    unknown_types: u64,
}

impl FixSession {
    pub fn new(sender_comp_id: impl Into<String>, target_comp_id: impl Into<String>) -> Self {
        Self {
            sender_comp_id: sender_comp_id.into(),
            target_comp_id: target_comp_id.into(),
            next_seq_num: 1,
            logged_on: false,
            handlers: HashMap::new(),
            outbound: Box::new(|frame| {
                tracing::debug!(frame = %frame.replace('\u{1}', "|"), "outbound FIX frame");
            }),
            parse_errors: 0,
            unknown_types: 0,
        }
    }

    /// Replace the outbound frame sink.
    pub fn set_outbound(&mut self, sink: OutboundSink) {
        self.outbound = sink;
    }

    /// Register (or replace) the handler for a message type.
    pub fn set_message_handler(&mut self, message_type: &str, handler: MessageHandler) {
        self.handlers.insert(message_type.to_string(), handler);
    }

    pub fn is_logged_on(&self) -> bool {
        self.logged_on
    }

    /// Next sequence number that will be assigned to an outbound frame.
    pub fn next_seq_num(&self) -> u64 {
        self.next_seq_num
    }

    pub fn parse_error_count(&self) -> u64 {
        self.parse_errors
    }

    pub fn unknown_type_count(&self) -> u64 {
        self.unknown_types
    }

    /// Emit a LOGON frame and enter the logged-on state.
    pub fn logon(&mut self) {
        let mut msg = FixMessage::new();
        msg.set_field(tags::MSG_TYPE, msg_type::LOGON);
        self.send_message(&mut msg);
        self.logged_on = true;
        tracing::info!(sender = %self.sender_comp_id, target = %self.target_comp_id, "FIX session logged on");
    }

    /// Emit a LOGOUT frame and leave the logged-on state. No-op when not
    /// logged on.
    pub fn logout(&mut self) {
        if !self.logged_on {
            return;
        }
        let mut msg = FixMessage::new();
        msg.set_field(tags::MSG_TYPE, msg_type::LOGOUT);
        self.send_message(&mut msg);
        self.logged_on = false;
        tracing::info!(sender = %self.sender_comp_id, "FIX session logged out");
    }

    /// Stamp missing header fields (sequence, comp ids, sending time),
    /// serialize, and emit.
    ///
    /// Sequence numbers are assigned monotonically and never reused.
    pub fn send_message(&mut self, msg: &mut FixMessage) {
        if !msg.has_field(tags::MSG_SEQ_NUM) {
            let seq = self.take_seq_num();
            msg.set_int_field(tags::MSG_SEQ_NUM, seq as i64);
        }
        if !msg.has_field(tags::SENDER_COMP_ID) {
            self.stamp_header(msg);
        }

        let wire = msg.to_wire();
        (self.outbound)(&wire);
    }

    pub fn send_heartbeat(&mut self) {
        let mut msg = FixMessage::new();
        msg.set_field(tags::MSG_TYPE, msg_type::HEARTBEAT);
        self.send_message(&mut msg);
    }

    pub fn send_test_request(&mut self, test_req_id: &str) {
        let mut msg = FixMessage::new();
        msg.set_field(tags::MSG_TYPE, msg_type::TEST_REQUEST);
        msg.set_field(tags::TEST_REQ_ID, test_req_id);
        self.send_message(&mut msg);
    }

    /// Emit a NEW_ORDER_SINGLE for `order`.
    pub fn send_new_order(&mut self, order: &Order) {
        let mut msg = FixMessage::new();
        msg.set_field(tags::MSG_TYPE, msg_type::NEW_ORDER_SINGLE);
        msg.set_field(tags::ORDER_ID, order.id.to_string());
        msg.set_field(tags::SYMBOL, order.symbol.as_str());
        msg.set_field(
            tags::SIDE,
            match order.side {
                Side::Buy => "1",
                Side::Sell => "2",
            },
        );
        msg.set_int_field(tags::ORDER_QTY, order.quantity);
        msg.set_price_field(tags::PRICE, order.price);
        self.send_message(&mut msg);
    }

    /// Emit an ORDER_CANCEL_REQUEST for a previously sent order.
    pub fn send_cancel_request(&mut self, order_id: OrderId, symbol: Symbol) {
        let mut msg = FixMessage::new();
        msg.set_field(tags::MSG_TYPE, msg_type::ORDER_CANCEL_REQUEST);
        msg.set_field(tags::ORDER_ID, order_id.to_string());
        msg.set_field(tags::SYMBOL, symbol.as_str());
        self.send_message(&mut msg);
    }

    /// Emit one MARKET_DATA_REQUEST (subscribe) frame per symbol.
    pub fn subscribe_market_data(&mut self, symbols: &[Symbol]) {
        for symbol in symbols {
            self.send_market_data_request(*symbol, "1");
        }
    }

    /// Emit one MARKET_DATA_REQUEST (unsubscribe) frame per symbol.
    pub fn unsubscribe_market_data(&mut self, symbols: &[Symbol]) {
        for symbol in symbols {
            self.send_market_data_request(*symbol, "2");
        }
    }

    fn send_market_data_request(&mut self, symbol: Symbol, request_type: &str) {
        let mut msg = FixMessage::new();
        msg.set_field(tags::MSG_TYPE, msg_type::MARKET_DATA_REQUEST);
        msg.set_field(tags::SUBSCRIPTION_REQUEST_TYPE, request_type);
        msg.set_field(tags::SYMBOL, symbol.as_str());
        self.send_message(&mut msg);
    }

    /// Parse and dispatch one inbound frame.
    ///
    /// Malformed frames are dropped with an error-counter increment and no
    /// session-state change. Unknown message types are counted but not
    /// fatal. Built-in handling: LOGON/LOGOUT flip the logon flag,
    /// TEST_REQUEST answers with a HEARTBEAT; everything else is forwarded to
    /// the registered handler for its type, if any.
    pub fn process_message(&mut self, raw: &str) -> Result<(), SessionError> {
        let msg = FixMessage::parse(raw);
        if !msg.is_valid() {
            self.parse_errors += 1;
            tracing::warn!("dropping invalid FIX message");
            return Err(SessionError::InvalidMessage);
        }

        let message_type = msg.message_type().unwrap_or_default().to_string();
        match message_type.as_str() {
            msg_type::LOGON => {
                self.logged_on = true;
                tracing::debug!("received LOGON");
            }
            msg_type::LOGOUT => {
                self.logged_on = false;
                tracing::debug!("received LOGOUT");
            }
            msg_type::TEST_REQUEST => {
                tracing::debug!("received TEST_REQUEST, answering with heartbeat");
                self.send_heartbeat();
            }
            msg_type::HEARTBEAT => {
                tracing::trace!("received HEARTBEAT");
            }
            other if !KNOWN_TYPES.contains(&other) => {
                self.unknown_types += 1;
                tracing::debug!(message_type = other, "no handler for message type");
            }
            _ => {}
        }

        if let Some(handler) = self.handlers.get_mut(&message_type) {
            handler(&msg);
        }

        Ok(())
    }

    fn take_seq_num(&mut self) -> u64 {
        let seq = self.next_seq_num;
        self.next_seq_num += 1;
        seq
    }

    fn stamp_header(&self, msg: &mut FixMessage) {
        msg.set_field(tags::SENDER_COMP_ID, self.sender_comp_id.clone());
        msg.set_field(tags::TARGET_COMP_ID, self.target_comp_id.clone());
        msg.set_field(tags::SENDING_TIME, utc_sending_time());
    }
}

/// UTC timestamp in FIX `YYYYMMDD-HH:MM:SS` form.
///
/// Wall time is acceptable here: SENDING_TIME is a wire annotation, not a
/// latency measurement.
fn utc_sending_time() -> String {
    let unix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();

    let days = unix / 86_400;
    let secs_of_day = unix % 86_400;
    let (year, month, day) = civil_from_days(days as i64);

    format!(
        "{:04}{:02}{:02}-{:02}:{:02}:{:02}",
        year,
        month,
        day,
        secs_of_day / 3_600,
        (secs_of_day / 60) % 60,
        secs_of_day % 60
    )
}

/// Days-since-epoch to (year, month, day), Howard Hinnant's civil algorithm.
fn civil_from_days(z: i64) -> (i64, u32, u32) {
    let z = z + 719_468;
    let era = if z >= 0 { z } else { z - 146_096 } / 146_097;
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1_460 + doe / 36_524 - doe / 146_096) / 365;
    let y = yoe + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let d = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let m = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = if m <= 2 { y + 1 } else { y };
    (year, m as u32, d)
}
