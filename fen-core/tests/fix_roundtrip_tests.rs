//! FIX codec round-trip and session sequencing, end to end.

use std::sync::{Arc, Mutex};

use fen_core::core::{Order, OrderType, Side, Symbol};
use fen_core::fix::message::{checksum, msg_type, tags, FixMessage, SOH};
use fen_core::fix::FixSession;

fn build_order_frame() -> FixMessage {
    let mut msg = FixMessage::new();
    msg.set_field(tags::MSG_TYPE, "D");
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
fn serialize_parse_reserialize_is_byte_identical() {
    let original = build_order_frame();
    let wire = original.to_wire();

    let parsed = FixMessage::parse(&wire);
    assert!(parsed.is_valid());
    assert_eq!(parsed.get_field(tags::BEGIN_STRING), Some("FIX.4.4"));

    let rewire = parsed.to_wire();
    assert_eq!(rewire, wire, "round-trip changed bytes");
}

#[test]
fn body_length_matches_serialized_body() {
    let wire = build_order_frame().to_wire();
    let parsed = FixMessage::parse(&wire);

    let declared = parsed.get_int_field(tags::BODY_LENGTH).unwrap() as usize;

    // Body runs from just past the 9= field's SOH to the start of "10=".
    let len_field_start = wire.find("\u{1}9=").unwrap() + 1;
    let body_start = len_field_start + wire[len_field_start..].find(SOH).unwrap() + 1;
    let checksum_start = wire.rfind("10=").unwrap();

    assert_eq!(declared, checksum_start - body_start);
}

#[test]
fn checksum_is_prefix_sum_mod_256() {
    let wire = build_order_frame().to_wire();
    let checksum_start = wire.rfind("10=").unwrap();

    let declared: u32 = wire[checksum_start + 3..checksum_start + 6].parse().unwrap();
    assert_eq!(declared, checksum(&wire[..checksum_start]) as u32);
}

#[test]
fn every_handled_type_roundtrips() {
    for mt in [
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
    ] {
        let mut msg = FixMessage::new();
        msg.set_field(tags::MSG_TYPE, mt);
        msg.set_int_field(tags::MSG_SEQ_NUM, 7);

        let wire = msg.to_wire();
        let parsed = FixMessage::parse(&wire);
        assert_eq!(parsed.message_type(), Some(mt));
        assert_eq!(parsed.to_wire(), wire);
    }
}

#[test]
fn session_order_flow_end_to_end() {
    let frames = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&frames);

    let mut client = FixSession::new("CLIENT1", "EXCHANGE1");
    client.set_outbound(Box::new(move |frame| {
        sink.lock().unwrap().push(frame.to_string());
    }));

    client.logon();
    let order = Order::new(
        1001,
        Symbol::new("AAPL"),
        Side::Buy,
        OrderType::Limit,
        150.50,
        100,
        "CLIENT1",
    );
    client.send_new_order(&order);
    client.logout();

    let frames = frames.lock().unwrap();
    assert_eq!(frames.len(), 3);

    // Sequence numbers form 1, 2, 3 - strictly increasing and contiguous.
    let seqs: Vec<i64> = frames
        .iter()
        .map(|raw| {
            let msg = FixMessage::parse(raw);
            assert!(msg.is_valid());
            msg.get_int_field(tags::MSG_SEQ_NUM).unwrap()
        })
        .collect();
    assert_eq!(seqs, vec![1, 2, 3]);

    // Every emitted frame is parseable by a peer session.
    let mut exchange = FixSession::new("EXCHANGE1", "CLIENT1");
    let received = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&received);
    exchange.set_message_handler(
        msg_type::NEW_ORDER_SINGLE,
        Box::new(move |msg| {
            log.lock()
                .unwrap()
                .push(msg.get_field(tags::SYMBOL).unwrap_or("").to_string());
        }),
    );

    for raw in frames.iter() {
        exchange.process_message(raw).unwrap();
    }

    assert_eq!(received.lock().unwrap().as_slice(), &["AAPL".to_string()]);
    // Client's logon/logout drove the exchange-side flag through the cycle.
    assert!(!exchange.is_logged_on());
    assert_eq!(exchange.parse_error_count(), 0);
}
