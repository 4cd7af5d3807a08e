//! FIX session demo: build an order frame, round-trip it through the codec,
//! then drive a logon / order / logout cycle through the protocol adapter.

use anyhow::Result;
use clap::Parser;

use fen_bins::common::{self, CommonArgs};
use fen_core::core::{Order, OrderType, Side, Symbol, Tick};
use fen_core::fix::convert::tick_to_market_data_snapshot;
use fen_core::fix::message::{tags, FixMessage};
use fen_core::fix::FixProtocolAdapter;
use fen_core::time::clock;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    #[command(flatten)]
    common: CommonArgs,
}

fn main() -> Result<()> {
    let args = Args::parse();
    common::init_logging(&args.common.log_level)?;

    // Hand-built NEW_ORDER_SINGLE frame through the raw codec.
    let mut msg = FixMessage::new();
    msg.set_field(tags::MSG_TYPE, "D");
    msg.set_field(tags::SYMBOL, "AAPL");
    msg.set_field(tags::SIDE, "1");
    msg.set_int_field(tags::ORDER_QTY, 100);
    msg.set_price_field(tags::PRICE, 150.50);
    msg.set_int_field(tags::MSG_SEQ_NUM, 1);
    msg.set_field(tags::SENDER_COMP_ID, "CLIENT1");
    msg.set_field(tags::TARGET_COMP_ID, "EXCHANGE1");

    let wire = msg.to_wire();
    tracing::info!(frame = %msg, bytes = wire.len(), "serialized order frame");

    let parsed = FixMessage::parse(&wire);
    tracing::info!(
        valid = parsed.is_valid(),
        symbol = parsed.get_field(tags::SYMBOL).unwrap_or("?"),
        qty = parsed.get_int_field(tags::ORDER_QTY).unwrap_or(0),
        "parsed frame back"
    );

    // Session flow through the adapter, frames logged via the outbound sink.
    let mut adapter = FixProtocolAdapter::new("SIMEX", "CLIENT1", "EXCHANGE1");
    adapter.session_mut().set_outbound(Box::new(|frame| {
        tracing::info!(frame = %frame.replace('\u{1}', "|"), "outbound");
    }));

    adapter.connect();
    tracing::info!(connected = adapter.is_connected(), "session up");

    let order = Order::new(
        12_345,
        Symbol::new("MSFT"),
        Side::Buy,
        OrderType::Limit,
        300.25,
        500,
        "CLIENT1",
    );
    adapter.submit_order(&order);

    // A market-data snapshot frame built from a synthetic tick.
    let tick = Tick {
        symbol: Symbol::new("MSFT"),
        bid_price: 300.20,
        ask_price: 300.30,
        bid_size: 400,
        ask_size: 600,
        last_price: 300.25,
        last_size: 100,
        timestamp: clock::now(),
    };
    let snapshot = tick_to_market_data_snapshot(&tick);
    tracing::info!(frame = %snapshot, "snapshot frame");

    adapter.disconnect();
    tracing::info!(connected = adapter.is_connected(), "session down");

    Ok(())
}
